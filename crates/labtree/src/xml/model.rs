//! XML data model

use indexmap::IndexMap;

/// XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// XML element
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
}

impl Element {
    /// Returns the attribute value if present, None otherwise
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Iterate over child elements, skipping text content
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Content::Element(el) => Some(el),
            Content::Text(_) => None,
        })
    }

    /// Returns the first descendant element with the given name,
    /// searching depth-first
    pub fn descendant(&self, name: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text of this element and its descendants, in document
    /// order, with each fragment trimmed and fragments joined by a space
    pub fn collected_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        self.collect_text_into(&mut parts);
        parts.join(" ")
    }

    fn collect_text_into(&self, parts: &mut Vec<String>) {
        for child in &self.children {
            match child {
                Content::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        parts.push(trimmed.to_string());
                    }
                }
                Content::Element(el) => el.collect_text_into(parts),
            }
        }
    }
}
