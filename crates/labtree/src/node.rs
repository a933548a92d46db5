//! Canonical named-node tree

use indexmap::IndexMap;

/// A node in the canonical content tree.
///
/// Attribute order is insertion order and survives serialization.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attrib: IndexMap<String, String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<Node>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub text: Option<String>,
}

impl Node {
    /// Create a node with no attributes, children or text
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrib: IndexMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Add an attribute, keeping insertion order
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrib.insert(key.into(), value.into());
        self
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child node
    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Returns the attribute value if present, None otherwise
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrib.get(key).map(String::as_str)
    }

    /// Returns the first child with the given name, None otherwise
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Iterate over children with the given name
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children.iter().filter(move |c| c.name == name)
    }
}
