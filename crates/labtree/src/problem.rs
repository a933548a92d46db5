//! Native problem-markup extraction
//!
//! The courseware authors multiple-choice problems as an XML dialect:
//! a `problem` root holding statement elements (`p`, `label`), a
//! `multiplechoiceresponse` with a `choicegroup` of `choice` elements,
//! and an optional `solution` subtree. This module pulls the statement,
//! the solution and the ordered option list out of that markup.

use crate::error::{Error, Result};
use crate::xml::{Element, Parser};

/// One answer choice
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub text: String,
    pub is_correct: bool,
}

/// A multiple-choice problem extracted from native markup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultipleChoiceProblem {
    pub sentence: String,
    pub solution: String,
    pub choices: Vec<Choice>,
}

impl MultipleChoiceProblem {
    /// Extract a problem from native markup.
    ///
    /// Fails with a `MalformedContent` error when the markup cannot be
    /// parsed, carries no statement, or has no answer section. An answer
    /// section with zero choices is valid.
    pub fn parse(content: &str) -> Result<Self> {
        let mut parser = Parser::new(content.as_bytes());
        let doc = parser.parse().map_err(Error::into_malformed)?;
        let root = doc.root;

        let sentence = extract_sentence(&root);
        if sentence.is_empty() {
            return Err(Error::malformed("missing problem statement"));
        }

        let group = root
            .descendant("multiplechoiceresponse")
            .and_then(|response| response.descendant("choicegroup"))
            .ok_or_else(|| Error::malformed("missing answer options"))?;

        let choices = group
            .child_elements()
            .filter(|el| el.name == "choice")
            .map(|el| Choice {
                text: el.collected_text(),
                is_correct: el
                    .attr("correct")
                    .is_some_and(|v| v.eq_ignore_ascii_case("true")),
            })
            .collect();

        let solution = root
            .descendant("solution")
            .map(Element::collected_text)
            .unwrap_or_default();

        Ok(Self {
            sentence,
            solution,
            choices,
        })
    }
}

/// Statement text: `p` and `label` elements at the top level of the
/// problem, up to the answer section. Falls back to a `label` nested
/// inside the answer section, which is where newer authoring places it.
fn extract_sentence(root: &Element) -> String {
    let mut parts: Vec<String> = Vec::new();
    for child in root.child_elements() {
        if child.name == "multiplechoiceresponse" {
            break;
        }
        if child.name == "p" || child.name == "label" {
            let text = child.collected_text();
            if !text.is_empty() {
                parts.push(text);
            }
        }
    }

    if parts.is_empty() {
        if let Some(label) = root
            .descendant("multiplechoiceresponse")
            .and_then(|response| response.descendant("label"))
        {
            return label.collected_text();
        }
    }

    parts.join(" ")
}
