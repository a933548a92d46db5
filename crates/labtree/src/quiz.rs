//! Quiz tree building and lab aggregation
//!
//! Problems arrive in one of two upstream representations: a pre-rendered
//! platform-XML string already in the target tree shape, or native
//! authoring markup that needs field extraction. Both normalize to a
//! `Node` named `"Quiz"`; a lab's quiz blocks aggregate under a
//! `"QuizBlocks"` root.

use crate::error::{Error, Result};
use crate::node::Node;
use crate::problem::MultipleChoiceProblem;
use crate::xml;

/// Feedback attached to every quiz built from native markup
pub const WRONG_MESSAGE: &str = "No. This is incorrect - please try again!";

/// The raw representation a problem arrives in.
///
/// A problem record carrying a non-empty platform-XML string is always
/// taken over its native-markup content; the variant fixes that choice at
/// construction time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProblemSource {
    PlatformXml(String),
    NativeMarkup(String),
}

impl ProblemSource {
    /// Select the source from raw record fields. A non-empty
    /// `platform_xml` wins; the markup content is ignored in that case.
    pub fn from_fields(platform_xml: &str, content: &str) -> Self {
        if platform_xml.is_empty() {
            Self::NativeMarkup(content.to_string())
        } else {
            Self::PlatformXml(platform_xml.to_string())
        }
    }
}

/// One problem of a quiz block
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(from = "ProblemRecord")
)]
pub struct Problem {
    pub id: String,
    pub source: ProblemSource,
}

/// Raw record shape the content source exposes per problem
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ProblemRecord {
    id: String,
    #[serde(default)]
    platform_xml: String,
    #[serde(default)]
    content: String,
}

#[cfg(feature = "serde")]
impl From<ProblemRecord> for Problem {
    fn from(record: ProblemRecord) -> Self {
        let source = ProblemSource::from_fields(&record.platform_xml, &record.content);
        Self {
            id: record.id,
            source,
        }
    }
}

/// An ordered group of problems within a lab
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct QuizBlock {
    pub id: String,
    pub slug: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub problems: Vec<Problem>,
}

/// A lab: ordered quiz blocks for one simulation exercise
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Lab {
    pub id: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub quiz_blocks: Vec<QuizBlock>,
}

/// Build a `"Quiz"` node from a pre-rendered platform-XML string.
///
/// Mirrors the source tree's names and attributes for the quiz element,
/// its option-group children and their option children; markup below the
/// option level and text content are not carried over.
pub fn quiz_from_platform_xml(xml_string: &str) -> Result<Node> {
    let mut parser = xml::Parser::new(xml_string.as_bytes());
    let doc = parser.parse().map_err(Error::into_malformed)?;

    let mut quiz = Node::new(doc.root.name.as_str());
    quiz.attrib = doc.root.attributes.clone();

    for options_el in doc.root.child_elements() {
        let mut options = Node::new(options_el.name.as_str());
        options.attrib = options_el.attributes.clone();

        for option_el in options_el.child_elements() {
            let mut option = Node::new(option_el.name.as_str());
            option.attrib = option_el.attributes.clone();
            options.push(option);
        }

        quiz.push(options);
    }

    Ok(quiz)
}

/// Build a `"Quiz"` node from native problem markup.
pub fn quiz_from_markup(content: &str, problem_id: &str) -> Result<Node> {
    let problem = MultipleChoiceProblem::parse(content)?;

    let mut options = Node::new("Options");
    for choice in &problem.choices {
        let mut option = Node::new("Option").with_attr("Sentence", &choice.text);
        if choice.is_correct {
            option = option.with_attr("IsCorrectAnswer", "true");
        }
        options.push(option);
    }

    let mut quiz = Node::new("Quiz")
        .with_attr("Id", problem_id)
        .with_attr("Sentence", escape_text(&problem.sentence))
        .with_attr("CorrectMessage", escape_text(&problem.solution))
        .with_attr("WrongMessage", WRONG_MESSAGE);
    quiz.push(options);

    Ok(quiz)
}

/// Build the `"Quiz"` node for one problem, dispatching on its source
pub fn build_quiz(problem: &Problem) -> Result<Node> {
    match &problem.source {
        ProblemSource::PlatformXml(xml_string) => quiz_from_platform_xml(xml_string),
        ProblemSource::NativeMarkup(content) => quiz_from_markup(content, &problem.id),
    }
}

/// Build the full lab tree: a `"QuizBlocks"` root with one `"QuizBlock"`
/// per block and one `"Quiz"` per problem, preserving upstream order.
///
/// The build is total: the first malformed problem fails the whole lab.
/// Callers that want to skip bad problems can drive `build_quiz`
/// themselves.
pub fn build_lab_tree(lab: &Lab) -> Result<Node> {
    let mut root = Node::new("QuizBlocks");

    for quiz_block in &lab.quiz_blocks {
        let mut block = Node::new("QuizBlock").with_attr("Id", &quiz_block.slug);

        for problem in &quiz_block.problems {
            block.push(build_quiz(problem)?);
        }

        root.push(block);
    }

    Ok(root)
}

/// Render statement/solution text with control characters as backslash
/// escapes: `\\`, `\t`, `\n`, `\r`, other C0 controls as `\xHH`.
/// Non-ASCII characters pass through unchanged.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if u32::from(c) < 0x20 || u32::from(c) == 0x7f => {
                out.push_str(&format!("\\x{:02x}", u32::from(c)));
            }
            c => out.push(c),
        }
    }
    out
}
