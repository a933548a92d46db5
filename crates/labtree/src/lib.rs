//! labtree - normalizes lab quiz content into a canonical node tree
//!
//! Quiz problems arrive in two upstream representations: a pre-rendered
//! platform-XML string, or the courseware's native authoring markup. Both
//! normalize to the same `Node` tree, which renders to XML or (with the
//! `serde` feature) JSON.
//!
//! # Quick Start
//!
//! ```
//! use labtree::{quiz_from_markup, to_xml};
//! # fn main() -> Result<(), labtree::Error> {
//! let markup = r#"
//!     <problem>
//!         <p>2+2=?</p>
//!         <multiplechoiceresponse>
//!             <choicegroup>
//!                 <choice correct="true">4</choice>
//!                 <choice correct="false">5</choice>
//!             </choicegroup>
//!         </multiplechoiceresponse>
//!         <solution><p>4</p></solution>
//!     </problem>"#;
//! let quiz = quiz_from_markup(markup, "problem-1")?;
//! assert_eq!(quiz.attr("Sentence"), Some("2+2=?"));
//! assert!(to_xml(&quiz).starts_with("<Quiz"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod cursor;
pub use cursor::Cursor;

pub mod node;
pub use node::Node;

pub mod xml;
pub use xml::{
    Content as XmlContent, Document as XmlDocument, Element as XmlElement, Parser as XmlParser,
};

pub mod problem;
pub use problem::{Choice, MultipleChoiceProblem};

pub mod quiz;
pub use quiz::{
    build_lab_tree, build_quiz, escape_text, quiz_from_markup, quiz_from_platform_xml, Lab,
    Problem, ProblemSource, QuizBlock, WRONG_MESSAGE,
};

pub mod render;
pub use render::to_xml;

/// Parse an XML document from a string
pub fn parse_xml(s: &str) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(s.as_bytes());
    parser.parse()
}

/// Parse an XML document from bytes
pub fn parse_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(bytes);
    parser.parse()
}

/// Extract a multiple-choice problem from native markup
pub fn parse_problem_markup(s: &str) -> Result<MultipleChoiceProblem> {
    MultipleChoiceProblem::parse(s)
}
