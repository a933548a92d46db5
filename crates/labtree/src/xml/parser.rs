//! XML parser implementation

use indexmap::IndexMap;

use crate::cursor::Cursor;
use crate::error::{Error, ErrorKind, Result, Span};
use crate::xml::model::{Content, Document, Element};

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        self.cursor.skip_whitespace();
        let root = self.parse_element()?;
        self.cursor.skip_whitespace();

        if !self.cursor.is_eof() {
            return Err(Error::at(ErrorKind::InvalidToken, self.cursor.position()));
        }

        Ok(Document { root })
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.expect_byte(b'<')?;

        if self.cursor.current() == Some(b'?') {
            self.skip_processing_instruction()?;
            self.cursor.skip_whitespace();
            return self.parse_element();
        }

        if self.cursor.current() == Some(b'!') {
            self.skip_declaration_or_comment()?;
            self.cursor.skip_whitespace();
            return self.parse_element();
        }

        if self.cursor.current() == Some(b'/') {
            return Err(self.error_here("unexpected closing tag"));
        }

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            self.expect_byte(b'>')?;
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }

        self.expect_byte(b'>')?;

        let mut children = Vec::new();
        loop {
            if self.cursor.current() == Some(b'<') && self.cursor.peek(1) == Some(b'/') {
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != name {
                    return Err(Error::at(
                        ErrorKind::MismatchedTag {
                            open: name,
                            close: close_name,
                        },
                        self.cursor.position(),
                    ));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.current() == Some(b'<')
                && (self.cursor.peek(1) == Some(b'!') || self.cursor.peek(1) == Some(b'?'))
            {
                self.cursor.advance();
                if self.cursor.current() == Some(b'?') {
                    self.skip_processing_instruction()?;
                } else {
                    self.skip_declaration_or_comment()?;
                }
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                let child = self.parse_element()?;
                children.push(Content::Element(child));
                continue;
            }

            if self.cursor.is_eof() {
                return Err(Error::at(
                    ErrorKind::UnterminatedMarkup,
                    self.cursor.position(),
                ));
            }

            if let Some(text) = self.parse_text()? {
                children.push(Content::Text(text));
            }
        }

        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => {
                    return Err(Error::at(
                        ErrorKind::UnterminatedMarkup,
                        self.cursor.position(),
                    ));
                }
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(Error::at(
                    ErrorKind::DuplicateAttribute { name },
                    self.cursor.position(),
                ));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_string(raw)?;
                return decode_entities(&text);
            }
            self.cursor.advance();
        }

        Err(Error::at(
            ErrorKind::UnterminatedMarkup,
            self.cursor.position(),
        ))
    }

    fn parse_text(&mut self) -> Result<Option<String>> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = bytes_to_string(raw)?;
        let text = decode_entities(&text)?;

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();

        let Some(first) = self.cursor.current() else {
            return Err(self.error_here("expected name"));
        };
        if !is_name_start(first) {
            return Err(Error::at(ErrorKind::InvalidToken, self.cursor.position()));
        }

        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        bytes_to_string(raw)
    }

    fn skip_declaration_or_comment(&mut self) -> Result<()> {
        // cursor currently at '!'
        if self.cursor.peek(1) == Some(b'-') && self.cursor.peek(2) == Some(b'-') {
            self.cursor.advance_by(3);
            self.skip_until(b"-->")?;
            return Ok(());
        }

        if self.cursor.peek_bytes(8) == Some(b"![CDATA[") {
            self.cursor.advance_by(8);
            self.skip_until(b"]]>")?;
            return Ok(());
        }

        self.skip_until(b">")
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        // cursor currently at '?'
        self.cursor.advance();
        self.skip_until(b"?>")
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while self.cursor.current().is_some() {
            if self.cursor.peek_bytes(pattern.len()) == Some(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(Error::at(
            ErrorKind::UnterminatedMarkup,
            self.cursor.position(),
        ))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.current() == Some(expected) {
            self.cursor.advance();
            Ok(())
        } else {
            let found = match self.cursor.current() {
                Some(b) => char::from(b).to_string(),
                None => "end of input".to_string(),
            };
            Err(Error::at(
                ErrorKind::Expected {
                    expected: char::from(expected).to_string(),
                    found,
                },
                self.cursor.position(),
            ))
        }
    }

    fn error_here(&self, message: &str) -> Error {
        Error::with_message(
            ErrorKind::InvalidToken,
            Span::new(self.cursor.position(), self.cursor.position()),
            message.to_string(),
        )
    }
}

fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(|s| s.to_string())
        .map_err(|_| Error::new(ErrorKind::InvalidUtf8, Span::empty()))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':')
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str) -> Result<String> {
    let mut result = String::new();
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        for next in chars.by_ref() {
            if next == ';' {
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::new(ErrorKind::InvalidEntity, Span::empty()));
            }
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ensure_eq<T: PartialEq + std::fmt::Debug>(left: T, right: T) -> Result<()> {
        if left == right {
            Ok(())
        } else {
            Err(Error::with_message(
                ErrorKind::InvalidToken,
                Span::empty(),
                format!("assertion failed: left={left:?} right={right:?}"),
            ))
        }
    }

    #[test]
    fn test_parse_simple_element() -> Result<()> {
        let input = b"<Quiz></Quiz>";
        let mut parser = Parser::new(input);
        let doc = parser.parse()?;

        ensure_eq(doc.root.name, "Quiz".to_string())?;
        ensure_eq(doc.root.children.len(), 0)?;
        Ok(())
    }

    #[test]
    fn test_parse_with_attributes() -> Result<()> {
        let input = b"<Quiz Id=\"p1\" Sentence='What?'></Quiz>";
        let mut parser = Parser::new(input);
        let doc = parser.parse()?;

        ensure_eq(doc.root.attr("Id"), Some("p1"))?;
        ensure_eq(doc.root.attr("Sentence"), Some("What?"))?;
        Ok(())
    }

    #[test]
    fn test_parse_nested() -> Result<()> {
        let input = b"<Options><Option>text</Option></Options>";
        let mut parser = Parser::new(input);
        let doc = parser.parse()?;

        match doc.root.children.first() {
            Some(Content::Element(child)) => {
                ensure_eq(child.name.clone(), "Option".to_string())?;
                match child.children.first() {
                    Some(Content::Text(text)) => {
                        ensure_eq(text, &"text".to_string())?;
                    }
                    _ => {
                        return Err(Error::with_message(
                            ErrorKind::InvalidToken,
                            Span::empty(),
                            "expected text".to_string(),
                        ));
                    }
                }
            }
            _ => {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    Span::empty(),
                    "expected child element".to_string(),
                ));
            }
        }

        Ok(())
    }

    #[test]
    fn test_parse_self_closing() -> Result<()> {
        let input = b"<Options><Option Sentence=\"A\" /></Options>";
        let mut parser = Parser::new(input);
        let doc = parser.parse()?;

        match doc.root.children.first() {
            Some(Content::Element(child)) => {
                ensure_eq(child.name.clone(), "Option".to_string())?;
                ensure_eq(child.attr("Sentence"), Some("A"))?;
                ensure_eq(child.children.len(), 0)?;
            }
            _ => {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    Span::empty(),
                    "expected child element".to_string(),
                ));
            }
        }

        Ok(())
    }

    #[test]
    fn test_parse_entities_in_attributes() -> Result<()> {
        let input = b"<Option Sentence=\"2 &lt; 4 &amp; 3 &gt; 1\" />";
        let mut parser = Parser::new(input);
        let doc = parser.parse()?;

        ensure_eq(doc.root.attr("Sentence"), Some("2 < 4 & 3 > 1"))?;
        Ok(())
    }

    #[test]
    fn test_parse_skips_prolog_and_comments() -> Result<()> {
        let input = b"<?xml version=\"1.0\"?><!-- quiz export --><Quiz Id=\"p1\"/>";
        let mut parser = Parser::new(input);
        let doc = parser.parse()?;

        ensure_eq(doc.root.name, "Quiz".to_string())?;
        Ok(())
    }

    #[test]
    fn test_mismatched_tag_is_error() {
        let input = b"<Quiz><Options></Quiz></Options>";
        let mut parser = Parser::new(input);
        let err = parser.parse().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MismatchedTag { .. }));
    }

    #[test]
    fn test_duplicate_attribute_is_error() {
        let input = b"<Quiz Id=\"a\" Id=\"b\"/>";
        let mut parser = Parser::new(input);
        let err = parser.parse().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::DuplicateAttribute { .. }));
    }

    #[test]
    fn test_unterminated_element_is_error() {
        let input = b"<Quiz><Options>";
        let mut parser = Parser::new(input);
        let err = parser.parse().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnterminatedMarkup));
    }
}
