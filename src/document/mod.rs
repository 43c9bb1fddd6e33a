//! The tagged-text document.
//!
//! A document is an XML file with a `<characters>` list and a `<text>` body
//! in which `<quote>` and `<mention>` elements are nested inline, one
//! sentence per line. The annotation tool rewrites it freely, so the body
//! is both parsed as a tree (to update attributes) and scanned as raw lines
//! (to recover token positions).

pub mod tree;

use thiserror::Error;

pub use tree::{Document, Element, Node};

/// Errors raised while reading or writing a document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("Unexpected closing tag </{0}>")]
    UnexpectedClose(String),

    #[error("Unclosed element <{0}>")]
    Unclosed(String),

    #[error("Document has no root element")]
    NoRoot,

    #[error("Element <{0}> outside the root element")]
    MultipleRoots(String),

    #[error("Document has no <text> body")]
    NoTextBody,

    #[error("Document is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// The raw markup between `<text ...>` and `</text>`
pub fn text_body(xml: &str) -> Result<&str, DocumentError> {
    let mut search = 0;
    let open_end = loop {
        let start = xml[search..]
            .find("<text")
            .map(|i| i + search)
            .ok_or(DocumentError::NoTextBody)?;
        let after = &xml[start + "<text".len()..];
        if after.starts_with('>') || after.starts_with(char::is_whitespace) {
            let close = after.find('>').ok_or(DocumentError::NoTextBody)?;
            break start + "<text".len() + close + 1;
        }
        search = start + 1;
    };

    let close_start = xml
        .rfind("</text>")
        .filter(|&i| i >= open_end)
        .ok_or(DocumentError::NoTextBody)?;

    Ok(&xml[open_end..close_start])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_body() {
        let xml = "<?xml version=\"1.0\"?>\n<doc><characters></characters><text>\n a b\n c\n</text></doc>\n";
        assert_eq!(text_body(xml).unwrap(), "\n a b\n c\n");
    }

    #[test]
    fn test_text_body_skips_similar_tags() {
        let xml = "<doc><textual/><text id=\"1\"> a</text></doc>";
        assert_eq!(text_body(xml).unwrap(), " a");
    }

    #[test]
    fn test_text_body_missing() {
        assert!(matches!(
            text_body("<doc></doc>"),
            Err(DocumentError::NoTextBody)
        ));
    }
}
