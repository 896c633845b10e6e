//! Structured scene documents
//!
//! A scene file is read into a tree of [`Element`]s (tag name, attributes,
//! child elements). The scene parser only ever sees this tree, so the
//! validation rules are independent of the concrete markup syntax.

mod reader;

pub use reader::{parse_document, MAX_DEPTH};

use thiserror::Error;

/// A single element of a structured document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    line: usize,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            line: 0,
        }
    }

    /// Builder pattern: add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder pattern: add a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub(crate) fn push_attribute(&mut self, name: String, value: String) {
        self.attributes.push((name, value));
    }

    pub(crate) fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Tag name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source line the element starts on (0 for elements built in code)
    pub fn line(&self) -> usize {
        self.line
    }

    /// Raw attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements in document order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First child with the given tag name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Position of the first child with the given tag name
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|child| child.name == name)
    }
}

/// Syntax errors raised while reading a document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Input ended in the middle of a construct
    #[error("unexpected end of document, expected {expected}")]
    UnexpectedEof {
        /// What the reader was looking for
        expected: &'static str,
    },

    /// A character that does not fit the grammar at this point
    #[error("line {line}, column {column}: unexpected '{found}', expected {expected}")]
    UnexpectedChar {
        /// Offending character
        found: char,
        /// What the reader was looking for
        expected: &'static str,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
    },

    /// Closing tag does not match the open element
    #[error("line {line}: closing tag </{close}> does not match <{open}>")]
    MismatchedTag {
        /// Name of the open element
        open: String,
        /// Name found in the closing tag
        close: String,
        /// 1-based line of the closing tag
        line: usize,
    },

    /// Same attribute given twice on one element
    #[error("line {line}: duplicate attribute '{attribute}' on <{element}>")]
    DuplicateAttribute {
        /// Element name
        element: String,
        /// Attribute name
        attribute: String,
        /// 1-based line
        line: usize,
    },

    /// Unknown or malformed character reference
    #[error("line {line}: invalid entity '&{entity};'")]
    InvalidEntity {
        /// Entity text between `&` and `;`
        entity: String,
        /// 1-based line
        line: usize,
    },

    /// Document has no root element
    #[error("document has no root element")]
    Empty,

    /// Elements nested deeper than [`MAX_DEPTH`]
    #[error("line {line}: elements nested deeper than {limit} levels")]
    TooDeep {
        /// Largest accepted depth
        limit: usize,
        /// 1-based line of the first element past the limit
        line: usize,
    },

    /// Content after the root element
    #[error("line {line}: content after the root element")]
    TrailingContent {
        /// 1-based line
        line: usize,
    },
}
