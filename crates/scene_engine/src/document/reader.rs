//! Reader for the markup subset scene files use
//!
//! Understood: an optional `<?xml ...?>` prolog and other processing
//! instructions, comments, `<!DOCTYPE ...>`, CDATA sections, elements with
//! single- or double-quoted attributes, self-closing elements and the
//! predefined / numeric character references. Text content is skipped.
//!
//! Open elements are kept on an explicit stack and nesting is capped at
//! [`MAX_DEPTH`], so hostile input fails with an error instead of
//! exhausting the call stack.

use super::{DocumentError, Element};

/// Deepest element nesting accepted, the root counting as depth 1
pub const MAX_DEPTH: usize = 256;

/// Read a document and return its root element
pub fn parse_document(src: &str) -> Result<Element, DocumentError> {
    let mut reader = Reader::new(src);

    reader.skip_misc()?;
    if reader.is_eof() {
        return Err(DocumentError::Empty);
    }
    reader.expect('<', "root element")?;
    let root = reader.parse_element()?;

    reader.skip_misc()?;
    if !reader.is_eof() {
        return Err(DocumentError::TrailingContent { line: reader.line });
    }

    Ok(root)
}

enum StartTag {
    /// `<name ...>`, children follow
    Open(Element),
    /// `<name .../>`
    Empty(Element),
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Consume `prefix`, which the caller has already checked is present
    fn consume(&mut self, prefix: &str) {
        for _ in prefix.chars() {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char, what: &'static str) -> Result<(), DocumentError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(found) => Err(self.unexpected(found, what)),
            None => Err(DocumentError::UnexpectedEof { expected: what }),
        }
    }

    fn unexpected(&self, found: char, expected: &'static str) -> DocumentError {
        DocumentError::UnexpectedChar {
            found,
            expected,
            line: self.line,
            column: self.column,
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn skip_until(&mut self, terminator: &str, what: &'static str) -> Result<(), DocumentError> {
        loop {
            if self.starts_with(terminator) {
                self.consume(terminator);
                return Ok(());
            }
            if self.bump().is_none() {
                return Err(DocumentError::UnexpectedEof { expected: what });
            }
        }
    }

    /// Skip whitespace, comments, processing instructions and doctype
    fn skip_misc(&mut self) -> Result<(), DocumentError> {
        loop {
            self.skip_whitespace();
            if self.starts_with("<?") {
                self.skip_until("?>", "'?>'")?;
            } else if self.starts_with("<!--") {
                self.skip_until("-->", "'-->'")?;
            } else if self.starts_with("<!DOCTYPE") {
                self.skip_until(">", "'>'")?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_name(&mut self) -> Result<String, DocumentError> {
        let mut name = String::new();
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {
                name.push(c);
                self.bump();
            }
            Some(found) => return Err(self.unexpected(found, "a name")),
            None => return Err(DocumentError::UnexpectedEof { expected: "a name" }),
        }
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':') {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Ok(name)
    }

    /// Parse a start tag whose `<` has been consumed
    fn parse_start_tag(&mut self) -> Result<StartTag, DocumentError> {
        let line = self.line;
        let name = self.parse_name()?;
        let mut element = Element::new(name).at_line(line);

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('/') => {
                    self.bump();
                    self.expect('>', "'>' after '/'")?;
                    return Ok(StartTag::Empty(element));
                }
                Some('>') => {
                    self.bump();
                    return Ok(StartTag::Open(element));
                }
                Some(_) => self.parse_attribute(&mut element)?,
                None => return Err(DocumentError::UnexpectedEof { expected: "'>'" }),
            }
        }
    }

    /// Parse a closing tag and check it against the open element
    fn parse_end_tag(&mut self, open: &Element) -> Result<(), DocumentError> {
        let line = self.line;
        self.consume("</");
        let close = self.parse_name()?;
        self.skip_whitespace();
        self.expect('>', "'>' after closing tag")?;
        if close != open.name() {
            return Err(DocumentError::MismatchedTag {
                open: open.name().to_string(),
                close,
                line,
            });
        }
        Ok(())
    }

    fn parse_attribute(&mut self, element: &mut Element) -> Result<(), DocumentError> {
        let name = self.parse_name()?;
        self.skip_whitespace();
        self.expect('=', "'=' after attribute name")?;
        self.skip_whitespace();

        let quote = match self.peek() {
            Some(c @ ('"' | '\'')) => {
                self.bump();
                c
            }
            Some(found) => return Err(self.unexpected(found, "a quoted attribute value")),
            None => return Err(DocumentError::UnexpectedEof { expected: "attribute value" }),
        };

        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => break,
                Some('&') => value.push(self.parse_entity()?),
                Some('<') => return Err(self.unexpected('<', "attribute value")),
                Some(c) => value.push(c),
                None => return Err(DocumentError::UnexpectedEof { expected: "closing quote" }),
            }
        }

        if element.attribute(&name).is_some() {
            return Err(DocumentError::DuplicateAttribute {
                element: element.name().to_string(),
                attribute: name,
                line: self.line,
            });
        }
        element.push_attribute(name, value);
        Ok(())
    }

    /// Parse a character reference whose `&` has been consumed
    fn parse_entity(&mut self) -> Result<char, DocumentError> {
        let mut entity = String::new();
        loop {
            match self.bump() {
                Some(';') => break,
                Some(c) if entity.len() < 16 => entity.push(c),
                Some(_) | None => return Err(DocumentError::InvalidEntity { entity, line: self.line }),
            }
        }

        let decoded = match entity.as_str() {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            numeric => numeric
                .strip_prefix("#x")
                .map(|hex| u32::from_str_radix(hex, 16))
                .or_else(|| numeric.strip_prefix('#').map(str::parse::<u32>))
                .and_then(Result::ok)
                .and_then(char::from_u32),
        };

        decoded.ok_or(DocumentError::InvalidEntity { entity, line: self.line })
    }

    /// Parse an element whose `<` has been consumed, children included
    fn parse_element(&mut self) -> Result<Element, DocumentError> {
        let mut current = match self.parse_start_tag()? {
            StartTag::Empty(element) => return Ok(element),
            StartTag::Open(element) => element,
        };
        let mut ancestors: Vec<Element> = Vec::new();

        loop {
            if self.starts_with("</") {
                self.parse_end_tag(&current)?;
                match ancestors.pop() {
                    Some(mut parent) => {
                        parent.push_child(current);
                        current = parent;
                    }
                    None => return Ok(current),
                }
            } else if self.starts_with("<!--") {
                self.skip_until("-->", "'-->'")?;
            } else if self.starts_with("<![CDATA[") {
                self.skip_until("]]>", "']]>'")?;
            } else if self.starts_with("<?") {
                self.skip_until("?>", "'?>'")?;
            } else if self.starts_with("<") {
                // current sits one level below its ancestors, the child one further
                if ancestors.len() + 2 > MAX_DEPTH {
                    return Err(DocumentError::TooDeep {
                        limit: MAX_DEPTH,
                        line: self.line,
                    });
                }
                self.bump();
                match self.parse_start_tag()? {
                    StartTag::Empty(child) => current.push_child(child),
                    StartTag::Open(child) => ancestors.push(std::mem::replace(&mut current, child)),
                }
            } else if self.bump().is_none() {
                return Err(DocumentError::UnexpectedEof { expected: "closing tag" });
            }
        }
    }
}
