//! INI values: a scalar, optionally quoted, or a `[ ... ]` list whose
//! elements may each be quoted.

use crate::error::{ConfigError, Result};
use crate::tree::Position;

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Value {
    Scalar(String),
    List(Vec<String>),
}

/// Reads the raw text of param `name`, which starts at `origin`.
pub(super) fn read_value(name: &str, raw: &str, origin: Position) -> Result<Value> {
    let mut cursor = Cursor::new(raw, origin);
    cursor.skip_whitespace();
    if cursor.peek() == Some('[') {
        return read_list(name, cursor).map(Value::List);
    }
    match cursor.read_quoted()? {
        Some(value) => Ok(Value::Scalar(value)),
        None => Ok(Value::Scalar(raw.to_owned())),
    }
}

fn read_list(name: &str, mut cursor: Cursor<'_>) -> Result<Vec<String>> {
    let origin = cursor.position();
    cursor.bump();
    cursor.skip_whitespace();

    let mut values = Vec::new();
    while !cursor.at_end() {
        if let Some(value) = read_element(name, &mut cursor, values.is_empty())? {
            values.push(value);
        }
        cursor.skip_whitespace();
        match cursor.peek() {
            Some(',') => {
                cursor.bump();
                cursor.skip_whitespace();
                if matches!(cursor.peek(), Some(']') | None) {
                    return Err(missing_element(name, origin));
                }
            }
            // Anything after the closing bracket is ignored.
            Some(']') => return Ok(values),
            _ => {}
        }
    }
    Err(ConfigError::parse(
        format!("Wrong parameter list '{name}' format: missing ']' at the end"),
        origin,
    ))
}

/// Reads one list element. Returns `None` for the empty content of `[]`.
fn read_element(name: &str, cursor: &mut Cursor<'_>, first: bool) -> Result<Option<String>> {
    if let Some(value) = cursor.read_quoted()? {
        return Ok(Some(value));
    }
    let word = cursor.read_word();
    if word.is_empty() {
        if cursor.peek() == Some(',') {
            return Err(missing_element(name, cursor.position()));
        }
        if first {
            return Ok(None);
        }
    }
    Ok(Some(word.to_owned()))
}

fn missing_element(name: &str, position: Position) -> ConfigError {
    ConfigError::parse(
        format!("Parameter list '{name}' element is missing"),
        position,
    )
}

struct Cursor<'a> {
    rest: &'a str,
    consumed: usize,
    origin: Position,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, origin: Position) -> Self {
        Self {
            rest: text,
            consumed: 0,
            origin,
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn at_end(&self) -> bool {
        self.rest.is_empty()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.rest = &self.rest[ch.len_utf8()..];
        self.consumed += 1;
        Some(ch)
    }

    fn position(&self) -> Position {
        Position {
            line: self.origin.line,
            column: self.origin.column.map(|column| column + self.consumed),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Reads up to whitespace, a comma or a closing bracket.
    fn read_word(&mut self) -> &'a str {
        let end = self
            .rest
            .find(|ch: char| ch.is_whitespace() || ch == ',' || ch == ']')
            .unwrap_or(self.rest.len());
        let (word, rest) = self.rest.split_at(end);
        self.consumed += word.chars().count();
        self.rest = rest;
        word
    }

    fn read_quoted(&mut self) -> Result<Option<String>> {
        let quote = match self.peek() {
            Some(quote @ ('\'' | '"')) => quote,
            _ => return Ok(None),
        };
        let start = self.position();
        self.bump();

        let mut value = String::new();
        while let Some(ch) = self.bump() {
            if ch == quote {
                return Ok(Some(value));
            }
            value.push(ch);
        }
        Err(ConfigError::parse("String isn't closed", start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(raw: &str) -> Result<Value> {
        read_value("testIntList", raw, Position::new(1, 15))
    }

    fn list(values: &[&str]) -> Value {
        Value::List(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_lists() {
        assert_eq!(read("[1, 2, 3]").unwrap(), list(&["1", "2", "3"]));
        assert_eq!(read("[1,2,3]").unwrap(), list(&["1", "2", "3"]));
        assert_eq!(read(r#"["1", "2", "3"]"#).unwrap(), list(&["1", "2", "3"]));
        assert_eq!(
            read(r#"["Hello", world, ' ']/>"#).unwrap(),
            list(&["Hello", "world", " "])
        );
        assert_eq!(read("[]").unwrap(), list(&[]));
        assert_eq!(read("[ ]").unwrap(), list(&[]));
    }

    #[test]
    fn test_missing_elements() {
        for raw in ["[1,2,]", "[,1,2]", "[1, ,3 ]", "[,]"] {
            let error = read(raw).unwrap_err();
            assert!(
                error
                    .to_string()
                    .starts_with("Parameter list 'testIntList' element is missing"),
                "{raw}: {error}"
            );
        }
    }

    #[test]
    fn test_unterminated_list() {
        let error = read("[1, 2").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Wrong parameter list 'testIntList' format: missing ']' at the end (line 1, column 15)"
        );
    }

    #[test]
    fn test_scalars() {
        assert_eq!(read("Hello world").unwrap(), Value::Scalar("Hello world".into()));
        assert_eq!(read("'  padded  '").unwrap(), Value::Scalar("  padded  ".into()));
        assert_eq!(read(r#""a" trailing"#).unwrap(), Value::Scalar("a".into()));
        assert_eq!(read("").unwrap(), Value::Scalar(String::new()));
    }

    #[test]
    fn test_unclosed_string() {
        let error = read(r#"[1, "two]"#).unwrap_err();
        assert_eq!(error.to_string(), "String isn't closed (line 1, column 19)");
        assert!(read("'open").is_err());
    }
}
