//! Line-level INI syntax: section headers, `key = value` entries, blank lines
//! and full-line `;` / `#` comments.

use crate::error::{ConfigError, Result};
use crate::tree::Position;

/// Entries grouped under the header that precedes them. Entries appearing
/// before any header form the root section, which has no name.
#[derive(Debug)]
pub(super) struct Section<'a> {
    pub(super) name: Option<&'a str>,
    pub(super) position: Position,
    pub(super) entries: Vec<Entry<'a>>,
}

#[derive(Debug)]
pub(super) struct Entry<'a> {
    pub(super) key: &'a str,
    pub(super) value: &'a str,
    pub(super) position: Position,
    pub(super) value_position: Position,
}

pub(super) fn lex(text: &str) -> Result<Vec<Section<'_>>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut sections = vec![Section {
        name: None,
        position: Position::new(1, 1),
        entries: Vec::new(),
    }];

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
            continue;
        }
        let position = Position::new(index + 1, column_of(line, trimmed));

        if let Some(header) = trimmed.strip_prefix('[') {
            sections.push(Section {
                name: Some(section_name(header, position)?),
                position,
                entries: Vec::new(),
            });
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            return Err(ConfigError::parse("Expected '=' after the key", position));
        };
        let key = key.trim_end();
        if key.is_empty() {
            return Err(ConfigError::parse("Key is empty", position));
        }
        let value_start = value.trim_start();
        let value_position = Position::new(index + 1, column_of(line, value_start));
        if let Some(section) = sections.last_mut() {
            section.entries.push(Entry {
                key,
                value: value_start.trim_end(),
                position,
                value_position,
            });
        }
    }
    Ok(sections)
}

fn section_name(header: &str, position: Position) -> Result<&str> {
    let Some((name, rest)) = header.split_once(']') else {
        return Err(ConfigError::parse("Section isn't closed", position));
    };
    let rest = rest.trim();
    if !(rest.is_empty() || rest.starts_with(';') || rest.starts_with('#')) {
        return Err(ConfigError::parse(
            "Unexpected text after the section header",
            position,
        ));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::parse("Section name is empty", position));
    }
    Ok(name)
}

/// 1-based character column at which `part`, a suffix of `line`, starts.
fn column_of(line: &str, part: &str) -> usize {
    line[..line.len() - part.len()].chars().count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_entries_under_headers() {
        let sections = lex("name = app\n\n[db]\n  host = localhost ; not a comment\n").unwrap();
        assert_eq!(sections.len(), 2);

        assert_eq!(sections[0].name, None);
        assert_eq!(sections[0].entries[0].key, "name");
        assert_eq!(sections[0].entries[0].value, "app");

        let db = &sections[1];
        assert_eq!(db.name, Some("db"));
        assert_eq!(db.position, Position::new(3, 1));
        assert_eq!(db.entries[0].value, "localhost ; not a comment");
        assert_eq!(db.entries[0].position, Position::new(4, 3));
        assert_eq!(db.entries[0].value_position, Position::new(4, 10));
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let sections = lex("; comment\n# another\n\n[a]\n").unwrap();
        assert!(sections[0].entries.is_empty());
        assert_eq!(sections[1].position, Position::new(4, 1));
    }

    #[test]
    fn test_value_keeps_inner_equals_signs() {
        let sections = lex("url = postgres://db?sslmode=require\n").unwrap();
        assert_eq!(sections[0].entries[0].value, "postgres://db?sslmode=require");
    }

    #[test]
    fn test_empty_value() {
        let sections = lex("name =\n").unwrap();
        assert_eq!(sections[0].entries[0].value, "");
    }

    #[test]
    fn test_malformed_lines() {
        let error = lex("[a]\nflag\n").unwrap_err();
        assert_eq!(error.to_string(), "Expected '=' after the key (line 2, column 1)");

        let error = lex("\n  [a.b\n").unwrap_err();
        assert_eq!(error.to_string(), "Section isn't closed (line 2, column 3)");

        assert!(lex("[ ]\n").is_err());
        assert!(lex(" = 1\n").is_err());
        assert!(lex("[a] b\n").is_err());
    }
}
