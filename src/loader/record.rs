//! Single-record parser
//!
//! A program source is a list of records, one per line:
//!
//! ```text
//! x y token
//! ```
//!
//! `token` decides the cell kind:
//! - `'c` is a character; `'\n` and `'\s` are the only escapes (newline, space)
//! - a leading digit (or a sign followed by a digit) is a base-10 number
//! - anything else is an operation keyword

use super::LoadError;
use crate::grid::{Cell, Operation, Vec2};

/// One parsed source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// 1-based source line
    pub line: usize,
    pub position: Vec2,
    pub cell: Cell,
}

/// Parse one source line; blank lines yield `None`
pub fn parse_record(text: &str, line: usize) -> Result<Option<Record>, LoadError> {
    let mut fields = text.split_whitespace();

    let Some(x) = fields.next() else {
        return Ok(None);
    };
    let y = fields.next().ok_or(LoadError::MissingField { line, field: "y" })?;
    let token = fields
        .next()
        .ok_or(LoadError::MissingField { line, field: "token" })?;

    if let Some(extra) = fields.next() {
        return Err(LoadError::TrailingInput {
            line,
            text: extra.to_string(),
        });
    }

    let position = Vec2::new(parse_coordinate(x, line)?, parse_coordinate(y, line)?);
    let cell = parse_token(token, line)?;
    Ok(Some(Record {
        line,
        position,
        cell,
    }))
}

fn parse_coordinate(text: &str, line: usize) -> Result<i64, LoadError> {
    text.parse().map_err(|_| LoadError::InvalidCoordinate {
        line,
        text: text.to_string(),
    })
}

/// Classify and parse a cell token
pub fn parse_token(token: &str, line: usize) -> Result<Cell, LoadError> {
    if let Some(literal) = token.strip_prefix('\'') {
        return parse_character(literal, token, line);
    }

    if is_number(token) {
        return token
            .parse()
            .map(Cell::Number)
            .map_err(|_| LoadError::InvalidNumber {
                line,
                token: token.to_string(),
            });
    }

    Operation::from_keyword(token)
        .map(Cell::Op)
        .ok_or_else(|| LoadError::UnknownOperation {
            line,
            keyword: token.to_string(),
        })
}

fn is_number(token: &str) -> bool {
    let digits = token
        .strip_prefix('-')
        .or_else(|| token.strip_prefix('+'))
        .unwrap_or(token);
    digits.starts_with(|c: char| c.is_ascii_digit())
}

fn parse_character(literal: &str, token: &str, line: usize) -> Result<Cell, LoadError> {
    let invalid = || LoadError::InvalidCharacter {
        line,
        token: token.to_string(),
    };

    let mut chars = literal.chars();
    let c = match chars.next().ok_or_else(invalid)? {
        '\\' => match chars.next().ok_or_else(invalid)? {
            'n' => '\n',
            's' => ' ',
            escape => return Err(LoadError::UnknownEscape { line, escape }),
        },
        c => c,
    };

    if chars.next().is_some() {
        return Err(invalid());
    }
    Ok(Cell::Char(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert_eq!(parse_token("'a", 1), Ok(Cell::Char('a')));
        assert_eq!(parse_token("'\\n", 1), Ok(Cell::Char('\n')));
        assert_eq!(parse_token("'\\s", 1), Ok(Cell::Char(' ')));
        assert_eq!(parse_token("''", 1), Ok(Cell::Char('\'')));
        assert_eq!(parse_token("42", 1), Ok(Cell::Number(42)));
        assert_eq!(parse_token("-7", 1), Ok(Cell::Number(-7)));
        assert_eq!(parse_token("007", 1), Ok(Cell::Number(7)));
        assert_eq!(parse_token("up", 1), Ok(Cell::Op(Operation::RunUp)));
        assert_eq!(parse_token("goto", 1), Ok(Cell::Op(Operation::Goto)));
    }

    #[test]
    fn test_bad_tokens() {
        assert_eq!(
            parse_token("'\\t", 3),
            Err(LoadError::UnknownEscape {
                line: 3,
                escape: 't'
            })
        );
        assert!(matches!(
            parse_token("'", 3),
            Err(LoadError::InvalidCharacter { line: 3, .. })
        ));
        assert!(matches!(
            parse_token("'ab", 3),
            Err(LoadError::InvalidCharacter { line: 3, .. })
        ));
        assert!(matches!(
            parse_token("12x", 3),
            Err(LoadError::InvalidNumber { line: 3, .. })
        ));
        assert!(matches!(
            parse_token("-", 3),
            Err(LoadError::UnknownOperation { line: 3, .. })
        ));
        assert_eq!(
            parse_token("jump", 4),
            Err(LoadError::UnknownOperation {
                line: 4,
                keyword: "jump".to_string()
            })
        );
    }

    #[test]
    fn test_records() {
        assert_eq!(parse_record("   ", 1), Ok(None));
        assert_eq!(
            parse_record("3 1 'x", 2),
            Ok(Some(Record {
                line: 2,
                position: Vec2::new(3, 1),
                cell: Cell::Char('x'),
            }))
        );
        assert_eq!(
            parse_record("3 1", 5),
            Err(LoadError::MissingField {
                line: 5,
                field: "token"
            })
        );
        assert!(matches!(
            parse_record("3 1 up down", 6),
            Err(LoadError::TrailingInput { line: 6, .. })
        ));
        assert!(matches!(
            parse_record("a 1 up", 7),
            Err(LoadError::InvalidCoordinate { line: 7, .. })
        ));
    }
}
