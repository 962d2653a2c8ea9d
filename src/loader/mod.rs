//! Program loader
//!
//! Builds a [`Grid`] from record-per-line source text (see [`record`]).
//! Any malformed record or out-of-range coordinate rejects the whole program;
//! a coordinate given twice is accepted (last write wins) and reported as a
//! [`LoadWarning`].

pub mod record;

use crate::grid::{Grid, GridTooLarge, Vec2};
use record::{parse_record, Record};
use rustc_hash::FxHashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Load-time errors
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// Source file could not be read
    Io {
        path: String,
        kind: io::ErrorKind,
        message: String,
    },
    /// Requested grid dimensions cannot be allocated
    GridTooLarge {
        height: usize,
        width: usize,
    },
    MissingField {
        line: usize,
        field: &'static str,
    },
    TrailingInput {
        line: usize,
        text: String,
    },
    InvalidCoordinate {
        line: usize,
        text: String,
    },
    /// Coordinate outside the grid
    OutOfRange {
        line: usize,
        position: Vec2,
        width: usize,
        height: usize,
    },
    InvalidNumber {
        line: usize,
        token: String,
    },
    UnknownEscape {
        line: usize,
        escape: char,
    },
    InvalidCharacter {
        line: usize,
        token: String,
    },
    UnknownOperation {
        line: usize,
        keyword: String,
    },
}

impl LoadError {
    /// 1-based source line, if the error refers to one
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::Io { .. } | LoadError::GridTooLarge { .. } => None,
            LoadError::MissingField { line, .. }
            | LoadError::TrailingInput { line, .. }
            | LoadError::InvalidCoordinate { line, .. }
            | LoadError::OutOfRange { line, .. }
            | LoadError::InvalidNumber { line, .. }
            | LoadError::UnknownEscape { line, .. }
            | LoadError::InvalidCharacter { line, .. }
            | LoadError::UnknownOperation { line, .. } => Some(*line),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let LoadError::Io { path, message, .. } = self {
            return write!(f, "Failed to read {}: {}", path, message);
        }
        if let LoadError::GridTooLarge { height, width } = self {
            return write!(f, "A {}x{} grid is too large to allocate", height, width);
        }

        write!(f, "Parse error at line {}: ", self.line().unwrap_or(0))?;
        match self {
            LoadError::MissingField { field, .. } => write!(f, "missing {} field", field),
            LoadError::TrailingInput { text, .. } => {
                write!(f, "unexpected trailing input '{}'", text)
            }
            LoadError::InvalidCoordinate { text, .. } => {
                write!(f, "invalid coordinate '{}'", text)
            }
            LoadError::OutOfRange {
                position,
                width,
                height,
                ..
            } => write!(
                f,
                "position {} is outside the {}x{} grid",
                position, height, width
            ),
            LoadError::InvalidNumber { token, .. } => write!(f, "invalid number '{}'", token),
            LoadError::UnknownEscape { escape, .. } => {
                write!(f, "unknown escape '\\{}' (expected \\n or \\s)", escape)
            }
            LoadError::InvalidCharacter { token, .. } => {
                write!(f, "malformed character literal '{}'", token)
            }
            LoadError::UnknownOperation { keyword, .. } => {
                write!(f, "unknown operation '{}'", keyword)
            }
            LoadError::Io { .. } | LoadError::GridTooLarge { .. } => Ok(()),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<GridTooLarge> for LoadError {
    fn from(err: GridTooLarge) -> Self {
        LoadError::GridTooLarge {
            height: err.height,
            width: err.width,
        }
    }
}

/// Non-fatal load problems
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// Two records wrote the same cell; the later one wins
    DuplicateCell {
        position: Vec2,
        first_line: usize,
        line: usize,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::DuplicateCell {
                position,
                first_line,
                line,
            } => write!(
                f,
                "Warning at line {}: cell {} already set at line {}, overwriting",
                line, position, first_line
            ),
        }
    }
}

/// A successfully loaded program
#[derive(Debug, Clone)]
pub struct LoadedProgram {
    pub grid: Grid,
    /// Number of non-blank records applied
    pub records: usize,
    pub warnings: Vec<LoadWarning>,
}

/// Parse `source` into a `height` x `width` grid
pub fn load_program(source: &str, height: usize, width: usize) -> Result<LoadedProgram, LoadError> {
    let mut grid = Grid::new(height, width)?;
    let mut seen: FxHashMap<Vec2, usize> = FxHashMap::default();
    let mut warnings = Vec::new();
    let mut records = 0;

    for (index, text) in source.lines().enumerate() {
        let Some(Record {
            line,
            position,
            cell,
        }) = parse_record(text, index + 1)?
        else {
            continue;
        };

        grid.set_at(position, cell)
            .map_err(|_| LoadError::OutOfRange {
                line,
                position,
                width,
                height,
            })?;

        if let Some(first_line) = seen.insert(position, line) {
            warnings.push(LoadWarning::DuplicateCell {
                position,
                first_line,
                line,
            });
        }
        records += 1;
    }

    Ok(LoadedProgram {
        grid,
        records,
        warnings,
    })
}

/// Read and parse a program file
pub fn load_file(path: &Path, height: usize, width: usize) -> Result<LoadedProgram, LoadError> {
    let source = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        kind: e.kind(),
        message: e.to_string(),
    })?;
    load_program(&source, height, width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Cell, Operation};

    #[test]
    fn test_load_basic_program() {
        let source = "0 0 right\n\n1 0 'a\n  2 0   -12  \n3 0 '\\s\n";
        let program = load_program(source, 1, 4).unwrap();

        assert_eq!(program.records, 4);
        assert!(program.warnings.is_empty());
        assert_eq!(program.grid.get(0, 0), Ok(Cell::Op(Operation::RunRight)));
        assert_eq!(program.grid.get(1, 0), Ok(Cell::Char('a')));
        assert_eq!(program.grid.get(2, 0), Ok(Cell::Number(-12)));
        assert_eq!(program.grid.get(3, 0), Ok(Cell::Char(' ')));
    }

    #[test]
    fn test_unset_cells_are_nil() {
        let program = load_program("1 1 halt", 3, 3).unwrap();
        assert_eq!(program.grid.occupied(), 1);
        assert_eq!(program.grid.get(0, 0), Ok(Cell::Nil));
    }

    #[test]
    fn test_out_of_range_rejects_program() {
        let err = load_program("0 0 halt\n5 0 halt\n", 2, 5).unwrap_err();
        assert_eq!(
            err,
            LoadError::OutOfRange {
                line: 2,
                position: Vec2::new(5, 0),
                width: 5,
                height: 2,
            }
        );
        assert_eq!(
            err.to_string(),
            "Parse error at line 2: position (5, 0) is outside the 2x5 grid"
        );

        assert!(matches!(
            load_program("-1 0 halt", 2, 2),
            Err(LoadError::OutOfRange { line: 1, .. })
        ));
    }

    #[test]
    fn test_error_reports_line() {
        let err = load_program("0 0 halt\n\n0 1 bogus\n", 3, 3).unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert_eq!(
            err.to_string(),
            "Parse error at line 3: unknown operation 'bogus'"
        );
    }

    #[test]
    fn test_duplicate_cell_warns_and_overwrites() {
        let program = load_program("0 0 'a\n0 0 'b\n", 1, 1).unwrap();
        assert_eq!(program.grid.get(0, 0), Ok(Cell::Char('b')));
        assert_eq!(
            program.warnings,
            vec![LoadWarning::DuplicateCell {
                position: Vec2::ZERO,
                first_line: 1,
                line: 2,
            }]
        );
    }

    #[test]
    fn test_missing_file() {
        let err = load_file(Path::new("/nonexistent/program.bs"), 1, 1).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Io {
                kind: io::ErrorKind::NotFound,
                ..
            }
        ));
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_oversized_grid_is_a_load_error() {
        let err = load_program("", usize::MAX / 2, 4).unwrap_err();
        assert_eq!(
            err,
            LoadError::GridTooLarge {
                height: usize::MAX / 2,
                width: 4,
            }
        );
        assert_eq!(err.line(), None);
        assert!(err.to_string().ends_with("grid is too large to allocate"));
    }
}
