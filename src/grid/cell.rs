//! Cell values
//!
//! Every grid position holds exactly one [`Cell`] variant. Operations are
//! identified by [`Operation`], which also owns the source keyword table used
//! by the loader and the display names used in diagnostics.

use super::vec2::Vec2;
use std::fmt;

/// Integer payload of a number cell
pub type Number = i64;

/// The fixed operation set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Goto,
    Run,
    RunUp,
    RunLeft,
    RunDown,
    RunRight,
    Select,
    Print,
    Halt,
    Add,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::Goto,
        Operation::Run,
        Operation::RunUp,
        Operation::RunLeft,
        Operation::RunDown,
        Operation::RunRight,
        Operation::Select,
        Operation::Print,
        Operation::Halt,
        Operation::Add,
    ];

    /// Resolve a source keyword (`up`, `select`, ...)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "select" => Some(Operation::Select),
            "print" => Some(Operation::Print),
            "run" => Some(Operation::Run),
            "up" => Some(Operation::RunUp),
            "right" => Some(Operation::RunRight),
            "down" => Some(Operation::RunDown),
            "left" => Some(Operation::RunLeft),
            "goto" => Some(Operation::Goto),
            "halt" => Some(Operation::Halt),
            "add" => Some(Operation::Add),
            _ => None,
        }
    }

    /// The keyword that produces this operation in source text
    pub fn keyword(&self) -> &'static str {
        match self {
            Operation::Goto => "goto",
            Operation::Run => "run",
            Operation::RunUp => "up",
            Operation::RunLeft => "left",
            Operation::RunDown => "down",
            Operation::RunRight => "right",
            Operation::Select => "select",
            Operation::Print => "print",
            Operation::Halt => "halt",
            Operation::Add => "add",
        }
    }

    /// Unit run-vector for the four directional operations
    pub fn direction(&self) -> Option<Vec2> {
        match self {
            Operation::RunUp => Some(Vec2::UP),
            Operation::RunLeft => Some(Vec2::LEFT),
            Operation::RunDown => Some(Vec2::DOWN),
            Operation::RunRight => Some(Vec2::RIGHT),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Goto => "goto",
            Operation::Run => "run",
            Operation::RunUp => "run_up",
            Operation::RunLeft => "run_left",
            Operation::RunDown => "run_down",
            Operation::RunRight => "run_right",
            Operation::Select => "select",
            Operation::Print => "print",
            Operation::Halt => "halt",
            Operation::Add => "add",
        };
        f.write_str(name)
    }
}

/// The tagged value stored at one grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Nil,
    Op(Operation),
    Number(Number),
    Char(char),
}

impl Cell {
    pub fn is_nil(&self) -> bool {
        matches!(self, Cell::Nil)
    }

    pub fn as_op(&self) -> Option<Operation> {
        match self {
            Cell::Op(op) => Some(*op),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Short label used in diagnostics and in the grid pane
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Nil => "nil",
            Cell::Op(_) => "operation",
            Cell::Number(_) => "number",
            Cell::Char(_) => "character",
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Nil => f.write_str("nil"),
            Cell::Op(op) => write!(f, "<{}>", op),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Char('\n') => f.write_str("'\\n"),
            Cell::Char(' ') => f.write_str("'\\s"),
            Cell::Char(c) => write!(f, "'{}", c),
        }
    }
}
