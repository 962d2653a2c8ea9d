//! Signed 2D coordinates
//!
//! [`Vec2`] is used both for positions (cursor, selection corners) and for
//! displacements (the run-vector). The type enforces no bounds; callers check
//! against the [`Grid`](super::Grid) before indexing. Offsets that come from
//! program data go through [`Vec2::checked_add`] and [`Vec2::checked_sub`].

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// An (x, y) pair of signed integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vec2 {
    pub x: i64,
    pub y: i64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0, y: 0 };
    pub const UP: Vec2 = Vec2 { x: 0, y: -1 };
    pub const DOWN: Vec2 = Vec2 { x: 0, y: 1 };
    pub const LEFT: Vec2 = Vec2 { x: -1, y: 0 };
    pub const RIGHT: Vec2 = Vec2 { x: 1, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Vec2 { x, y }
    }

    pub fn is_zero(&self) -> bool {
        *self == Vec2::ZERO
    }

    /// Componentwise addition, `None` on `i64` overflow
    pub fn checked_add(self, other: Vec2) -> Option<Vec2> {
        Some(Vec2::new(
            self.x.checked_add(other.x)?,
            self.y.checked_add(other.y)?,
        ))
    }

    /// Componentwise subtraction, `None` on `i64` overflow
    pub fn checked_sub(self, other: Vec2) -> Option<Vec2> {
        Some(Vec2::new(
            self.x.checked_sub(other.x)?,
            self.y.checked_sub(other.y)?,
        ))
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Vec2) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl From<(i64, i64)> for Vec2 {
    fn from((x, y): (i64, i64)) -> Self {
        Vec2 { x, y }
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
