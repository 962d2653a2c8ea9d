//! Selection shapes
//!
//! A selection's [`Shape`] is derived from its corners, never stored:
//! - rank 0: a single cell
//! - rank 1: a line along exactly one axis, extent `[len]`
//! - rank 2: a rectangle spanning both axes, extents `[height, width]`
//!
//! Extents count cells inclusively (`end - beg + 1`).

use super::Selection;
use crate::grid::Vec2;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Point,
    Line { len: i64 },
    Rect { height: i64, width: i64 },
}

impl Shape {
    pub fn rank(&self) -> usize {
        match self {
            Shape::Point => 0,
            Shape::Line { .. } => 1,
            Shape::Rect { .. } => 2,
        }
    }

    pub fn extents(&self) -> Vec<i64> {
        match self {
            Shape::Point => Vec::new(),
            Shape::Line { len } => vec![*len],
            Shape::Rect { height, width } => vec![*height, *width],
        }
    }

    /// Length of the first axis; `None` for a point
    pub fn leading_extent(&self) -> Option<i64> {
        match self {
            Shape::Point => None,
            Shape::Line { len } => Some(*len),
            Shape::Rect { height, .. } => Some(*height),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Point => write!(f, "rank 0"),
            Shape::Line { len } => write!(f, "rank 1 [{}]", len),
            Shape::Rect { height, width } => write!(f, "rank 2 [{}, {}]", height, width),
        }
    }
}

impl Selection {
    pub fn shape(&self) -> Shape {
        let (beg, end) = (self.beg(), self.end());
        if beg == end {
            Shape::Point
        } else if beg.y == end.y {
            Shape::Line { len: self.width() }
        } else if beg.x == end.x {
            Shape::Line { len: self.height() }
        } else {
            Shape::Rect {
                height: self.height(),
                width: self.width(),
            }
        }
    }

    /// The `i`-th slice along the leading axis, one rank lower
    ///
    /// A single-row selection is sliced into its cells; anything else is
    /// sliced into rows (a column therefore yields cells as well).
    pub fn slice(&self, i: i64) -> Selection {
        let (beg, end) = (self.beg(), self.end());
        if self.is_horizontal() {
            Selection::point(Vec2::new(beg.x + i, beg.y))
        } else {
            Selection::new(Vec2::new(beg.x, beg.y + i), Vec2::new(end.x, beg.y + i))
        }
    }

    /// Unit step from one element of a line to the next
    pub fn axis_step(&self) -> Vec2 {
        if self.is_horizontal() {
            Vec2::RIGHT
        } else {
            Vec2::DOWN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(bx: i64, by: i64, ex: i64, ey: i64) -> Selection {
        Selection::new(Vec2::new(bx, by), Vec2::new(ex, ey))
    }

    #[test]
    fn test_point_is_rank_zero() {
        for p in [Vec2::ZERO, Vec2::new(7, 3), Vec2::new(-2, 9)] {
            let shape = Selection::point(p).shape();
            assert_eq!(shape, Shape::Point);
            assert_eq!(shape.rank(), 0);
            assert!(shape.extents().is_empty());
        }
    }

    #[test]
    fn test_lines_are_rank_one() {
        let row = sel(1, 4, 5, 4).shape();
        assert_eq!(row.rank(), 1);
        assert_eq!(row.extents(), vec![5]);

        let column = sel(2, 0, 2, 2).shape();
        assert_eq!(column.rank(), 1);
        assert_eq!(column.extents(), vec![3]);
    }

    #[test]
    fn test_rectangle_is_rank_two() {
        let shape = sel(3, 1, 0, 2).shape();
        assert_eq!(shape.rank(), 2);
        assert_eq!(shape.extents(), vec![2, 4]);
        assert_eq!(shape.leading_extent(), Some(2));
        assert_eq!(shape.to_string(), "rank 2 [2, 4]");
    }

    #[test]
    fn test_slices() {
        let row = sel(1, 4, 3, 4);
        assert_eq!(row.slice(2), Selection::point(Vec2::new(3, 4)));

        let column = sel(2, 0, 2, 2);
        assert_eq!(column.slice(1), Selection::point(Vec2::new(2, 1)));

        let rect = sel(0, 0, 2, 1);
        assert_eq!(rect.slice(1), sel(0, 1, 2, 1));
        assert_eq!(rect.slice(1).shape(), Shape::Line { len: 3 });
    }

    #[test]
    fn test_shape_matches_raw_corner_bounds() {
        for (a, b) in [
            (Vec2::new(4, 4), Vec2::new(1, 1)),
            (Vec2::new(0, 3), Vec2::new(0, 0)),
            (Vec2::new(5, 2), Vec2::new(2, 2)),
        ] {
            let shape = Selection::new(a, b).shape();
            let w = a.x.max(b.x) - a.x.min(b.x) + 1;
            let h = a.y.max(b.y) - a.y.min(b.y) + 1;
            let expected = match (w > 1, h > 1) {
                (false, false) => vec![],
                (true, false) => vec![w],
                (false, true) => vec![h],
                (true, true) => vec![h, w],
            };
            assert_eq!(shape.extents(), expected);
        }
    }
}
