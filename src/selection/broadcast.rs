//! Rank-polymorphic broadcasting
//!
//! [`replicate`] applies a kernel defined on fixed-rank arguments to
//! selections of higher rank by slicing along the leading axis and recursing,
//! the way array languages lift scalar functions over vectors and matrices.
//!
//! ```text
//! add(z:[3], y:point, x:[3])
//!   → add(z[0], y, x[0])
//!   → add(z[1], y, x[1])
//!   → add(z[2], y, x[2])
//! ```
//!
//! Only arguments at the highest excess rank are sliced in a given round;
//! every other argument must already sit at its expected rank. Ranks and
//! extents are checked before the kernel runs, so a mismatch never leaves a
//! partially-written result behind.

use super::{Selection, Shape};
use std::fmt;

/// Broadcasting failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    /// Argument and expected-rank lists differ in length
    ArityMismatch { args: usize, ranks: usize },
    /// Argument cannot be brought to its expected rank
    RankMismatch {
        index: usize,
        rank: usize,
        expected: usize,
    },
    /// Argument's leading extent differs from the batch extent
    ExtentMismatch {
        index: usize,
        extent: i64,
        expected: i64,
    },
}

impl fmt::Display for BroadcastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BroadcastError::ArityMismatch { args, ranks } => write!(
                f,
                "{} argument(s) given for {} expected rank(s)",
                args, ranks
            ),
            BroadcastError::RankMismatch {
                index,
                rank,
                expected,
            } => write!(
                f,
                "Argument {} has rank {} and cannot be broadcast to rank {}",
                index, rank, expected
            ),
            BroadcastError::ExtentMismatch {
                index,
                extent,
                expected,
            } => write!(
                f,
                "Argument {} has leading extent {}, expected {}",
                index, extent, expected
            ),
        }
    }
}

impl std::error::Error for BroadcastError {}

/// Apply `kernel` to `args`, broadcasting arguments whose rank exceeds
/// `expected_ranks`
pub fn replicate<F, E>(args: &[Selection], expected_ranks: &[usize], kernel: &mut F) -> Result<(), E>
where
    F: FnMut(&[Selection]) -> Result<(), E>,
    E: From<BroadcastError>,
{
    let plan = plan(args, expected_ranks)?;
    run_plan(args, plan.as_ref(), kernel)
}

/// One level of broadcasting: which arguments get sliced and how many times
#[derive(Debug)]
struct Plan {
    sliced: Vec<bool>,
    outer: i64,
    inner: Option<Box<Plan>>,
}

fn plan(args: &[Selection], expected_ranks: &[usize]) -> Result<Option<Plan>, BroadcastError> {
    if args.len() != expected_ranks.len() {
        return Err(BroadcastError::ArityMismatch {
            args: args.len(),
            ranks: expected_ranks.len(),
        });
    }

    let shapes: Vec<Shape> = args.iter().map(Selection::shape).collect();
    if shapes
        .iter()
        .zip(expected_ranks)
        .all(|(shape, &expected)| shape.rank() == expected)
    {
        return Ok(None);
    }

    // The batch axis belongs to the first argument at the highest excess rank.
    let mut max_rank = 0;
    let mut outer = 0;
    for (shape, &expected) in shapes.iter().zip(expected_ranks) {
        if shape.rank() > expected && shape.rank() > max_rank {
            max_rank = shape.rank();
            outer = shape.leading_extent().unwrap_or(1);
        }
    }

    let mut sliced = vec![false; args.len()];
    for (index, (shape, &expected)) in shapes.iter().zip(expected_ranks).enumerate() {
        if max_rank > 0 && shape.rank() > expected && shape.rank() == max_rank {
            let extent = shape.leading_extent().unwrap_or(1);
            if extent != outer {
                return Err(BroadcastError::ExtentMismatch {
                    index,
                    extent,
                    expected: outer,
                });
            }
            sliced[index] = true;
        } else if shape.rank() != expected {
            return Err(BroadcastError::RankMismatch {
                index,
                rank: shape.rank(),
                expected,
            });
        }
    }

    // Slices of one argument all share a shape, so the first one stands in
    // for the rest when planning the next level.
    let first: Vec<Selection> = args
        .iter()
        .zip(&sliced)
        .map(|(arg, &is_sliced)| if is_sliced { arg.slice(0) } else { *arg })
        .collect();
    let inner = plan(&first, expected_ranks)?.map(Box::new);

    Ok(Some(Plan {
        sliced,
        outer,
        inner,
    }))
}

fn run_plan<F, E>(args: &[Selection], plan: Option<&Plan>, kernel: &mut F) -> Result<(), E>
where
    F: FnMut(&[Selection]) -> Result<(), E>,
{
    let Some(level) = plan else {
        return kernel(args);
    };

    let mut reduced = args.to_vec();
    for i in 0..level.outer {
        for (slot, (arg, &is_sliced)) in reduced.iter_mut().zip(args.iter().zip(&level.sliced)) {
            if is_sliced {
                *slot = arg.slice(i);
            }
        }
        run_plan(&reduced, level.inner.as_deref(), kernel)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Vec2;

    fn sel(bx: i64, by: i64, ex: i64, ey: i64) -> Selection {
        Selection::new(Vec2::new(bx, by), Vec2::new(ex, ey))
    }

    fn collect(args: &[Selection], ranks: &[usize]) -> Result<Vec<Vec<Selection>>, BroadcastError> {
        let mut calls = Vec::new();
        replicate(args, ranks, &mut |a: &[Selection]| -> Result<(), BroadcastError> {
            calls.push(a.to_vec());
            Ok(())
        })?;
        Ok(calls)
    }

    #[test]
    fn test_all_points_apply_once() {
        let args = [sel(0, 0, 0, 0), sel(1, 0, 1, 0), sel(2, 0, 2, 0)];
        let calls = collect(&args, &[0, 0, 0]).unwrap();
        assert_eq!(calls, vec![args.to_vec()]);
    }

    #[test]
    fn test_scalar_broadcasts_over_vector() {
        let z = sel(0, 1, 3, 1);
        let y = sel(5, 5, 5, 5);
        let x = sel(0, 0, 3, 0);
        let calls = collect(&[z, y, x], &[0, 0, 0]).unwrap();

        assert_eq!(calls.len(), 4);
        for (i, call) in calls.iter().enumerate() {
            let i = i as i64;
            assert_eq!(call[0], Selection::point(Vec2::new(i, 1)));
            assert_eq!(call[1], y);
            assert_eq!(call[2], Selection::point(Vec2::new(i, 0)));
        }
    }

    #[test]
    fn test_rectangle_broadcasts_row_major() {
        let z = sel(0, 0, 1, 2);
        let y = sel(9, 9, 9, 9);
        let x = sel(4, 0, 5, 2);
        let calls = collect(&[z, y, x], &[0, 0, 0]).unwrap();

        let targets: Vec<Vec2> = calls.iter().map(|c| c[0].beg()).collect();
        let expected: Vec<Vec2> = z.positions().collect();
        assert_eq!(targets, expected);
        assert!(calls.iter().all(|c| c[1] == y));
        assert_eq!(calls[3][2], Selection::point(Vec2::new(5, 1)));
    }

    #[test]
    fn test_vertical_and_horizontal_lines_pair_up() {
        let z = sel(0, 0, 0, 2);
        let x = sel(3, 3, 5, 3);
        let calls = collect(&[z, x], &[0, 0]).unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2], vec![
            Selection::point(Vec2::new(0, 2)),
            Selection::point(Vec2::new(5, 3)),
        ]);
    }

    #[test]
    fn test_mixed_intermediate_rank_is_rejected() {
        let z = sel(0, 0, 2, 2);
        let y = sel(0, 5, 2, 5);
        let x = sel(7, 7, 7, 7);
        let err = collect(&[z, y, x], &[0, 0, 0]).unwrap_err();
        assert_eq!(
            err,
            BroadcastError::RankMismatch {
                index: 1,
                rank: 1,
                expected: 0,
            }
        );
    }

    #[test]
    fn test_extent_mismatch_runs_nothing() {
        let mut calls = 0;
        let result = replicate(
            &[sel(0, 0, 2, 0), sel(0, 1, 3, 1)],
            &[0, 0],
            &mut |_: &[Selection]| -> Result<(), BroadcastError> {
                calls += 1;
                Ok(())
            },
        );
        assert_eq!(
            result,
            Err(BroadcastError::ExtentMismatch {
                index: 1,
                extent: 4,
                expected: 3,
            })
        );
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_rank_below_expected_is_rejected() {
        assert_eq!(
            plan(&[sel(0, 0, 0, 0)], &[1]).map(|_| ()),
            Err(BroadcastError::RankMismatch {
                index: 0,
                rank: 0,
                expected: 1,
            })
        );
        assert_eq!(
            plan(&[sel(0, 0, 0, 0)], &[0, 0]).map(|_| ()),
            Err(BroadcastError::ArityMismatch { args: 1, ranks: 2 })
        );
    }
}
