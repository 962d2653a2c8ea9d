// Broadcasting tests: the add kernel lifted over lines and rectangles

use selgrid::grid::{Cell, Grid, Vec2};
use selgrid::interpreter::ops::arith::{add, KernelError, ADD_RANKS};
use selgrid::selection::broadcast::{replicate, BroadcastError};
use selgrid::selection::Selection;

fn sel(bx: i64, by: i64, ex: i64, ey: i64) -> Selection {
    Selection::new(Vec2::new(bx, by), Vec2::new(ex, ey))
}

fn fill(grid: &mut Grid, selection: Selection, values: &[i64]) {
    for (position, &value) in selection.positions().zip(values) {
        grid.set_at(position, Cell::Number(value)).unwrap();
    }
}

fn numbers(grid: &Grid, selection: Selection) -> Vec<Cell> {
    selection
        .positions()
        .map(|p| grid.get_at(p).unwrap())
        .collect()
}

#[test]
fn test_rect_plus_rect() {
    let mut grid = Grid::new(6, 3).unwrap();
    let x = sel(0, 0, 2, 1);
    let y = sel(0, 2, 2, 3);
    let z = sel(0, 4, 2, 5);
    fill(&mut grid, x, &[1, 2, 3, 4, 5, 6]);
    fill(&mut grid, y, &[10, 20, 30, 40, 50, 60]);

    replicate(&[z, y, x], &ADD_RANKS, &mut |a: &[Selection]| add(&mut grid, a)).unwrap();

    let expected: Vec<Cell> = [11, 22, 33, 44, 55, 66].map(Cell::Number).to_vec();
    assert_eq!(numbers(&grid, z), expected);
}

#[test]
fn test_rect_plus_scalar() {
    let mut grid = Grid::new(3, 3).unwrap();
    let x = sel(0, 0, 1, 1);
    let y = Selection::point(Vec2::new(2, 2));
    let z = sel(0, 0, 1, 1);
    fill(&mut grid, x, &[1, 2, 3, 4]);
    fill(&mut grid, y, &[100]);

    // z aliases x: each cell is read before it is written
    replicate(&[z, y, x], &ADD_RANKS, &mut |a: &[Selection]| add(&mut grid, a)).unwrap();

    let expected: Vec<Cell> = [101, 102, 103, 104].map(Cell::Number).to_vec();
    assert_eq!(numbers(&grid, z), expected);
}

#[test]
fn test_column_plus_row() {
    let mut grid = Grid::new(4, 4).unwrap();
    let x = sel(0, 0, 0, 2); // column of 3
    let y = sel(1, 3, 3, 3); // row of 3
    let z = sel(3, 0, 3, 2);
    fill(&mut grid, x, &[1, 2, 3]);
    fill(&mut grid, y, &[7, 8, 9]);

    replicate(&[z, y, x], &ADD_RANKS, &mut |a: &[Selection]| add(&mut grid, a)).unwrap();

    let expected: Vec<Cell> = [8, 10, 12].map(Cell::Number).to_vec();
    assert_eq!(numbers(&grid, z), expected);
}

#[test]
fn test_length_mismatch_writes_nothing() {
    let mut grid = Grid::new(2, 4).unwrap();
    let x = sel(0, 0, 2, 0);
    let y = sel(0, 1, 1, 1);
    let z = sel(0, 0, 2, 0);
    fill(&mut grid, x, &[1, 2, 3]);
    fill(&mut grid, y, &[1, 1]);
    let before = grid.clone();

    let result = replicate(&[z, y, x], &ADD_RANKS, &mut |a: &[Selection]| add(&mut grid, a));

    assert!(matches!(
        result,
        Err(KernelError::Broadcast(BroadcastError::ExtentMismatch { .. }))
    ));
    assert_eq!(grid, before);
}

#[test]
fn test_rect_with_line_is_rank_mismatch() {
    let mut grid = Grid::new(3, 3).unwrap();
    let z = sel(0, 0, 2, 1);
    let y = Selection::point(Vec2::new(0, 2));
    let x = sel(0, 2, 2, 2);

    let result = replicate(&[z, y, x], &ADD_RANKS, &mut |a: &[Selection]| add(&mut grid, a));

    assert!(matches!(
        result,
        Err(KernelError::Broadcast(BroadcastError::RankMismatch { index: 2, .. }))
    ));
}
