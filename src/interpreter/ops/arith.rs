use crate::grid::{Cell, Grid, Number, Operation, Vec2};
use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::selection::broadcast::{replicate, BroadcastError};
use crate::selection::Selection;

/// Expected ranks of `add`'s `[z, y, x]` arguments
pub const ADD_RANKS: [usize; 3] = [0, 0, 0];

/// Failure inside a broadcast kernel: either the broadcast itself or the
/// kernel's own fault
#[derive(Debug)]
pub enum KernelError {
    Broadcast(BroadcastError),
    Runtime(RuntimeError),
}

impl From<BroadcastError> for KernelError {
    fn from(err: BroadcastError) -> Self {
        KernelError::Broadcast(err)
    }
}

impl From<RuntimeError> for KernelError {
    fn from(err: RuntimeError) -> Self {
        KernelError::Runtime(err)
    }
}

impl KernelError {
    fn into_runtime(self, op: Operation) -> RuntimeError {
        match self {
            KernelError::Broadcast(err) => RuntimeError::from_broadcast(err, op),
            KernelError::Runtime(err) => err,
        }
    }
}

/// Elementwise kernel: `z = x + y` on single cells
pub fn add(grid: &mut Grid, args: &[Selection]) -> Result<(), KernelError> {
    let [z, y, x] = args else {
        return Err(RuntimeError::ArityMismatch {
            op: Operation::Add,
            args: args.len(),
            expected: 3,
        }
        .into());
    };

    let lhs = number_at(grid, x.beg())?;
    let rhs = number_at(grid, y.beg())?;
    let sum = lhs.checked_add(rhs).ok_or(RuntimeError::IntegerOverflow {
        op: Operation::Add,
        position: z.beg(),
    })?;
    grid.set_at(z.beg(), Cell::Number(sum))
        .map_err(RuntimeError::from)?;
    Ok(())
}

fn number_at(grid: &Grid, position: Vec2) -> Result<Number, RuntimeError> {
    match grid.get_at(position)? {
        Cell::Number(n) => Ok(n),
        found => Err(RuntimeError::NotANumber {
            op: Operation::Add,
            position,
            found,
        }),
    }
}

impl Interpreter {
    // z y x -- z
    // x + y = z
    pub(crate) fn execute_add(&mut self) -> Result<Flow, RuntimeError> {
        let z = self.pop_operand(Operation::Add)?;
        let y = self.pop_operand(Operation::Add)?;
        let x = self.pop_operand(Operation::Add)?;

        let args = [z, y, x];
        for arg in &args {
            self.check_in_grid(arg)?;
        }

        let grid = &mut self.grid;
        replicate(&args, &ADD_RANKS, &mut |a: &[Selection]| add(grid, a))
            .map_err(|e| e.into_runtime(Operation::Add))?;

        self.selections.push(z);
        Ok(Flow::Advance)
    }
}
