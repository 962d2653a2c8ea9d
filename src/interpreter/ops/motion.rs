use crate::grid::{Cell, Operation, Vec2};
use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::{DiagnosticKind, RuntimeError};
use crate::selection::Shape;

impl Interpreter {
    /// `up`, `down`, `left`, `right`: set the run-vector to a unit vector
    pub(crate) fn execute_direction(&mut self, op: Operation) {
        if let Some(direction) = op.direction() {
            self.run = direction;
        }
    }

    /// `run`: consume a two-number selection as the new run-vector
    pub(crate) fn execute_run(&mut self) -> Result<Flow, RuntimeError> {
        if let Some(run) = self.take_vector_operand(Operation::Run)? {
            self.run = run;
        }
        Ok(Flow::Advance)
    }

    /// `goto`: consume a two-number selection as the new cursor position
    ///
    /// A successful jump suppresses this step's advance.
    pub(crate) fn execute_goto(&mut self) -> Result<Flow, RuntimeError> {
        match self.take_vector_operand(Operation::Goto)? {
            Some(target) => {
                self.cursor = target;
                Ok(Flow::Jumped)
            }
            None => Ok(Flow::Advance),
        }
    }

    /// Read the top selection as an `(x, y)` pair and pop it
    ///
    /// The selection must be a line of exactly two number cells, in either
    /// orientation. Otherwise a diagnostic is reported, the stack is left
    /// untouched and `None` is returned.
    fn take_vector_operand(&mut self, op: Operation) -> Result<Option<Vec2>, RuntimeError> {
        let selection = *self
            .selections
            .peek()
            .map_err(|e| RuntimeError::from_selection(e, op, self.cursor))?;

        self.check_in_grid(&selection)?;
        let shape = selection.shape();
        if shape != (Shape::Line { len: 2 }) {
            self.report(op, DiagnosticKind::BadVectorShape { shape });
            return Ok(None);
        }

        let first = selection.beg();
        let second = first + selection.axis_step();
        let mut components = [0; 2];
        for (slot, position) in components.iter_mut().zip([first, second]) {
            match self.grid.get_at(position)? {
                Cell::Number(n) => *slot = n,
                found => {
                    self.report(op, DiagnosticKind::NonNumericComponent { position, found });
                    return Ok(None);
                }
            }
        }

        self.pop_operand(op)?;
        Ok(Some(Vec2::new(components[0], components[1])))
    }
}
