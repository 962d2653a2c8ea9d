use crate::grid::{Cell, Operation};
use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::{DiagnosticKind, RuntimeError};

impl Interpreter {
    /// `select`: open a selection at `cursor + run`, or close the open one at
    /// `cursor - run` and push it
    pub(crate) fn execute_select(&mut self) -> Result<Flow, RuntimeError> {
        let (cursor, run) = (self.cursor, self.run);
        let result = if self.selections.is_selecting() {
            self.selections.end(cursor, run).map(|_| ())
        } else {
            self.selections.begin(cursor, run)
        };
        result.map_err(|e| RuntimeError::from_selection(e, Operation::Select, cursor))?;
        Ok(Flow::Advance)
    }

    /// `print`: pop a selection and emit its cells in row-major order
    ///
    /// Characters are written as-is and numbers in decimal; nil cells emit
    /// nothing. An operation cell emits an error line in place.
    pub(crate) fn execute_print(&mut self) -> Result<Flow, RuntimeError> {
        let selection = self.pop_operand(Operation::Print)?;
        self.check_in_grid(&selection)?;

        for position in selection.positions() {
            match self.grid.get_at(position)? {
                Cell::Char(c) => {
                    let mut buf = [0; 4];
                    self.emit(c.encode_utf8(&mut buf))?;
                }
                Cell::Number(n) => self.emit(&n.to_string())?,
                Cell::Op(found) => {
                    let diagnostic = self.record_diagnostic(
                        Operation::Print,
                        DiagnosticKind::UnprintableOperation { position, found },
                    );
                    self.emit(&format!("{}\n", diagnostic))?;
                }
                Cell::Nil => {}
            }
        }

        Ok(Flow::Advance)
    }
}
