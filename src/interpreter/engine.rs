// Execution engine for the grid interpreter

use crate::grid::{Cell, Grid, Operation, Vec2};
use crate::interpreter::constants::{DEFAULT_SNAPSHOT_LIMIT, DEFAULT_TUI_MAX_STEPS};
use crate::interpreter::errors::{Diagnostic, DiagnosticKind, RuntimeError};
use crate::selection::{Selection, SelectionStack};
use crate::snapshot::{MockTerminal, Snapshot, SnapshotManager};
use std::io::Write;

/// Execution settings
#[derive(Debug, Clone, PartialEq)]
pub struct ExecConfig {
    /// Fault with [`RuntimeError::StepLimitExceeded`] after this many steps
    pub max_steps: Option<u64>,
    /// Take a snapshot before every step for time-travel navigation
    pub record_history: bool,
    /// Memory cap for the snapshot history, in bytes
    pub snapshot_limit: usize,
    /// Write non-fatal diagnostics to stderr as they happen
    pub echo_diagnostics: bool,
}

impl Default for ExecConfig {
    fn default() -> Self {
        ExecConfig {
            max_steps: None,
            record_history: false,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
            echo_diagnostics: false,
        }
    }
}

impl ExecConfig {
    /// Settings for the time-travel debugger
    pub fn debugger() -> Self {
        ExecConfig {
            max_steps: Some(DEFAULT_TUI_MAX_STEPS),
            record_history: true,
            ..ExecConfig::default()
        }
    }
}

/// What happens to the cursor after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Move by the run-vector
    Advance,
    /// The operation placed the cursor itself
    Jumped,
}

/// The machine: grid, selection stack, cursor, run-vector and halt flag
pub struct Interpreter {
    /// Program storage
    pub(crate) grid: Grid,

    /// Selection stack and open selection
    pub(crate) selections: SelectionStack,

    /// Position being executed
    pub(crate) cursor: Vec2,

    /// Displacement applied after each step
    pub(crate) run: Vec2,

    /// Set by `halt`
    halted: bool,

    /// Number of steps started so far
    steps: u64,

    /// Captured program output
    terminal: MockTerminal,

    /// Live output sink (stdout in the CLI)
    echo: Option<Box<dyn Write>>,

    /// Non-fatal problems reported so far
    diagnostics: Vec<Diagnostic>,

    /// Operation executed by the most recent step
    last_op: Option<Operation>,

    config: ExecConfig,

    /// Snapshot manager for reverse execution
    snapshot_manager: SnapshotManager,

    /// Current position in execution history
    history_position: usize,

    /// Fault that ended the run, if any
    fault: Option<RuntimeError>,
}

impl Interpreter {
    /// Create an interpreter at the initial state: cursor and run-vector
    /// `(0, 0)`, empty selection stack, running
    pub fn new(grid: Grid, config: ExecConfig) -> Self {
        let snapshot_limit = config.snapshot_limit;
        Interpreter {
            grid,
            selections: SelectionStack::new(),
            cursor: Vec2::ZERO,
            run: Vec2::ZERO,
            halted: false,
            steps: 0,
            terminal: MockTerminal::new(),
            echo: None,
            diagnostics: Vec::new(),
            last_op: None,
            config,
            snapshot_manager: SnapshotManager::new(snapshot_limit),
            history_position: 0,
            fault: None,
        }
    }

    /// Stream output to `sink` as it is produced, flushing after every write
    pub fn with_echo(mut self, sink: impl Write + 'static) -> Self {
        self.echo = Some(Box::new(sink));
        self
    }

    /// Run until `halt` or a fault
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        let result = self.run_loop();

        if let Err(err) = &result {
            self.fault = Some(err.clone());
        }

        // Record the terminal state (halted or faulted) as the last snapshot
        if self.config.record_history
            && !matches!(result, Err(RuntimeError::SnapshotLimitExceeded { .. }))
        {
            let recorded = self.take_snapshot();
            if result.is_ok() {
                recorded?;
            }
        }

        result
    }

    fn run_loop(&mut self) -> Result<(), RuntimeError> {
        while !self.halted {
            if self.config.record_history {
                self.take_snapshot()?;
            }
            self.step()?;
        }
        Ok(())
    }

    /// Execute one step: run the operation under the cursor, if any, then
    /// advance by the run-vector unless the operation moved the cursor
    pub fn step(&mut self) -> Result<(), RuntimeError> {
        if self.halted {
            return Ok(());
        }

        if let Some(limit) = self.config.max_steps {
            if self.steps >= limit {
                return Err(RuntimeError::StepLimitExceeded { limit });
            }
        }

        let cell = self
            .grid
            .get_at(self.cursor)
            .map_err(|_| RuntimeError::CursorOutOfBounds {
                cursor: self.cursor,
                step: self.steps,
            })?;

        if !matches!(cell, Cell::Op(_)) && self.run.is_zero() {
            return Err(RuntimeError::Stalled {
                cursor: self.cursor,
                step: self.steps,
            });
        }

        self.steps += 1;

        let flow = match cell {
            Cell::Op(op) => {
                self.last_op = Some(op);
                self.execute_op(op)?
            }
            Cell::Nil | Cell::Number(_) | Cell::Char(_) => {
                self.last_op = None;
                Flow::Advance
            }
        };

        if flow == Flow::Advance {
            self.cursor = self.cursor.checked_add(self.run).ok_or(
                RuntimeError::CoordinateOverflow {
                    position: self.cursor,
                    offset: self.run,
                },
            )?;
        }

        Ok(())
    }

    /// Dispatch a single operation
    fn execute_op(&mut self, op: Operation) -> Result<Flow, RuntimeError> {
        match op {
            Operation::RunUp | Operation::RunLeft | Operation::RunDown | Operation::RunRight => {
                self.execute_direction(op);
                Ok(Flow::Advance)
            }
            Operation::Run => self.execute_run(),
            Operation::Goto => self.execute_goto(),
            Operation::Select => self.execute_select(),
            Operation::Print => self.execute_print(),
            Operation::Add => self.execute_add(),
            Operation::Halt => {
                self.halted = true;
                Ok(Flow::Advance)
            }
        }
    }

    // ========== Helpers shared by the operation handlers ==========

    /// Pop the top selection on behalf of `op`
    pub(crate) fn pop_operand(&mut self, op: Operation) -> Result<Selection, RuntimeError> {
        self.selections
            .pop()
            .map_err(|e| RuntimeError::from_selection(e, op, self.cursor))
    }

    /// Fail unless every cell of `selection` lies on the grid
    pub(crate) fn check_in_grid(&self, selection: &Selection) -> Result<(), RuntimeError> {
        for corner in [selection.beg(), selection.end()] {
            if !self.grid.contains(corner) {
                return Err(RuntimeError::OutOfBounds {
                    position: corner,
                    width: self.grid.width(),
                    height: self.grid.height(),
                });
            }
        }
        Ok(())
    }

    /// Write program output
    pub(crate) fn emit(&mut self, text: &str) -> Result<(), RuntimeError> {
        if self.echo.is_none() || self.config.record_history {
            self.terminal.print(text, self.steps);
        }
        if let Some(out) = self.echo.as_mut() {
            out.write_all(text.as_bytes())
                .and_then(|_| out.flush())
                .map_err(|e| RuntimeError::OutputFailed {
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// Record a diagnostic without echoing it
    pub(crate) fn record_diagnostic(&mut self, op: Operation, kind: DiagnosticKind) -> Diagnostic {
        let diagnostic = Diagnostic {
            step: self.steps,
            cursor: self.cursor,
            op,
            kind,
        };
        self.diagnostics.push(diagnostic.clone());
        diagnostic
    }

    /// Record a diagnostic and echo it to stderr when configured
    pub(crate) fn report(&mut self, op: Operation, kind: DiagnosticKind) {
        let diagnostic = self.record_diagnostic(op, kind);
        if self.config.echo_diagnostics {
            eprintln!("{}", diagnostic);
        }
    }

    // ========== History ==========

    /// Take a snapshot of the current execution state
    fn take_snapshot(&mut self) -> Result<(), RuntimeError> {
        let snapshot = Snapshot {
            grid: self.grid.clone(),
            selections: self.selections.clone(),
            cursor: self.cursor,
            run: self.run,
            halted: self.halted,
            steps: self.steps,
            terminal: self.terminal.clone(),
            diagnostics: self.diagnostics.clone(),
            last_op: self.last_op,
        };

        self.snapshot_manager
            .push(snapshot)
            .map_err(|_| RuntimeError::SnapshotLimitExceeded {
                current: self.snapshot_manager.memory_usage(),
                limit: self.snapshot_manager.memory_limit(),
            })?;

        self.history_position = self.snapshot_manager.len() - 1;
        Ok(())
    }

    /// Restore execution state from a snapshot
    fn restore_snapshot(&mut self, snapshot: &Snapshot) {
        self.grid = snapshot.grid.clone();
        self.selections = snapshot.selections.clone();
        self.cursor = snapshot.cursor;
        self.run = snapshot.run;
        self.halted = snapshot.halted;
        self.steps = snapshot.steps;
        self.terminal = snapshot.terminal.clone();
        self.diagnostics = snapshot.diagnostics.clone();
        self.last_op = snapshot.last_op;
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position == 0 {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "Already at the beginning of execution".to_string(),
            });
        }

        self.restore_at(self.history_position - 1)
    }

    /// Step forward in execution (restore next snapshot)
    pub fn step_forward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position + 1 >= self.snapshot_manager.len() {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "No more snapshots available (execution finished)".to_string(),
            });
        }

        self.restore_at(self.history_position + 1)
    }

    /// Rewind to the beginning of execution history
    pub fn rewind_to_start(&mut self) -> Result<(), RuntimeError> {
        self.restore_at(0)
    }

    /// Jump to the last recorded state
    pub fn jump_to_end(&mut self) -> Result<(), RuntimeError> {
        let last = self.snapshot_manager.len().saturating_sub(1);
        self.restore_at(last)
    }

    fn restore_at(&mut self, index: usize) -> Result<(), RuntimeError> {
        // Clone the snapshot to avoid borrow checker issues
        let snapshot = self.snapshot_manager.get(index).cloned().ok_or_else(|| {
            RuntimeError::HistoryOperationFailed {
                message: format!("Snapshot {} not found in history", index),
            }
        })?;
        self.restore_snapshot(&snapshot);
        self.history_position = index;
        Ok(())
    }

    // ========== Getter methods for UI ==========

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selections(&self) -> &SelectionStack {
        &self.selections
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn run_vector(&self) -> Vec2 {
        self.run
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Number of steps executed to reach the current state
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Get a reference to the captured output
    pub fn terminal(&self) -> &MockTerminal {
        &self.terminal
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn last_op(&self) -> Option<Operation> {
        self.last_op
    }

    /// The fault that ended the run, if it ended in one
    pub fn fault(&self) -> Option<&RuntimeError> {
        self.fault.as_ref()
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    /// Get the current history position
    pub fn history_position(&self) -> usize {
        self.history_position
    }

    /// Get the total number of snapshots
    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.len()
    }
}
