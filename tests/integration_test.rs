// Integration tests: load program text, run it, inspect the machine

use selgrid::grid::{Cell, Vec2};
use selgrid::interpreter::engine::{ExecConfig, Interpreter};
use selgrid::interpreter::errors::{DiagnosticKind, RuntimeError};
use selgrid::loader::{load_program, LoadError};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

fn run_source(source: &str, height: usize, width: usize) -> (Interpreter, Result<(), RuntimeError>) {
    let program = load_program(source, height, width).expect("Loading failed");
    let mut interpreter = Interpreter::new(program.grid, ExecConfig::default());
    let result = interpreter.run();
    (interpreter, result)
}

#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_hello() {
    let (interpreter, result) = run_source(include_str!("../demos/hello.bs"), 1, 8);

    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert!(interpreter.is_halted());
    assert_eq!(interpreter.terminal().contents(), "Hi\n");
    assert!(interpreter.selections().is_empty());
    assert_eq!(interpreter.steps(), 8);
}

#[test]
fn test_goto_jumps_exactly() {
    let program = load_program(include_str!("../demos/goto.bs"), 2, 8).expect("Loading failed");
    let mut interpreter = Interpreter::new(program.grid, ExecConfig::default());

    // right, select, 5, 1, select, goto
    for _ in 0..6 {
        interpreter.step().expect("Step failed");
    }
    // no advance after the jump
    assert_eq!(interpreter.cursor(), Vec2::new(5, 1));
    assert!(!interpreter.is_halted());
    // goto consumes its operand
    assert!(interpreter.selections().is_empty());

    interpreter.step().expect("Step failed");
    assert!(interpreter.is_halted());
    assert_eq!(interpreter.steps(), 7);
}

#[test]
fn test_run_sets_run_vector() {
    let (interpreter, result) = run_source(include_str!("../demos/run.bs"), 7, 6);

    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(interpreter.run_vector(), Vec2::DOWN);
    assert_eq!(interpreter.terminal().contents(), "ok");
}

#[test]
fn test_add_broadcasts_scalar() {
    let (interpreter, result) = run_source(include_str!("../demos/add.bs"), 1, 17);

    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(interpreter.terminal().contents(), "111213");
    assert_eq!(interpreter.grid().get(10, 0), Ok(Cell::Number(11)));
    assert_eq!(interpreter.grid().get(12, 0), Ok(Cell::Number(13)));
    // x and y are consumed, z is printed
    assert!(interpreter.selections().is_empty());
}

#[test]
fn test_selection_corners_normalize() {
    let (interpreter, result) = run_source(include_str!("../demos/corners.bs"), 8, 5);

    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(interpreter.terminal().contents(), "abcd");
}

#[test]
fn test_print_on_empty_stack_is_fatal() {
    let (interpreter, result) = run_source("0 0 print\n", 1, 1);

    assert!(matches!(
        result,
        Err(RuntimeError::EmptySelectionStack { .. })
    ));
    assert_eq!(interpreter.fault(), result.err().as_ref());
    assert!(!interpreter.is_halted());
}

#[test]
fn test_walking_off_the_grid_is_fatal() {
    let (_, result) = run_source("0 0 right\n", 1, 2);
    assert_eq!(
        result,
        Err(RuntimeError::CursorOutOfBounds {
            cursor: Vec2::new(2, 0),
            step: 2,
        })
    );
}

#[test]
fn test_huge_run_vector_is_fatal() {
    let source = "0 0 right\n1 0 select\n2 0 9223372036854775807\n3 0 0\n4 0 select\n5 0 run\n";
    let (interpreter, result) = run_source(source, 1, 6);

    assert_eq!(
        result,
        Err(RuntimeError::CoordinateOverflow {
            position: Vec2::new(5, 0),
            offset: Vec2::new(i64::MAX, 0),
        })
    );
    assert_eq!(interpreter.cursor(), Vec2::new(5, 0));
    assert_eq!(interpreter.run_vector(), Vec2::new(i64::MAX, 0));
}

#[test]
fn test_empty_program_stalls() {
    let (_, result) = run_source("", 2, 2);
    assert!(matches!(result, Err(RuntimeError::Stalled { step: 0, .. })));
}

#[test]
fn test_goto_with_wrong_shape_is_reported() {
    let source = "0 0 right\n1 0 select\n2 0 1\n3 0 2\n4 0 3\n5 0 select\n6 0 goto\n7 0 halt\n";
    let (interpreter, result) = run_source(source, 1, 8);

    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert!(interpreter.is_halted());
    assert_eq!(interpreter.selections().depth(), 1);
    assert_eq!(interpreter.diagnostics().len(), 1);
    assert!(matches!(
        interpreter.diagnostics()[0].kind,
        DiagnosticKind::BadVectorShape { .. }
    ));
}

#[test]
fn test_print_of_operation_emits_error_line() {
    let source = "0 0 right\n1 0 select\n2 0 right\n3 0 select\n4 0 print\n5 0 halt\n";
    let (interpreter, result) = run_source(source, 1, 6);

    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(
        interpreter.terminal().contents(),
        "ERR PRINT: Operation <run_right> cannot be printed\n"
    );
    assert_eq!(interpreter.diagnostics().len(), 1);
}

#[test]
fn test_step_limit() {
    // Bounces between two direction cells forever
    let source = "0 0 right\n1 0 left\n";
    let program = load_program(source, 1, 2).unwrap();
    let config = ExecConfig {
        max_steps: Some(50),
        ..ExecConfig::default()
    };
    let mut interpreter = Interpreter::new(program.grid, config);

    assert_eq!(
        interpreter.run(),
        Err(RuntimeError::StepLimitExceeded { limit: 50 })
    );
    assert_eq!(interpreter.steps(), 50);
}

#[test]
fn test_echo_streams_output() {
    let program = load_program(include_str!("../demos/hello.bs"), 1, 8).unwrap();
    let sink = SharedBuf::default();
    let mut interpreter =
        Interpreter::new(program.grid, ExecConfig::default()).with_echo(sink.clone());

    assert!(interpreter.run().is_ok());
    assert_eq!(sink.0.borrow().as_slice(), b"Hi\n");
}

#[test]
fn test_history_replays_output() {
    let program = load_program(include_str!("../demos/hello.bs"), 1, 8).unwrap();
    let mut interpreter = Interpreter::new(program.grid, ExecConfig::debugger());
    assert!(interpreter.run().is_ok());

    // One snapshot before each step plus the final state
    assert_eq!(interpreter.total_snapshots(), 9);

    interpreter.rewind_to_start().unwrap();
    assert_eq!(interpreter.cursor(), Vec2::ZERO);
    assert_eq!(interpreter.terminal().contents(), "");

    interpreter.jump_to_end().unwrap();
    assert!(interpreter.is_halted());
    assert_eq!(interpreter.terminal().contents(), "Hi\n");

    interpreter.step_backward().unwrap();
    assert!(!interpreter.is_halted());
    assert_eq!(interpreter.cursor(), Vec2::new(7, 0));
}

#[test]
fn test_load_errors_reject_program() {
    assert!(matches!(
        load_program("0 0 halt\n9 9 halt\n", 2, 2),
        Err(LoadError::OutOfRange { line: 2, .. })
    ));
    assert!(matches!(
        load_program("0 0 'xy\n", 1, 1),
        Err(LoadError::InvalidCharacter { line: 1, .. })
    ));
    assert!(matches!(
        load_program("0 0\n", 1, 1),
        Err(LoadError::MissingField { line: 1, .. })
    ));
    assert!(matches!(
        load_program("", usize::MAX / 2, 4),
        Err(LoadError::GridTooLarge { .. })
    ));
}
