//! Grid interpreter execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: The [`Interpreter`](engine::Interpreter) machine, its step
//!   loop and history navigation
//! - [`ops`]: Operation handlers, one file per operation family
//! - [`errors`]: Fatal runtime errors and non-fatal diagnostics
//!
//! # Execution Model
//!
//! Each step reads the cell under the cursor. An operation cell is executed;
//! any other cell is passed over. The cursor then moves by the run-vector,
//! unless a successful `goto` already placed it. The loop ends at `halt` or
//! at the first fault.
//!
//! When history recording is on, a snapshot is taken before every step to
//! enable time-travel debugging.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod ops;
