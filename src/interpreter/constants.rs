// Constants for the grid interpreter

/// Default memory cap for the snapshot history (256 MB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 256 * 1024 * 1024;

/// Step cap applied in the debugger when none is configured, so that a
/// non-terminating program still produces a finite history
pub const DEFAULT_TUI_MAX_STEPS: u64 = 100_000;

/// Rough per-selection size used when estimating snapshot memory
pub const SELECTION_SIZE_ESTIMATE: usize = 32;
