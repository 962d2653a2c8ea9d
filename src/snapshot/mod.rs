// Snapshot management for reverse execution

use crate::grid::{Cell, Grid, Operation, Vec2};
use crate::interpreter::constants::SELECTION_SIZE_ESTIMATE;
use crate::interpreter::errors::Diagnostic;
use crate::selection::SelectionStack;

/// Mock terminal for capturing `print` output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockTerminal {
    pub chunks: Vec<OutputChunk>,
}

impl MockTerminal {
    pub fn new() -> Self {
        MockTerminal { chunks: Vec::new() }
    }

    /// Append text emitted during `step`
    pub fn print(&mut self, text: &str, step: u64) {
        if let Some(last) = self.chunks.last_mut() {
            if last.step == step {
                last.text.push_str(text);
                return;
            }
        }
        self.chunks.push(OutputChunk {
            text: text.to_string(),
            step,
        });
    }

    /// Everything printed so far, concatenated
    pub fn contents(&self) -> String {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }

    /// Get all output as lines; a trailing unterminated line is kept
    pub fn get_output(&self) -> Vec<String> {
        let contents = self.contents();
        let mut lines: Vec<String> = contents.split('\n').map(|s| s.to_string()).collect();
        // Remove trailing empty string if text ended with newline
        if lines.last().is_some_and(|s| s.is_empty()) {
            lines.pop();
        }
        lines
    }

    /// Total bytes captured
    pub fn byte_len(&self) -> usize {
        self.chunks.iter().map(|c| c.text.len()).sum()
    }
}

/// A run of output produced by a single step
#[derive(Debug, Clone, PartialEq)]
pub struct OutputChunk {
    pub text: String,
    pub step: u64,
}

/// Snapshot of execution state
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub grid: Grid,
    pub selections: SelectionStack,
    pub cursor: Vec2,
    pub run: Vec2,
    pub halted: bool,
    pub steps: u64,
    pub terminal: MockTerminal,
    pub diagnostics: Vec<Diagnostic>,
    pub last_op: Option<Operation>,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // This is a rough estimate
        let grid_size = self.grid.len() * std::mem::size_of::<Cell>();

        let selection_size = self.selections.depth() * SELECTION_SIZE_ESTIMATE;

        let terminal_size = self.terminal.byte_len() + self.terminal.chunks.len() * 16;

        // Diagnostics: assume 64 bytes each
        let diagnostic_size = self.diagnostics.len() * 64;

        grid_size + selection_size + terminal_size + diagnostic_size
    }
}

/// Manages execution history for reverse execution
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), String> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(format!(
                "Snapshot memory limit exceeded: {} + {} > {}",
                self.current_memory, snapshot_size, self.max_memory
            ));
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}
