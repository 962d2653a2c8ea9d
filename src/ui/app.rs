//! Main TUI application state and logic

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::ui::panes::{self, GridView};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Grid,
    Selections,
    Machine,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: grid -> output -> selections -> machine)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Grid => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Selections,
            FocusedPane::Selections => FocusedPane::Machine,
            FocusedPane::Machine => FocusedPane::Grid,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Grid => FocusedPane::Machine,
            FocusedPane::Output => FocusedPane::Grid,
            FocusedPane::Selections => FocusedPane::Output,
            FocusedPane::Machine => FocusedPane::Selections,
        }
    }
}

/// The main application state
pub struct App {
    /// Interpreter with its recorded history
    pub interpreter: Interpreter,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    pub grid_view: GridView,
    pub selections_scroll: usize,
    pub machine_scroll: usize,
    pub output_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app around an interpreter whose history is recorded
    pub fn new(interpreter: Interpreter) -> Self {
        let status_message = match interpreter.fault() {
            Some(err) => format!("Execution stopped: {}", err),
            None => String::from("Ready!"),
        };
        App {
            interpreter,
            focused_pane: FocusedPane::Grid,
            grid_view: GridView::default(),
            selections_scroll: 0,
            machine_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(250) {
                if self.interpreter.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                    self.after_step();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Whether the displayed state is the last one recorded
    fn at_end(&self) -> bool {
        self.interpreter.history_position() + 1 >= self.interpreter.total_snapshots()
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Grid (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Selections (top) | Machine (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(columns[1]);

        let fault = if self.at_end() {
            self.interpreter.fault()
        } else {
            None
        };

        panes::render_grid_pane(
            frame,
            left_rows[0],
            self.interpreter.grid(),
            self.interpreter.cursor(),
            self.interpreter.selections(),
            self.focused_pane == FocusedPane::Grid,
            &mut self.grid_view,
        );

        panes::render_terminal_pane(
            frame,
            left_rows[1],
            self.interpreter.terminal(),
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        panes::render_selections_pane(
            frame,
            right_rows[0],
            self.interpreter.selections(),
            self.focused_pane == FocusedPane::Selections,
            &mut self.selections_scroll,
        );

        panes::render_machine_pane(
            frame,
            right_rows[1],
            &self.interpreter,
            fault,
            self.focused_pane == FocusedPane::Machine,
            &mut self.machine_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.interpreter.history_position(),
            self.interpreter.total_snapshots(),
            self.interpreter.fault().is_some(),
            self.is_playing,
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let mut stepped = 0;
                for _ in 0..n {
                    if self.interpreter.step_forward().is_err() {
                        break;
                    }
                    stepped += 1;
                }
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.after_step();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Grid => {
                    self.grid_view.follow_cursor = false;
                    self.grid_view.row = self.grid_view.row.saturating_sub(1);
                }
                FocusedPane::Selections => {
                    self.selections_scroll = self.selections_scroll.saturating_sub(1);
                }
                FocusedPane::Machine => {
                    self.machine_scroll = self.machine_scroll.saturating_sub(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Grid => {
                    self.grid_view.follow_cursor = false;
                    self.grid_view.row = self.grid_view.row.saturating_add(1);
                }
                FocusedPane::Selections => {
                    self.selections_scroll = self.selections_scroll.saturating_add(1);
                }
                FocusedPane::Machine => {
                    self.machine_scroll = self.machine_scroll.saturating_add(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                match self.interpreter.jump_to_end() {
                    Ok(()) => {
                        self.status_message = match self.interpreter.fault() {
                            Some(err) => format!("Jumped to end: {}", err),
                            None => "Jumped to end".to_string(),
                        };
                        self.after_step();
                    }
                    Err(e) => self.status_message = format!("Error: {}", e),
                }
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                match self.interpreter.rewind_to_start() {
                    Ok(()) => {
                        self.status_message = "Jumped to start".to_string();
                        self.after_step();
                    }
                    Err(e) => self.status_message = format!("Error: {}", e),
                }
            }
            _ => {}
        }
    }

    /// Re-attach the grid to the cursor and scroll output to the bottom
    fn after_step(&mut self) {
        self.grid_view.follow_cursor = true;
        self.output_scroll = usize::MAX;
        self.machine_scroll = usize::MAX;
    }

    /// Step forward in execution
    fn step_forward(&mut self) {
        match self.interpreter.step_forward() {
            Ok(()) => {
                self.status_message = "Stepped forward".to_string();
                self.after_step();
            }
            Err(RuntimeError::HistoryOperationFailed { message }) => {
                self.status_message = format!("Cannot step forward: {}", message);
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        match self.interpreter.step_backward() {
            Ok(()) => {
                self.status_message = "Stepped backward".to_string();
                self.after_step();
            }
            Err(RuntimeError::HistoryOperationFailed { message }) => {
                self.status_message = format!("Cannot step backward: {}", message);
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }
}
