use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub operation: Color,
    pub character: Color,
    pub number: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub cursor_bg: Color,
    pub selection_bg: Color,       // Top of the selection stack
    pub stacked_selection_bg: Color, // Deeper selections
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    operation: Color::Rgb(137, 180, 250),      // Blue for operations
    character: Color::Rgb(166, 227, 161),      // Green for characters
    number: Color::Rgb(250, 179, 135),         // Orange for numbers
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for status bar
    cursor_bg: Color::Rgb(249, 226, 175),      // Yellow block under the cursor
    selection_bg: Color::Rgb(88, 91, 112),
    stacked_selection_bg: Color::Rgb(62, 64, 84),
};
