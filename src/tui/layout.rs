use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows the input box may grow to (text lines, borders excluded)
pub const MAX_INPUT_LINES: u16 = 4;

/// Chat window layout
pub struct AppLayout {
    /// `None` while the sidebar is collapsed
    pub sidebar_area: Option<Rect>,
    pub header_area: Rect,
    pub chat_area: Rect,
    pub input_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Create the layout:
    /// - Sidebar: 30% width (left), when open
    /// - Main column: header row, chat history, input box sized to its text
    /// - Status bar: bottom row across the full width
    pub fn new(area: Rect, sidebar_open: bool, input_lines: u16) -> Self {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Main area
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let (sidebar_area, main_area) = if sidebar_open {
            let horizontal_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
                .split(vertical_chunks[0]);
            (Some(horizontal_chunks[0]), horizontal_chunks[1])
        } else {
            (None, vertical_chunks[0])
        };

        let input_height = input_lines.clamp(1, MAX_INPUT_LINES) + 2;
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),            // Header
                Constraint::Min(1),               // Chat history
                Constraint::Length(input_height), // Input box
            ])
            .split(main_area);

        Self {
            sidebar_area,
            header_area: main_chunks[0],
            chat_area: main_chunks[1],
            input_area: main_chunks[2],
            status_area: vertical_chunks[1],
        }
    }
}

/// Centered rectangle for modal dialogs, clamped to `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
