use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct BoardAreas {
    pub header: Rect,
    pub list: Rect,
    pub status: Rect,
    pub footer: Rect,
}

impl BoardAreas {
    /// Lines available for job rows inside the bordered list.
    pub fn list_lines(&self) -> usize {
        self.list.height.saturating_sub(2) as usize
    }

    /// Columns available for job rows inside the bordered list.
    pub fn list_width(&self) -> usize {
        self.list.width.saturating_sub(2) as usize
    }
}

pub fn areas(size: Rect) -> BoardAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(size);

    BoardAreas {
        header: rows[0],
        list: rows[1],
        status: rows[2],
        footer: rows[3],
    }
}
