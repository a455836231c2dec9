use gridpath_engine::Cell;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::ui::widgets::style;

/// One grid cell drawn as a two-column tile.
#[derive(Debug, Clone, Copy)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const AGENT: Self = Self::new(style::AGENT, "@");
    pub const CURSOR: Self = Self::new(style::CURSOR, "[]");

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub const fn width() -> u16 {
        2
    }

    pub const fn height() -> u16 {
        1
    }

    pub const fn from_cell(cell: Cell) -> Self {
        match cell {
            Cell::Empty => Self::new(style::EMPTY, "."),
            Cell::Start => Self::new(style::START, "S"),
            Cell::Goal => Self::new(style::GOAL, "G"),
            Cell::Path => Self::new(style::PATH, ""),
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Paragraph fills the whole tile, not only the symbol columns
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
