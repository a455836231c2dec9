use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

/// Label/value rows, labels left-aligned and values right-aligned.
#[derive(Debug, Default)]
pub struct StatusDisplay<'a> {
    rows: Vec<(&'a str, String)>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatusDisplay<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, label: &'a str, value: impl ToString) -> Self {
        self.rows.push((label, value.to_string()));
        self
    }

    /// Adds a row with an empty label and value.
    pub fn gap(self) -> Self {
        self.row("", "")
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        28 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        let rows = u16::try_from(self.rows.len()).unwrap_or(u16::MAX);
        rows.saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }
}

impl Widget for StatusDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let row_areas =
            Layout::vertical(self.rows.iter().map(|_| Constraint::Length(1))).split(area);
        for ((label, value), area) in iter::zip(&self.rows, row_areas.iter().copied()) {
            let [label_area, value_area] = area.layout(&Layout::horizontal([
                Constraint::Fill(1),
                Constraint::Fill(1),
            ]));
            Line::styled(*label, style::DEFAULT)
                .left_aligned()
                .render(label_area, buf);
            Line::styled(value.as_str(), style::DEFAULT)
                .right_aligned()
                .render(value_area, buf);
        }
    }
}
