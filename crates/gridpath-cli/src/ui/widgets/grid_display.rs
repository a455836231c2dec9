use gridpath_engine::{Cell, Position};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// Square grid of cells with optional tiles drawn on top.
///
/// Rows come from either a single agent grid or a combined cohort grid. Cells outside the
/// render area are clipped.
#[derive(Debug)]
pub struct GridDisplay<'a> {
    rows: Vec<&'a [Cell]>,
    overlays: Vec<(Position, CellDisplay)>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> GridDisplay<'a> {
    pub fn new<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a [Cell]>,
    {
        Self {
            rows: rows.into_iter().collect(),
            overlays: vec![],
            block: None,
        }
    }

    /// Draws `tile` over the cell at `position`. Later overlays win.
    pub fn overlay(mut self, position: Position, tile: CellDisplay) -> Self {
        self.overlays.push((position, tile));
        self
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn columns(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    pub fn width(&self) -> u16 {
        let columns = u16::try_from(self.columns()).unwrap_or(u16::MAX);
        columns.saturating_mul(CellDisplay::width())
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        let rows = u16::try_from(self.rows.len()).unwrap_or(u16::MAX);
        rows.saturating_mul(CellDisplay::height())
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn tile_area(area: Rect, x: usize, y: usize) -> Option<Rect> {
        let dx = u16::try_from(x).ok()?.checked_mul(CellDisplay::width())?;
        let dy = u16::try_from(y).ok()?.checked_mul(CellDisplay::height())?;
        let tile = Rect::new(
            area.x.checked_add(dx)?,
            area.y.checked_add(dy)?,
            CellDisplay::width(),
            CellDisplay::height(),
        );
        area.contains(tile.as_position())
            .then(|| tile.intersection(area))
    }
}

impl Widget for GridDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GridDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        for (y, row) in self.rows.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Some(tile) = GridDisplay::tile_area(area, x, y) {
                    CellDisplay::from_cell(*cell).render(tile, buf);
                }
            }
        }
        for (position, display) in &self.overlays {
            let (x, y) = (usize::from(position.x), usize::from(position.y));
            if let Some(tile) = GridDisplay::tile_area(area, x, y) {
                display.render(tile, buf);
            }
        }
    }
}
