use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{cell_display::*, grid_display::*, status_display::*};

mod cell_display;
mod grid_display;
mod status_display;

mod color {
    use ratatui::style::Color;

    pub const GREEN: Color = Color::Rgb(0, 200, 0);
    pub const RED: Color = Color::Rgb(220, 40, 40);
    pub const BLUE: Color = Color::Rgb(60, 110, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Modifier, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = fg_bg(color::GRAY, color::BLACK);
    pub const START: Style = fg_bg(color::BLACK, color::GREEN);
    pub const GOAL: Style = fg_bg(color::BLACK, color::RED);
    pub const PATH: Style = bg_only(color::BLUE);
    pub const AGENT: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const CURSOR: Style = fg_bg(color::WHITE, color::GRAY).add_modifier(Modifier::BOLD);
    pub const SUCCESS: Style = Style::new().fg(color::GREEN);
    pub const FAILURE: Style = Style::new().fg(color::RED);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
