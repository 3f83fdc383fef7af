//! Visualization: render the choropleth map and the indicator line chart to **SVG**.
//!
//! - Tile-grid choropleth of the roster, Viridis-scaled, grey for countries without data
//! - Line chart of the observed series with the trend projection overlaid
//! - Both render to an in-memory `String`; `save_svg` writes it out
//! - Empty inputs render a placeholder carrying the "no data" message instead of failing

pub mod chart;
pub mod map;
pub mod palette;
pub mod text;

pub use chart::render_line_chart;
pub use map::{TileLayout, render_choropleth};

use anyhow::{Context, Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_svg::SVGBackend;
use std::fs;
use std::path::Path;

use text::truncate_to_width;

pub const DEFAULT_WIDTH: u32 = 900;
pub const DEFAULT_HEIGHT: u32 = 620;

/// Draw onto a fresh white SVG canvas and return the document.
pub(crate) fn render_svg<F>(width: u32, height: u32, draw: F) -> Result<String>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<()>,
{
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
        draw(&root)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(buf)
}

/// Centered text helper; `px` is the font size.
pub(crate) fn draw_centered<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    (x, y): (i32, i32),
    px: u32,
    color: &RGBColor,
) -> Result<()> {
    let style = TextStyle::from((FontFamily::SansSerif, px).into_font())
        .color(color)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw_text(text, &style, (x, y))
        .map_err(|e| anyhow!("{:?}", e))
}

/// Placeholder shown in place of a map or chart that has nothing to draw.
pub fn no_data_svg(width: u32, height: u32, title: &str, message: &str) -> Result<String> {
    render_svg(width, height, |root| {
        let w = width as i32;
        let title = truncate_to_width(title, 20, width.saturating_sub(32));
        draw_centered(root, &title, (w / 2, 28), 20, &BLACK)?;
        draw_centered(root, message, (w / 2, height as i32 / 2), 16, &RGBColor(150, 110, 0))
    })
}

/// Write an SVG document produced by this module.
pub fn save_svg<P: AsRef<Path>>(path: P, svg: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, svg).with_context(|| format!("write {}", path.display()))
}
