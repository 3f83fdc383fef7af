//! Tile-grid choropleth of the roster.

use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::palette::{self, NO_DATA};
use super::{draw_centered, no_data_svg, render_svg};
use crate::dashboard::{MAP_LEGEND, NO_MAP_DATA, format_percent};
use crate::models::FleetSnapshot;
use crate::roster::{self, CountryRef, GRID_COLS, GRID_ROWS};

const TITLE_BAND: f64 = 52.0;
const LEGEND_BAND: f64 = 70.0;
const PAD: f64 = 16.0;

/// Square tiles laid out on the roster grid inside a bounding box.
///
/// Shared by the SVG renderer and the GUI painter so both draw the same map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileLayout {
    pub left: f64,
    pub top: f64,
    pub tile: f64,
    pub gap: f64,
}

impl TileLayout {
    /// Largest square tiles that fit `width x height`, centered horizontally.
    pub fn fit(x: f64, y: f64, width: f64, height: f64) -> Self {
        let tile = (width / GRID_COLS as f64)
            .min(height / GRID_ROWS as f64)
            .max(1.0);
        let used_w = tile * GRID_COLS as f64;
        Self {
            left: x + (width - used_w).max(0.0) / 2.0,
            top: y,
            tile,
            gap: (tile * 0.08).max(1.0),
        }
    }

    /// `(x0, y0, x1, y1)` of a country's tile.
    pub fn cell(&self, country: &CountryRef) -> (f64, f64, f64, f64) {
        let x0 = self.left + country.col as f64 * self.tile + self.gap / 2.0;
        let y0 = self.top + country.row as f64 * self.tile + self.gap / 2.0;
        let side = self.tile - self.gap;
        (x0, y0, x0 + side, y0 + side)
    }

    /// Font size for tile labels.
    pub fn label_px(&self) -> u32 {
        (self.tile * 0.28).clamp(7.0, 14.0) as u32
    }
}

/// Fill color of one tile: Viridis over the snapshot range, grey without data.
pub fn tile_rgb(snapshot: &FleetSnapshot, iso3: &str, range: (f64, f64)) -> (u8, u8, u8) {
    match snapshot.get(iso3) {
        Some(v) => palette::viridis_rgb(palette::normalize(v, range.0, range.1)),
        None => (NO_DATA.0, NO_DATA.1, NO_DATA.2),
    }
}

/// Render the snapshot as an SVG tile-grid map.
///
/// An empty snapshot yields the placeholder with the map's "no data" message.
pub fn render_choropleth(
    snapshot: &FleetSnapshot,
    title: &str,
    width: u32,
    height: u32,
) -> Result<String> {
    let Some(range) = snapshot.value_range() else {
        return no_data_svg(width, height, title, NO_MAP_DATA);
    };

    render_svg(width, height, |root| {
        let (w, h) = (width as f64, height as f64);
        draw_centered(root, title, ((w / 2.0) as i32, 26), 20, &BLACK)?;

        let layout = TileLayout::fit(
            PAD,
            TITLE_BAND,
            w - 2.0 * PAD,
            (h - TITLE_BAND - LEGEND_BAND).max(GRID_ROWS as f64),
        );
        for country in roster::all() {
            draw_tile(root, &layout, snapshot, country, range)?;
        }
        draw_color_bar(root, range, w, h)
    })
}

fn draw_tile<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &TileLayout,
    snapshot: &FleetSnapshot,
    country: &CountryRef,
    range: (f64, f64),
) -> Result<()> {
    let (x0, y0, x1, y1) = layout.cell(country);
    let rgb = tile_rgb(snapshot, country.iso3, range);
    let fill = RGBColor(rgb.0, rgb.1, rgb.2);
    let corners = [(x0 as i32, y0 as i32), (x1 as i32, y1 as i32)];
    root.draw(&Rectangle::new(corners, fill.filled()))
        .map_err(|e| anyhow!("{:?}", e))?;
    root.draw(&Rectangle::new(corners, WHITE.stroke_width(1)))
        .map_err(|e| anyhow!("{:?}", e))?;

    let (lr, lg, lb) = palette::label_rgb(rgb);
    let center = (((x0 + x1) / 2.0) as i32, ((y0 + y1) / 2.0) as i32);
    draw_centered(
        root,
        country.iso3,
        center,
        layout.label_px(),
        &RGBColor(lr, lg, lb),
    )
}

fn draw_color_bar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    (lo, hi): (f64, f64),
    w: f64,
    h: f64,
) -> Result<()> {
    const STEPS: usize = 48;
    let bar_w = (w * 0.5).max(120.0);
    let left = (w - bar_w) / 2.0;
    let top = h - LEGEND_BAND + 26.0;
    let bar_h = 14.0;
    let step_w = bar_w / STEPS as f64;

    draw_centered(root, MAP_LEGEND, ((w / 2.0) as i32, (top - 12.0) as i32), 13, &BLACK)?;
    for i in 0..STEPS {
        let color = palette::viridis((i as f64 + 0.5) / STEPS as f64);
        let x0 = left + i as f64 * step_w;
        root.draw(&Rectangle::new(
            [
                (x0 as i32, top as i32),
                ((x0 + step_w).ceil() as i32, (top + bar_h) as i32),
            ],
            color.filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    let label_y = (top + bar_h + 12.0) as i32;
    draw_centered(root, &format_percent(lo), (left as i32, label_y), 12, &BLACK)?;
    draw_centered(root, &format_percent(hi), ((left + bar_w) as i32, label_y), 12, &BLACK)?;

    // grey swatch for countries without data
    let sx = (left + bar_w + 40.0) as i32;
    root.draw(&Rectangle::new(
        [(sx, top as i32), (sx + 14, (top + bar_h) as i32)],
        NO_DATA.filled(),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    draw_centered(root, "No data", (sx + 7, label_y), 12, &BLACK)
}
