//! Colors: the Viridis scale for the choropleth plus the two series colors of
//! the line chart.

use plotters::style::RGBColor;

/// Viridis sampled at nine evenly spaced stops (dark purple -> yellow).
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

/// Observed series (Office blue, #4472C4).
pub const OBSERVED: RGBColor = RGBColor(68, 114, 196);
/// Projection series (Office orange, #ED7D31).
pub const PROJECTED: RGBColor = RGBColor(237, 125, 49);
/// Tiles for countries absent from the snapshot.
pub const NO_DATA: RGBColor = RGBColor(190, 190, 190);

/// Linear interpolation along Viridis for `t` in [0, 1] (clamped).
pub fn viridis_rgb(t: f64) -> (u8, u8, u8) {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let pos = t * (VIRIDIS.len() - 1) as f64;
    let i = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = pos - i as f64;
    let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
    (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

pub fn viridis(t: f64) -> RGBColor {
    let (r, g, b) = viridis_rgb(t);
    RGBColor(r, g, b)
}

/// Position of `value` within `[min, max]`; a degenerate range maps to the middle.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span.abs() < f64::EPSILON {
        0.5
    } else {
        ((value - min) / span).clamp(0.0, 1.0)
    }
}

/// Black or white, whichever reads better on `(r, g, b)`.
pub fn label_rgb(bg: (u8, u8, u8)) -> (u8, u8, u8) {
    let luma = 0.299 * bg.0 as f64 + 0.587 * bg.1 as f64 + 0.114 * bg.2 as f64;
    if luma > 150.0 { (0, 0, 0) } else { (255, 255, 255) }
}
