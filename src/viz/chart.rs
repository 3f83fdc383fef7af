//! Line chart of one country's series with the trend projection overlaid.

use anyhow::{Result, anyhow};
use plotters::prelude::*;
use plotters::style::FontFamily;

use super::palette::{OBSERVED, PROJECTED};
use super::text::truncate_to_width;
use super::{no_data_svg, render_svg};
use crate::dashboard::{CHART_Y_LABEL, NO_CHART_DATA};
use crate::models::{IndicatorSeries, ProjectionPoint};

/// Render the series (and the projection, when non-empty) as an SVG line chart.
///
/// An empty series yields the placeholder with the chart's "no data" message,
/// whatever the projection holds.
pub fn render_line_chart(
    series: &IndicatorSeries,
    forecast: &[ProjectionPoint],
    title: &str,
    width: u32,
    height: u32,
) -> Result<String> {
    if series.is_empty() {
        return no_data_svg(width, height, title, NO_CHART_DATA);
    }

    let observed: Vec<(f64, f64)> = series
        .points()
        .iter()
        .map(|p| (p.year as f64, p.value))
        .collect();
    let projected: Vec<(f64, f64)> = forecast
        .iter()
        .map(|p| (p.year as f64, p.predicted_value))
        .collect();

    let (mut x_min, mut x_max) = bounds(observed.iter().chain(projected.iter()).map(|p| p.0));
    if (x_max - x_min).abs() < f64::EPSILON {
        x_min -= 1.0;
        x_max += 1.0;
    }
    let (mut y_min, mut y_max) = bounds(observed.iter().chain(projected.iter()).map(|p| p.1));
    if (y_max - y_min).abs() < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let pad = (y_max - y_min) * 0.05;
    let (y_min, y_max) = (y_min - pad, y_max + pad);

    let caption = truncate_to_width(title, 20, width.saturating_sub(40));
    let x_label_count = ((x_max - x_min) as usize + 1).min(12);

    render_svg(width, height, |root| {
        let mut chart = ChartBuilder::on(root)
            .margin(16)
            .caption(caption.as_str(), (FontFamily::SansSerif, 20))
            .set_label_area_size(LabelAreaPosition::Left, 64)
            .set_label_area_size(LabelAreaPosition::Bottom, 48)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| anyhow!("{:?}", e))?;

        let x_label_fmt = |x: &f64| (x.round() as i32).to_string();
        let y_label_fmt = |v: &f64| {
            if (y_max - y_min) < 10.0 {
                format!("{v:.1}")
            } else {
                format!("{v:.0}")
            }
        };
        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc(CHART_Y_LABEL)
            .x_labels(x_label_count)
            .y_labels(8)
            .x_label_formatter(&x_label_fmt)
            .y_label_formatter(&y_label_fmt)
            .label_style((FontFamily::SansSerif, 12))
            .axis_desc_style((FontFamily::SansSerif, 14))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;

        chart
            .draw_series(LineSeries::new(observed.clone(), OBSERVED.stroke_width(2)))
            .map_err(|e| anyhow!("{:?}", e))?
            .label("Observed")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], OBSERVED.stroke_width(2)));
        chart
            .draw_series(
                observed
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, OBSERVED.filled())),
            )
            .map_err(|e| anyhow!("{:?}", e))?;

        if !projected.is_empty() {
            chart
                .draw_series(LineSeries::new(projected.clone(), PROJECTED.stroke_width(2)))
                .map_err(|e| anyhow!("{:?}", e))?
                .label("Projection")
                .legend(|(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], PROJECTED.stroke_width(2))
                });
            chart
                .draw_series(
                    projected
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 3, PROJECTED.stroke_width(1))),
                )
                .map_err(|e| anyhow!("{:?}", e))?;
        }

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .label_font((FontFamily::SansSerif, 13))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
        Ok(())
    })
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
