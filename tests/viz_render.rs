use std::fs;
use wbi_africa::dashboard::{MAP_TITLE, NO_CHART_DATA, NO_MAP_DATA};
use wbi_africa::models::{FleetSnapshot, IndicatorPoint, IndicatorSeries};
use wbi_africa::roster;
use wbi_africa::viz::{self, TileLayout, map::tile_rgb, palette};

fn snapshot() -> FleetSnapshot {
    [
        ("KEN".to_string(), 40.0),
        ("NGA".to_string(), 55.5),
        ("ZAF".to_string(), 72.3),
    ]
    .into_iter()
    .collect()
}

#[test]
fn choropleth_labels_every_roster_tile() {
    let svg = viz::render_choropleth(&snapshot(), MAP_TITLE, 900, 620).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains(MAP_TITLE));
    for c in roster::all() {
        assert!(svg.contains(c.iso3), "missing tile label {}", c.iso3);
    }
    assert!(svg.contains("40.00%"));
    assert!(svg.contains("72.30%"));
}

#[test]
fn empty_snapshot_renders_placeholder() {
    let svg = viz::render_choropleth(&FleetSnapshot::default(), MAP_TITLE, 600, 400).unwrap();
    assert!(svg.contains(NO_MAP_DATA));
    assert!(!svg.contains("KEN"));
}

#[test]
fn tiles_use_scale_ends_and_grey_for_missing() {
    let snap = snapshot();
    let range = snap.value_range().unwrap();
    assert_eq!(tile_rgb(&snap, "KEN", range), palette::viridis_rgb(0.0));
    assert_eq!(tile_rgb(&snap, "ZAF", range), palette::viridis_rgb(1.0));
    let grey = palette::NO_DATA;
    assert_eq!(tile_rgb(&snap, "TCD", range), (grey.0, grey.1, grey.2));
}

#[test]
fn tile_layout_stays_inside_box() {
    let layout = TileLayout::fit(10.0, 20.0, 500.0, 300.0);
    for c in roster::all() {
        let (x0, y0, x1, y1) = layout.cell(c);
        assert!(x0 >= 10.0 && x1 <= 510.0);
        assert!(y0 >= 20.0 && y1 <= 320.0);
        assert!(x1 > x0 && y1 > y0);
    }
}

#[test]
fn line_chart_with_projection() {
    let series = IndicatorSeries::from_points([
        IndicatorPoint { year: 2015, value: 10.0 },
        IndicatorPoint { year: 2016, value: 20.0 },
        IndicatorPoint { year: 2017, value: 30.0 },
    ]);
    let forecast = wbi_africa::trend::project(&series, 10, 2024);
    let svg = viz::render_line_chart(&series, &forecast, "Growth in Kenya", 900, 620).unwrap();
    assert!(svg.contains("Growth in Kenya"));
    assert!(svg.contains("Observed"));
    assert!(svg.contains("Projection"));
    assert!(svg.contains("<circle") || svg.contains("<polyline"));
}

#[test]
fn line_chart_single_point_still_renders() {
    let series = IndicatorSeries::from_points([IndicatorPoint { year: 2020, value: 5.0 }]);
    let svg = viz::render_line_chart(&series, &[], "One point", 640, 400).unwrap();
    assert!(svg.contains("Observed"));
    assert!(!svg.contains("Projection"));
}

#[test]
fn empty_series_renders_placeholder_and_saves() {
    let svg = viz::render_line_chart(&IndicatorSeries::empty(), &[], "Nothing", 640, 400).unwrap();
    assert!(svg.contains(NO_CHART_DATA));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chart.svg");
    viz::save_svg(&path, &svg).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), svg);
}
