use std::sync::Arc;
use wbi_africa::dashboard::{
    self, DashboardView, Metrics, NO_CHART_DATA, NO_MAP_DATA, format_percent, forecast_lines,
};
use wbi_africa::models::{FleetSnapshot, IndicatorPoint, IndicatorSeries, ProjectionPoint};
use wbi_africa::roster;

fn view(series: IndicatorSeries, forecast: Vec<ProjectionPoint>, snapshot: FleetSnapshot) -> DashboardView {
    let kenya = roster::lookup("KEN").unwrap();
    DashboardView {
        country: *kenya,
        indicator: "IT.NET.USER.ZS".into(),
        metrics: Metrics::from_series(&series, kenya),
        forecast,
        snapshot: Arc::new(snapshot),
        series: Arc::new(series),
    }
}

#[test]
fn percent_has_two_decimals() {
    assert_eq!(format_percent(42.567), "42.57%");
    assert_eq!(format_percent(5.0), "5.00%");
    assert_eq!(format_percent(0.004), "0.00%");
}

#[test]
fn forecast_lines_format() {
    let lines = forecast_lines(&[
        ProjectionPoint { year: 2025, predicted_value: 110.0 },
        ProjectionPoint { year: 2026, predicted_value: 120.456 },
    ]);
    assert_eq!(lines, ["2025: 110.00%", "2026: 120.46%"]);
}

#[test]
fn metrics_come_from_latest_point() {
    let kenya = roster::lookup("KEN").unwrap();
    let s = IndicatorSeries::from_points([
        IndicatorPoint { year: 2022, value: 42.567 },
        IndicatorPoint { year: 2019, value: 30.0 },
    ]);
    let m = Metrics::from_series(&s, kenya).unwrap();
    assert_eq!(m.value_label(), "42.57%");
    assert_eq!(m.year_label(), "2022");
    assert_eq!(m.country_name, "Kenya");
    assert!(Metrics::from_series(&IndicatorSeries::empty(), kenya).is_none());
}

#[test]
fn empty_view_shows_every_no_data_message() {
    let v = view(IndicatorSeries::empty(), Vec::new(), FleetSnapshot::default());
    assert!(v.forecast_block().is_none());
    let txt = dashboard::render_text(&v, 10);
    assert!(txt.contains("No data available for Kenya."));
    assert!(txt.contains(NO_MAP_DATA));
    assert!(txt.contains(NO_CHART_DATA));
    assert!(!txt.contains(dashboard::FORECAST_HEADING));
}

#[test]
fn empty_snapshot_only_blanks_the_map() {
    let s = IndicatorSeries::from_points([
        IndicatorPoint { year: 2020, value: 20.0 },
        IndicatorPoint { year: 2021, value: 25.0 },
    ]);
    let forecast = wbi_africa::trend::project(&s, 2, 2024);
    let v = view(s, forecast, FleetSnapshot::default());
    let txt = dashboard::render_text(&v, 10);

    assert!(txt.contains("25.00%"));
    assert!(txt.contains(dashboard::FORECAST_HEADING));
    assert!(txt.contains("2025: 45.00%"));
    assert!(txt.contains(NO_MAP_DATA));
    assert!(!txt.contains(NO_CHART_DATA));
}

#[test]
fn snapshot_table_marks_selected_country() {
    let snap: FleetSnapshot = [
        ("KEN".to_string(), 40.0),
        ("NGA".to_string(), 55.5),
        ("GHA".to_string(), 68.0),
    ]
    .into_iter()
    .collect();
    let v = view(IndicatorSeries::empty(), Vec::new(), snap);
    let short = dashboard::render_text(&v, 2);
    assert!(short.contains("GHA  Ghana"));
    assert!(short.contains("... 1 more"));
    assert!(!short.contains("KEN  Kenya"));

    let full = dashboard::render_text(&v, 3);
    assert!(full.contains("*  3. KEN  Kenya"));
    assert!(full.contains("   1. GHA  Ghana"));
    assert!(!full.contains("more"));
    assert!(full.contains("3 of 54 countries reporting"));
}

#[test]
fn headings_name_the_country() {
    let ghana = roster::lookup("Ghana").unwrap();
    assert_eq!(dashboard::chart_heading(ghana), "Digital Payments Growth in Ghana");
    assert_eq!(dashboard::no_metrics_message(ghana), "No data available for Ghana.");
}
