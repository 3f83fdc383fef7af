use wbi_africa::models::{IndicatorPoint, IndicatorSeries};
use wbi_africa::trend::{self, fit, project};

fn series(pts: &[(i32, f64)]) -> IndicatorSeries {
    IndicatorSeries::from_points(pts.iter().map(|&(year, value)| IndicatorPoint { year, value }))
}

#[test]
fn three_point_line_projects_forward() {
    let s = series(&[(2015, 10.0), (2016, 20.0), (2017, 30.0)]);
    let out = project(&s, 10, 2024);

    assert_eq!(out.len(), 10);
    assert_eq!(out[0].year, 2025);
    assert!((out[0].predicted_value - 110.0).abs() < 1e-6);
    assert_eq!(out[9].year, 2034);
    assert!((out[9].predicted_value - 200.0).abs() < 1e-6);
    assert!(out.windows(2).all(|w| w[1].year == w[0].year + 1));
}

#[test]
fn window_starts_after_current_year_not_last_observation() {
    let s = series(&[(2000, 1.0), (2001, 2.0)]);
    let out = project(&s, 3, 2030);
    let years: Vec<i32> = out.iter().map(|p| p.year).collect();
    assert_eq!(years, [2031, 2032, 2033]);
}

#[test]
fn unsorted_gappy_input_is_fine() {
    let s = series(&[(2020, 40.0), (2010, 20.0), (2015, 30.0)]);
    let f = fit(&s).unwrap();
    assert!((f.slope - 2.0).abs() < 1e-9);
}

#[test]
fn empty_series_gives_empty_projection_every_time() {
    let s = IndicatorSeries::empty();
    assert!(project(&s, 10, 2024).is_empty());
    assert!(project(&s, 10, 2024).is_empty());
    assert!(fit(&s).is_none());
}

#[test]
fn projection_is_deterministic() {
    let s = series(&[(2011, 3.5), (2013, 4.0), (2019, 9.25)]);
    assert_eq!(project(&s, 10, 2024), project(&s, 10, 2024));
}

#[test]
fn current_year_is_plausible() {
    assert!(trend::current_year() >= 2024);
}
