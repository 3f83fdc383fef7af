//! Linear trend fit and extrapolation.

use crate::models::{IndicatorSeries, ProjectionPoint};
use chrono::Datelike;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Ordinary least-squares line `value = intercept + slope * year`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub observations: usize,
}

impl LinearFit {
    pub fn predict(&self, year: i32) -> f64 {
        self.intercept + self.slope * year as f64
    }
}

/// Fit OLS of value against year.
///
/// The year column is centred on its mean before solving, which keeps the
/// design matrix well conditioned for calendar-year inputs. Returns `None`
/// with fewer than two distinct years or when the solve fails.
pub fn fit(series: &IndicatorSeries) -> Option<LinearFit> {
    let pts = series.points();
    let first = pts.first()?.year;
    if pts.iter().all(|p| p.year == first) {
        return None;
    }
    let n = pts.len();
    let mean_x = pts.iter().map(|p| p.year as f64).sum::<f64>() / n as f64;

    // columns: [1, year - mean]
    let x = DMatrix::from_fn(n, 2, |r, c| {
        if c == 0 {
            1.0
        } else {
            pts[r].year as f64 - mean_x
        }
    });
    let y = DVector::from_iterator(n, pts.iter().map(|p| p.value));
    let beta = solve_least_squares(&x, &y)?;

    let slope = beta[1];
    let intercept = beta[0] - slope * mean_x;
    if !(slope.is_finite() && intercept.is_finite()) {
        return None;
    }
    Some(LinearFit {
        slope,
        intercept,
        observations: n,
    })
}

/// SVD least squares, `None` if no tolerance yields a finite solution.
fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);
    for &tol in &[1e-12, 1e-9] {
        if let Ok(beta) = svd.solve(y, tol)
            && beta.iter().all(|v| v.is_finite())
        {
            return Some(beta);
        }
    }
    None
}

/// Extrapolate the fitted line over `current_year+1 ..= current_year+horizon_years`.
///
/// The window starts after `current_year` whatever the last observed year is,
/// and stops early rather than overflow the year. Empty when no fit is
/// available or `horizon_years` is zero.
pub fn project(
    series: &IndicatorSeries,
    horizon_years: u32,
    current_year: i32,
) -> Vec<ProjectionPoint> {
    let Some(line) = fit(series) else {
        return Vec::new();
    };
    let horizon = i32::try_from(horizon_years).unwrap_or(i32::MAX);
    (1..=horizon)
        .map_while(|i| current_year.checked_add(i))
        .map(|year| ProjectionPoint {
            year,
            predicted_value: line.predict(year),
        })
        .collect()
}

/// Calendar year from the local clock.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
