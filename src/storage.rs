use crate::dashboard::{DashboardView, Metrics};
use crate::models::{FleetSnapshot, IndicatorSeries, ProjectionPoint};
use crate::roster;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save the fleet snapshot as CSV, highest value first.
pub fn save_snapshot_csv<P: AsRef<Path>>(snapshot: &FleetSnapshot, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize(("iso3", "country", "value"))?;
    for (iso3, value) in snapshot.ranked() {
        let name = roster::by_iso3(iso3).map(|c| c.display_name).unwrap_or("");
        wtr.serialize((iso3, name, value))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save one series as `year,value` CSV.
pub fn save_series_csv<P: AsRef<Path>>(series: &IndicatorSeries, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize(("year", "value"))?;
    for p in series.points() {
        wtr.serialize((p.year, p.value))?;
    }
    wtr.flush()?;
    Ok(())
}

/// JSON document written by `save_dashboard_json`.
#[derive(Debug, Serialize)]
pub struct DashboardExport<'a> {
    pub generated_at: DateTime<Utc>,
    pub country: &'a str,
    pub iso3: &'a str,
    pub indicator: &'a str,
    pub metrics: Option<&'a Metrics>,
    pub forecast: &'a [ProjectionPoint],
    pub series: &'a IndicatorSeries,
    pub snapshot: &'a FleetSnapshot,
}

impl<'a> DashboardExport<'a> {
    pub fn new(view: &'a DashboardView) -> Self {
        Self {
            generated_at: Utc::now(),
            country: view.country.display_name,
            iso3: view.country.iso3,
            indicator: &view.indicator,
            metrics: view.metrics.as_ref(),
            forecast: &view.forecast,
            series: &view.series,
            snapshot: &view.snapshot,
        }
    }
}

/// Save the whole dashboard view as pretty JSON.
pub fn save_dashboard_json<P: AsRef<Path>>(view: &DashboardView, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(&DashboardExport::new(view))?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
