//! Dashboard view model: binds one selected country to the fetch, fleet and
//! trend components and formats the result.
//!
//! The three display regions (metrics, map, chart/forecast) degrade
//! independently: an empty series hides the metrics and forecast, an empty
//! snapshot only blanks the map.

use crate::api::Client;
use crate::config::Config;
use crate::fetch::{IndicatorFetcher, IndicatorSource};
use crate::fleet::FleetAggregator;
use crate::models::{FleetSnapshot, IndicatorSeries, ProjectionPoint};
use crate::roster::{self, CountryRef};
use crate::trend;
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;

pub const TITLE: &str = "Africa Digital Payments Dashboard";
pub const SUBTITLE: &str = "Tracking digital payments, fintech growth, and crypto adoption.";
pub const USAGE_LABEL: &str = "Digital Payments Usage";
pub const YEAR_LABEL: &str = "Latest Data Year";
pub const COUNTRY_LABEL: &str = "Country";
pub const FORECAST_HEADING: &str = "Projection for Digital Payment Growth";
pub const MAP_HEADING: &str = "Digital Payments Adoption in Africa";
pub const MAP_TITLE: &str = "Fintech Adoption Rate in Africa";
pub const MAP_LEGEND: &str = "Fintech Adoption (%)";
pub const CHART_Y_LABEL: &str = "Internet Users (% of Population)";
pub const NO_MAP_DATA: &str = "No data available for the digital payments adoption map.";
pub const NO_CHART_DATA: &str = "No digital payments data available.";
pub const FOOTER: &str = "Data Source: World Bank API";

/// Percentage with two decimals: `42.567` -> `"42.57%"`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// One `"<year>: <value>%"` line per projected point.
pub fn forecast_lines(forecast: &[ProjectionPoint]) -> Vec<String> {
    forecast
        .iter()
        .map(|p| format!("{}: {}", p.year, format_percent(p.predicted_value)))
        .collect()
}

pub fn chart_heading(country: &CountryRef) -> String {
    format!("Digital Payments Growth in {}", country.display_name)
}

pub fn chart_title(country: &CountryRef) -> String {
    format!("Internet & Digital Payments Growth in {}", country.display_name)
}

pub fn no_metrics_message(country: &CountryRef) -> String {
    format!("No data available for {}.", country.display_name)
}

/// The three summary cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub latest_value: f64,
    pub latest_year: i32,
    pub country_name: &'static str,
}

impl Metrics {
    /// `None` for an empty series.
    pub fn from_series(series: &IndicatorSeries, country: &CountryRef) -> Option<Self> {
        let latest = series.latest()?;
        Some(Self {
            latest_value: latest.value,
            latest_year: latest.year,
            country_name: country.display_name,
        })
    }

    pub fn value_label(&self) -> String {
        format_percent(self.latest_value)
    }

    pub fn year_label(&self) -> String {
        self.latest_year.to_string()
    }
}

/// Everything one dashboard render needs.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub country: CountryRef,
    pub indicator: String,
    pub metrics: Option<Metrics>,
    pub forecast: Vec<ProjectionPoint>,
    pub snapshot: Arc<FleetSnapshot>,
    pub series: Arc<IndicatorSeries>,
}

impl DashboardView {
    pub fn build<S: IndicatorSource>(
        fetcher: &IndicatorFetcher<S>,
        fleet: &FleetAggregator<S>,
        country: &CountryRef,
        indicator: &str,
        horizon_years: u32,
        current_year: i32,
    ) -> Self {
        let series = fetcher.fetch(country.iso3, indicator);
        let snapshot = fleet.aggregate(indicator);
        let forecast = trend::project(&series, horizon_years, current_year);
        Self {
            country: *country,
            indicator: indicator.to_string(),
            metrics: Metrics::from_series(&series, country),
            forecast,
            snapshot,
            series,
        }
    }

    /// Forecast text, or `None` when there is nothing to show.
    pub fn forecast_block(&self) -> Option<String> {
        if self.forecast.is_empty() {
            return None;
        }
        Some(forecast_lines(&self.forecast).join("\n"))
    }
}

/// Long-lived owner of the fetcher, aggregator and their caches.
pub struct DashboardService<S> {
    config: Config,
    fetcher: Arc<IndicatorFetcher<S>>,
    fleet: FleetAggregator<S>,
}

impl DashboardService<Client> {
    /// Service backed by the live World Bank API.
    pub fn from_config(config: Config) -> Result<Self> {
        let client = Client::from_config(&config)?;
        Ok(Self::new(client, config))
    }
}

impl<S: IndicatorSource> DashboardService<S> {
    pub fn new(source: S, config: Config) -> Self {
        let fetcher = Arc::new(IndicatorFetcher::new(source));
        let fleet = FleetAggregator::new(Arc::clone(&fetcher)).with_workers(config.workers);
        Self {
            config,
            fetcher,
            fleet,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &IndicatorFetcher<S> {
        &self.fetcher
    }

    pub fn fleet(&self) -> &FleetAggregator<S> {
        &self.fleet
    }

    /// Build the view for `country` with the configured indicator and horizon.
    pub fn view(&self, country: &CountryRef, current_year: i32) -> DashboardView {
        DashboardView::build(
            &self.fetcher,
            &self.fleet,
            country,
            &self.config.indicator,
            self.config.horizon_years,
            current_year,
        )
    }

    /// Drop every cached series and snapshot.
    pub fn refresh(&self) {
        self.fetcher.clear();
        self.fleet.clear();
    }
}

/// Plain-text rendering of the dashboard for terminals.
///
/// `top` caps the number of snapshot rows listed under the map heading.
pub fn render_text(view: &DashboardView, top: usize) -> String {
    let mut out = String::new();
    let rule = "=".repeat(64);
    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out, "{SUBTITLE}");
    let _ = writeln!(out, "{rule}");

    match &view.metrics {
        Some(m) => {
            let _ = writeln!(out, "{USAGE_LABEL:<26}{YEAR_LABEL:<20}{COUNTRY_LABEL}");
            let _ = writeln!(
                out,
                "{:<26}{:<20}{}",
                m.value_label(),
                m.year_label(),
                m.country_name
            );
        }
        None => {
            let _ = writeln!(out, "{}", no_metrics_message(&view.country));
        }
    }

    if let Some(block) = view.forecast_block() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{FORECAST_HEADING}");
        for line in block.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{MAP_HEADING}");
    if view.snapshot.is_empty() {
        let _ = writeln!(out, "  {NO_MAP_DATA}");
    } else {
        let ranked = view.snapshot.ranked();
        for (rank, (iso3, value)) in ranked.iter().take(top).enumerate() {
            let name = roster::by_iso3(iso3).map(|c| c.display_name).unwrap_or(iso3);
            let marker = if *iso3 == view.country.iso3 { "*" } else { " " };
            let _ = writeln!(
                out,
                "{marker}{:>3}. {iso3}  {name:<34}{:>8}",
                rank + 1,
                format_percent(*value)
            );
        }
        if ranked.len() > top {
            let _ = writeln!(out, "  ... {} more", ranked.len() - top);
        }
        let _ = writeln!(
            out,
            "  {} of {} countries reporting",
            view.snapshot.len(),
            roster::all().len()
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", chart_heading(&view.country));
    if view.series.is_empty() {
        let _ = writeln!(out, "  {NO_CHART_DATA}");
    } else {
        for p in view.series.points() {
            let _ = writeln!(out, "  {}  {:>8}", p.year, format_percent(p.value));
        }
    }

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{FOOTER}");
    out
}
