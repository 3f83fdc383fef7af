//! wbi_africa
//!
//! Digital-payment readiness across Africa from World Bank indicator data.
//! Pairs with the `wbi-africa` CLI and the `wbi-africa-gui` desktop dashboard.
//!
//! ### Pipeline
//! - Fetch one indicator series per country, cleaned and sorted, memoized per session
//! - Aggregate the latest value of every roster country into a snapshot
//! - Fit a least-squares trend and project it over the next years
//! - Present metrics, forecast text, a choropleth map and a line chart
//!
//! ### Example
//! ```no_run
//! use wbi_africa::{Config, DashboardService, roster, trend};
//!
//! let service = DashboardService::from_config(Config::default())?;
//! let kenya = roster::lookup("KEN").expect("roster entry");
//! let view = service.view(kenya, trend::current_year());
//! println!("{}", wbi_africa::dashboard::render_text(&view, 10));
//! let svg = wbi_africa::viz::render_choropleth(&view.snapshot, "Adoption", 900, 620)?;
//! wbi_africa::viz::save_svg("map.svg", &svg)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod fleet;
pub mod models;
pub mod roster;
pub mod storage;
pub mod trend;
pub mod viz;

pub use api::Client;
pub use config::Config;
pub use dashboard::{DashboardService, DashboardView};
pub use fetch::{IndicatorFetcher, IndicatorSource};
pub use fleet::FleetAggregator;
pub use models::{FleetSnapshot, IndicatorPoint, IndicatorSeries, ProjectionPoint};
pub use roster::CountryRef;
