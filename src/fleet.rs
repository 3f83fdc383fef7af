//! Latest value per roster country for one indicator.

use crate::cache::SnapshotCache;
use crate::fetch::{IndicatorFetcher, IndicatorSource};
use crate::models::FleetSnapshot;
use crate::roster;
use log::{debug, warn};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

pub struct FleetAggregator<S> {
    fetcher: Arc<IndicatorFetcher<S>>,
    countries: Vec<String>,
    workers: usize,
    cache: SnapshotCache,
}

impl<S: IndicatorSource> FleetAggregator<S> {
    /// Aggregator over the full African roster, fetching sequentially.
    pub fn new(fetcher: Arc<IndicatorFetcher<S>>) -> Self {
        Self {
            fetcher,
            countries: roster::all().iter().map(|c| c.iso3.to_string()).collect(),
            workers: 1,
            cache: SnapshotCache::new(),
        }
    }

    /// Replace the country list (ISO-3 codes). Duplicates are dropped.
    pub fn with_countries<I, T>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for code in codes {
            let code = code.into().to_ascii_uppercase();
            if !out.contains(&code) {
                out.push(code);
            }
        }
        self.countries = out;
        self
    }

    /// Fan fetches out over a pool of `workers` threads (at least one).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn fetcher(&self) -> &Arc<IndicatorFetcher<S>> {
        &self.fetcher
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Snapshot for `indicator`, built at most once per session.
    pub fn aggregate(&self, indicator: &str) -> Arc<FleetSnapshot> {
        self.cache
            .get_or_insert_with(indicator.to_string(), || Arc::new(self.collect(indicator)))
    }

    fn collect(&self, indicator: &str) -> FleetSnapshot {
        let one = |iso3: &String| (iso3.clone(), self.isolated_latest(iso3, indicator));
        let latest: Vec<(String, Option<f64>)> = if self.workers <= 1 {
            self.countries.iter().map(one).collect()
        } else {
            match ThreadPoolBuilder::new().num_threads(self.workers).build() {
                Ok(pool) => pool.install(|| self.countries.par_iter().map(one).collect()),
                Err(e) => {
                    warn!("{indicator}: no fetch pool ({e}); fetching sequentially");
                    self.countries.iter().map(one).collect()
                }
            }
        };

        let total = latest.len();
        let snapshot: FleetSnapshot = latest
            .into_iter()
            .filter_map(|(iso3, v)| v.map(|v| (iso3, v)))
            .collect();
        debug!(
            "{indicator}: {} of {total} countries have data",
            snapshot.len()
        );
        snapshot
    }

    // A panicking source only costs its own country.
    fn isolated_latest(&self, iso3: &str, indicator: &str) -> Option<f64> {
        panic::catch_unwind(AssertUnwindSafe(|| self.latest_value(iso3, indicator)))
            .unwrap_or_else(|_| {
                warn!("{iso3}/{indicator}: fetch panicked; country skipped");
                None
            })
    }

    fn latest_value(&self, iso3: &str, indicator: &str) -> Option<f64> {
        self.fetcher
            .fetch(iso3, indicator)
            .latest()
            .map(|p| p.value)
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}
