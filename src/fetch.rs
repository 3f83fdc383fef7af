//! Memoized per-country series retrieval.
//!
//! `IndicatorSource` is the network seam; `IndicatorFetcher` wraps any source
//! with the session cache and turns every failure into an empty series.

use crate::cache::SeriesCache;
use crate::error::FetchError;
use crate::models::IndicatorSeries;
use log::{debug, warn};
use std::sync::Arc;

/// Anything that can produce one indicator series for one country.
pub trait IndicatorSource: Send + Sync {
    fn fetch_series(&self, iso3: &str, indicator: &str) -> Result<IndicatorSeries, FetchError>;
}

impl<S: IndicatorSource + ?Sized> IndicatorSource for Arc<S> {
    fn fetch_series(&self, iso3: &str, indicator: &str) -> Result<IndicatorSeries, FetchError> {
        (**self).fetch_series(iso3, indicator)
    }
}

pub struct IndicatorFetcher<S> {
    source: S,
    cache: SeriesCache,
}

impl<S: IndicatorSource> IndicatorFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: SeriesCache::new(),
        }
    }

    /// Series for `(iso3, indicator)`, fetched at most once per session.
    ///
    /// Failures (transport, non-2xx, malformed body) yield an empty series and
    /// are cached like any other result.
    pub fn fetch(&self, iso3: &str, indicator: &str) -> Arc<IndicatorSeries> {
        let iso3 = iso3.trim().to_ascii_uppercase();
        let key = (iso3.clone(), indicator.to_string());
        self.cache.get_or_insert_with(key, || {
            match self.source.fetch_series(&iso3, indicator) {
                Ok(series) => {
                    debug!("{iso3}/{indicator}: {} observations", series.len());
                    Arc::new(series)
                }
                Err(e) => {
                    warn!("{iso3}/{indicator}: no data ({e})");
                    Arc::new(IndicatorSeries::empty())
                }
            }
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Forget every cached series.
    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
