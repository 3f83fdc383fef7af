/// Synchronous client for the **World Bank Indicators API (v2)**.
///
/// This module covers the `country/{iso3}/indicator/{code}` endpoint for a single
/// country and a single indicator, and returns a cleaned `IndicatorSeries`.
/// Pagination is handled automatically.
///
/// ### Notes
/// - The API sometimes serializes `per_page` as a **string**; we accept both string/number.
/// - Countries without data come back as `[meta, null]`; that is an empty series, not an error.
/// - An API-level failure comes back as `[{"message": [...]}]` and is reported as `FetchError::Api`.
/// - There is no retry: callers degrade failures to empty results.
///
/// Typical usage:
/// ```no_run
/// # use wbi_africa::Client;
/// # use wbi_africa::fetch::IndicatorSource;
/// let client = Client::default();
/// let series = client.fetch_series("KEN", "IT.NET.USER.ZS")?;
/// println!("{} observations", series.len());
/// # Ok::<(), wbi_africa::error::FetchError>(())
/// ```
use crate::config::Config;
use crate::error::FetchError;
use crate::fetch::IndicatorSource;
use crate::models::{Entry, IndicatorSeries, Meta};
use anyhow::{Context, Result};
use log::{debug, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    pub per_page: u32,
    pub max_pages: u32,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::from_config(&Config::default()).expect("reqwest client build")
    }
}

// Allow -, _, . unescaped in codes (common for indicator ids)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(code: &str) -> String {
    percent_encoding::utf8_percent_encode(code.trim(), SAFE).to_string()
}

impl Client {
    /// Build a client with the endpoint, paging and timeouts from `cfg`.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs)) // total request timeout
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .redirect(Policy::limited(5))
            .user_agent(concat!("wbi_africa/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            per_page: cfg.per_page,
            max_pages: cfg.max_pages,
            http,
        })
    }

    /// Request URL for one page of one (country, indicator) series.
    pub fn series_url(&self, iso3: &str, indicator: &str, page: u32) -> String {
        format!(
            "{}/country/{}/indicator/{}?format=json&per_page={}&page={}",
            self.base_url,
            enc(iso3),
            enc(indicator),
            self.per_page,
            page
        )
    }

    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let resp = self.http.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl IndicatorSource for Client {
    fn fetch_series(&self, iso3: &str, indicator: &str) -> Result<IndicatorSeries, FetchError> {
        let mut entries: Vec<Entry> = Vec::new();
        let mut page = 1u32;
        loop {
            let url = self.series_url(iso3, indicator, page);
            debug!("GET {url}");
            let v = self.get_json(&url)?;
            let (meta, batch) = parse_page(&v)?;
            entries.extend(batch);

            let total_pages = meta.map(|m| m.pages).unwrap_or(1);
            if page >= total_pages {
                break;
            }
            if page >= self.max_pages {
                warn!(
                    "{iso3}/{indicator}: stopping after {} of {total_pages} pages",
                    self.max_pages
                );
                break;
            }
            page += 1;
        }
        Ok(IndicatorSeries::from_entries(&entries))
    }
}

/// Split one decoded response page into its metadata and observation records.
///
/// The API returns an array: `[Meta, [Entry, ...]]`, or a `"message"` object in
/// position 0 on error. Meta is optional here; without it the page is treated
/// as the only one.
pub fn parse_page(v: &Value) -> Result<(Option<Meta>, Vec<Entry>), FetchError> {
    let arr = v
        .as_array()
        .ok_or_else(|| FetchError::Shape("not a top-level array".into()))?;
    let head = arr
        .first()
        .ok_or_else(|| FetchError::Shape("empty array".into()))?;
    if let Some(msg) = head.get("message") {
        return Err(FetchError::Api(msg.to_string()));
    }
    let body = arr
        .get(1)
        .ok_or_else(|| FetchError::Shape(format!("expected 2 elements, got {}", arr.len())))?;

    let meta: Option<Meta> = serde_json::from_value(head.clone()).ok();
    let entries: Vec<Entry> = match body {
        Value::Null => Vec::new(),
        Value::Array(_) => serde_json::from_value(body.clone())?,
        other => {
            return Err(FetchError::Shape(format!(
                "element 1 is not an array: {}",
                type_name(other)
            )));
        }
    };
    Ok((meta, entries))
}

/// Parse a single-page response body straight into a cleaned series.
pub fn parse_series(v: &Value) -> Result<IndicatorSeries, FetchError> {
    let (_meta, entries) = parse_page(v)?;
    Ok(IndicatorSeries::from_entries(&entries))
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
