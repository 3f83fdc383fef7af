use std::collections::HashMap;
use std::fs;
use wbi_africa::Config;
use wbi_africa::config::{
    DEFAULT_BASE_URL, DEFAULT_HORIZON_YEARS, DEFAULT_INDICATOR, MAX_HORIZON_YEARS,
};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k| map.get(k).cloned()
}

#[test]
fn defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.indicator, DEFAULT_INDICATOR);
    assert_eq!(cfg.horizon_years, DEFAULT_HORIZON_YEARS);
    assert_eq!(cfg.horizon_years, 10);
    cfg.validate().unwrap();
}

#[test]
fn env_overrides() {
    let mut cfg = Config::default();
    cfg.apply_env(env(&[
        ("WBI_AFRICA_BASE_URL", "http://localhost:8080/v2/"),
        ("WBI_AFRICA_INDICATOR", " FX.OWN.TOTL.ZS "),
        ("WBI_AFRICA_WORKERS", "3"),
    ]))
    .unwrap();
    assert_eq!(cfg.base_url, "http://localhost:8080/v2");
    assert_eq!(cfg.indicator, "FX.OWN.TOTL.ZS");
    assert_eq!(cfg.workers, 3);
}

#[test]
fn blank_env_values_are_ignored() {
    let mut cfg = Config::default();
    cfg.apply_env(env(&[("WBI_AFRICA_INDICATOR", "  ")])).unwrap();
    assert_eq!(cfg.indicator, DEFAULT_INDICATOR);
}

#[test]
fn bad_worker_count_is_rejected() {
    let mut cfg = Config::default();
    assert!(cfg.apply_env(env(&[("WBI_AFRICA_WORKERS", "many")])).is_err());
    let mut cfg = Config::default();
    assert!(cfg.apply_env(env(&[("WBI_AFRICA_WORKERS", "0")])).is_err());
}

#[test]
fn partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wbi.json");
    fs::write(&path, r#"{"indicator":"FX.OWN.TOTL.ZS","horizon_years":5}"#).unwrap();
    let cfg = Config::from_file(&path).unwrap();
    assert_eq!(cfg.indicator, "FX.OWN.TOTL.ZS");
    assert_eq!(cfg.horizon_years, 5);
    assert_eq!(cfg.per_page, Config::default().per_page);
    assert_eq!(cfg.workers, Config::default().workers);
}

#[test]
fn zero_horizon_is_invalid() {
    let cfg = Config {
        horizon_years: 0,
        ..Config::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn oversized_horizon_is_invalid() {
    let at_cap = Config {
        horizon_years: MAX_HORIZON_YEARS,
        ..Config::default()
    };
    at_cap.validate().unwrap();
    let cfg = Config {
        horizon_years: 3_000_000_000,
        ..Config::default()
    };
    assert!(cfg.validate().is_err());
}
