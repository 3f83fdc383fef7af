use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata section returned by the API (position 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub page: u32,
    pub pages: u32,
    /// Some responses encode `per_page` as a string, others as a number.
    /// Accept both and normalize to `u32`.
    #[serde(deserialize_with = "de_u32_from_string_or_number")]
    pub per_page: u32,
    pub total: u32,
}

/// Serde helper: parse `u32` from either a JSON number or a string.
fn de_u32_from_string_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct U32Visitor;

    impl<'de> Visitor<'de> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or integer representing a non-negative number")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(|_| E::custom("negative or oversized value for u32"))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<u32>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U32Visitor)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeName {
    pub id: String,
    pub value: String,
}

/// Raw observation record from the API (position 1 array).
///
/// Only `date` and `value` matter to the pipeline; the descriptive fields are
/// optional so that trimmed-down payloads still decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub indicator: Option<CodeName>,
    #[serde(default)]
    pub country: Option<CodeName>,
    #[serde(default)]
    pub countryiso3code: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl Entry {
    /// Convert into a clean point. `None` if the value is missing or non-finite
    /// or the date is not an integer year.
    pub fn to_point(&self) -> Option<IndicatorPoint> {
        let year = self.date.as_deref()?.trim().parse::<i32>().ok()?;
        let value = self.value.filter(|v| v.is_finite())?;
        Some(IndicatorPoint { year, value })
    }
}

/// One observation of an indicator for one country in one year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IndicatorPoint {
    pub year: i32,
    pub value: f64,
}

/// Cleaned series for one (country, indicator) pair.
///
/// Always sorted ascending by year and free of missing or non-finite values.
/// Years need not be contiguous.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IndicatorSeries {
    points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from arbitrary points: drops non-finite values, sorts by year.
    pub fn from_points(points: impl IntoIterator<Item = IndicatorPoint>) -> Self {
        let mut points: Vec<IndicatorPoint> =
            points.into_iter().filter(|p| p.value.is_finite()).collect();
        points.sort_by_key(|p| p.year);
        Self { points }
    }

    /// Build from raw API records, dropping null-valued or undated ones.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        Self::from_points(entries.into_iter().filter_map(Entry::to_point))
    }

    pub fn points(&self) -> &[IndicatorPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// The point with the maximum year.
    pub fn latest(&self) -> Option<IndicatorPoint> {
        self.points.last().copied()
    }

    /// Inclusive (first, last) observed years.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        Some((self.points.first()?.year, self.points.last()?.year))
    }
}

/// Latest-known value per ISO-3 code for one indicator.
///
/// Countries without data are absent rather than zero-filled.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FleetSnapshot {
    values: BTreeMap<String, f64>,
}

impl FleetSnapshot {
    pub fn insert(&mut self, iso3: impl Into<String>, value: f64) {
        self.values.insert(iso3.into(), value);
    }

    pub fn get(&self, iso3: &str) -> Option<f64> {
        self.values.get(iso3).copied()
    }

    pub fn contains(&self, iso3: &str) -> bool {
        self.values.contains_key(iso3)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries ordered by ISO-3 code.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries ordered by value, highest first.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut out: Vec<(&str, f64)> = self.iter().collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(b.0)));
        out
    }

    /// (min, max) over all values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut it = self.values.values().copied();
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

impl FromIterator<(String, f64)> for FleetSnapshot {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// One extrapolated value of the trend line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProjectionPoint {
    pub year: i32,
    pub predicted_value: f64,
}
