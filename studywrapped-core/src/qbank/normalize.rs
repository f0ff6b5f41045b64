//! Response normalization for the QBank reports API
//!
//! The remote API's JSON schema has changed between deployments:
//! payloads are sometimes nested under a `data` envelope and sometimes
//! top-level, accuracy arrives as a 0-1 fraction or a 0-100 percentage,
//! and count fields have carried alternate names. Every function here
//! is a pure transform from a raw `serde_json::Value` into one
//! canonical shape.
//!
//! Precedence, in order:
//! 1. A `data` envelope, when present, wins over top-level fields.
//! 2. Newer field names win over legacy aliases (handled via serde
//!    aliases on the canonical types).
//! 3. A missing or malformed payload degrades to the all-zero
//!    canonical record - downstream stages tolerate all-zero input,
//!    so normalization never raises.

use serde_json::Value;

use super::types::{
    AccuracyEvolution, AnsweredSummary, CategorySeries, DailyAnswered, EvolutionPoint, TagTotals,
};

/// Unwrap a `data` envelope when present.
fn unwrap_envelope(raw: &Value) -> &Value {
    raw.get("data").unwrap_or(raw)
}

/// Canonicalize an accuracy value to a 0-100 float.
///
/// Values in `(0, 1]` are fractions and are scaled by 100. Exactly 0
/// means "no data", not a fraction, and is kept as 0. Values already
/// above 1 are treated as percentages and passed through.
pub fn normalize_accuracy(raw: f64) -> f64 {
    if raw > 0.0 && raw <= 1.0 {
        raw * 100.0
    } else {
        raw
    }
}

/// Normalize the per-day answered-questions response.
///
/// Rows are recovered individually: one malformed row is dropped
/// without discarding the rest of the series.
pub fn normalize_daily(raw: &Value) -> Vec<DailyAnswered> {
    unwrap_envelope(raw)
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|row| serde_json::from_value(row.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Normalize the aggregate answered-questions response.
pub fn normalize_answered(raw: &Value) -> AnsweredSummary {
    let inner = unwrap_envelope(raw);

    let total = int_field(inner, &["total", "answeredTotal", "count"]);
    let correct = int_field(inner, &["correct", "right"]);
    let wrong = int_field(inner, &["wrong", "incorrect"]);
    let accuracy = inner
        .get("accuracy")
        .or_else(|| inner.get("accuracyRate"))
        .and_then(Value::as_f64)
        .map(normalize_accuracy)
        .unwrap_or(0.0);

    let by_tag: Vec<TagTotals> = inner
        .get("byTag")
        .or_else(|| inner.get("by_tag"))
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    AnsweredSummary {
        total,
        correct,
        wrong,
        accuracy,
        by_tag,
    }
}

/// Normalize the ever-answered-wrong response to a single count.
///
/// Deployments have reported either a `total` field or only the raw
/// question list; the list length is the fallback.
pub fn normalize_ever_wrong(raw: &Value) -> i64 {
    let inner = unwrap_envelope(raw);
    let total = int_field(inner, &["total", "count"]);
    if total > 0 {
        return total;
    }
    inner
        .get("questions")
        .and_then(Value::as_array)
        .map(|qs| qs.len() as i64)
        .unwrap_or(0)
}

/// Normalize the accuracy-evolution response.
///
/// Two shapes exist: a flat array of dated points, and a per-category
/// breakdown as parallel arrays (`categories[i]` names the series whose
/// monthly percentages are `percentages[i]`). Both may be enveloped.
pub fn normalize_evolution(raw: &Value) -> AccuracyEvolution {
    let inner = unwrap_envelope(raw);

    if let Some(points) = inner.as_array() {
        let points = points
            .iter()
            .filter_map(|p| serde_json::from_value::<EvolutionPoint>(p.clone()).ok())
            .map(|mut p| {
                p.accuracy_rate = normalize_accuracy(p.accuracy_rate);
                p
            })
            .collect();
        return AccuracyEvolution {
            points,
            categories: Vec::new(),
        };
    }

    // Parallel-array form
    let names: Vec<String> = inner
        .get("categories")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    let percentages: Vec<Vec<f64>> = inner
        .get("percentages")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    let categories = names
        .into_iter()
        .zip(percentages)
        .map(|(name, monthly)| CategorySeries {
            name,
            monthly_pct: monthly.into_iter().map(normalize_accuracy).collect(),
        })
        .collect();

    AccuracyEvolution {
        points: Vec::new(),
        categories,
    }
}

/// First present integer among alternate field names.
fn int_field(value: &Value, names: &[&str]) -> i64 {
    names
        .iter()
        .find_map(|name| value.get(name).and_then(Value::as_i64))
        .unwrap_or(0)
}
