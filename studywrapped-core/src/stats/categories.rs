//! Specialty ranking
//!
//! Three input shapes are supported, in preference order:
//!
//! 1. Direct per-tag question totals from the answered-summary report.
//! 2. Per-specialty watched seconds from the video store.
//! 3. The accuracy-evolution per-category percentage series, from which
//!    question counts are proportionally *estimated* - every ranking
//!    built this way is flagged `estimated` so downstream surfaces can
//!    label it as an approximation.
//!
//! When no category data is available through any path, a fixed set of
//! placeholder specialties is returned rather than an empty list.

use crate::qbank::types::{CategorySeries, TagTotals};
use crate::types::CategoryRanking;

/// Primary path: rank direct per-tag totals, top N by total descending.
pub fn rank_tag_totals(tags: &[TagTotals], top_n: usize) -> Vec<CategoryRanking> {
    let mut sorted: Vec<&TagTotals> = tags.iter().collect();
    sorted.sort_by(|a, b| b.total.cmp(&a.total));

    sorted
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, tag)| CategoryRanking {
            rank: i + 1,
            title: tag.tag_name.clone(),
            total: tag.total,
            correct: tag.correct,
            value: format!("{} questions", tag.total),
            estimated: false,
        })
        .collect()
}

/// Video path: rank specialties by watched hours.
///
/// `rows` are (tag name, watched seconds) pairs, already summed per tag.
pub fn rank_watch_seconds(rows: &[(String, i64)], top_n: usize) -> Vec<CategoryRanking> {
    let mut sorted: Vec<&(String, i64)> = rows.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    sorted
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, (name, seconds))| {
            let hours = (*seconds as f64 / 3600.0).round() as i64;
            CategoryRanking {
                rank: i + 1,
                title: name.clone(),
                total: hours,
                correct: 0,
                value: format!("{} hours", hours),
                estimated: false,
            }
        })
        .collect()
}

/// Engagement figures derived from one category's monthly series.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEngagement {
    pub name: String,
    /// Months with any non-zero percentage
    pub months_engaged: usize,
    /// Sum of all monthly percentages - the unitless ranking weight
    pub weight: f64,
    /// Mean accuracy over engaged months only; idle months must not
    /// drag the average toward zero
    pub mean_accuracy: f64,
}

/// Reduce a monthly percentage series to its engagement figures.
pub fn engagement(series: &CategorySeries) -> CategoryEngagement {
    let engaged: Vec<f64> = series
        .monthly_pct
        .iter()
        .copied()
        .filter(|&pct| pct > 0.0)
        .collect();
    let weight: f64 = engaged.iter().sum();
    let mean_accuracy = if engaged.is_empty() {
        0.0
    } else {
        weight / engaged.len() as f64
    };

    CategoryEngagement {
        name: series.name.clone(),
        months_engaged: engaged.len(),
        weight,
        mean_accuracy,
    }
}

/// Fallback path: rank categories from the evolution percentage series.
///
/// Ranked by months engaged descending, then mean accuracy descending.
/// Question counts are estimated proportionally from each category's
/// share of the summed weights:
/// `estimated = total_questions * weight / sum_weights`, with correct
/// derived from the mean accuracy. The results carry `estimated: true`.
pub fn rank_from_evolution(
    series: &[CategorySeries],
    total_questions: i64,
    top_n: usize,
) -> Vec<CategoryRanking> {
    let mut engagements: Vec<CategoryEngagement> = series
        .iter()
        .map(engagement)
        .filter(|e| e.months_engaged > 0)
        .collect();

    let sum_weights: f64 = engagements.iter().map(|e| e.weight).sum();
    if sum_weights <= 0.0 {
        return Vec::new();
    }

    engagements.sort_by(|a, b| {
        b.months_engaged
            .cmp(&a.months_engaged)
            .then_with(|| {
                b.mean_accuracy
                    .partial_cmp(&a.mean_accuracy)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    engagements
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, e)| {
            let estimated_total =
                (total_questions as f64 * e.weight / sum_weights).round() as i64;
            let estimated_correct =
                (estimated_total as f64 * e.mean_accuracy / 100.0).round() as i64;
            CategoryRanking {
                rank: i + 1,
                title: e.name,
                total: estimated_total,
                correct: estimated_correct,
                value: format!("~{} questions (estimated)", estimated_total),
                estimated: true,
            }
        })
        .collect()
}

/// Explicit placeholder entries for when no category data exists.
pub fn placeholder_rankings() -> Vec<CategoryRanking> {
    ["Internal Medicine", "Surgery", "Pediatrics"]
        .iter()
        .enumerate()
        .map(|(i, title)| CategoryRanking {
            rank: i + 1,
            title: (*title).to_string(),
            total: 0,
            correct: 0,
            value: "0 questions".to_string(),
            estimated: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, total: i64, correct: i64) -> TagTotals {
        TagTotals {
            tag_id: 0,
            tag_name: name.to_string(),
            total,
            correct,
            wrong: total - correct,
        }
    }

    fn series(name: &str, monthly: &[f64]) -> CategorySeries {
        CategorySeries {
            name: name.to_string(),
            monthly_pct: monthly.to_vec(),
        }
    }

    #[test]
    fn test_primary_ranking_by_total() {
        let tags = vec![
            tag("Pediatrics", 200, 150),
            tag("Cardiology", 900, 700),
            tag("Surgery", 400, 280),
        ];
        let ranked = rank_tag_totals(&tags, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].title, "Cardiology");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].value, "900 questions");
        assert_eq!(ranked[1].title, "Surgery");
        assert!(!ranked[0].estimated);
    }

    #[test]
    fn test_watch_seconds_ranking() {
        let rows = vec![
            ("Cardiology".to_string(), 842_400),
            ("Pediatrics".to_string(), 482_400),
        ];
        let ranked = rank_watch_seconds(&rows, 5);
        assert_eq!(ranked[0].total, 234);
        assert_eq!(ranked[0].value, "234 hours");
    }

    #[test]
    fn test_engagement_ignores_idle_months() {
        let e = engagement(&series("Cardiology", &[80.0, 0.0, 60.0, 0.0]));
        assert_eq!(e.months_engaged, 2);
        assert_eq!(e.weight, 140.0);
        assert_eq!(e.mean_accuracy, 70.0);
    }

    #[test]
    fn test_proportional_estimate_sums_to_total() {
        // Weights 30 and 70 over a total of 1000: estimates 300 and 700
        let input = vec![
            series("A", &[30.0]),
            series("B", &[70.0]),
        ];
        let ranked = rank_from_evolution(&input, 1000, 5);
        assert_eq!(ranked.len(), 2);
        let totals: i64 = ranked.iter().map(|r| r.total).sum();
        assert_eq!(totals, 1000);
        // B has the same engaged-month count but higher accuracy
        assert_eq!(ranked[0].title, "B");
        assert_eq!(ranked[0].total, 700);
        assert_eq!(ranked[1].total, 300);
        assert!(ranked.iter().all(|r| r.estimated));
        assert!(ranked[0].value.contains("estimated"));
    }

    #[test]
    fn test_evolution_ranking_prefers_months_engaged() {
        let input = vec![
            series("Steady", &[50.0, 50.0, 50.0]),
            series("Spike", &[95.0, 0.0, 0.0]),
        ];
        let ranked = rank_from_evolution(&input, 100, 5);
        assert_eq!(ranked[0].title, "Steady");
    }

    #[test]
    fn test_estimated_correct_from_mean_accuracy() {
        let input = vec![series("Solo", &[80.0])];
        let ranked = rank_from_evolution(&input, 500, 5);
        assert_eq!(ranked[0].total, 500);
        assert_eq!(ranked[0].correct, 400);
    }

    #[test]
    fn test_no_data_yields_empty_from_evolution() {
        assert!(rank_from_evolution(&[], 100, 5).is_empty());
        let idle = vec![series("Idle", &[0.0, 0.0])];
        assert!(rank_from_evolution(&idle, 100, 5).is_empty());
    }

    #[test]
    fn test_placeholders_never_empty() {
        let placeholders = placeholder_rankings();
        assert_eq!(placeholders.len(), 3);
        assert_eq!(placeholders[0].rank, 1);
        assert_eq!(placeholders[0].total, 0);
    }
}
