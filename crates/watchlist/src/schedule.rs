//! Schedule curation — exact best-fit selection under a time budget.
//!
//! Given a watchlist snapshot and a budget in minutes, pick the subset
//! that maximizes total watch time without exceeding the budget. Among
//! selections with the same total, the one with more items wins; among
//! equal totals and counts, earlier-inserted items win. Watchlists are
//! small (tens of items), so an exact dynamic program over achievable
//! totals is both affordable and provably better than greedy fitting.

use crate::item::WatchItem;
use reelclaw_core::error::ScheduleError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for one curation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Available time in minutes.
    pub budget_minutes: u32,

    /// Optional genre filter ("any" or empty means no filter;
    /// "sci-fi" is understood as "science fiction").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    /// Optional restriction to an explicit set of titles
    /// (case-insensitive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titles: Option<Vec<String>>,
}

/// The curated schedule. Ephemeral — computed per request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Selected items, in original watchlist insertion order.
    pub items: Vec<WatchItem>,

    /// Sum of selected durations.
    pub total_minutes: u32,

    /// Budget left over.
    pub unused_minutes: u32,
}

/// Normalize a genre filter for comparison against stored genres.
fn normalize_genre(genre: &str) -> String {
    let g = genre.trim().to_lowercase();
    if g == "sci-fi" { "science fiction".into() } else { g }
}

/// Whether a genre string means "no filter".
fn is_unfiltered(genre: &str) -> bool {
    let g = genre.trim().to_lowercase();
    g.is_empty() || g == "any" || g == "all"
}

/// Select the best-fitting subset of the snapshot for the request.
///
/// Errors with `NoEligibleItems` when the filtered candidate set is
/// empty; returns an empty selection (not an error) when candidates
/// exist but none fits the budget.
pub fn curate(
    snapshot: &[WatchItem],
    request: &ScheduleRequest,
) -> Result<ScheduleResult, ScheduleError> {
    let genre_filter = request
        .genre
        .as_deref()
        .filter(|g| !is_unfiltered(g))
        .map(normalize_genre);

    let title_filter: Option<Vec<String>> = request
        .titles
        .as_ref()
        .map(|ts| ts.iter().map(|t| t.trim().to_lowercase()).collect());

    // Candidates keep their snapshot position so the output can honor
    // insertion order.
    let candidates: Vec<(usize, &WatchItem)> = snapshot
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            genre_filter
                .as_ref()
                .is_none_or(|g| item.has_genre(g))
        })
        .filter(|(_, item)| {
            title_filter
                .as_ref()
                .is_none_or(|ts| ts.iter().any(|t| item.title.to_lowercase() == *t))
        })
        .collect();

    if candidates.is_empty() {
        let reason = match (&genre_filter, &title_filter) {
            _ if snapshot.is_empty() => "the watchlist is empty".to_string(),
            (Some(g), _) => format!("no '{g}' titles on the watchlist"),
            (None, Some(_)) => "none of the requested titles are on the watchlist".to_string(),
            (None, None) => "the watchlist is empty".to_string(),
        };
        return Err(ScheduleError::NoEligibleItems(reason));
    }

    let budget = request.budget_minutes as usize;
    let durations: Vec<usize> = candidates
        .iter()
        .map(|(_, i)| i.duration_minutes as usize)
        .collect();
    let cap = budget.min(durations.iter().sum());
    let n = candidates.len();

    // dp[i][t] = max item count among subsets of the first i candidates
    // totalling exactly t minutes (None = unreachable). The table stays
    // small: cap is clamped to the candidates' combined runtime.
    let mut dp: Vec<Vec<Option<u32>>> = vec![vec![None; cap + 1]; n + 1];
    dp[0][0] = Some(0);
    for i in 1..=n {
        let d = durations[i - 1];
        for t in 0..=cap {
            let skip = dp[i - 1][t];
            let take = if t >= d {
                dp[i - 1][t - d].map(|c| c + 1)
            } else {
                None
            };
            dp[i][t] = match (skip, take) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (skip, None) => skip,
                (None, take) => take,
            };
        }
    }

    let best_total = (0..=cap)
        .rev()
        .find(|&t| dp[n][t].is_some())
        .unwrap_or(0);

    // Walk back through the table. Skipping a candidate whenever the
    // count survives without it drops later items first, so count ties
    // resolve toward the earliest-inserted items.
    let mut picked: Vec<usize> = Vec::new();
    let mut t = best_total;
    for i in (1..=n).rev() {
        if t == 0 {
            break;
        }
        if dp[i - 1][t] == dp[i][t] {
            continue;
        }
        picked.push(i - 1);
        t -= durations[i - 1];
    }
    picked.sort_unstable();

    let items: Vec<WatchItem> = picked
        .into_iter()
        .map(|ci| candidates[ci].1.clone())
        .collect();

    let total_minutes = best_total as u32;
    debug!(
        candidates = candidates.len(),
        selected = items.len(),
        total_minutes,
        budget = request.budget_minutes,
        "Schedule curated"
    );

    Ok(ScheduleResult {
        items,
        total_minutes,
        unused_minutes: request.budget_minutes - total_minutes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, minutes: u32, genres: &[&str]) -> WatchItem {
        WatchItem::new(title, minutes, genres.iter().map(|g| g.to_string())).unwrap()
    }

    fn titles(result: &ScheduleResult) -> Vec<&str> {
        result.items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn exact_fit_beats_smaller_totals() {
        // A+B = 150 exactly; A+C = 135; B+C = 105.
        let list = vec![item("A", 90, &[]), item("B", 60, &[]), item("C", 45, &[])];
        let result = curate(
            &list,
            &ScheduleRequest {
                budget_minutes: 150,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(titles(&result), vec!["A", "B"]);
        assert_eq!(result.total_minutes, 150);
        assert_eq!(result.unused_minutes, 0);
    }

    #[test]
    fn nothing_fits_returns_empty_selection() {
        let list = vec![item("A", 90, &[]), item("B", 60, &[])];
        let result = curate(
            &list,
            &ScheduleRequest {
                budget_minutes: 10,
                ..Default::default()
            },
        )
        .unwrap();

        assert!(result.items.is_empty());
        assert_eq!(result.total_minutes, 0);
        assert_eq!(result.unused_minutes, 10);
    }

    #[test]
    fn equal_total_prefers_more_items() {
        // {Long} and {Short1, Short2} both total 120 — two movies win.
        let list = vec![
            item("Long", 120, &[]),
            item("Short1", 60, &[]),
            item("Short2", 60, &[]),
        ];
        let result = curate(
            &list,
            &ScheduleRequest {
                budget_minutes: 120,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(result.total_minutes, 120);
        assert_eq!(result.items.len(), 2);
        assert_eq!(titles(&result), vec!["Short1", "Short2"]);
    }

    #[test]
    fn equal_contribution_prefers_insertion_order() {
        let list = vec![item("First", 30, &[]), item("Second", 30, &[])];
        let result = curate(
            &list,
            &ScheduleRequest {
                budget_minutes: 30,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(titles(&result), vec!["First"]);
    }

    #[test]
    fn output_in_insertion_order() {
        let list = vec![
            item("A", 40, &[]),
            item("B", 50, &[]),
            item("C", 30, &[]),
        ];
        let result = curate(
            &list,
            &ScheduleRequest {
                budget_minutes: 120,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(titles(&result), vec!["A", "B", "C"]);
        assert_eq!(result.total_minutes, 120);
    }

    #[test]
    fn genre_filter_restricts_candidates() {
        let list = vec![
            item("Scream", 111, &["horror"]),
            item("Heat", 170, &["crime"]),
            item("The Thing", 109, &["horror", "science fiction"]),
        ];
        let result = curate(
            &list,
            &ScheduleRequest {
                budget_minutes: 240,
                genre: Some("Horror".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(titles(&result), vec!["Scream", "The Thing"]);
        assert_eq!(result.total_minutes, 220);
    }

    #[test]
    fn sci_fi_alias_matches_science_fiction() {
        let list = vec![item("Arrival", 116, &["science fiction"])];
        let result = curate(
            &list,
            &ScheduleRequest {
                budget_minutes: 120,
                genre: Some("sci-fi".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(titles(&result), vec!["Arrival"]);
    }

    #[test]
    fn any_genre_means_no_filter() {
        let list = vec![item("Heat", 170, &["crime"])];
        let result = curate(
            &list,
            &ScheduleRequest {
                budget_minutes: 200,
                genre: Some("any".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(result.items.len(), 1);
    }

    #[test]
    fn explicit_titles_restrict_candidates() {
        let list = vec![
            item("A", 60, &[]),
            item("B", 60, &[]),
            item("C", 60, &[]),
        ];
        let result = curate(
            &list,
            &ScheduleRequest {
                budget_minutes: 180,
                titles: Some(vec!["a".into(), "c".into()]),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(titles(&result), vec!["A", "C"]);
    }

    #[test]
    fn empty_candidate_set_is_no_eligible_items() {
        let list = vec![item("Heat", 170, &["crime"])];
        let err = curate(
            &list,
            &ScheduleRequest {
                budget_minutes: 200,
                genre: Some("horror".into()),
                ..Default::default()
            },
        )
        .unwrap_err();

        let ScheduleError::NoEligibleItems(reason) = err;
        assert!(reason.contains("horror"));
    }

    #[test]
    fn empty_watchlist_is_no_eligible_items() {
        let err = curate(
            &[],
            &ScheduleRequest {
                budget_minutes: 120,
                ..Default::default()
            },
        )
        .unwrap_err();
        let ScheduleError::NoEligibleItems(reason) = err;
        assert!(reason.contains("empty"));
    }

    #[test]
    fn zero_budget_is_empty_selection() {
        let list = vec![item("A", 90, &[])];
        let result = curate(
            &list,
            &ScheduleRequest {
                budget_minutes: 0,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.unused_minutes, 0);
    }

    /// Exhaustive cross-check against brute force on a fixed list: the
    /// DP must match the best subset total, and match or beat its count.
    #[test]
    fn matches_brute_force_on_fixed_list() {
        let durations: [u32; 8] = [35, 90, 45, 120, 60, 25, 80, 100];
        let list: Vec<WatchItem> = durations
            .iter()
            .enumerate()
            .map(|(i, &d)| item(&format!("M{i}"), d, &[]))
            .collect();

        for budget in [0u32, 10, 60, 95, 150, 200, 300, 555, 600] {
            let result = curate(
                &list,
                &ScheduleRequest {
                    budget_minutes: budget,
                    ..Default::default()
                },
            )
            .unwrap();

            let mut best_total = 0u32;
            let mut best_count = 0u32;
            for mask in 0u32..(1 << durations.len()) {
                let total: u32 = durations
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, &d)| d)
                    .sum();
                if total > budget {
                    continue;
                }
                let count = mask.count_ones();
                if total > best_total || (total == best_total && count > best_count) {
                    best_total = total;
                    best_count = count;
                }
            }

            assert_eq!(result.total_minutes, best_total, "budget {budget}");
            assert_eq!(result.items.len() as u32, best_count, "budget {budget}");
            assert_eq!(result.unused_minutes, budget - best_total);
        }
    }
}
