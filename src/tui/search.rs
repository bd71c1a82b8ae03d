// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Fuzzy order search for the `/` prompt.

use crate::model::OrderId;
use crate::planner::Planner;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchCandidate {
    pub(crate) order_id: OrderId,
    haystack: String,
}

#[derive(Debug, Clone, Copy)]
struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

/// One candidate per placed order: `#<id> <customer name>`, lowercased.
pub(crate) fn candidates_from_planner(planner: &Planner) -> Vec<SearchCandidate> {
    let mut candidates = planner
        .partition()
        .order_ids()
        .filter_map(|order_id| planner.order(order_id))
        .map(|order| SearchCandidate {
            order_id: order.id,
            haystack: format!("#{} {}", order.id, order.customer_name).to_lowercase(),
        })
        .collect::<Vec<_>>();
    candidates.sort_by(|a, b| a.haystack.cmp(&b.haystack));
    candidates
}

/// Matching order ids, best first. An empty query matches nothing.
pub(crate) fn ranked_search_results(candidates: &[SearchCandidate], query: &str) -> Vec<OrderId> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut scored = candidates
        .iter()
        .filter_map(|candidate| {
            fuzzy_score(&needle, &candidate.haystack).map(|score| (score, candidate))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b.cmp(score_a).then_with(|| a.haystack.cmp(&b.haystack))
    });
    scored.into_iter().map(|(_, candidate)| candidate.order_id).collect()
}

fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    let subseq = subsequence_stats(needle, haystack)?;
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());
    let ratio_score = (ratio * 1000.0).round() as i64;

    let mut score = ratio_score;
    score -= subseq.span as i64;
    score -= (subseq.first as i64) / 4;
    score += (subseq.consecutive as i64) * 40;
    if subseq.start_boundary {
        score += 150;
    }
    if haystack.contains(needle) {
        score += 2000;
    } else {
        score += 500;
    }

    Some(score)
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut needle_iter = needle.chars().peekable();
    let mut first: Option<usize> = None;
    let mut last = 0usize;
    let mut prev_match: Option<usize> = None;
    let mut consecutive = 0usize;
    let mut start_boundary = false;
    let mut prev_hay: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = needle_iter.peek() else {
            break;
        };

        if ch == want {
            needle_iter.next();
            if first.is_none() {
                first = Some(idx);
                start_boundary = prev_hay.map_or(true, is_boundary_char);
            }
            if prev_match.is_some_and(|prev| idx == prev + 1) {
                consecutive += 1;
            }
            prev_match = Some(idx);
            last = idx;
        }

        prev_hay = Some(ch);
    }

    if needle_iter.peek().is_some() {
        return None;
    }

    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last.saturating_sub(first).saturating_add(1),
        consecutive,
        start_boundary,
    })
}

fn is_boundary_char(ch: char) -> bool {
    matches!(ch, ' ' | '#' | '-' | '_' | '/')
}

#[cfg(test)]
mod tests {
    use super::{candidates_from_planner, ranked_search_results, subsequence_stats};
    use crate::model::{fixtures, OrderId};
    use crate::planner::Planner;

    fn demo_planner() -> Planner {
        Planner::new(
            fixtures::demo_orders(),
            fixtures::demo_vehicles(),
            Some(&fixtures::demo_solution()),
        )
    }

    #[test]
    fn exact_substring_ranks_first() {
        let planner = demo_planner();
        let candidates = candidates_from_planner(&planner);

        let results = ranked_search_results(&candidates, "farm");

        assert_eq!(results.first(), Some(&OrderId::new(3).unwrap()));
    }

    #[test]
    fn subsequence_matches_across_words() {
        let planner = demo_planner();
        let candidates = candidates_from_planner(&planner);

        let results = ranked_search_results(&candidates, "pshop");

        assert!(results.contains(&OrderId::new(6).unwrap()));
    }

    #[test]
    fn search_by_order_number() {
        let planner = demo_planner();
        let candidates = candidates_from_planner(&planner);

        let results = ranked_search_results(&candidates, "#7");

        assert_eq!(results.first(), Some(&OrderId::new(7).unwrap()));
    }

    #[test]
    fn blank_or_unmatched_query_returns_nothing() {
        let planner = demo_planner();
        let candidates = candidates_from_planner(&planner);

        assert!(ranked_search_results(&candidates, "   ").is_empty());
        assert!(ranked_search_results(&candidates, "zzzz").is_empty());
    }

    #[test]
    fn subsequence_stats_tracks_span_and_runs() {
        let stats = subsequence_stats("van", "moto van").unwrap();
        assert_eq!(stats.first, 5);
        assert_eq!(stats.span, 3);
        assert_eq!(stats.consecutive, 2);
        assert!(stats.start_boundary);
        assert!(subsequence_stats("xyz", "moto van").is_none());
    }
}
