//! Cross-election aggregation over constituency results: swing-state
//! classification and win-margin tables. Everything here is a pure reduction
//! over in-memory result lists; the database layer feeds it.

use crate::models::CandidateResult;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How consistently one party holds a constituency across observed elections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Competitiveness {
    /// One party won every observed election.
    Solid,
    /// One party won all but one.
    Leaning,
    /// Two or more parties are tied on wins.
    TossUp,
    /// A plurality winner exists but without a dominant record.
    Competitive,
}

impl std::fmt::Display for Competitiveness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Competitiveness::Solid => write!(f, "solid"),
            Competitiveness::Leaning => write!(f, "leaning"),
            Competitiveness::TossUp => write!(f, "toss_up"),
            Competitiveness::Competitive => write!(f, "competitive"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstituencySwing {
    pub constituency: String,
    pub label: Competitiveness,
    /// Absent when the top win count is shared.
    pub dominant_party: Option<String>,
    pub win_counts: BTreeMap<String, i64>,
    pub elections_observed: i64,
}

/// Classify a single constituency from the parties that won it, one entry
/// per observed election. Returns `None` when nothing was observed.
pub fn classify_wins(constituency: &str, wins: &[String]) -> Option<ConstituencySwing> {
    if wins.is_empty() {
        return None;
    }

    let mut win_counts: BTreeMap<String, i64> = BTreeMap::new();
    for party in wins {
        *win_counts.entry(party.clone()).or_insert(0) += 1;
    }

    let n = wins.len() as i64;
    let max_wins = win_counts.values().max().copied().unwrap_or(0);
    let leaders: Vec<&String> = win_counts
        .iter()
        .filter(|(_, &count)| count == max_wins)
        .map(|(party, _)| party)
        .collect();

    let (label, dominant_party) = if leaders.len() > 1 {
        (Competitiveness::TossUp, None)
    } else {
        let leader = leaders[0].clone();
        let label = if max_wins == n {
            Competitiveness::Solid
        } else if max_wins == n - 1 {
            Competitiveness::Leaning
        } else {
            Competitiveness::Competitive
        };
        (label, Some(leader))
    };

    Some(ConstituencySwing {
        constituency: constituency.to_string(),
        label,
        dominant_party,
        win_counts,
        elections_observed: n,
    })
}

/// Classify every constituency from per-election winner records. The input
/// pairs a parliament number with that election's result lines; only lines
/// flagged as winners participate. Constituencies absent from an election are
/// treated as unobserved for it.
pub fn swing_table(elections: &[(i64, Vec<CandidateResult>)]) -> Vec<ConstituencySwing> {
    let mut wins_by_constituency: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (_, results) in elections.iter().sorted_by_key(|(parliament, _)| *parliament) {
        for result in results.iter().filter(|r| r.winner) {
            wins_by_constituency
                .entry(result.constituency.clone())
                .or_default()
                .push(result.party.clone());
        }
    }

    wins_by_constituency
        .iter()
        .filter_map(|(constituency, wins)| classify_wins(constituency, wins))
        .collect()
}

/// The gap between winner and runner-up in one constituency contest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinMargin {
    pub constituency: String,
    pub winner: String,
    pub winner_party: String,
    pub winner_votes: i64,
    pub runner_up: Option<String>,
    pub runner_up_party: Option<String>,
    pub margin: i64,
    /// Margin as a share of votes cast in the constituency, 0 when no
    /// votes were recorded.
    pub margin_pct: f64,
}

/// Compute per-constituency win margins from one election's result lines,
/// sorted ascending so the closest contests come first. Constituencies with
/// no winner flag are skipped.
pub fn win_margins(results: &[CandidateResult]) -> Vec<WinMargin> {
    let mut margins: Vec<WinMargin> = results
        .iter()
        .map(|r| r.constituency.as_str())
        .unique()
        .filter_map(|constituency| margin_for(constituency, results))
        .collect();

    margins.sort_by(|a, b| a.margin.cmp(&b.margin));
    margins
}

fn margin_for(constituency: &str, results: &[CandidateResult]) -> Option<WinMargin> {
    let mut lines: Vec<&CandidateResult> = results
        .iter()
        .filter(|r| r.constituency == constituency)
        .collect();
    lines.sort_by(|a, b| b.votes.cmp(&a.votes));

    let winner = lines.iter().find(|r| r.winner)?;
    let runner_up = lines.iter().find(|r| r.candidate_name != winner.candidate_name);
    let total_votes: i64 = lines.iter().map(|r| r.votes).sum();

    let margin = winner.votes - runner_up.map(|r| r.votes).unwrap_or(0);
    let margin_pct = if total_votes > 0 {
        margin as f64 * 100.0 / total_votes as f64
    } else {
        0.0
    };

    Some(WinMargin {
        constituency: constituency.to_string(),
        winner: winner.candidate_name.clone(),
        winner_party: winner.party.clone(),
        winner_votes: winner.votes,
        runner_up: runner_up.map(|r| r.candidate_name.clone()),
        runner_up_party: runner_up.map(|r| r.party.clone()),
        margin,
        margin_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wins(parties: &[&str]) -> Vec<String> {
        parties.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn unbroken_streak_is_solid() {
        let swing = classify_wins("Dhaka-1", &wins(&["AL", "AL", "AL", "AL"])).unwrap();
        assert_eq!(swing.label, Competitiveness::Solid);
        assert_eq!(swing.dominant_party.as_deref(), Some("AL"));
        assert_eq!(swing.win_counts["AL"], 4);
    }

    #[test]
    fn even_split_is_toss_up() {
        let swing = classify_wins("Dhaka-2", &wins(&["AL", "AL", "BNP", "BNP"])).unwrap();
        assert_eq!(swing.label, Competitiveness::TossUp);
        assert_eq!(swing.dominant_party, None);
    }

    #[test]
    fn three_of_four_is_leaning() {
        let swing = classify_wins("Dhaka-3", &wins(&["AL", "AL", "AL", "BNP"])).unwrap();
        assert_eq!(swing.label, Competitiveness::Leaning);
        assert_eq!(swing.dominant_party.as_deref(), Some("AL"));
    }

    #[test]
    fn plurality_without_dominance_is_competitive() {
        let swing = classify_wins("Dhaka-4", &wins(&["AL", "AL", "BNP", "JP", "JI"])).unwrap();
        assert_eq!(swing.label, Competitiveness::Competitive);
        assert_eq!(swing.dominant_party.as_deref(), Some("AL"));
    }

    #[test]
    fn single_observation_is_solid() {
        let swing = classify_wins("Dhaka-5", &wins(&["JP"])).unwrap();
        assert_eq!(swing.label, Competitiveness::Solid);
    }

    #[test]
    fn no_observations_is_absence() {
        assert!(classify_wins("Dhaka-6", &[]).is_none());
    }

    fn result(constituency: &str, name: &str, party: &str, votes: i64, winner: bool) -> CandidateResult {
        CandidateResult {
            constituency: constituency.to_string(),
            candidate_name: name.to_string(),
            party: party.to_string(),
            votes,
            winner,
        }
    }

    #[test]
    fn swing_table_groups_by_constituency() {
        let elections = vec![
            (10, vec![result("Dhaka-1", "x", "AL", 100, true), result("Bogra-1", "y", "BNP", 90, true)]),
            (11, vec![result("Dhaka-1", "x", "AL", 110, true)]),
        ];
        let table = swing_table(&elections);
        assert_eq!(table.len(), 2);

        let bogra = table.iter().find(|s| s.constituency == "Bogra-1").unwrap();
        assert_eq!(bogra.elections_observed, 1);
        let dhaka = table.iter().find(|s| s.constituency == "Dhaka-1").unwrap();
        assert_eq!(dhaka.label, Competitiveness::Solid);
        assert_eq!(dhaka.elections_observed, 2);
    }

    #[test]
    fn margins_sort_closest_first() {
        let results = vec![
            result("Dhaka-1", "a", "AL", 60_000, true),
            result("Dhaka-1", "b", "BNP", 40_000, false),
            result("Sylhet-1", "c", "BNP", 50_500, true),
            result("Sylhet-1", "d", "AL", 49_500, false),
        ];
        let margins = win_margins(&results);
        assert_eq!(margins.len(), 2);
        assert_eq!(margins[0].constituency, "Sylhet-1");
        assert_eq!(margins[0].margin, 1_000);
        assert!((margins[0].margin_pct - 1.0).abs() < 1e-9);
        assert_eq!(margins[1].margin, 20_000);
    }

    #[test]
    fn unopposed_winner_has_full_margin() {
        let results = vec![result("Feni-1", "solo", "AL", 75_000, true)];
        let margins = win_margins(&results);
        assert_eq!(margins[0].margin, 75_000);
        assert_eq!(margins[0].runner_up, None);
        assert!((margins[0].margin_pct - 100.0).abs() < 1e-9);
    }
}
