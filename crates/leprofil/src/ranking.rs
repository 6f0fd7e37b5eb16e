// Top-K label selection

use crate::labels::Label;
use crate::score::{LabelScores, ScoreSource};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Number of recommendations returned by default
pub const DEFAULT_TOP_K: usize = 3;

/// A label with its position in the recommendation list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedLabel {
    /// 1-based rank
    pub rank: usize,
    /// Recommended label
    pub label: Label,
    /// Probability the rank was derived from
    pub probability: f64,
    /// Whether the probability was calibrated
    pub source: ScoreSource,
}

/// Picks the K most probable labels.
///
/// Order is descending probability; equal probabilities keep label
/// declaration order, so the result is a pure function of the scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopKSelector {
    k: usize,
}

impl TopKSelector {
    /// Selector returning at most `k` labels
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Configured K
    pub fn k(&self) -> usize {
        self.k
    }

    /// Rank scores and keep the first `min(k, len)` entries
    pub fn select(&self, scores: &LabelScores) -> Vec<RankedLabel> {
        let mut ordered: Vec<_> = scores.iter().collect();
        ordered.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.label.declaration_index().cmp(&b.label.declaration_index()))
        });

        ordered
            .into_iter()
            .take(self.k)
            .enumerate()
            .map(|(idx, score)| RankedLabel {
                rank: idx + 1,
                label: score.label,
                probability: score.probability,
                source: score.source,
            })
            .collect()
    }

    /// Labels only, in rank order
    pub fn select_labels(&self, scores: &LabelScores) -> Vec<Label> {
        self.select(scores).into_iter().map(|r| r.label).collect()
    }
}

impl Default for TopKSelector {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}
