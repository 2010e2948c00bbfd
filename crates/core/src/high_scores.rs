//! High-score list - top scores, best first
//!
//! Pure list maintenance. Loading and saving belong to a persistence
//! collaborator; the list is the only thing exchanged with it.

use arrayvec::ArrayVec;

use crate::types::MAX_HIGH_SCORES;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScoreList {
    scores: ArrayVec<u32, MAX_HIGH_SCORES>,
}

impl HighScoreList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary (possibly unsorted, oversized or zero-laden) input
    pub fn from_scores(scores: impl IntoIterator<Item = u32>) -> Self {
        let mut list = Self::new();
        for score in scores {
            list.record(score);
        }
        list
    }

    /// Insert a finished session's score.
    ///
    /// Zero scores are ignored. Returns the 0-based rank when the score made the list.
    pub fn record(&mut self, score: u32) -> Option<usize> {
        if score == 0 {
            return None;
        }

        // Insert after equal scores so earlier entries keep their rank.
        let rank = self.scores.iter().position(|&s| s < score).unwrap_or(self.scores.len());
        if rank >= MAX_HIGH_SCORES {
            return None;
        }

        if self.scores.is_full() {
            self.scores.pop();
        }
        self.scores.insert(rank, score);
        Some(rank)
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn best(&self) -> Option<u32> {
        self.scores.first().copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
