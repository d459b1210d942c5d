use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::evaluation::{EvaluationResult, RatingScale};
use super::parameters::JokeParameters;

/// One successfully evaluated joke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvaluationHistoryEntry {
    pub joke: String,
    pub parameters: JokeParameters,
    pub evaluation: EvaluationResult,
    pub timestamp: jiff::Timestamp,
}

/// Append-only log of evaluated jokes. Entries are only added by the session
/// reducer and are never edited or removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationHistory {
    entries: Vec<EvaluationHistoryEntry>,
}

impl EvaluationHistory {
    pub(crate) fn record(&mut self, entry: EvaluationHistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[EvaluationHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&EvaluationHistoryEntry> {
        self.entries.last()
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary::from_entries(&self.entries)
    }
}

/// Read-only aggregates over the history, for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HistorySummary {
    pub count: usize,
    /// Mean 1-based score per criterion; `None` when the history is empty.
    pub mean_humor: Option<f64>,
    pub mean_appropriateness: Option<f64>,
    pub mean_relevance: Option<f64>,
    pub mean_creativity: Option<f64>,
    pub jokes_per_topic: BTreeMap<String, usize>,
}

impl HistorySummary {
    pub fn from_entries(entries: &[EvaluationHistoryEntry]) -> Self {
        let mut jokes_per_topic = BTreeMap::new();
        for entry in entries {
            *jokes_per_topic
                .entry(entry.parameters.topic.clone())
                .or_insert(0) += 1;
        }

        Self {
            count: entries.len(),
            mean_humor: mean(entries, |e| e.humor.score()),
            mean_appropriateness: mean(entries, |e| e.appropriateness.score()),
            mean_relevance: mean(entries, |e| e.relevance.score()),
            mean_creativity: mean(entries, |e| e.creativity.score()),
            jokes_per_topic,
        }
    }
}

fn mean(entries: &[EvaluationHistoryEntry], score: impl Fn(&EvaluationResult) -> u8) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let total: u32 = entries.iter().map(|e| u32::from(score(&e.evaluation))).sum();
    Some(f64::from(total) / entries.len() as f64)
}
