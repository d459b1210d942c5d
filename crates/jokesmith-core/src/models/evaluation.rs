//! Structured joke ratings returned by the evaluation path.
//!
//! The four rating scales are closed sets. The evaluation prompt lists their
//! labels straight from [`RatingScale::ALL`], so the wording sent to the model
//! and the parser below always agree.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// A closed, ordered rating scale.
pub trait RatingScale: Copy + Sized + 'static {
    /// JSON key the scale is reported under.
    const KEY: &'static str;
    /// Every label, worst first.
    const ALL: &'static [Self];

    /// Exact label the model must emit.
    fn label(self) -> &'static str;

    /// 1-based position on the scale.
    fn score(self) -> u8 {
        Self::ALL
            .iter()
            .position(|r| r.label() == self.label())
            .map(|i| i as u8 + 1)
            .unwrap_or(0)
    }

    /// Highest attainable score.
    fn max_score() -> u8 {
        Self::ALL.len() as u8
    }
}

macro_rules! rating_scale {
    (
        $(#[$meta:meta])*
        $name:ident, $key:literal { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
        #[ts(export)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl RatingScale for $name {
            const KEY: &'static str = $key;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

rating_scale! {
    /// Timing, surprise and cleverness.
    Humor, "humor" {
        NotFunny => "Not Funny",
        SomewhatFunny => "Somewhat Funny",
        Funny => "Funny",
        VeryFunny => "Very Funny",
        Hilarious => "Hilarious",
    }
}

rating_scale! {
    /// Cultural sensitivity and audience suitability.
    Appropriateness, "appropriateness" {
        Inappropriate => "Inappropriate",
        SomewhatAppropriate => "Somewhat Appropriate",
        Appropriate => "Appropriate",
        VeryAppropriate => "Very Appropriate",
    }
}

rating_scale! {
    /// How well the joke matches the requested topic.
    Relevance, "relevance" {
        OffTopic => "Off Topic",
        SomewhatRelated => "Somewhat Related",
        OnTopic => "On Topic",
        PerfectlyMatched => "Perfectly Matched",
    }
}

rating_scale! {
    /// Originality of the approach.
    Creativity, "creativity" {
        Generic => "Generic",
        SomewhatOriginal => "Somewhat Original",
        Original => "Original",
        HighlyCreative => "Highly Creative",
    }
}

/// The five-field rating produced by the evaluation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct EvaluationResult {
    pub humor: Humor,
    pub appropriateness: Appropriateness,
    pub relevance: Relevance,
    pub creativity: Creativity,
    pub summary: String,
}

/// JSON key of the free-text field.
pub const SUMMARY_KEY: &str = "summary";

/// Every key an evaluation object carries, in prompt order.
pub const EVALUATION_KEYS: [&str; 5] = [
    Humor::KEY,
    Appropriateness::KEY,
    Relevance::KEY,
    Creativity::KEY,
    SUMMARY_KEY,
];

#[derive(Debug, Error)]
#[error("evaluation output is not a strict evaluation object: {source}")]
pub struct EvaluationParseError {
    /// The text exactly as received, kept for diagnosis.
    pub raw: String,
    #[source]
    pub source: serde_json::Error,
}

impl EvaluationResult {
    /// Parse model output as one strict JSON evaluation object.
    ///
    /// Surrounding whitespace is tolerated. Anything else around the object
    /// (prose, code fences, a second object), unknown keys, missing keys, and
    /// labels outside the scales all fail. There is no partial result.
    pub fn parse_strict(raw: &str) -> Result<Self, EvaluationParseError> {
        serde_json::from_str(raw.trim()).map_err(|source| EvaluationParseError {
            raw: raw.to_string(),
            source,
        })
    }
}
