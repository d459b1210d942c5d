//! Plain-text rendering of session state.

use std::fmt::Display;

use jokesmith_core::error::CoreError;
use jokesmith_core::models::catalog::Choice;
use jokesmith_core::models::evaluation::{EvaluationResult, RatingScale};
use jokesmith_core::models::history::HistorySummary;
use jokesmith_core::models::message::Message;
use jokesmith_core::session::{Control, Session};

pub fn evaluation(result: &EvaluationResult) -> String {
    format!(
        "Humor:           {}\n\
         Appropriateness: {}\n\
         Relevance:       {}\n\
         Creativity:      {}\n\
         Summary:         {}",
        rating(result.humor),
        rating(result.appropriateness),
        rating(result.relevance),
        rating(result.creativity),
        result.summary,
    )
}

fn rating<R: RatingScale + Display>(r: R) -> String {
    format!("{r} ({}/{})", r.score(), R::max_score())
}

pub fn summary(summary: &HistorySummary) -> String {
    if summary.count == 0 {
        return "No jokes evaluated yet.".to_string();
    }

    let mut out = format!("Jokes evaluated: {}\n", summary.count);
    for (name, mean) in [
        ("humor", summary.mean_humor),
        ("appropriateness", summary.mean_appropriateness),
        ("relevance", summary.mean_relevance),
        ("creativity", summary.mean_creativity),
    ] {
        if let Some(mean) = mean {
            out.push_str(&format!("Average {name}: {mean:.2}\n"));
        }
    }
    let topics = summary
        .jokes_per_topic
        .iter()
        .map(|(topic, n)| format!("{topic} ({n})"))
        .collect::<Vec<_>>()
        .join(", ");
    out.push_str(&format!("Topics: {topics}"));
    out
}

pub fn transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(Message::transcript_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn choices(heading: &str, choices: &[Choice]) -> String {
    let labels = choices.iter().map(Choice::label).collect::<Vec<_>>().join("  ");
    format!("{heading}: {labels}")
}

/// Why the form could not be turned into parameters.
pub fn parameter_error(error: &CoreError) -> String {
    match error {
        CoreError::MissingParameters => "set topic, tone and type first".to_string(),
        other => other.to_string(),
    }
}

/// Prompt text advertising the control the session currently offers.
pub fn prompt(session: &Session, form_complete: bool) -> &'static str {
    match session.control() {
        Control::Generate if form_complete => "[generate] > ",
        Control::Generate => "[set topic/tone/type] > ",
        Control::Evaluate => "[evaluate] > ",
        Control::Loading => "[working] > ",
    }
}
