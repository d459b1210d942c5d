//! Prompt construction for the generation and evaluation paths.

use crate::models::evaluation::{
    Appropriateness, Creativity, EVALUATION_KEYS, Humor, RatingScale, Relevance,
};
use crate::models::parameters::JokeParameters;

const GENERATION_SYSTEM_PROMPT: &str = "\
You are a witty comedian with expertise in multiple styles of humor. \
You create jokes based on the given parameters.
Guidelines:
- Adapt your style based on the requested tone and type
- Consider cultural sensitivity
- Maintain coherence between topic and punchline
- Use creative wordplay when appropriate
- Keep jokes concise and well-structured";

const EVALUATION_ANALYST_PROMPT: &str = "\
You are an expert humor analyst with deep understanding of comedy theory.
Evaluate jokes using these criteria:
- humor: timing, surprise factor, and cleverness
- appropriateness: cultural sensitivity and audience suitability
- relevance: how well it matches the requested topic or theme
- creativity: originality and innovative approach";

/// A system instruction and the user turn that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// The one-sentence joke request sent as the user turn.
pub fn generation_instruction(params: &JokeParameters) -> String {
    format!(
        "Generate a {} joke on {} in a {} tone with a creativity level of {}",
        params.kind, params.topic, params.tone, params.temperature
    )
}

pub fn generation_system_prompt() -> &'static str {
    GENERATION_SYSTEM_PROMPT
}

pub fn generation_prompt(params: &JokeParameters) -> PromptPair {
    PromptPair {
        system: GENERATION_SYSTEM_PROMPT.to_string(),
        user: generation_instruction(params),
    }
}

/// Build the evaluation prompt for a finished joke.
///
/// The system instruction allows exactly the keys in [`EVALUATION_KEYS`] and,
/// for each rating key, exactly the labels of its scale. `context` carries the
/// parameters the joke was requested with so relevance can be judged.
pub fn evaluation_prompt(joke: &str, context: Option<&JokeParameters>) -> PromptPair {
    let mut system = String::from(EVALUATION_ANALYST_PROMPT);
    system.push_str("\n\nRespond with ONLY a JSON object with exactly these keys: ");
    system.push_str(
        &EVALUATION_KEYS
            .iter()
            .map(|k| format!("\"{k}\""))
            .collect::<Vec<_>>()
            .join(", "),
    );
    system.push_str(".\nEach rating key must use one of these exact values:\n");
    system.push_str(&scale_line::<Humor>());
    system.push_str(&scale_line::<Appropriateness>());
    system.push_str(&scale_line::<Relevance>());
    system.push_str(&scale_line::<Creativity>());
    system.push_str(
        "\"summary\" is one or two sentences explaining the ratings.\n\
         Do not include any other text, markdown, or code fences. \
         Do not repeat the joke in your response.",
    );

    let mut user = String::from("Evaluate this joke:\n\n");
    user.push_str(joke.trim());
    if let Some(p) = context {
        user.push_str(&format!(
            "\n\nRequested topic: {}. Requested tone: {}. Requested type: {}.",
            p.topic, p.tone, p.kind
        ));
    }

    PromptPair { system, user }
}

fn scale_line<R: RatingScale>() -> String {
    let labels = R::ALL
        .iter()
        .map(|r| format!("\"{}\"", r.label()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("- \"{}\": [{labels}]\n", R::KEY)
}
