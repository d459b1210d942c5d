use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "jokesmith",
    version,
    about = "Generate and rate jokes through a jokesmith gateway"
)]
pub struct Cli {
    /// Gateway base URL
    #[arg(short = 's', long = "server", default_value = "http://127.0.0.1:3000")]
    pub server: String,

    /// Joke topic (e.g. Work, Animals, Food, Television)
    #[arg(long = "topic")]
    pub topic: Option<String>,

    /// Joke tone (e.g. Witty, Goofy, Dark, Silly)
    #[arg(long = "tone")]
    pub tone: Option<String>,

    /// Joke type (e.g. Pun, Knock-knock, Story)
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// Creativity level between 0 and 1
    #[arg(short = 't', long = "temperature", default_value_t = 0.7)]
    pub temperature: f32,

    /// Generate one joke, evaluate it, and exit
    #[arg(long = "once")]
    pub once: bool,
}
