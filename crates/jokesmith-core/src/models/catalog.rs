//! The preset choices offered by the parameter form.
//!
//! Free text is still accepted everywhere; these lists only drive menus and
//! hints.

/// A selectable preset with the emoji shown next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub emoji: &'static str,
    pub value: &'static str,
}

const fn choice(emoji: &'static str, value: &'static str) -> Choice {
    Choice { emoji, value }
}

pub const TOPICS: &[Choice] = &[
    choice("💼", "Work"),
    choice("🐶", "Animals"),
    choice("🍔", "Food"),
    choice("📺", "Television"),
];

pub const TONES: &[Choice] = &[
    choice("😏", "Witty"),
    choice("😂", "Goofy"),
    choice("🌑", "Dark"),
    choice("😊", "Silly"),
];

pub const TYPES: &[Choice] = &[
    choice("🧩", "Pun"),
    choice("🚪", "Knock-knock"),
    choice("📖", "Story"),
];

impl Choice {
    pub fn label(&self) -> String {
        format!("{} {}", self.emoji, self.value)
    }
}

/// Case-insensitive lookup of a preset by value.
pub fn find<'a>(choices: &'a [Choice], value: &str) -> Option<&'a Choice> {
    choices.iter().find(|c| c.value.eq_ignore_ascii_case(value.trim()))
}
