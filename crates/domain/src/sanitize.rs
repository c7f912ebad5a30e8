//! Guardrail enforcement on candidate texts
//!
//! Sanitization is best-effort text surgery, not a hard contract: banned-word
//! removal is naive substring deletion and can fragment surrounding text.
//! The function always returns a string, possibly empty, and never errors.

use crate::model::Guardrails;
use regex::Regex;

/// How over-length text is cut down to the character cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    /// Cut at the cap, possibly mid-word (template strategy)
    Hard,
    /// Cut one character early and append an ellipsis (generative strategy)
    Ellipsis,
}

/// Sanitizer configured from persona guardrails
#[derive(Debug)]
pub struct Sanitizer {
    banned_words: Vec<String>,
    max_chars: usize,
    strip_decorations: bool,
    truncation: Truncation,
    hashtag_pattern: Regex,
}

impl Sanitizer {
    pub fn new(
        guardrails: &Guardrails,
        strip_decorations: bool,
        truncation: Truncation,
    ) -> Self {
        // Hashtag tokens: a run of '#' followed by word characters including
        // hiragana, katakana, Han, and the long vowel mark.
        let hashtag_pattern = Regex::new(r"#+[0-9A-Za-z_ぁ-んァ-ヶ一-龠ー]+").expect("Valid regex");

        Self {
            banned_words: guardrails.banned_words.clone(),
            max_chars: guardrails.max_chars,
            strip_decorations,
            truncation,
            hashtag_pattern,
        }
    }

    /// Sanitizer for the template strategy: strips hashtags and emoji, hard
    /// truncation at the cap.
    pub fn template(guardrails: &Guardrails) -> Self {
        Self::new(guardrails, true, Truncation::Hard)
    }

    /// Sanitizer for the generative strategy: keeps decorations (the prompt
    /// governs them), reserves one trailing character for an ellipsis.
    pub fn generative(guardrails: &Guardrails) -> Self {
        Self::new(guardrails, false, Truncation::Ellipsis)
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Apply the guardrails in order: decorations, banned words, trim,
    /// length cap. Infallible; the result may be empty.
    pub fn sanitize(&self, text: &str) -> String {
        let mut text = if self.strip_decorations {
            let without_hashtags = self.hashtag_pattern.replace_all(text, "");
            without_hashtags
                .chars()
                .filter(|c| !is_emoji(*c))
                .collect::<String>()
        } else {
            text.to_string()
        };

        for word in &self.banned_words {
            if !word.is_empty() {
                text = text.replace(word.as_str(), "");
            }
        }

        let text = text.trim();
        truncate_chars(text, self.max_chars, self.truncation)
    }
}

fn is_emoji(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c)
}

/// Truncate to at most `max_chars` Unicode scalars.
pub fn truncate_chars(text: &str, max_chars: usize, truncation: Truncation) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    match truncation {
        Truncation::Hard => text.chars().take(max_chars).collect(),
        Truncation::Ellipsis => {
            let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
            cut.push('…');
            cut
        }
    }
}
