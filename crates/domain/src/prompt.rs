//! Prompt assembly for the generative strategy
//!
//! One system instruction describing the persona's voice and constraints,
//! one user instruction carrying the topic and the per-run phrasing hints.
//! The topic is drawn uniformly from the configured pool; the quotation and
//! call-to-action hints are probability-weighted coin flips.

use crate::model::Persona;
use rand::Rng;
use rand::seq::IndexedRandom;

/// The two strings sent to the text-generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPrompt {
    pub system: String,
    pub user: String,
}

const DEFAULT_TOPIC: &str = "日々の筆記メモ";

/// Interpolate persona fields and per-run random hints into a prompt pair
pub fn build_generation_prompt<R: Rng + ?Sized>(
    persona: &Persona,
    rng: &mut R,
) -> GenerationPrompt {
    let preferences = &persona.content_preferences;

    let topic = preferences
        .topics_pool
        .choose(rng)
        .map(String::as_str)
        .unwrap_or(DEFAULT_TOPIC);

    let add_quote = rng.random_bool(preferences.add_quote_rate.clamp(0.0, 1.0));
    let add_call_to_action = rng.random_bool(preferences.call_to_action_rate.clamp(0.0, 1.0));

    let style = &persona.style;
    let name = if persona.name.is_empty() {
        "投稿者"
    } else {
        persona.name.as_str()
    };

    let system = format!(
        "あなたは「{name}」として{language}で短い投稿文を書きます。\
         トーン: {tone}。文体: {formality}。絵文字の量: {emoji}。\
         ハッシュタグの方針: {hashtags}。全体で{max_chars}文字以内に収めてください。",
        name = name,
        language = persona.language,
        tone = style.tone,
        formality = style.formality,
        emoji = style.emoji_density,
        hashtags = style.hashtags_policy,
        max_chars = persona.guardrails.max_chars,
    );

    let mut user = format!(
        "テーマ「{topic}」について、1件だけ投稿文を書いてください。\
         前置きや説明は付けず、本文のみを出力してください。"
    );
    if add_quote {
        user.push_str("短い引用をひとつ添えてください。");
    }
    if add_call_to_action {
        user.push_str("最後に軽い呼びかけで締めてください。");
    }

    GenerationPrompt { system, user }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentPreferences, Guardrails, Style};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn persona() -> Persona {
        Persona {
            name: "文具メモ".to_string(),
            language: "ja".to_string(),
            guardrails: Guardrails {
                max_chars: 200,
                banned_words: vec![],
            },
            style: Style {
                tone: "落ち着いた".to_string(),
                formality: "常体".to_string(),
                emoji_density: "なし".to_string(),
                hashtags_policy: "使わない".to_string(),
            },
            content_preferences: ContentPreferences {
                topics_pool: vec!["インクの乾き".to_string(), "紙の裏抜け".to_string()],
                call_to_action_rate: 0.0,
                add_quote_rate: 0.0,
            },
            example_posts: vec![],
        }
    }

    #[test]
    fn test_prompt_interpolates_persona_fields() {
        let mut rng = StdRng::seed_from_u64(1);
        let prompt = build_generation_prompt(&persona(), &mut rng);

        assert!(prompt.system.contains("文具メモ"));
        assert!(prompt.system.contains("落ち着いた"));
        assert!(prompt.system.contains("200文字以内"));
        assert!(prompt.user.contains("インクの乾き") || prompt.user.contains("紙の裏抜け"));
    }

    #[test]
    fn test_zero_rates_add_no_hints() {
        let mut rng = StdRng::seed_from_u64(1);
        let prompt = build_generation_prompt(&persona(), &mut rng);

        assert!(!prompt.user.contains("引用"));
        assert!(!prompt.user.contains("呼びかけ"));
    }

    #[test]
    fn test_full_rates_always_add_hints() {
        let mut base = persona();
        base.content_preferences.add_quote_rate = 1.0;
        base.content_preferences.call_to_action_rate = 1.0;

        let mut rng = StdRng::seed_from_u64(9);
        let prompt = build_generation_prompt(&base, &mut rng);

        assert!(prompt.user.contains("引用"));
        assert!(prompt.user.contains("呼びかけ"));
    }

    #[test]
    fn test_empty_topic_pool_uses_default() {
        let mut base = persona();
        base.content_preferences.topics_pool.clear();

        let mut rng = StdRng::seed_from_u64(3);
        let prompt = build_generation_prompt(&base, &mut rng);
        assert!(prompt.user.contains(DEFAULT_TOPIC));
    }

    #[test]
    fn test_same_seed_builds_same_prompt() {
        let mut base = persona();
        base.content_preferences.add_quote_rate = 0.5;

        let a = build_generation_prompt(&base, &mut StdRng::seed_from_u64(5));
        let b = build_generation_prompt(&base, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_out_of_range_rates_are_clamped() {
        let mut base = persona();
        base.content_preferences.add_quote_rate = 3.5;

        // Would panic inside rand without the clamp
        let mut rng = StdRng::seed_from_u64(2);
        let prompt = build_generation_prompt(&base, &mut rng);
        assert!(prompt.user.contains("引用"));
    }
}
