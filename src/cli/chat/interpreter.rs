use std::sync::OnceLock;

use regex::Regex;

use crate::generation_client::GenerationRequest;

/// Slide count used when the prompt carries no "<N> slides" hint.
pub const DEFAULT_SLIDE_COUNT: u32 = 6;

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+").expect("valid url pattern"))
}

fn slide_count_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*slides?").expect("valid slide count pattern"))
}

/// Derives a `GenerationRequest` from one free-text prompt.
///
/// The first line becomes the topic, untrimmed. URLs are collected from
/// the whole input in order of appearance, duplicates included. The
/// slide count comes from the first "<N> slides" phrase, defaulting to
/// 6 and clamped to at least 1. Total over all inputs.
pub fn interpret(text: &str) -> GenerationRequest {
    let topic = text.split('\n').next().unwrap_or("").to_string();

    let urls = url_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    let slide_count = slide_count_pattern()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
        .map(|count| count.max(1))
        .unwrap_or(DEFAULT_SLIDE_COUNT);

    GenerationRequest {
        topic,
        urls,
        slide_count,
    }
}
