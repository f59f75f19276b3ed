//! Keyword-based transcript summary
//!
//! Pure and deterministic: the same text always yields the same summary.

use mmind_common::db::SummaryContent;
use std::collections::HashMap;

/// Speaking rate used for the duration estimate
const WORDS_PER_MINUTE: usize = 150;

/// Sentences kept in the synopsis
const SYNOPSIS_SENTENCES: usize = 3;

/// Key topics returned
const MAX_KEY_TOPICS: usize = 5;

/// Tokens of this length or shorter are never topics
const MAX_EXCLUDED_TOPIC_LEN: usize = 4;

const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

const TODO_ITEMS: &[&str] = &[
    "Review meeting recording",
    "Follow up on action items",
    "Share summary with team",
];

/// Derive synopsis, highlights, todo list and key topics from transcript text
pub fn derive_summary(text: &str) -> SummaryContent {
    let words = word_count(text);

    SummaryContent {
        text: synopsis(text),
        highlights: vec![
            format!(
                "Meeting duration: {} minutes (estimated)",
                estimated_minutes(words)
            ),
            format!("Total words spoken: {}", words),
            "Key discussion points identified".to_string(),
        ],
        todo: TODO_ITEMS.iter().map(|s| s.to_string()).collect(),
        key_topics: extract_key_topics(text),
    }
}

/// Number of whitespace-separated tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// `ceil(words / 150)`; zero words estimate zero minutes
pub fn estimated_minutes(words: usize) -> usize {
    words.div_ceil(WORDS_PER_MINUTE)
}

/// First three non-blank sentences joined with ". " plus a trailing period
pub fn synopsis(text: &str) -> String {
    let sentences: Vec<&str> = text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(SYNOPSIS_SENTENCES)
        .collect();

    format!("{}.", sentences.join(". "))
}

/// Up to five most frequent non-stop-word tokens longer than four characters
///
/// Ties keep the order in which tokens were first seen.
pub fn extract_key_topics(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for token in lowered.split(|c: char| !is_word_char(c)) {
        if token.chars().count() <= MAX_EXCLUDED_TOPIC_LEN || STOP_WORDS.contains(&token) {
            continue;
        }
        match index.get(token) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(token, counts.len());
                counts.push((token, 1));
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(MAX_KEY_TOPICS)
        .map(|(word, _)| word.to_string())
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
