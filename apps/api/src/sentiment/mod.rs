//! Sentiment scoring with a keyword and emoji lexicon heuristic applied to each new post.
//!
//! The word sets and emoji table live in `lexicon.json` so they can grow without
//! touching the counting rule. Scoring never fails: if the lexicon cannot be
//! loaded every post is scored `neutral`.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::error;

use crate::models::post::Sentiment;

const LEXICON_JSON: &str = include_str!("lexicon.json");

/// Unicode variation selectors that may trail an emoji glyph (e.g. `❤️`).
const VARIATION_SELECTORS: [char; 2] = ['\u{FE0E}', '\u{FE0F}'];

#[derive(Debug, Deserialize)]
struct LexiconFile {
    positive_words: Vec<String>,
    negative_words: Vec<String>,
    emoji: HashMap<String, i8>,
}

/// Parsed sentiment lexicon.
#[derive(Debug, Clone)]
pub struct Lexicon {
    positive: HashSet<String>,
    negative: HashSet<String>,
    emoji: HashMap<char, i8>,
}

impl Lexicon {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: LexiconFile = serde_json::from_str(json)?;

        let emoji = file
            .emoji
            .into_iter()
            .filter(|(_, sign)| *sign != 0)
            .filter_map(|(glyph, sign)| {
                glyph
                    .chars()
                    .find(|c| !VARIATION_SELECTORS.contains(c))
                    .map(|c| (c, sign.signum()))
            })
            .collect();

        Ok(Self {
            positive: file.positive_words.iter().map(|w| w.to_lowercase()).collect(),
            negative: file.negative_words.iter().map(|w| w.to_lowercase()).collect(),
            emoji,
        })
    }

    /// Counts positive and negative hits: whitespace tokens of the lower-cased
    /// text against the word sets, plus every emoji char in the raw text.
    pub fn counts(&self, text: &str) -> (usize, usize) {
        let lowered = text.to_lowercase();
        let mut pos = 0;
        let mut neg = 0;

        for token in lowered.split_whitespace() {
            if self.positive.contains(token) {
                pos += 1;
            }
            if self.negative.contains(token) {
                neg += 1;
            }
        }

        for c in text.chars() {
            match self.emoji.get(&c) {
                Some(sign) if *sign > 0 => pos += 1,
                Some(_) => neg += 1,
                None => {}
            }
        }

        (pos, neg)
    }

    pub fn score(&self, text: &str) -> Sentiment {
        let (pos, neg) = self.counts(text);
        if pos > neg {
            Sentiment::Positive
        } else if neg > pos {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

fn bundled_lexicon() -> Option<&'static Lexicon> {
    static LEXICON: OnceLock<Option<Lexicon>> = OnceLock::new();
    LEXICON
        .get_or_init(|| match Lexicon::from_json(LEXICON_JSON) {
            Ok(lexicon) => Some(lexicon),
            Err(e) => {
                error!("Failed to load sentiment lexicon, all posts will score neutral: {e}");
                None
            }
        })
        .as_ref()
}

/// Scores a post's text with the bundled lexicon.
pub fn score(text: &str) -> Sentiment {
    bundled_lexicon()
        .map(|lexicon| lexicon.score(text))
        .unwrap_or(Sentiment::Neutral)
}
