//! # Lexicon Sentiment
//!
//! Rule-based polarity scoring for short forum texts.

use std::collections::{HashMap, HashSet};

/// Anything that turns a text into a polarity in `[-1.0, 1.0]`.
pub trait PolarityScorer {
    fn polarity(&self, text: &str) -> f64;
}

/// Negated words keep half their strength with the sign flipped.
const NEGATION_FACTOR: f64 = -0.5;

/// General-purpose polarity lexicon with negation and intensifier handling.
pub struct LexiconSentiment {
    /// Word to polarity mapping
    words: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
    /// Intensifier to multiplier mapping
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconSentiment {
    pub fn new() -> Self {
        let positive_words = [
            ("good", 0.7),
            ("great", 0.8),
            ("excellent", 1.0),
            ("amazing", 0.6),
            ("awesome", 1.0),
            ("best", 1.0),
            ("better", 0.5),
            ("happy", 0.8),
            ("glad", 0.5),
            ("love", 0.5),
            ("like", 0.2),
            ("nice", 0.6),
            ("fine", 0.4),
            ("fair", 0.7),
            ("positive", 0.2),
            ("optimistic", 0.5),
            ("hopeful", 0.5),
            ("excited", 0.4),
            ("exciting", 0.3),
            ("strong", 0.4),
            ("stable", 0.3),
            ("secure", 0.4),
            ("safe", 0.5),
            ("success", 0.5),
            ("successful", 0.8),
            ("win", 0.8),
            ("growth", 0.3),
            ("growing", 0.2),
            ("promotion", 0.4),
            ("promoted", 0.4),
            ("raise", 0.3),
            ("bonus", 0.4),
            ("generous", 0.4),
            ("helpful", 0.5),
            ("supportive", 0.5),
            ("interesting", 0.5),
            ("fun", 0.3),
            ("easy", 0.4),
            ("perfect", 1.0),
            ("wonderful", 1.0),
            ("fantastic", 0.4),
            ("impressive", 1.0),
            ("thanks", 0.2),
            ("thank", 0.2),
            ("lucky", 0.3),
            ("relief", 0.3),
            ("relieved", 0.3),
            ("congrats", 0.6),
            ("congratulations", 0.6),
        ];

        let negative_words = [
            ("bad", -0.7),
            ("worse", -0.4),
            ("worst", -1.0),
            ("terrible", -1.0),
            ("awful", -1.0),
            ("horrible", -1.0),
            ("poor", -0.4),
            ("sad", -0.5),
            ("unhappy", -0.6),
            ("angry", -0.5),
            ("upset", -0.4),
            ("hate", -0.8),
            ("wrong", -0.5),
            ("negative", -0.3),
            ("pessimistic", -0.5),
            ("worried", -0.4),
            ("worry", -0.4),
            ("scared", -0.5),
            ("afraid", -0.6),
            ("fear", -0.5),
            ("anxious", -0.3),
            ("stressful", -0.5),
            ("stressed", -0.5),
            ("uncertain", -0.4),
            ("unstable", -0.4),
            ("toxic", -0.6),
            ("weak", -0.4),
            ("fail", -0.5),
            ("failed", -0.5),
            ("failure", -0.6),
            ("loss", -0.4),
            ("lost", -0.3),
            ("lose", -0.4),
            ("cut", -0.3),
            ("cuts", -0.3),
            ("decline", -0.4),
            ("declining", -0.4),
            ("shrinking", -0.4),
            ("struggling", -0.5),
            ("miserable", -1.0),
            ("disappointed", -0.7),
            ("disappointing", -0.6),
            ("frustrated", -0.6),
            ("frustrating", -0.6),
            ("stupid", -0.8),
            ("crazy", -0.6),
            ("difficult", -0.5),
            ("hard", -0.3),
            ("problem", -0.4),
            ("crisis", -0.6),
            ("chaos", -0.6),
            ("brutal", -0.7),
            ("unfair", -0.6),
            ("dead", -0.2),
            ("sucks", -0.3),
        ];

        let words = positive_words
            .into_iter()
            .chain(negative_words)
            .collect::<HashMap<_, _>>();

        let negations = [
            "not", "no", "never", "neither", "nor", "none", "nothing", "nobody", "cannot",
            "cant", "dont", "doesnt", "didnt", "wont", "wouldnt", "isnt", "arent", "wasnt",
            "werent", "hardly", "barely",
        ]
        .into_iter()
        .collect();

        let intensifiers = [
            ("very", 1.3),
            ("really", 1.3),
            ("extremely", 1.5),
            ("incredibly", 1.5),
            ("super", 1.4),
            ("so", 1.2),
            ("totally", 1.3),
            ("highly", 1.3),
            ("absolutely", 1.5),
            ("slightly", 0.5),
            ("somewhat", 0.7),
            ("kinda", 0.7),
        ]
        .into_iter()
        .collect();

        Self {
            words,
            negations,
            intensifiers,
        }
    }

    pub fn word_score(&self, word: &str) -> Option<f64> {
        self.words.get(word).copied()
    }

    /// Expects tokens with apostrophes already stripped ("isn't" arrives as "isnt").
    fn is_negation(&self, token: &str) -> bool {
        self.negations.contains(token)
    }
}

/// Lowercased word tokens with apostrophes removed, so "don't" becomes "dont".
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’'))
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .chars()
                .filter(|c| *c != '\'' && *c != '’')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|token| !token.is_empty())
}

impl PolarityScorer for LexiconSentiment {
    /// Mean polarity of the sentiment-bearing words, clamped to `[-1, 1]`.
    /// Text without any such word is neutral.
    fn polarity(&self, text: &str) -> f64 {
        let mut scores: Vec<f64> = Vec::new();
        let mut negate_next = false;
        let mut intensifier: f64 = 1.0;

        for token in tokenize(text) {
            if self.is_negation(&token) {
                negate_next = true;
                continue;
            }

            if let Some(multiplier) = self.intensifiers.get(token.as_str()) {
                intensifier *= multiplier;
                continue;
            }

            match self.word_score(&token) {
                Some(mut score) => {
                    score = (score * intensifier).clamp(-1.0, 1.0);
                    if negate_next {
                        score *= NEGATION_FACTOR;
                    }
                    scores.push(score);
                    negate_next = false;
                    intensifier = 1.0;
                }
                None => {
                    intensifier = 1.0;
                }
            }
        }

        if scores.is_empty() {
            return 0.0;
        }
        (scores.iter().sum::<f64>() / scores.len() as f64).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_neutral() {
        let scorer = LexiconSentiment::new();
        assert_eq!(scorer.polarity(""), 0.0);
        assert_eq!(scorer.polarity("   \n\t"), 0.0);
        assert_eq!(scorer.polarity("the quarterly meeting is on tuesday"), 0.0);
    }

    #[test]
    fn test_positive_and_negative() {
        let scorer = LexiconSentiment::new();
        assert!(scorer.polarity("Great team and a generous bonus") > 0.0);
        assert!(scorer.polarity("Terrible news, everyone is worried") < 0.0);
    }

    #[test]
    fn test_negation_flips_and_weakens() {
        let scorer = LexiconSentiment::new();
        let plain = scorer.polarity("the outlook is good");
        let negated = scorer.polarity("the outlook is not good");
        let contracted = scorer.polarity("the outlook isn't good");
        assert!(plain > 0.0);
        assert!(negated < 0.0);
        assert!(negated.abs() < plain.abs());
        assert_eq!(negated, contracted);
    }

    #[test]
    fn test_intensifier_strengthens() {
        let scorer = LexiconSentiment::new();
        let normal = scorer.polarity("management is bad");
        let intensified = scorer.polarity("management is really bad");
        assert!(intensified < normal);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let scorer = LexiconSentiment::new();
        let texts = [
            "absolutely extremely incredibly perfect excellent best",
            "extremely really totally worst terrible awful horrible",
            "not not not bad",
            "LAYOFFS!!! worst. week. ever.",
            "¿Qué? 😀 good",
        ];
        for text in texts {
            let score = scorer.polarity(text);
            assert!((-1.0..=1.0).contains(&score), "{text}: {score}");
        }
    }

    #[test]
    fn test_tokenize_strips_apostrophes_and_case() {
        let tokens: Vec<String> = tokenize("Don't PANIC, it's fine").collect();
        assert_eq!(tokens, vec!["dont", "panic", "its", "fine"]);
    }
}
