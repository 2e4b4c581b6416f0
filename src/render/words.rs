//! Word frequencies → word cloud tokens

use crate::api::WordCount;
use serde::{Deserialize, Serialize};

/// Smallest and largest font size in pixels
pub const FONT_RANGE: (f64, f64) = (10.0, 60.0);

/// Linear map from a value domain onto an output range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Scale a value; a zero-width domain maps everything to the range midpoint
    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordToken {
    pub text: String,
    pub value: u64,
    /// Font size in pixels
    pub font_size: f64,
}

/// Size each word by its count relative to the current word set
pub fn word_cloud(words: &[WordCount]) -> Vec<WordToken> {
    let min = words.iter().map(|w| w.count).min().unwrap_or(0) as f64;
    let max = words.iter().map(|w| w.count).max().unwrap_or(0) as f64;
    let scale = LinearScale::new((min, max), FONT_RANGE);

    words
        .iter()
        .map(|w| WordToken {
            text: w.keyword.clone(),
            value: w.count,
            font_size: scale.scale(w.count as f64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(keyword: &str, count: u64) -> WordCount {
        WordCount {
            keyword: keyword.to_string(),
            count,
        }
    }

    #[test]
    fn test_font_sizes_span_range() {
        let tokens = word_cloud(&[word("storm", 100), word("rain", 10), word("wind", 55)]);

        assert_eq!(tokens[0].font_size, 60.0);
        assert_eq!(tokens[1].font_size, 10.0);
        assert_eq!(tokens[2].font_size, 35.0);
    }

    #[test]
    fn test_single_count_uses_midpoint() {
        let tokens = word_cloud(&[word("storm", 4), word("rain", 4)]);
        assert!(tokens.iter().all(|t| t.font_size == 35.0));
    }

    #[test]
    fn test_empty_word_set() {
        assert!(word_cloud(&[]).is_empty());
    }
}
