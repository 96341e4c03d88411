//! OCR-error correction, whitespace normalization, and text quality
//! scoring. Runs before every other stage; never fails, even on empty
//! input.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::patterns::LEGAL_VOCABULARY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionKind {
    OcrCharacter,
    OcrWord,
    Whitespace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub original: String,
    pub corrected: String,
    pub kind: CorrectionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessResult {
    pub text: String,
    pub corrections: Vec<Correction>,
    /// 0–100.
    pub quality_score: f64,
    pub warnings: Vec<String>,
}

lazy_static! {
    // A number-ish token: starts with a digit (optionally $-prefixed) and
    // continues through digits, confusable letters, and separators.
    // Confusions are rewritten inside these tokens only, so words like
    // "too" or "return" are never touched, and the rewrite is a no-op on
    // already-clean text.
    static ref NUMBER_TOKEN: Regex = Regex::new(r"\$?\d[\dOoIl,.]*").unwrap();
    static ref LEADING_L: Regex = Regex::new(r"\b[lI](\d)").unwrap();

    static ref TAB_RUNS: Regex = Regex::new(r"[ \t]{2,}").unwrap();
    static ref BLANK_RUNS: Regex = Regex::new(r"\n{3,}").unwrap();
    static ref TRAILING_WS: Regex = Regex::new(r"[ \t]+\n").unwrap();

    // Signs of truncated OCR output: a dangling decimal point or a
    // month name cut off before its day.
    static ref DANGLING_DECIMAL: Regex = Regex::new(r"\$\d+\.(?:\s|$)").unwrap();
}

/// Whole-word OCR confusions (rn↔m and friends) seen in scanned legal
/// documents. Lowercase forms; matching is done case-insensitively on
/// word boundaries.
const WORD_CORRECTIONS: &[(&str, &str)] = &[
    ("rnonth", "month"),
    ("rnonths", "months"),
    ("rnonthly", "monthly"),
    ("payrnent", "payment"),
    ("agreernent", "agreement"),
    ("docurnent", "document"),
    ("prernises", "premises"),
    ("notlce", "notice"),
    ("evictlon", "eviction"),
    ("tennant", "tenant"),
    ("landiord", "landlord"),
    ("staternent", "statement"),
];

/// Clean the raw text and score its quality. Empty input yields score 0
/// and a warning, never an error.
pub fn preprocess(raw: &str) -> PreprocessResult {
    if raw.trim().is_empty() {
        return PreprocessResult {
            text: String::new(),
            corrections: Vec::new(),
            quality_score: 0.0,
            warnings: vec!["document text is empty or whitespace-only".to_string()],
        };
    }

    let mut corrections = Vec::new();
    let mut text = raw.replace("\r\n", "\n").replace('\r', "\n");
    if text != raw {
        corrections.push(Correction {
            original: "\\r\\n".to_string(),
            corrected: "\\n".to_string(),
            kind: CorrectionKind::Whitespace,
        });
    }

    text = fix_digit_confusions(&text, &mut corrections);
    text = fix_word_confusions(&text, &mut corrections);
    text = normalize_whitespace(&text, &mut corrections);

    let mut warnings = Vec::new();
    let quality_score = score_quality(&text, &corrections, &mut warnings);

    PreprocessResult {
        text,
        corrections,
        quality_score,
        warnings,
    }
}

fn fix_digit_confusions(text: &str, corrections: &mut Vec<Correction>) -> String {
    let mut rewrites: Vec<(String, String)> = Vec::new();
    let rewritten = NUMBER_TOKEN.replace_all(text, |caps: &regex::Captures| {
        let token = &caps[0];
        let fixed: String = token
            .chars()
            .map(|c| match c {
                'O' | 'o' => '0',
                'l' | 'I' => '1',
                other => other,
            })
            .collect();
        if fixed != token {
            rewrites.push((token.to_string(), fixed.clone()));
        }
        fixed
    });
    let mut current = rewritten.into_owned();
    for (original, corrected) in rewrites {
        corrections.push(Correction {
            original,
            corrected,
            kind: CorrectionKind::OcrCharacter,
        });
    }
    // Tokens that *start* with a confused letter ("l4 days") fall outside
    // the number-token scan and get their own pass.
    let next = LEADING_L.replace_all(&current, "1$1").into_owned();
    if next != current {
        corrections.push(Correction {
            original: "l-before-digit".to_string(),
            corrected: "1".to_string(),
            kind: CorrectionKind::OcrCharacter,
        });
        current = next;
    }
    current
}

fn fix_word_confusions(text: &str, corrections: &mut Vec<Correction>) -> String {
    let mut current = text.to_string();
    for (wrong, right) in WORD_CORRECTIONS {
        // \b works here because both sides are plain ASCII words.
        let pattern = format!(r"(?i)\b{}\b", wrong);
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(_) => continue,
        };
        if re.is_match(&current) {
            current = re.replace_all(&current, *right).into_owned();
            corrections.push(Correction {
                original: (*wrong).to_string(),
                corrected: (*right).to_string(),
                kind: CorrectionKind::OcrWord,
            });
        }
    }
    current
}

fn normalize_whitespace(text: &str, corrections: &mut Vec<Correction>) -> String {
    let mut current = TRAILING_WS.replace_all(text, "\n").into_owned();
    current = TAB_RUNS.replace_all(&current, " ").into_owned();
    current = BLANK_RUNS.replace_all(&current, "\n\n").into_owned();
    let trimmed = current.trim().to_string();
    if trimmed != text {
        corrections.push(Correction {
            original: "whitespace".to_string(),
            corrected: "normalized".to_string(),
            kind: CorrectionKind::Whitespace,
        });
    }
    trimmed
}

fn score_quality(text: &str, corrections: &[Correction], warnings: &mut Vec<String>) -> f64 {
    let mut score: f64 = 50.0;
    let lower = text.to_lowercase();

    // Legal vocabulary survives OCR poorly, so its presence is a strong
    // positive signal.
    let vocab_hits = LEGAL_VOCABULARY
        .iter()
        .filter(|kw| lower.contains(*kw))
        .count();
    score += (vocab_hits as f64 * 2.5).min(30.0);

    let total_chars = text.chars().count().max(1);
    let non_ascii = text.chars().filter(|c| !c.is_ascii()).count();
    if non_ascii as f64 / total_chars as f64 > 0.02 {
        score -= 15.0;
        warnings.push("unusually high non-ASCII character ratio".to_string());
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if !words.is_empty() {
        let avg_len =
            words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64;
        if !(3.0..=12.0).contains(&avg_len) {
            score -= 10.0;
            warnings.push("abnormal average word length".to_string());
        }
    }

    let dangling = DANGLING_DECIMAL.find_iter(text).count();
    if dangling > 0 {
        score -= (dangling as f64 * 5.0).min(15.0);
        warnings.push("incomplete-looking dollar amounts".to_string());
    }

    let ocr_fixes = corrections
        .iter()
        .filter(|c| c.kind != CorrectionKind::Whitespace)
        .count();
    score -= (ocr_fixes as f64 * 2.0).min(20.0);

    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_input_scores_zero_with_warning() {
        let result = preprocess("   \n\t ");
        assert_eq!(result.quality_score, 0.0);
        assert_eq!(result.text, "");
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn digit_context_confusions_are_fixed() {
        let result = preprocess("Pay $1,2OO.00 within l4 days of 2O24.");
        assert!(result.text.contains("$1,200.00"), "{}", result.text);
        assert!(result.text.contains("14 days"));
        assert!(result.text.contains("2024"));
    }

    #[test]
    fn word_confusions_are_fixed_case_insensitively() {
        let result = preprocess("This NOTLCE concerns your rnonthly paymeNt and the prernises.");
        assert!(result.text.to_lowercase().contains("notice"));
        assert!(result.text.contains("monthly"));
        assert!(result.text.contains("premises"));
    }

    #[test]
    fn ordinary_words_are_left_alone() {
        // "return" contains "rn" but is not in the correction table.
        let result = preprocess("Please return the keys to the landlord.");
        assert!(result.text.contains("return"));
        assert!(result
            .corrections
            .iter()
            .all(|c| c.kind == CorrectionKind::Whitespace || c.original != "return"));
    }

    #[test]
    fn preprocessing_is_idempotent() {
        let first = preprocess("NOTLCE:  pay  $1,2OO within l4 days.\r\n\r\n\r\nSigned.");
        let second = preprocess(&first.text);
        assert_eq!(second.text, first.text);
        assert!(
            second.corrections.is_empty(),
            "re-running on clean text must not correct anything: {:?}",
            second.corrections
        );
    }

    #[test]
    fn legal_vocabulary_raises_quality() {
        let legal = preprocess("Notice of eviction: the tenant must vacate the premises.");
        let random = preprocess("zxq vbn mlk pqr stuv wxyz abcd efgh");
        assert!(legal.quality_score > random.quality_score);
    }

    #[test]
    fn crlf_becomes_lf() {
        let result = preprocess("line one\r\nline two\r\n");
        assert_eq!(result.text, "line one\nline two");
    }
}
