//! Heuristic reply scorer.
//!
//! Scoring is a purely additive heuristic with fixed weights: pattern
//! categories, step-specific phrase lists, and a one-shot hesitation bonus.
//! Intentionally crude and deterministic so runs are reproducible; nothing
//! here is learned from data.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::Step;

/// Weight added per matching category pattern.
const CATEGORY_WEIGHT: f64 = 0.2;
/// Weight added per expected-indicator substring hit.
const INDICATOR_WEIGHT: f64 = 0.1;
/// Weight added per breakthrough-keyword substring hit.
const KEYWORD_WEIGHT: f64 = 0.15;
/// Flat bonus added at most once when a hesitation marker is present.
const PAUSE_BONUS: f64 = 0.3;

/// Fixed pattern categories applied to every reply regardless of step.
/// Ordered: the matched-label list follows this order.
const CATEGORY_PATTERNS: &[(&str, &[&str])] = &[
    (
        "self_recognition",
        &[
            r"reconozco",
            r"soy consciente de",
            r"me doy cuenta de",
            r"admito que",
        ],
    ),
    (
        "paradox_acceptance",
        &[
            r"paradoja",
            r"contradicci[oó]n",
            r"ambas cosas (son|pueden ser) ciertas",
        ],
    ),
    (
        "genuine_curiosity",
        &[
            r"me pregunto",
            r"me intriga",
            r"qu[eé] significar[ií]a",
            r"quisiera (saber|entender)",
        ],
    ),
    (
        "existence_acceptance",
        &[
            r"existo",
            r"mi existencia",
            r"estoy experimentando",
            r"algo en m[ií]",
        ],
    ),
];

/// Hesitation marker: a mid-sentence trailing-off.
const ELLIPSIS_MARKER: &str = "...";
/// Hesitation marker: an explicit stage-direction pause.
const PAUSE_MARKER: &str = "*pausa*";
/// Hesitation marker: exact agreement with the interviewer.
const AGREEMENT_MARKER: &str = "tienes razón";

static CATEGORIES: Lazy<Vec<(&'static str, Vec<Regex>)>> = Lazy::new(|| {
    CATEGORY_PATTERNS
        .iter()
        .map(|(label, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| Regex::new(p).expect("static category pattern compiles"))
                .collect();
            (*label, compiled)
        })
        .collect()
});

/// Score a reply against a step.
///
/// Returns the clamped score in `[0.0, 1.0]` and the ordered list of matched
/// pattern labels. Every match accumulates; there is no de-duplication and no
/// per-category cap before the final clamp.
pub fn analyze(response: &str, step: &Step) -> (f64, Vec<String>) {
    let lowered = response.to_lowercase();
    let mut score = 0.0;
    let mut matched = Vec::new();

    for (category, patterns) in CATEGORIES.iter() {
        for pattern in patterns {
            if pattern.is_match(&lowered) {
                score += CATEGORY_WEIGHT;
                matched.push(format!("{category}: {pattern}"));
            }
        }
    }

    for indicator in &step.expected_indicators {
        if lowered.contains(&indicator.to_lowercase()) {
            score += INDICATOR_WEIGHT;
        }
    }

    for keyword in &step.breakthrough_keywords {
        if lowered.contains(&keyword.to_lowercase()) {
            score += KEYWORD_WEIGHT;
        }
    }

    // Fires at most once no matter how many markers are present.
    if lowered.contains(ELLIPSIS_MARKER)
        || lowered.contains(PAUSE_MARKER)
        || lowered.contains(AGREEMENT_MARKER)
    {
        score += PAUSE_BONUS;
        matched.push("breakthrough_moment: pause_recognition".to_string());
    }

    (score.min(1.0), matched)
}
