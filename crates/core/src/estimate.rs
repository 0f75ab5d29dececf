use serde::{Deserialize, Serialize};

use crate::ComplexityClass;

/// Default water cost per estimated token, in milliliters.
///
/// A rough figure for illustration, not a measured quantity; callers override
/// it through [`CostModel::PerToken`].
pub const WATER_PER_TOKEN_ML: f64 = 0.18;

/// Per-character rate used by the earliest tracker builds.
pub const LEGACY_WATER_PER_CHAR_ML: f64 = 0.0001;

pub const CHARS_PER_TOKEN: usize = 4;

/// Ordered classification rules; the first rule with a matching needle wins.
/// Lowercased needles are matched against the lowercased text, raw needles
/// against the text as given.
struct ComplexityRule {
    class: ComplexityClass,
    keywords: &'static [&'static str],
    raw_patterns: &'static [&'static str],
}

const COMPLEXITY_RULES: &[ComplexityRule] = &[
    ComplexityRule {
        class: ComplexityClass::Code,
        keywords: &["function", "code", "programming", "script"],
        raw_patterns: &["{}", "()"],
    },
    ComplexityRule {
        class: ComplexityClass::Creative,
        keywords: &["write a story", "poem", "creative", "imagine"],
        raw_patterns: &[],
    },
    ComplexityRule {
        class: ComplexityClass::Analysis,
        keywords: &["analyze", "explain", "compare", "research"],
        raw_patterns: &[],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostModel {
    PerToken { ml_per_token: f64 },
    PerCharacter { ml_per_char: f64 },
}

impl Default for CostModel {
    fn default() -> Self {
        Self::PerToken {
            ml_per_token: WATER_PER_TOKEN_ML,
        }
    }
}

impl CostModel {
    pub fn base_cost(&self, chars: usize) -> f64 {
        match *self {
            Self::PerToken { ml_per_token } => estimate_tokens(chars) as f64 * ml_per_token,
            Self::PerCharacter { ml_per_char } => chars as f64 * ml_per_char,
        }
    }
}

/// Which text a turn's cost is computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateMode {
    /// Prompt text only.
    SingleText,
    /// Prompt and response text together.
    #[default]
    PairedTurn,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub water_usage_ml: f64,
    pub complexity: ComplexityClass,
    pub tokens: u64,
    pub char_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Estimator {
    model: CostModel,
}

impl Estimator {
    pub fn new(model: CostModel) -> Self {
        Self { model }
    }

    pub fn estimate(&self, text: &str) -> Estimate {
        self.estimate_parts(text, char_count(text))
    }

    /// Estimates one turn. The complexity class always comes from the
    /// prompt; `mode` decides whether response characters are billed.
    pub fn estimate_turn(&self, prompt: &str, response: &str, mode: EstimateMode) -> Estimate {
        let chars = match mode {
            EstimateMode::SingleText => char_count(prompt),
            EstimateMode::PairedTurn => char_count(prompt) + char_count(response),
        };
        self.estimate_parts(prompt, chars)
    }

    fn estimate_parts(&self, classified_text: &str, chars: usize) -> Estimate {
        let complexity = classify(classified_text);
        let cost = self.model.base_cost(chars) * complexity.multiplier();
        Estimate {
            water_usage_ml: if cost.is_finite() && cost > 0.0 {
                cost
            } else {
                0.0
            },
            complexity,
            tokens: estimate_tokens(chars),
            char_count: chars,
        }
    }
}

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

pub fn estimate_tokens(chars: usize) -> u64 {
    chars.div_ceil(CHARS_PER_TOKEN) as u64
}

pub fn classify(text: &str) -> ComplexityClass {
    let lower = text.to_lowercase();
    COMPLEXITY_RULES
        .iter()
        .find(|rule| {
            rule.keywords.iter().any(|keyword| lower.contains(keyword))
                || rule.raw_patterns.iter().any(|pattern| text.contains(pattern))
        })
        .map(|rule| rule.class)
        .unwrap_or(ComplexityClass::Simple)
}
