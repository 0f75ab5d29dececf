use serde::{Deserialize, Serialize};

/// Human-readable amount: microliters below 1 ml, liters from 1000 ml.
pub fn format_usage(ml: f64) -> String {
    if ml.is_nan() || ml < 0.001 {
        return "< 0.001 ml".to_string();
    }
    if ml < 1.0 {
        return format!("{:.0} μl", ml * 1000.0);
    }
    if ml < 1000.0 {
        return format!("{:.2} ml", ml);
    }
    format!("{:.2} L", ml / 1000.0)
}

/// Compact label for the toolbar badge.
pub fn badge_text(ml: f64) -> String {
    if ml < 1.0 {
        format!("{:.0}μl", ml.max(0.0) * 1000.0)
    } else {
        format!("{:.1}ml", ml)
    }
}

pub fn water_equivalence(ml: f64) -> &'static str {
    const LADDER: &[(f64, &str)] = &[
        (0.001, "Less than a dewdrop"),
        (0.1, "About a small raindrop"),
        (1.0, "Like a few tears"),
        (5.0, "About a teaspoon"),
        (15.0, "About a tablespoon"),
        (250.0, "Less than a cup of water"),
        (500.0, "About 2 cups of water"),
        (1000.0, "Nearly a water bottle"),
    ];
    LADDER
        .iter()
        .find(|(limit, _)| ml < *limit)
        .map(|(_, label)| *label)
        .unwrap_or("More than a water bottle!")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageLevel {
    Low,
    Medium,
    High,
}

impl UsageLevel {
    pub fn from_ml(ml: f64) -> Self {
        if ml > 10.0 {
            Self::High
        } else if ml > 1.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}
