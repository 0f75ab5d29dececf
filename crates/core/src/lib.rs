mod estimate;
mod format;

use std::collections::BTreeMap;

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

pub use estimate::{
    CHARS_PER_TOKEN, CostModel, Estimate, EstimateMode, Estimator, LEGACY_WATER_PER_CHAR_ML,
    WATER_PER_TOKEN_ML, char_count, classify, estimate_tokens,
};
pub use format::{UsageLevel, badge_text, format_usage, water_equivalence};

/// Default cap on the number of history entries kept in [`AggregateState`].
pub const MAX_HISTORY: usize = 1000;

/// Number of calendar days summed by [`AggregateState::weekly_total`]:
/// the reference day plus the seven days before it.
pub const WEEKLY_WINDOW_DAYS: u64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityClass {
    Code,
    Creative,
    Analysis,
    Simple,
}

impl ComplexityClass {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Code => 1.5,
            Self::Creative => 1.3,
            Self::Analysis => 1.4,
            Self::Simple => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Creative => "creative",
            Self::Analysis => "analysis",
            Self::Simple => "simple",
        }
    }
}

impl std::fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prompt/response pair detected on the chat page.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnObservation {
    /// Position of the turn in the conversation, in page order.
    pub ordinal: usize,
    pub prompt_text: String,
    pub response_text: String,
    pub observed_at: DateTime<Local>,
}

impl TurnObservation {
    pub fn new(
        ordinal: usize,
        prompt_text: impl Into<String>,
        response_text: impl Into<String>,
        observed_at: DateTime<Local>,
    ) -> Self {
        Self {
            ordinal,
            prompt_text: prompt_text.into(),
            response_text: response_text.into(),
            observed_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prompt_text.is_empty() && self.response_text.is_empty()
    }
}

/// One counted turn, as persisted in the usage history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEntry {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Characters in the triggering prompt.
    pub length: usize,
    pub complexity: ComplexityClass,
    pub water_usage_ml: f64,
    pub date_key: String,
}

impl UsageEntry {
    pub fn from_estimate<Tz: TimeZone>(
        observed_at: &DateTime<Tz>,
        prompt_length: usize,
        estimate: &Estimate,
    ) -> Self {
        Self {
            timestamp: observed_at.timestamp_millis(),
            length: prompt_length,
            complexity: estimate.complexity,
            water_usage_ml: estimate.water_usage_ml,
            date_key: date_key(observed_at.date_naive()),
        }
    }
}

/// Durable running totals plus a bounded usage log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateState {
    pub history: Vec<UsageEntry>,
    pub daily_totals: BTreeMap<String, f64>,
    pub lifetime_total_ml: f64,
    pub last_updated_at: Option<i64>,
}

impl AggregateState {
    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.daily_totals.is_empty() && self.lifetime_total_ml == 0.0
    }

    /// Folds one entry into the totals and appends it to the history,
    /// dropping the oldest entries once `max_history` is exceeded.
    /// Totals are never reduced by eviction.
    pub fn apply(&mut self, entry: UsageEntry, max_history: usize, updated_at: i64) {
        let amount = sanitize_ml(entry.water_usage_ml);
        *self
            .daily_totals
            .entry(entry.date_key.clone())
            .or_insert(0.0) += amount;
        self.lifetime_total_ml += amount;
        self.history.push(UsageEntry {
            water_usage_ml: amount,
            ..entry
        });
        if self.history.len() > max_history {
            let excess = self.history.len() - max_history;
            self.history.drain(..excess);
        }
        self.last_updated_at = Some(updated_at);
    }

    pub fn day_total(&self, date: NaiveDate) -> f64 {
        self.daily_totals
            .get(&date_key(date))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum of the daily totals for `as_of` and the seven days before it.
    pub fn weekly_total(&self, as_of: NaiveDate) -> f64 {
        (0..WEEKLY_WINDOW_DAYS)
            .filter_map(|offset| as_of.checked_sub_days(Days::new(offset)))
            .map(|date| self.day_total(date))
            .sum()
    }

    /// Counted turns for a day that are still present in the history.
    pub fn turns_on(&self, date: NaiveDate) -> usize {
        let key = date_key(date);
        self.history
            .iter()
            .filter(|entry| entry.date_key == key)
            .count()
    }

    /// Newest entries first.
    pub fn recent(&self, limit: usize) -> Vec<UsageEntry> {
        self.history.iter().rev().take(limit).cloned().collect()
    }
}

/// Calendar-day bucket key, e.g. `"Mon Jan 02 2006"`.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

fn sanitize_ml(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: NaiveDate, ml: f64) -> UsageEntry {
        UsageEntry {
            timestamp: 0,
            length: 10,
            complexity: ComplexityClass::Simple,
            water_usage_ml: ml,
            date_key: date_key(date),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn date_key_matches_browser_date_string() {
        assert_eq!(date_key(day(2006, 1, 2)), "Mon Jan 02 2006");
        assert_eq!(date_key(day(2025, 12, 19)), "Fri Dec 19 2025");
    }

    #[test]
    fn apply_accumulates_daily_and_lifetime() {
        let today = day(2025, 12, 19);
        let mut state = AggregateState::default();
        state.apply(entry(today, 0.5), MAX_HISTORY, 1);
        state.apply(entry(today, 1.25), MAX_HISTORY, 2);

        assert!((state.day_total(today) - 1.75).abs() < 1e-9);
        assert!((state.lifetime_total_ml - 1.75).abs() < 1e-9);
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.last_updated_at, Some(2));
    }

    #[test]
    fn apply_evicts_oldest_without_touching_totals() {
        let today = day(2025, 12, 19);
        let mut state = AggregateState::default();
        for i in 0..5 {
            let mut item = entry(today, 1.0);
            item.timestamp = i;
            state.apply(item, 3, i);
        }

        assert_eq!(state.history.len(), 3);
        assert_eq!(state.history[0].timestamp, 2);
        assert_eq!(state.history[2].timestamp, 4);
        assert!((state.lifetime_total_ml - 5.0).abs() < 1e-9);
        assert!((state.day_total(today) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn apply_clamps_invalid_amounts() {
        let today = day(2025, 12, 19);
        let mut state = AggregateState::default();
        state.apply(entry(today, f64::NAN), MAX_HISTORY, 1);
        state.apply(entry(today, -3.0), MAX_HISTORY, 2);

        assert_eq!(state.lifetime_total_ml, 0.0);
        assert_eq!(state.day_total(today), 0.0);
        assert!(state.history.iter().all(|item| item.water_usage_ml == 0.0));
    }

    #[test]
    fn weekly_total_covers_eight_days() {
        let as_of = day(2025, 12, 19);
        let mut state = AggregateState::default();
        state.apply(entry(as_of, 1.0), MAX_HISTORY, 1);
        state.apply(entry(day(2025, 12, 16), 2.0), MAX_HISTORY, 2);
        state.apply(entry(day(2025, 12, 12), 4.0), MAX_HISTORY, 3);
        state.apply(entry(day(2025, 12, 11), 8.0), MAX_HISTORY, 4);
        state.apply(entry(day(2025, 12, 9), 16.0), MAX_HISTORY, 5);

        assert!((state.weekly_total(as_of) - 7.0).abs() < 1e-9);
        assert!((state.weekly_total(as_of) - state.weekly_total(as_of)).abs() < 1e-12);
    }

    #[test]
    fn weekly_total_crosses_month_boundary() {
        let as_of = day(2026, 3, 2);
        let mut state = AggregateState::default();
        state.apply(entry(day(2026, 2, 25), 3.0), MAX_HISTORY, 1);
        state.apply(entry(day(2026, 2, 22), 5.0), MAX_HISTORY, 2);

        assert!((state.weekly_total(as_of) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn turns_on_and_recent() {
        let today = day(2025, 12, 19);
        let yesterday = day(2025, 12, 18);
        let mut state = AggregateState::default();
        for i in 0..3 {
            let mut item = entry(yesterday, 1.0);
            item.timestamp = i;
            state.apply(item, MAX_HISTORY, i);
        }
        for i in 3..5 {
            let mut item = entry(today, 1.0);
            item.timestamp = i;
            state.apply(item, MAX_HISTORY, i);
        }

        assert_eq!(state.turns_on(today), 2);
        assert_eq!(state.turns_on(yesterday), 3);
        let recent = state.recent(3);
        let stamps: Vec<i64> = recent.iter().map(|item| item.timestamp).collect();
        assert_eq!(stamps, vec![4, 3, 2]);
    }

    #[test]
    fn state_round_trips_through_json() {
        let today = day(2025, 12, 19);
        let mut state = AggregateState::default();
        state.apply(entry(today, 0.1 + 0.2), MAX_HISTORY, 42);
        state.apply(entry(today, 1.0 / 3.0), MAX_HISTORY, 43);

        let json = serde_json::to_string(&state).expect("serialize");
        let decoded: AggregateState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, state);
        assert!(json.contains("\"complexity\":\"simple\""));
    }

    #[test]
    fn missing_fields_decode_as_empty() {
        let decoded: AggregateState = serde_json::from_str("{}").expect("deserialize");
        assert!(decoded.is_empty());
        assert_eq!(decoded.last_updated_at, None);
    }
}
