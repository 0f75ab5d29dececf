use ingest::LatestTurn;
use serde::Serialize;
use water_core::{
    ComplexityClass, Estimate, UsageEntry, UsageLevel, badge_text, format_usage,
};

#[derive(Debug, Serialize)]
pub struct RecentEntryResponse {
    pub timestamp: i64,
    pub length: usize,
    pub complexity: ComplexityClass,
    pub water_usage_ml: f64,
    pub label: String,
}

impl From<UsageEntry> for RecentEntryResponse {
    fn from(entry: UsageEntry) -> Self {
        Self {
            timestamp: entry.timestamp,
            length: entry.length,
            complexity: entry.complexity,
            label: format_usage(entry.water_usage_ml),
            water_usage_ml: entry.water_usage_ml,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub date: String,
    pub today_ml: f64,
    pub today_label: String,
    pub week_ml: f64,
    pub week_label: String,
    pub lifetime_ml: f64,
    pub lifetime_label: String,
    pub prompts_today: usize,
    pub equivalence: &'static str,
    pub level: UsageLevel,
    pub badge: String,
    pub recent: Vec<RecentEntryResponse>,
    pub last_updated_at: Option<i64>,
    pub stale: bool,
}

#[derive(Debug, Serialize)]
pub struct WeeklyTotalResponse {
    pub date: String,
    pub total_ml: f64,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct TurnObservedResponse {
    pub counted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<UsageEntry>,
}

#[derive(Debug, Serialize)]
pub struct ConversationObservedResponse {
    pub counted: usize,
    pub turn_count: usize,
    pub conversation_total_ml: f64,
    pub conversation_label: String,
    pub latest: Option<LatestTurn>,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub water_usage_ml: f64,
    pub label: String,
    pub badge: String,
    pub complexity: ComplexityClass,
    pub tokens: u64,
    pub char_count: usize,
    pub level: UsageLevel,
}

impl From<Estimate> for EstimateResponse {
    fn from(estimate: Estimate) -> Self {
        Self {
            water_usage_ml: estimate.water_usage_ml,
            label: format_usage(estimate.water_usage_ml),
            badge: badge_text(estimate.water_usage_ml),
            complexity: estimate.complexity,
            tokens: estimate.tokens,
            char_count: estimate.char_count,
            level: UsageLevel::from_ml(estimate.water_usage_ml),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}
