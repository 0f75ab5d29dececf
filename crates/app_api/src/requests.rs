use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct EmptyRequest {}

#[derive(Debug, Deserialize, Default)]
pub struct DateRequest {
    pub date: Option<String>,
}

/// Missing text fields are treated as empty. `session_id` names the page
/// whose deduplication state applies and must not be blank.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct TurnObservedRequest {
    pub session_id: String,
    pub ordinal: usize,
    pub prompt: String,
    pub response: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ConversationObservedRequest {
    pub session_id: String,
    pub prompts: Vec<String>,
    pub responses: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SessionResetRequest {
    pub session_id: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct EstimateRequest {
    pub text: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ResetRequest {
    #[serde(default)]
    pub confirm: bool,
}
