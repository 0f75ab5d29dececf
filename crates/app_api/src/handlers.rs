use water_app::{AppError, Result, resolve_date};
use water_core::{
    AggregateState, UsageLevel, badge_text, date_key, format_usage, water_equivalence,
};

use crate::{
    AppContext, ConversationObservedRequest, ConversationObservedResponse, DateRequest,
    EstimateRequest, EstimateResponse, OkResponse, RecentEntryResponse, ResetRequest,
    SessionResetRequest, SummaryResponse, TurnObservedRequest, TurnObservedResponse,
    WeeklyTotalResponse,
};

const RECENT_LIMIT: usize = 5;

pub fn summary(ctx: &AppContext, req: DateRequest) -> Result<SummaryResponse> {
    let date = resolve_date(req.date.as_deref())?;
    let summary = ctx.app_state.services.usage.summary(date, RECENT_LIMIT)?;
    Ok(SummaryResponse {
        date: date_key(summary.date),
        today_ml: summary.today_ml,
        today_label: format_usage(summary.today_ml),
        week_ml: summary.week_ml,
        week_label: format_usage(summary.week_ml),
        lifetime_ml: summary.lifetime_ml,
        lifetime_label: format_usage(summary.lifetime_ml),
        prompts_today: summary.prompts_today,
        equivalence: water_equivalence(summary.today_ml),
        level: UsageLevel::from_ml(summary.today_ml),
        badge: badge_text(summary.today_ml),
        recent: summary
            .recent
            .into_iter()
            .map(RecentEntryResponse::from)
            .collect(),
        last_updated_at: summary.last_updated_at,
        stale: summary.stale,
    })
}

pub fn state(ctx: &AppContext) -> Result<AggregateState> {
    ctx.app_state.services.usage.state()
}

pub fn weekly_total(ctx: &AppContext, req: DateRequest) -> Result<WeeklyTotalResponse> {
    let date = resolve_date(req.date.as_deref())?;
    let total_ml = ctx.app_state.services.usage.weekly_total(date)?;
    Ok(WeeklyTotalResponse {
        date: date_key(date),
        total_ml,
        label: format_usage(total_ml),
    })
}

pub fn turn_observed(ctx: &AppContext, req: TurnObservedRequest) -> Result<TurnObservedResponse> {
    let entry = ctx
        .app_state
        .services
        .tracker
        .on_turn_observed(&req.session_id, req.ordinal, &req.prompt, &req.response)?;
    Ok(TurnObservedResponse {
        counted: entry.is_some(),
        entry,
    })
}

pub fn conversation_observed(
    ctx: &AppContext,
    req: ConversationObservedRequest,
) -> Result<ConversationObservedResponse> {
    let outcome = ctx
        .app_state
        .services
        .tracker
        .on_conversation_observed(&req.session_id, &req.prompts, &req.responses)?;
    Ok(ConversationObservedResponse {
        counted: outcome.recorded.len(),
        turn_count: outcome.turn_count,
        conversation_total_ml: outcome.conversation_total_ml,
        conversation_label: format_usage(outcome.conversation_total_ml),
        latest: outcome.latest,
    })
}

pub fn estimate(ctx: &AppContext, req: EstimateRequest) -> EstimateResponse {
    ctx.app_state.services.tracker.preview(&req.text).into()
}

pub fn session_reset(ctx: &AppContext, req: SessionResetRequest) -> Result<OkResponse> {
    ctx.app_state
        .services
        .tracker
        .reset_session(&req.session_id)?;
    Ok(ok())
}

pub fn reset(ctx: &AppContext, req: ResetRequest) -> Result<OkResponse> {
    if !req.confirm {
        return Err(AppError::InvalidInput(
            "reset requires confirm: true".to_string(),
        ));
    }
    ctx.app_state.services.usage.reset()?;
    Ok(ok())
}

pub fn ok() -> OkResponse {
    OkResponse { ok: true }
}
