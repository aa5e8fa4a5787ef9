//! WASM bindings for promo-calendar.
//!
//! Exposes range queries, day bucketing, conflict checks, view and period windows
//! to the calendar UI via `wasm-bindgen`. All complex types cross the boundary as
//! JSON strings; promotions use the same camelCase record shape the backend
//! stores (`id`, `teamId`, `channelId`, `startDate`, `endDate`, `status`, ...).
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p promo-calendar-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/promo-calendar-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/promo_calendar_wasm.wasm
//! ```

use promo_calendar::{
    bucket_by_day, check_conflicts, find_channel_conflicts, parse_date, parse_weekday, range_query,
    CalendarView, ChannelId, ConflictCheck, DateRange, KeyedBuckets, LeadTimeTable, Promotion,
    PromotionStatus, RangeQuery, TeamId, WindowPreset,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Range query parameters passed from JavaScript.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryInput {
    team_id: String,
    start: String,
    end: String,
    #[serde(default)]
    channel_ids: Vec<String>,
    #[serde(default)]
    statuses: Vec<String>,
}

/// Conflict check parameters passed from JavaScript.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConflictInput {
    team_id: String,
    channel_id: String,
    start: String,
    end: String,
    #[serde(default)]
    exclude_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BucketsDto {
    window: DateRange,
    max_per_day: usize,
    days: KeyedBuckets,
}

// ---------------------------------------------------------------------------
// Helpers: parse inputs, reporting errors as plain strings
// ---------------------------------------------------------------------------

fn parse_promotions(json: &str) -> Result<Vec<Promotion>, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid promotions JSON: {}", e))
}

fn parse_range(start: &str, end: &str) -> Result<DateRange, String> {
    DateRange::parse(start, end).map_err(|e| e.to_string())
}

fn parse_query(json: &str) -> Result<RangeQuery, String> {
    let input: QueryInput =
        serde_json::from_str(json).map_err(|e| format!("Invalid query JSON: {}", e))?;
    let statuses = input
        .statuses
        .iter()
        .map(|s| s.parse::<PromotionStatus>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(RangeQuery::new(input.team_id, parse_range(&input.start, &input.end)?)
        .with_channels(input.channel_ids)
        .with_statuses(statuses))
}

fn parse_conflict_check(json: &str) -> Result<ConflictCheck, String> {
    let input: ConflictInput =
        serde_json::from_str(json).map_err(|e| format!("Invalid conflict check JSON: {}", e))?;
    let range = parse_range(&input.start, &input.end)?;
    let check = ConflictCheck::new(input.team_id, input.channel_id, range);
    Ok(match input.exclude_id {
        Some(id) => check.excluding(id),
        None => check,
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Boundary-independent implementations
// ---------------------------------------------------------------------------

fn range_query_json(promotions_json: &str, query_json: &str) -> Result<String, String> {
    let promotions = parse_promotions(promotions_json)?;
    let query = parse_query(query_json)?;
    to_json(&range_query(&promotions, &query))
}

fn bucket_by_day_json(promotions_json: &str, query_json: &str) -> Result<String, String> {
    let promotions = parse_promotions(promotions_json)?;
    let query = parse_query(query_json)?;
    let buckets = bucket_by_day(range_query(&promotions, &query), &query.window);
    to_json(&BucketsDto {
        window: buckets.window(),
        max_per_day: buckets.max_per_day(),
        days: buckets.to_keyed(),
    })
}

fn check_conflicts_json(promotions_json: &str, check_json: &str) -> Result<String, String> {
    let promotions = parse_promotions(promotions_json)?;
    let check = parse_conflict_check(check_json)?;
    to_json(&check_conflicts(&promotions, &check))
}

fn audit_conflicts_json(promotions_json: &str, team_id: &str) -> Result<String, String> {
    let promotions = parse_promotions(promotions_json)?;
    to_json(&find_channel_conflicts(&promotions, &TeamId::from(team_id)))
}

fn calendar_window_json(view: &str, anchor: &str, week_start: &str) -> Result<String, String> {
    let view = view.parse::<CalendarView>().map_err(|e| e.to_string())?;
    let anchor = parse_date(anchor).map_err(|e| e.to_string())?;
    let week_start = parse_weekday(week_start).map_err(|e| e.to_string())?;
    to_json(&view.window(anchor, week_start))
}

fn step_anchor_str(view: &str, anchor: &str, steps: i32) -> Result<String, String> {
    let view = view.parse::<CalendarView>().map_err(|e| e.to_string())?;
    let anchor = parse_date(anchor).map_err(|e| e.to_string())?;
    Ok(promo_calendar::day_key(view.step(anchor, steps)))
}

fn preset_window_json(preset: &str, reference: &str) -> Result<String, String> {
    let preset = preset.parse::<WindowPreset>().map_err(|e| e.to_string())?;
    let reference = parse_date(reference).map_err(|e| e.to_string())?;
    to_json(&preset.window(reference))
}

fn lead_times_json(start: &str, channels_json: &str) -> Result<String, String> {
    let start = parse_date(start).map_err(|e| e.to_string())?;
    let channels: Vec<ChannelId> =
        serde_json::from_str(channels_json).map_err(|e| format!("Invalid channels JSON: {}", e))?;
    to_json(&LeadTimeTable::default().plan_all(&channels, start))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Promotions of a team overlapping a window, sorted by start date.
///
/// `query_json` is `{teamId, start, end, channelIds?, statuses?}` with
/// `YYYY-MM-DD` dates. Returns a JSON array of promotion records.
#[wasm_bindgen(js_name = "rangeQuery")]
pub fn range_query_js(promotions_json: &str, query_json: &str) -> Result<String, JsValue> {
    range_query_json(promotions_json, query_json).map_err(js_err)
}

/// Range query followed by per-day bucketing over the query window.
///
/// Returns `{window, maxPerDay, days}` where `days` maps `YYYY-MM-DD` to
/// promotion ids. Days without promotions are absent.
#[wasm_bindgen(js_name = "bucketByDay")]
pub fn bucket_by_day_js(promotions_json: &str, query_json: &str) -> Result<String, JsValue> {
    bucket_by_day_json(promotions_json, query_json).map_err(js_err)
}

/// Advisory conflict check for a candidate schedule.
///
/// `check_json` is `{teamId, channelId, start, end, excludeId?}`. Returns
/// `{hasConflict, conflicts}`.
#[wasm_bindgen(js_name = "checkConflicts")]
pub fn check_conflicts_js(promotions_json: &str, check_json: &str) -> Result<String, JsValue> {
    check_conflicts_json(promotions_json, check_json).map_err(js_err)
}

/// Every overlapping same-channel pair in a team's calendar.
#[wasm_bindgen(js_name = "auditConflicts")]
pub fn audit_conflicts_js(promotions_json: &str, team_id: &str) -> Result<String, JsValue> {
    audit_conflicts_json(promotions_json, team_id).map_err(js_err)
}

/// The `{start, end}` window for a `month`, `week` or `day` page.
#[wasm_bindgen(js_name = "calendarWindow")]
pub fn calendar_window_js(view: &str, anchor: &str, week_start: &str) -> Result<String, JsValue> {
    calendar_window_json(view, anchor, week_start).map_err(js_err)
}

/// Move a page anchor by `steps` months, weeks or days.
#[wasm_bindgen(js_name = "stepAnchor")]
pub fn step_anchor_js(view: &str, anchor: &str, steps: i32) -> Result<String, JsValue> {
    step_anchor_str(view, anchor, steps).map_err(js_err)
}

/// The `{start, end}` window for a named period (`7d`, `30d`, `q1`..`q4`,
/// `ytd`, `mtd`) as seen from `reference`.
#[wasm_bindgen(js_name = "presetWindow")]
pub fn preset_window_js(preset: &str, reference: &str) -> Result<String, JsValue> {
    preset_window_json(preset, reference).map_err(js_err)
}

/// Preparation deadlines for each channel in `channels_json` (a JSON array).
#[wasm_bindgen(js_name = "leadTimes")]
pub fn lead_times_js(start: &str, channels_json: &str) -> Result<String, JsValue> {
    lead_times_json(start, channels_json).map_err(js_err)
}
