use crate::document;
use crate::grid;
use crate::ipc::error::{bad_params, err, ok};
use crate::ipc::types::{AppState, Request};
use crate::schedule::{self, ClassScheduleEntry, DisplayWindow, ScheduleLayout, SkippedEntry};
use serde_json::json;
use tracing::debug;

/// Optional `params.window` override. Absent or null means the default
/// 7:00-21:59 window; a supplied object must hold valid hours.
fn parse_window(req: &Request) -> Result<DisplayWindow, serde_json::Value> {
    let raw = match req.params.get("window") {
        None => return Ok(DisplayWindow::default()),
        Some(v) if v.is_null() => return Ok(DisplayWindow::default()),
        Some(v) => v,
    };
    let Some(obj) = raw.as_object() else {
        return Err(bad_params(&req.id, "window must be an object"));
    };

    let start_hour = parse_hour(req, obj, "startHour", DisplayWindow::DEFAULT_START_HOUR)?;
    let end_hour = parse_hour(req, obj, "endHour", DisplayWindow::DEFAULT_END_HOUR)?;
    if start_hour >= end_hour {
        return Err(bad_params(&req.id, "window startHour must precede endHour"));
    }

    Ok(DisplayWindow {
        start_hour,
        end_hour,
    })
}

fn parse_hour(
    req: &Request,
    obj: &serde_json::Map<String, serde_json::Value>,
    key: &str,
    default: i64,
) -> Result<i64, serde_json::Value> {
    match obj.get(key) {
        None => Ok(default),
        Some(v) if v.is_null() => Ok(default),
        Some(v) => match v.as_i64() {
            Some(h) if (0..=23).contains(&h) => Ok(h),
            _ => Err(bad_params(
                &req.id,
                format!("window.{} must be an hour in 0..=23", key),
            )),
        },
    }
}

fn parse_entries(req: &Request) -> Result<(Vec<ClassScheduleEntry>, Vec<SkippedEntry>), serde_json::Value> {
    let Some(rows) = req.params.get("entries").and_then(|v| v.as_array()) else {
        return Err(bad_params(&req.id, "missing entries"));
    };

    let mut entries = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();
    for row in rows {
        match schedule::entry_from_row(row) {
            Ok(entry) => entries.push(entry),
            Err(skip) => skipped.push(skip),
        }
    }
    Ok((entries, skipped))
}

/// Shared front half of the three schedule methods: window + entries in,
/// block map out, with row-level and builder-level skips merged.
fn build_from_request(req: &Request) -> Result<(ScheduleLayout, DisplayWindow), serde_json::Value> {
    let window = parse_window(req)?;
    let (entries, mut skipped) = parse_entries(req)?;

    let mut layout = schedule::build_layout(&entries, window);
    skipped.append(&mut layout.skipped);
    layout.skipped = skipped;

    for skip in &layout.skipped {
        debug!(class_id = ?skip.class_id, reason = ?skip.reason, "schedule entry skipped");
    }
    Ok((layout, window))
}

fn skipped_json(req: &Request, layout: &ScheduleLayout) -> Result<serde_json::Value, serde_json::Value> {
    serde_json::to_value(&layout.skipped)
        .map_err(|e| err(&req.id, "encode_failed", e.to_string(), None))
}

fn handle_layout(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let (layout, window) = match build_from_request(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let skipped = match skipped_json(req, &layout) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    ok(
        &req.id,
        json!({
            "days": layout.days_json(),
            "skipped": skipped,
            "blocksPerDay": window.blocks_per_day()
        }),
    )
}

fn handle_grid(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let (layout, window) = match build_from_request(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let model = grid::render_grid(&layout, window);
    let grid = match serde_json::to_value(&model) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "encode_failed", e.to_string(), None),
    };
    let skipped = match skipped_json(req, &layout) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    ok(&req.id, json!({ "grid": grid, "skipped": skipped }))
}

fn handle_document(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (layout, window) = match build_from_request(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let name = state.teacher.as_ref().map(|t| t.display_name());
    let email = state
        .teacher
        .as_ref()
        .map(|t| t.email.clone())
        .unwrap_or_default();
    let model = document::render_document(&layout, window, name.as_deref(), &email);

    let doc = match serde_json::to_value(&model) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "encode_failed", e.to_string(), None),
    };
    let skipped = match skipped_json(req, &layout) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    ok(&req.id, json!({ "document": doc, "skipped": skipped }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "schedule.layout" => Some(handle_layout(state, req)),
        "schedule.grid" => Some(handle_grid(state, req)),
        "schedule.document" => Some(handle_document(state, req)),
        _ => None,
    }
}
