use crate::ipc::error::{bad_params, ok};
use crate::ipc::types::{AppState, Request, TeacherIdentity};
use serde_json::json;
use tracing::info;

fn required_name(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| bad_params(&req.id, format!("missing {}", key)))
}

fn handle_session_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let first_name = match required_name(req, "firstName") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let last_name = match required_name(req, "lastName") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let email = req
        .params
        .get("email")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .trim()
        .to_string();

    let identity = TeacherIdentity {
        first_name,
        last_name,
        email,
    };
    let display_name = identity.display_name();
    info!(teacher = %display_name, "session selected");
    state.teacher = Some(identity);

    ok(&req.id, json!({ "teacher": display_name }))
}

fn handle_session_info(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.teacher.as_ref() {
        Some(t) => ok(
            &req.id,
            json!({ "teacher": t.display_name(), "email": t.email }),
        ),
        None => ok(&req.id, json!({ "teacher": null, "email": null })),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.select" => Some(handle_session_select(state, req)),
        "session.info" => Some(handle_session_info(state, req)),
        _ => None,
    }
}
