
use serde_json::json;
use test_support::{request_ok, spawn_sidecar};

const PAGE_HEIGHT: f64 = 841.89;
const TABLE_Y: f64 = 120.0;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn ops(doc: &serde_json::Value) -> &Vec<serde_json::Value> {
    doc.get("ops").and_then(|v| v.as_array()).expect("ops")
}

fn op_kind(op: &serde_json::Value) -> &str {
    op.get("op").and_then(|v| v.as_str()).unwrap_or("")
}

fn first_line(op: &serde_json::Value) -> &str {
    op.get("lines")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

#[test]
fn header_uses_selected_session_identity() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.select",
        json!({ "firstName": "Maria", "lastName": "Santos", "email": "maria@school.test" }),
    );
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "schedule.document",
        json!({ "entries": [] }),
    );
    let doc = result.get("document").expect("document");

    assert!(approx(doc.get("pageWidth").and_then(|v| v.as_f64()).unwrap(), 595.28));
    assert!(approx(doc.get("pageHeight").and_then(|v| v.as_f64()).unwrap(), PAGE_HEIGHT));
    assert_eq!(
        doc.get("fileName").and_then(|v| v.as_str()),
        Some("Maria Santos_Weekly_Timetable.pdf")
    );

    let ops = ops(doc);
    assert_eq!(first_line(&ops[0]), "Weekly Class Schedule");
    assert_eq!(ops[0].get("bold").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(first_line(&ops[1]), "Teacher: Maria Santos");
    assert_eq!(first_line(&ops[2]), "Email: maria@school.test");
}

#[test]
fn header_falls_back_to_unknown_without_a_session() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.document",
        json!({ "entries": [] }),
    );
    let doc = result.get("document").expect("document");

    assert_eq!(
        doc.get("fileName").and_then(|v| v.as_str()),
        Some("Unknown_Weekly_Timetable.pdf")
    );
    assert_eq!(first_line(&ops(doc)[1]), "Teacher: Unknown");
}

#[test]
fn hour_gridlines_cover_window_inclusive_of_closing_hour() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.document",
        json!({ "entries": [] }),
    );
    let doc = result.get("document").expect("document");

    let hour_lines: Vec<&serde_json::Value> = ops(doc)
        .iter()
        .filter(|op| {
            op_kind(op) == "line" && op.get("width").and_then(|v| v.as_f64()) == Some(0.6)
        })
        .collect();
    // 7:00 through 22:00 inclusive.
    assert_eq!(hour_lines.len(), 16);

    let hour_labels: Vec<&str> = ops(doc)
        .iter()
        .filter(|op| {
            op_kind(op) == "text" && op.get("fontSize").and_then(|v| v.as_f64()) == Some(8.0)
        })
        .map(first_line)
        .collect();
    assert_eq!(hour_labels.first().copied(), Some("7:00 AM"));
    assert_eq!(hour_labels.last().copied(), Some("10:00 PM"));
}

#[test]
fn block_rect_tracks_minute_scale() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.document",
        json!({
            "entries": [{
                "id": "c1",
                "className": "Math",
                "scheduleDays": ["Mon"],
                "timeStart": "09:00",
                "timeEnd": "10:00",
                "roomNumber": "201"
            }]
        }),
    );
    let doc = result.get("document").expect("document");

    let table_height = PAGE_HEIGHT - TABLE_Y - 60.0;
    let px_per_minute = table_height / 900.0;
    let day_col_w = (595.28 - 72.0 - 60.0) / 6.0;

    let rects: Vec<&serde_json::Value> = ops(doc)
        .iter()
        .filter(|op| op_kind(op) == "roundedRect")
        .collect();
    assert_eq!(rects.len(), 1);
    let rect = rects[0];

    let expected_y = TABLE_Y + 120.0 * px_per_minute + 2.0;
    let expected_h = 55.0 * px_per_minute - 4.0;
    assert!(approx(rect.get("x").and_then(|v| v.as_f64()).unwrap(), 36.0 + 60.0 + 6.0));
    assert!(approx(rect.get("y").and_then(|v| v.as_f64()).unwrap(), expected_y));
    assert!(approx(rect.get("w").and_then(|v| v.as_f64()).unwrap(), day_col_w - 12.0));
    assert!(approx(rect.get("h").and_then(|v| v.as_f64()).unwrap(), expected_h));
    assert_eq!(rect.get("fill").and_then(|v| v.as_str()), Some("#f5576c"));

    // Block body text: bold title then the room/time info line.
    let title_op = ops(doc)
        .iter()
        .find(|op| {
            op_kind(op) == "text"
                && op.get("fontSize").and_then(|v| v.as_f64()) == Some(10.0)
                && op.get("bold").and_then(|v| v.as_bool()) == Some(true)
                && first_line(op) == "Math"
        })
        .expect("title op");
    assert_eq!(title_op.get("color").and_then(|v| v.as_str()), Some("#ffffff"));

    let info_op = ops(doc)
        .iter()
        .find(|op| first_line(op).starts_with("Room 201"))
        .expect("info op");
    let info_text = info_op
        .get("lines")
        .and_then(|v| v.as_array())
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();
    // The display duration is the snapped 55 minutes, so the range ends at 9:55.
    assert_eq!(info_text, "Room 201 \u{2022} 9:00 - 9:55");
}

#[test]
fn overlap_insets_cycle_on_the_printed_page() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.document",
        json!({
            "entries": [
                { "id": "a", "scheduleDays": ["Mon"], "timeStart": "09:00", "timeEnd": "10:00" },
                { "id": "b", "scheduleDays": ["Mon"], "timeStart": "09:10", "timeEnd": "10:00" },
                { "id": "c", "scheduleDays": ["Mon"], "timeStart": "09:20", "timeEnd": "10:00" },
                { "id": "d", "scheduleDays": ["Mon"], "timeStart": "09:30", "timeEnd": "10:00" }
            ]
        }),
    );
    let doc = result.get("document").expect("document");

    let xs: Vec<f64> = ops(doc)
        .iter()
        .filter(|op| op_kind(op) == "roundedRect")
        .map(|op| op.get("x").and_then(|v| v.as_f64()).unwrap())
        .collect();
    assert_eq!(xs.len(), 4);
    assert!(approx(xs[1] - xs[0], 6.0));
    assert!(approx(xs[2] - xs[0], 12.0));
    // Fourth block wraps back to the first inset position.
    assert!(approx(xs[3], xs[0]));
}

#[test]
fn long_titles_truncate_to_two_lines() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.document",
        json!({
            "entries": [{
                "id": "c1",
                "className": "Advanced Placement Organic Chemistry Laboratory Section",
                "scheduleDays": ["Mon"],
                "timeStart": "09:00",
                "timeEnd": "10:00"
            }]
        }),
    );
    let doc = result.get("document").expect("document");

    let title_op = ops(doc)
        .iter()
        .find(|op| {
            op_kind(op) == "text"
                && op.get("bold").and_then(|v| v.as_bool()) == Some(true)
                && first_line(op).starts_with("Advanced")
        })
        .expect("title op");
    let line_count = title_op
        .get("lines")
        .and_then(|v| v.as_array())
        .map(|a| a.len())
        .unwrap_or(0);
    assert_eq!(line_count, 2);
}

#[test]
fn footer_is_the_last_operation() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.document",
        json!({ "entries": [] }),
    );
    let doc = result.get("document").expect("document");

    let last = ops(doc).last().expect("ops");
    assert_eq!(first_line(last), "Generated by CoTeacher");
    assert!(approx(last.get("y").and_then(|v| v.as_f64()).unwrap(), PAGE_HEIGHT - 28.0));
}
