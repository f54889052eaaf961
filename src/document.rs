use serde::Serialize;

use crate::schedule::{hour_label, DayCode, DisplayWindow, ScheduleLayout};

// A4 portrait in points, the page the PDF collaborator prints.
pub const PAGE_WIDTH_PT: f64 = 595.28;
pub const PAGE_HEIGHT_PT: f64 = 841.89;

const MARGIN: f64 = 36.0;
const HEADER_BASELINE_Y: f64 = 80.0;
const HEADER_BLOCK_HEIGHT: f64 = 40.0;
const TIME_COLUMN_WIDTH: f64 = 60.0;
const FOOTER_RESERVE: f64 = 60.0;
/// Blocks shorter than this become unreadable; clamp their drawn height.
const MIN_BLOCK_HEIGHT: f64 = 12.0;
const CORNER_RADIUS: f64 = 4.0;
const BLOCK_PADDING: f64 = 6.0;
const TITLE_LINE_LIMIT: usize = 2;
const TITLE_LINE_ADVANCE: f64 = 12.0;
/// Print-page overlap insets cycle instead of growing without bound.
const OVERLAP_CYCLE: usize = 3;
const OVERLAP_STEP: f64 = 6.0;

const ACCENT: &str = "#f5576c";
const BODY_TEXT: &str = "#333333";
const BLOCK_TEXT: &str = "#ffffff";
const FOOTER_TEXT: &str = "#888888";

/// One primitive for the PDF-writing collaborator. Coordinates and content
/// only; fonts are Helvetica and the encoding itself happens elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    #[serde(rename_all = "camelCase")]
    Text {
        x: f64,
        y: f64,
        lines: Vec<String>,
        font_size: f64,
        bold: bool,
        color: String,
    },
    #[serde(rename_all = "camelCase")]
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        gray: u8,
    },
    #[serde(rename_all = "camelCase")]
    RoundedRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        fill: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    pub page_width: f64,
    pub page_height: f64,
    pub file_name: String,
    pub ops: Vec<DrawOp>,
}

/// Project the block map onto a single A4 page: header, day columns, hour
/// gridlines, one rounded rectangle per block with wrapped text, footer.
pub fn render_document(
    layout: &ScheduleLayout,
    window: DisplayWindow,
    teacher_name: Option<&str>,
    teacher_email: &str,
) -> DocumentModel {
    let name = teacher_name.filter(|n| !n.trim().is_empty()).unwrap_or("Unknown");

    let table_y = HEADER_BASELINE_Y + HEADER_BLOCK_HEIGHT;
    let table_height = PAGE_HEIGHT_PT - table_y - FOOTER_RESERVE;
    let table_width = PAGE_WIDTH_PT - MARGIN * 2.0;
    let day_count = DayCode::ALL.len() as f64;
    let day_col_w = (table_width - TIME_COLUMN_WIDTH) / day_count;
    let px_per_minute = table_height / window.total_minutes() as f64;

    let mut ops = Vec::new();

    // Page header.
    ops.push(text(MARGIN, HEADER_BASELINE_Y, "Weekly Class Schedule", 18.0, true, ACCENT));
    ops.push(text(
        MARGIN,
        HEADER_BASELINE_Y + 18.0,
        &format!("Teacher: {}", name),
        11.0,
        false,
        BODY_TEXT,
    ));
    ops.push(text(
        MARGIN + 200.0,
        HEADER_BASELINE_Y + 18.0,
        &format!("Email: {}", teacher_email),
        11.0,
        false,
        BODY_TEXT,
    ));

    // Day headers across the top of the table.
    for (i, day) in DayCode::ALL.iter().enumerate() {
        let x = MARGIN + TIME_COLUMN_WIDTH + i as f64 * day_col_w + 6.0;
        ops.push(text(x, table_y + 12.0, day.as_str(), 10.0, true, BODY_TEXT));
    }

    // Time gutter edge, then one separator per day column boundary.
    ops.push(DrawOp::Line {
        x1: MARGIN + TIME_COLUMN_WIDTH,
        y1: table_y - 4.0,
        x2: MARGIN + TIME_COLUMN_WIDTH,
        y2: table_y + table_height,
        width: 0.5,
        gray: 220,
    });
    for i in 0..=DayCode::ALL.len() {
        let x = MARGIN + TIME_COLUMN_WIDTH + i as f64 * day_col_w;
        ops.push(DrawOp::Line {
            x1: x,
            y1: table_y - 6.0,
            x2: x,
            y2: table_y + table_height,
            width: 0.4,
            gray: 240,
        });
    }

    // Hour gridlines with labels, top of window through the closing hour.
    let mut minute = window.start_minute();
    while minute <= (window.end_hour + 1) * 60 {
        let y = table_y + (minute - window.start_minute()) as f64 * px_per_minute;
        ops.push(DrawOp::Line {
            x1: MARGIN,
            y1: y,
            x2: MARGIN + table_width,
            y2: y,
            width: 0.6,
            gray: 200,
        });
        ops.push(text(MARGIN + 4.0, y - 2.0, &hour_label(minute), 8.0, false, ACCENT));
        minute += 60;
    }

    // Blocks, one rounded rect per class occurrence.
    for (day_idx, day) in DayCode::ALL.iter().enumerate() {
        for (stack_idx, block) in layout.day(*day).iter().enumerate() {
            let inset = (stack_idx % OVERLAP_CYCLE) as f64 * OVERLAP_STEP;
            let x = MARGIN + TIME_COLUMN_WIDTH + day_idx as f64 * day_col_w + 6.0 + inset;
            let w = day_col_w - 12.0 - inset;
            let y = table_y + (block.start_minute - window.start_minute()) as f64 * px_per_minute;
            let h = (block.duration_minutes as f64 * px_per_minute).max(MIN_BLOCK_HEIGHT);

            ops.push(DrawOp::RoundedRect {
                x,
                y: y + 2.0,
                w,
                h: h - 4.0,
                radius: CORNER_RADIUS,
                fill: ACCENT.to_string(),
            });

            let max_text_width = w - BLOCK_PADDING * 2.0;
            let mut title_lines = split_text_to_size(&block.title, max_text_width, 10.0);
            title_lines.truncate(TITLE_LINE_LIMIT);
            let title_line_count = title_lines.len();
            ops.push(DrawOp::Text {
                x: x + BLOCK_PADDING,
                y: y + BLOCK_PADDING + 8.0,
                lines: title_lines,
                font_size: 10.0,
                bold: true,
                color: BLOCK_TEXT.to_string(),
            });

            let mut info_parts = Vec::new();
            if !block.room.is_empty() {
                info_parts.push(format!("Room {}", block.room));
            }
            info_parts.push(clock_range(block.start_minute, block.end_minute()));
            let info = info_parts.join(" \u{2022} ");
            ops.push(DrawOp::Text {
                x: x + BLOCK_PADDING,
                y: y + BLOCK_PADDING + 8.0 + title_line_count as f64 * TITLE_LINE_ADVANCE,
                lines: split_text_to_size(&info, max_text_width, 8.0),
                font_size: 8.0,
                bold: false,
                color: BLOCK_TEXT.to_string(),
            });
        }
    }

    ops.push(text(
        MARGIN,
        PAGE_HEIGHT_PT - 28.0,
        "Generated by CoTeacher",
        10.0,
        false,
        FOOTER_TEXT,
    ));

    DocumentModel {
        page_width: PAGE_WIDTH_PT,
        page_height: PAGE_HEIGHT_PT,
        file_name: format!("{}_Weekly_Timetable.pdf", name),
        ops,
    }
}

fn text(x: f64, y: f64, content: &str, font_size: f64, bold: bool, color: &str) -> DrawOp {
    DrawOp::Text {
        x,
        y,
        lines: vec![content.to_string()],
        font_size,
        bold,
        color: color.to_string(),
    }
}

// Printed block text drops the AM/PM suffix to save width.
fn clock_range(start: i64, end: i64) -> String {
    format!("{} - {}", clock_label(start), clock_label(end))
}

fn clock_label(minute: i64) -> String {
    let hour = minute / 60;
    let display = if hour % 12 == 0 { 12 } else { hour % 12 };
    format!("{}:{:02}", display, minute % 60)
}

/// Greedy word wrap against an approximate Helvetica advance-width table.
/// Words wider than a full line are hard-broken mid-word, matching how the
/// PDF library's own splitter behaves.
pub fn split_text_to_size(content: &str, max_width: f64, font_size: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in content.split_whitespace() {
        if text_width(word, font_size) > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            hard_break(word, max_width, font_size, &mut lines, &mut current);
            continue;
        }

        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(&candidate, font_size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn hard_break(word: &str, max_width: f64, font_size: f64, lines: &mut Vec<String>, current: &mut String) {
    for c in word.chars() {
        let candidate_width = text_width(current, font_size) + glyph_em(c) * font_size;
        if !current.is_empty() && candidate_width > max_width {
            lines.push(std::mem::take(current));
        }
        current.push(c);
    }
}

fn text_width(content: &str, font_size: f64) -> f64 {
    content.chars().map(glyph_em).sum::<f64>() * font_size
}

// Coarse Helvetica advance widths in em. Close enough for wrap decisions;
// exact metrics live with the PDF collaborator.
fn glyph_em(c: char) -> f64 {
    match c {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.28,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' | ' ' => 0.35,
        'm' | 'w' | 'M' | 'W' => 0.85,
        c if c.is_ascii_uppercase() => 0.68,
        c if c.is_ascii_digit() => 0.56,
        _ => 0.52,
    }
}
