use serde::Serialize;

use crate::schedule::{hour_label, DayCode, DisplayWindow, ScheduleLayout, ROW_MINUTES};

/// Height of one 5-minute row.
pub const ROW_HEIGHT_PX: i64 = 14;
pub const TIME_COLUMN_WIDTH_PX: i64 = 90;
/// Below this the six day columns get too narrow; the view scrolls instead.
pub const MIN_GRID_WIDTH_PX: i64 = 1000;
/// Lateral inset applied per stacking position when blocks overlap.
pub const OVERLAP_STEP_PX: i64 = 6;
const BLOCK_Z_BASE: i64 = 40;
/// Grid rows are 1-based and row 1 holds the day headers.
const HEADER_ROW_OFFSET: i64 = 2;

/// Screen-coordinate model for the interactive weekly grid. Pure projection
/// of a `ScheduleLayout`; geometry and ordering come in precomputed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridModel {
    pub rows: i64,
    pub row_height_px: i64,
    pub time_column_width_px: i64,
    pub day_column_count: i64,
    pub min_width_px: i64,
    pub day_headers: Vec<GridDayHeader>,
    pub time_labels: Vec<GridTimeLabel>,
    pub blocks: Vec<GridBlock>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDayHeader {
    pub label: String,
    pub grid_column: i64,
}

/// One label cell per 5-minute row. Text only where the row opens a full
/// hour; the rest stay blank to keep the column readable.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridTimeLabel {
    pub grid_row: i64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridBlock {
    pub id: String,
    pub title: String,
    pub room: String,
    pub grid_column: i64,
    pub grid_row_start: i64,
    pub grid_row_end: i64,
    pub inset_px: i64,
    pub z_index: i64,
    pub time_range: String,
}

pub fn render_grid(layout: &ScheduleLayout, window: DisplayWindow) -> GridModel {
    let rows = window.blocks_per_day();

    // Column 1 is the time gutter, so day columns start at 2.
    let day_headers = DayCode::ALL
        .iter()
        .enumerate()
        .map(|(i, day)| GridDayHeader {
            label: day.as_str().to_string(),
            grid_column: i as i64 + 2,
        })
        .collect();

    let mut time_labels = Vec::with_capacity(rows as usize);
    for idx in 0..rows {
        let minute = window.start_minute() + idx * ROW_MINUTES;
        let label = if minute % 60 == 0 {
            hour_label(minute)
        } else {
            String::new()
        };
        time_labels.push(GridTimeLabel {
            grid_row: idx + HEADER_ROW_OFFSET,
            label,
        });
    }

    let mut blocks = Vec::with_capacity(layout.block_count());
    for (col_idx, day) in DayCode::ALL.iter().enumerate() {
        for (stack_idx, block) in layout.day(*day).iter().enumerate() {
            let i = stack_idx as i64;
            blocks.push(GridBlock {
                id: block.id.clone(),
                title: block.title.clone(),
                room: block.room.clone(),
                grid_column: col_idx as i64 + 2,
                grid_row_start: block.row_start + HEADER_ROW_OFFSET,
                grid_row_end: block.row_start + block.row_span + HEADER_ROW_OFFSET,
                inset_px: i * OVERLAP_STEP_PX,
                z_index: BLOCK_Z_BASE + i,
                time_range: clock_range(block.start_minute, block.end_minute()),
            });
        }
    }

    GridModel {
        rows,
        row_height_px: ROW_HEIGHT_PX,
        time_column_width_px: TIME_COLUMN_WIDTH_PX,
        day_column_count: DayCode::ALL.len() as i64,
        min_width_px: MIN_GRID_WIDTH_PX,
        day_headers,
        time_labels,
        blocks,
    }
}

// On-screen block text keeps the 24-hour clock.
fn clock_range(start: i64, end: i64) -> String {
    format!(
        "{}:{:02} - {}:{:02}",
        start / 60,
        start % 60,
        end / 60,
        end % 60
    )
}
