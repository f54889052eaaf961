use serde::Serialize;
use serde_json::{json, Value as JsonValue};

/// Grid granularity: one row per 5 minutes.
pub const ROW_MINUTES: i64 = 5;

/// One teaching session. Raw class durations snap to 1..3 sessions.
pub const SESSION_MINUTES: i64 = 55;

pub const MAX_SESSIONS: i64 = 3;

/// Six-day teaching week. Sunday carries no classes and has no code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DayCode {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl DayCode {
    pub const ALL: [DayCode; 6] = [
        DayCode::Mon,
        DayCode::Tue,
        DayCode::Wed,
        DayCode::Thu,
        DayCode::Fri,
        DayCode::Sat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayCode::Mon => "Mon",
            DayCode::Tue => "Tue",
            DayCode::Wed => "Wed",
            DayCode::Thu => "Thu",
            DayCode::Fri => "Fri",
            DayCode::Sat => "Sat",
        }
    }

    pub fn index(self) -> usize {
        match self {
            DayCode::Mon => 0,
            DayCode::Tue => 1,
            DayCode::Wed => 2,
            DayCode::Thu => 3,
            DayCode::Fri => 4,
            DayCode::Sat => 5,
        }
    }

    /// Normalize a raw day token: trim, keep the first three characters,
    /// drop periods/commas/embedded whitespace, then match case-sensitively.
    /// "Monday", "Mon." and "Mon" all resolve to `Mon`; "mon" does not.
    pub fn from_token(raw: &str) -> Option<DayCode> {
        let head: String = raw
            .trim()
            .chars()
            .take(3)
            .filter(|c| *c != '.' && *c != ',' && !c.is_whitespace())
            .collect();
        match head.as_str() {
            "Mon" => Some(DayCode::Mon),
            "Tue" => Some(DayCode::Tue),
            "Wed" => Some(DayCode::Wed),
            "Thu" => Some(DayCode::Thu),
            "Fri" => Some(DayCode::Fri),
            "Sat" => Some(DayCode::Sat),
            _ => None,
        }
    }
}

/// Daily time range the grid and the printed page render. Rows outside the
/// window do not exist; classes starting before it are clipped to its
/// opening instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayWindow {
    pub start_hour: i64,
    pub end_hour: i64,
}

impl DisplayWindow {
    pub const DEFAULT_START_HOUR: i64 = 7;
    pub const DEFAULT_END_HOUR: i64 = 21;

    pub fn start_minute(self) -> i64 {
        self.start_hour * 60
    }

    /// Minutes covered by the window; the end hour is included in full.
    pub fn total_minutes(self) -> i64 {
        (self.end_hour - self.start_hour + 1) * 60
    }

    pub fn blocks_per_day(self) -> i64 {
        self.total_minutes() / ROW_MINUTES
    }
}

impl Default for DisplayWindow {
    fn default() -> Self {
        DisplayWindow {
            start_hour: Self::DEFAULT_START_HOUR,
            end_hour: Self::DEFAULT_END_HOUR,
        }
    }
}

/// One class row after field-fallback normalization. Day tokens stay raw
/// here; they are resolved against `DayCode` during layout.
#[derive(Debug, Clone)]
pub struct ClassScheduleEntry {
    pub id: String,
    pub title: String,
    pub days: Vec<String>,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub room: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    MissingId,
    BadStartTime,
    BadEndTime,
    NoValidDays,
}

/// Why an input row produced no blocks. Collected instead of raised: partial
/// schedule data must not block rendering of the rest of the week.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    pub reason: SkipReason,
}

/// One scheduled occurrence of a class on one day, positioned on the
/// 5-minute row grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleBlock {
    pub id: String,
    pub title: String,
    pub row_start: i64,
    pub row_span: i64,
    pub start_minute: i64,
    pub duration_minutes: i64,
    pub room: String,
}

impl ScheduleBlock {
    pub fn end_minute(&self) -> i64 {
        self.start_minute + self.duration_minutes
    }
}

/// Per-day block lists plus the rows that were dropped along the way.
/// Both renderers consume this as-is; neither re-derives rows or ordering.
#[derive(Debug, Clone, Default)]
pub struct ScheduleLayout {
    days: [Vec<ScheduleBlock>; 6],
    pub skipped: Vec<SkippedEntry>,
}

impl ScheduleLayout {
    pub fn day(&self, day: DayCode) -> &[ScheduleBlock] {
        &self.days[day.index()]
    }

    pub fn block_count(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }

    /// `{ "Mon": [...], ..., "Sat": [...] }` with every day present.
    pub fn days_json(&self) -> JsonValue {
        let mut obj = serde_json::Map::new();
        for day in DayCode::ALL {
            let blocks = serde_json::to_value(self.day(day)).unwrap_or_else(|_| json!([]));
            obj.insert(day.as_str().to_string(), blocks);
        }
        JsonValue::Object(obj)
    }

    fn note_skip(&mut self, class_id: Option<String>, reason: SkipReason) {
        self.skipped.push(SkippedEntry { class_id, reason });
    }
}

/// Parse "HH:MM" or "HH:MM:SS" into minutes since midnight. Seconds are
/// ignored. Out-of-range components (hour 25, minute 99) pass through
/// unvalidated; callers treat the result as an offset, not a clock check.
pub fn parse_time_to_minutes(text: &str) -> Option<i64> {
    let mut parts = text.split(':');
    let hour = parts.next()?.trim().parse::<i64>().ok()?;
    let minute = parts.next()?.trim().parse::<i64>().ok()?;
    Some(hour * 60 + minute)
}

/// Snap a raw duration to whole sessions. Physical classes run in fixed
/// 55-minute periods, so display height only needs the nearest period count.
pub fn minutes_to_sessions(minutes: i64) -> i64 {
    if minutes <= 0 {
        return 1;
    }
    let sessions = (minutes as f64 / SESSION_MINUTES as f64).round() as i64;
    sessions.clamp(1, MAX_SESSIONS)
}

/// 12-hour top-of-hour label: 420 -> "7:00 AM", 720 -> "12:00 PM".
pub fn hour_label(minute: i64) -> String {
    let hour = minute / 60;
    let display = if hour % 12 == 0 { 12 } else { hour % 12 };
    let suffix = if hour < 12 { "AM" } else { "PM" };
    format!("{}:00 {}", display, suffix)
}

/// Normalize one loosely-shaped class row. Field fallbacks mirror what the
/// dashboard tolerates in its rows: `className`/`subject`/`classCode` for
/// the title, `roomNumber`/`room`/`roomNo` for the room, and `scheduleDays`
/// as either an array of tokens or a single token string.
pub fn entry_from_row(row: &JsonValue) -> Result<ClassScheduleEntry, SkippedEntry> {
    let id = match row.get("id") {
        Some(JsonValue::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(JsonValue::Number(n)) => n.to_string(),
        _ => {
            return Err(SkippedEntry {
                class_id: None,
                reason: SkipReason::MissingId,
            })
        }
    };

    let title = first_text(row, &["className", "subject", "classCode"])
        .unwrap_or_else(|| "Untitled".to_string());
    let room = first_text(row, &["roomNumber", "room", "roomNo"]).unwrap_or_default();

    let days = ["scheduleDays", "scheduleDaysText"]
        .iter()
        .find_map(|key| match row.get(*key) {
            Some(JsonValue::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            ),
            Some(JsonValue::String(s)) => Some(vec![s.clone()]),
            _ => None,
        })
        .unwrap_or_default();

    Ok(ClassScheduleEntry {
        id,
        title,
        days,
        time_start: row.get("timeStart").and_then(|v| v.as_str()).map(str::to_string),
        time_end: row.get("timeEnd").and_then(|v| v.as_str()).map(str::to_string),
        room,
    })
}

fn first_text(row: &JsonValue, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        row.get(*key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Build the per-day block map. Never fails: rows with unusable times or no
/// recognizable day fall into the skipped list and the rest of the week
/// still lays out. Each day's list ends up sorted by start minute, which is
/// the ordering both renderers rely on for overlap stacking.
pub fn build_layout(entries: &[ClassScheduleEntry], window: DisplayWindow) -> ScheduleLayout {
    let mut layout = ScheduleLayout::default();
    for entry in entries {
        place_entry(&mut layout, entry, window);
    }
    for blocks in layout.days.iter_mut() {
        // Stable, so same-start blocks keep input order.
        blocks.sort_by_key(|b| b.start_minute);
    }
    layout
}

fn place_entry(layout: &mut ScheduleLayout, entry: &ClassScheduleEntry, window: DisplayWindow) {
    let start_min = match entry.time_start.as_deref().and_then(parse_time_to_minutes) {
        Some(v) => v,
        None => {
            layout.note_skip(Some(entry.id.clone()), SkipReason::BadStartTime);
            return;
        }
    };
    let end_min = match entry.time_end.as_deref().and_then(parse_time_to_minutes) {
        Some(v) => v,
        None => {
            layout.note_skip(Some(entry.id.clone()), SkipReason::BadEndTime);
            return;
        }
    };

    // Classes opening before the window are clipped to its first row, not
    // hidden. A degenerate or inverted range floors to a 1-minute duration.
    let display_start = start_min.max(window.start_minute());
    let raw_duration = (end_min - start_min).max(1);
    let duration = minutes_to_sessions(raw_duration) * SESSION_MINUTES;

    let row_start = (display_start - window.start_minute()) / ROW_MINUTES;
    let row_span = (duration + ROW_MINUTES - 1) / ROW_MINUTES;

    let mut placed = false;
    for token in &entry.days {
        let Some(day) = DayCode::from_token(token) else {
            continue;
        };
        layout.days[day.index()].push(ScheduleBlock {
            id: format!("{}-{}", entry.id, day.as_str()),
            title: entry.title.clone(),
            row_start,
            row_span,
            start_minute: display_start,
            duration_minutes: duration,
            room: entry.room.clone(),
        });
        placed = true;
    }

    if !placed {
        layout.note_skip(Some(entry.id.clone()), SkipReason::NoValidDays);
    }
}
