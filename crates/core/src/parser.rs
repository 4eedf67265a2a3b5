use anyhow::{anyhow, Context, Result};
use chrono::{prelude::*, Duration};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::capture::TaskInput;
use crate::model::{Priority, Recurrence};

/// Result of inline token parsing from captured text.
#[derive(Debug, Default)]
struct InlineTokens {
    title_words: Vec<String>,
    category: Option<String>,
    due_date: Option<DateTime<Utc>>,
    priority: Option<Priority>,
    recurrence: Option<Recurrence>,
}

/// Parse free text with inline tokens (`due:`, `p:`, `#category`, `every:`) into a task draft.
pub fn parse_capture(text: &str) -> Result<TaskInput> {
    parse_capture_at(text, Local::now())
}

pub fn parse_capture_at(text: &str, now_local: DateTime<Local>) -> Result<TaskInput> {
    let inline = parse_inline_tokens(text, now_local)?;

    let title = inline.title_words.join(" ").trim().to_string();
    if title.is_empty() {
        return Err(anyhow!("Task title cannot be empty after parsing tokens"));
    }

    let mut input = TaskInput::titled(title);
    if let Some(category) = inline.category {
        input.category = category;
    }
    if let Some(priority) = inline.priority {
        input.priority = priority;
    }
    input.due_date = inline.due_date;
    input.recurrence = inline.recurrence;
    Ok(input)
}

/// Overlay tokens found in `text` on top of an existing draft. Words without a token
/// replace the title only when present.
pub fn apply_capture(base: TaskInput, text: &str) -> Result<TaskInput> {
    let inline = parse_inline_tokens(text, Local::now())?;
    let mut input = base;
    let title = inline.title_words.join(" ").trim().to_string();
    if !title.is_empty() {
        input.title = title;
    }
    if let Some(category) = inline.category {
        input.category = category;
    }
    if let Some(priority) = inline.priority {
        input.priority = priority;
    }
    if inline.due_date.is_some() {
        input.due_date = inline.due_date;
    }
    if inline.recurrence.is_some() {
        input.recurrence = inline.recurrence;
    }
    Ok(input)
}

fn parse_inline_tokens(text: &str, now_local: DateTime<Local>) -> Result<InlineTokens> {
    let mut result = InlineTokens::default();

    for raw_piece in text.split_whitespace() {
        let (piece, trailing) = strip_trailing_punctuation(raw_piece);
        if piece.starts_with('#') && piece.len() > 1 {
            result.category = Some(piece.trim_start_matches('#').to_ascii_lowercase());
            if let Some(rest) = trailing {
                push_trailing(&mut result.title_words, rest);
            }
            continue;
        }
        if let Some(spec) = piece.strip_prefix("due:") {
            result.due_date = Some(parse_date_spec_at(spec, now_local)?);
            if let Some(rest) = trailing {
                push_trailing(&mut result.title_words, rest);
            }
            continue;
        }
        if let Some(spec) = piece.strip_prefix("p:") {
            result.priority = Some(spec.parse::<Priority>()?);
            if let Some(rest) = trailing {
                push_trailing(&mut result.title_words, rest);
            }
            continue;
        }
        if let Some(spec) = piece.strip_prefix("every:") {
            result.recurrence = Some(spec.parse::<Recurrence>()?);
            if let Some(rest) = trailing {
                push_trailing(&mut result.title_words, rest);
            }
            continue;
        }

        result.title_words.push(raw_piece.to_string());
    }

    Ok(result)
}

fn strip_trailing_punctuation(input: &str) -> (String, Option<String>) {
    static PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;.!?]+$").expect("valid regex"));
    if let Some(mat) = PUNCT_RE.find(input) {
        let token = input[..mat.start()].to_string();
        let trailing = input[mat.start()..].to_string();
        (token, Some(trailing))
    } else {
        (input.to_string(), None)
    }
}

fn push_trailing(words: &mut Vec<String>, trailing: String) {
    if let Some(last) = words.last_mut() {
        last.push_str(&trailing);
    }
}

pub fn parse_date_spec(spec: &str) -> Result<DateTime<Utc>> {
    parse_date_spec_at(spec, Local::now())
}

pub fn parse_date_spec_at(spec: &str, now_local: DateTime<Local>) -> Result<DateTime<Utc>> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Date specification cannot be empty"));
    }

    let lower = trimmed.to_ascii_lowercase();

    match lower.as_str() {
        "now" => return Ok(now_local.with_timezone(&Utc)),
        "today" => return at_nine(now_local.date_naive()),
        "tomorrow" => return at_nine(now_local.date_naive() + Duration::days(1)),
        _ => {}
    }

    if lower.starts_with('+') {
        return parse_relative_spec(&lower, now_local);
    }

    if let Some(weekday) = parse_weekday(&lower) {
        let mut days_ahead = (weekday.num_days_from_monday() as i32
            - now_local.weekday().num_days_from_monday() as i32)
            .rem_euclid(7);
        if days_ahead == 0 {
            days_ahead = 7;
        }
        return at_nine(now_local.date_naive() + Duration::days(days_ahead.into()));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M") {
        return resolve_local(parsed, trimmed);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return at_nine(date);
    }

    if let Ok(time) = NaiveTime::parse_from_str(trimmed, "%H:%M") {
        return resolve_local(now_local.date_naive().and_time(time), trimmed);
    }

    Err(anyhow!(
        "Unrecognized date specification '{}'. Try YYYY-MM-DD, today, tomorrow, +3d, +2h, mon",
        spec
    ))
}

fn at_nine(date: NaiveDate) -> Result<DateTime<Utc>> {
    let dt = date
        .and_hms_opt(9, 0, 0)
        .ok_or_else(|| anyhow!("Invalid time of day for {}", date))?;
    resolve_local(dt, &date.to_string())
}

fn resolve_local(dt: NaiveDateTime, label: &str) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&dt)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("Could not resolve local time for '{}'", label))
}

fn parse_relative_spec(spec: &str, now_local: DateTime<Local>) -> Result<DateTime<Utc>> {
    let body = spec.strip_prefix('+').unwrap_or(spec);
    let Some((unit_start, _)) = body.char_indices().last() else {
        return Err(anyhow!("Relative date '{}' is too short", spec));
    };
    let (number_part, unit) = body.split_at(unit_start);
    if number_part.is_empty() {
        return Err(anyhow!("Relative date '{}' is too short", spec));
    }
    let value: i64 = number_part.parse().context("Invalid relative offset")?;
    let offset = match unit {
        "m" => Duration::try_minutes(value),
        "h" => Duration::try_hours(value),
        "d" => Duration::try_days(value),
        "w" => Duration::try_weeks(value),
        other => {
            return Err(anyhow!(
                "Unsupported relative unit '{}'. Use m, h, d, or w.",
                other
            ))
        }
    };
    offset
        .and_then(|offset| now_local.checked_add_signed(offset))
        .map(|due| due.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("Relative offset '{}' is out of range", spec))
}

fn parse_weekday(label: &str) -> Option<Weekday> {
    match label {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}
