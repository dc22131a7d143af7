//! Turns free-text task descriptions into structured drafts.
//!
//! No natural-language understanding happens here: category and priority
//! come from ordered keyword rules, the due date from a handful of date
//! patterns tried in a fixed order. Everything is a pure function of the
//! input text and a caller-supplied reference time, so the same text always
//! yields the same draft under test.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

use crate::model::{Category, Priority};
use crate::remind;
use crate::remind::at_clock;

/// A parsed, not yet saved task. The journal assigns identity and creation
/// time when it persists one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub priority: Priority,
    pub due_date: NaiveDateTime,
    pub suggested_reminders: Vec<NaiveDateTime>,
}

/// Ordered category rules. The first matching pattern wins; the order is
/// load-bearing because the vocabularies overlap ("book the exam fee").
static CATEGORY_RULES: LazyLock<Vec<(Regex, Category)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new("exam|test|gate|jee|neet|study|quiz").unwrap(),
            Category::Exam,
        ),
        (
            Regex::new("ticket|train|flight|bus|travel|book").unwrap(),
            Category::Travel,
        ),
        (
            Regex::new("pay|payment|bill|subscription|renew|fee").unwrap(),
            Category::Payment,
        ),
        (
            Regex::new("form|apply|application|register|registration").unwrap(),
            Category::Form,
        ),
    ]
});

/// Ordered priority rules, first match wins.
static PRIORITY_RULES: LazyLock<Vec<(Regex, Priority)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new("urgent|asap|immediately|critical|important").unwrap(),
            Priority::Urgent,
        ),
        (Regex::new("high|soon|priority").unwrap(), Priority::High),
        (Regex::new("low|maybe|sometime").unwrap(), Priority::Low),
    ]
});

/// Day plus month name, with an optional ordinal suffix: "15th march", "3 apr".
static DAY_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})(?:st|nd|rd|th)?\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec|january|february|march|april|june|july|august|september|october|november|december)").unwrap()
});

static DAYS_AHEAD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*days?").unwrap());

static SENTENCE_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());

/// Parse a free-text description into a draft, reminders included.
///
/// This is the whole engine: category, priority, due date and title split,
/// then the reminder schedule for the resulting attributes. Total on any
/// input; unrecognizable text degrades to a personal, medium-priority task
/// due a week from `now`.
pub fn parse_task(text: &str, now: NaiveDateTime) -> TaskDraft {
    let mut draft = infer(text, now);
    draft.suggested_reminders =
        remind::schedule(draft.due_date, draft.category, draft.priority, now);
    draft
}

/// Infer the structured attributes of a task, without scheduling reminders.
pub fn infer(text: &str, now: NaiveDateTime) -> TaskDraft {
    let (title, description) = split_title(text);
    TaskDraft {
        title,
        description,
        category: detect_category(text),
        priority: detect_priority(text),
        due_date: extract_due_date(text, now),
        suggested_reminders: Vec::new(),
    }
}

/// First matching category rule wins; anything unmatched is a personal task.
pub fn detect_category(text: &str) -> Category {
    let lower = text.to_lowercase();
    for (pattern, category) in CATEGORY_RULES.iter() {
        if pattern.is_match(&lower) {
            return *category;
        }
    }
    Category::Personal
}

/// First matching priority rule wins; anything unmatched is medium.
pub fn detect_priority(text: &str) -> Priority {
    let lower = text.to_lowercase();
    for (pattern, priority) in PRIORITY_RULES.iter() {
        if pattern.is_match(&lower) {
            return *priority;
        }
    }
    Priority::Medium
}

/// Resolve the due date, trying the patterns in a fixed order: explicit
/// day+month, "today", "tomorrow", "next week", "<n> days", and finally a
/// week from `now`.
pub fn extract_due_date(text: &str, now: NaiveDateTime) -> NaiveDateTime {
    let lower = text.to_lowercase();

    if let Some(date) = explicit_day_month(&lower, now) {
        return date;
    }
    if lower.contains("today") {
        return at_clock(now.date(), 23, 59);
    }
    if lower.contains("tomorrow") {
        return at_clock(now.date() + Duration::days(1), 23, 59);
    }
    if lower.contains("next week") {
        return now + Duration::days(7);
    }
    if let Some(date) = days_ahead(&lower, now) {
        return date;
    }
    now + Duration::days(7)
}

/// An explicit day+month resolves to midnight in the current year; a date
/// already behind `now` (strict comparison) moves to the next year.
/// Combinations that form no valid calendar date are treated as no match.
fn explicit_day_month(lower: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let caps = DAY_MONTH_RE.captures(lower)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;

    let date = NaiveDate::from_ymd_opt(now.year(), month, day)?.and_hms_opt(0, 0, 0)?;
    if date < now {
        return NaiveDate::from_ymd_opt(now.year() + 1, month, day)?.and_hms_opt(0, 0, 0);
    }
    Some(date)
}

fn month_number(name: &str) -> Option<u32> {
    let number = match &name[..3] {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(number)
}

/// "<n> day(s)" keeps the current time of day, n days out. Values that
/// overflow the calendar fall through to the default.
fn days_ahead(lower: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let caps = DAYS_AHEAD_RE.captures(lower)?;
    let days: i64 = caps[1].parse().ok()?;
    now.checked_add_signed(Duration::try_days(days)?)
}

/// Short inputs become the title whole. Longer ones split on sentence
/// terminators: the first sentence is the title, the rest are rejoined as
/// the description.
pub fn split_title(text: &str) -> (String, Option<String>) {
    let cleaned = text.trim();
    if cleaned.chars().count() < 50 {
        return (cleaned.to_string(), None);
    }

    let sentences: Vec<&str> = SENTENCE_END_RE
        .split(cleaned)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect();

    match sentences.as_slice() {
        [] => (cleaned.to_string(), None),
        [title] => (title.to_string(), None),
        [title, rest @ ..] => (title.to_string(), Some(rest.join(". "))),
    }
}
