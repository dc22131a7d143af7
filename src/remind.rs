//! Reminder scheduling over a resolved due date.
//!
//! Pure date arithmetic: given a due date, a category and a priority, work
//! out which future moments deserve a nudge. Nothing here touches the
//! journal or the wall clock.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::model::{Category, Priority};

/// Whole days left until the due date, rounded up. Millisecond precision,
/// so a due date 24h01s away counts as two days out.
pub fn days_until_due(due_date: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let millis = (due_date - now).num_milliseconds();
    (millis as f64 / (24.0 * 60.0 * 60.0 * 1000.0)).ceil() as i64
}

/// Compute the reminder times for a task.
///
/// Candidates that are not strictly in the future are dropped; survivors
/// come back sorted ascending, duplicates preserved.
pub fn schedule(
    due_date: NaiveDateTime,
    category: Category,
    priority: Priority,
    now: NaiveDateTime,
) -> Vec<NaiveDateTime> {
    let days_left = days_until_due(due_date, now);
    let due_day = due_date.date();
    let mut reminders = Vec::new();

    // Mid-morning on the day itself.
    push_future(&mut reminders, at_clock(due_day, 9, 0), now);

    // Exams and forms earn a longer runway.
    if matches!(category, Category::Exam | Category::Form) {
        if days_left > 7 {
            push_future(&mut reminders, at_clock(due_day - Duration::days(7), 10, 0), now);
        }
        if days_left > 3 {
            push_future(&mut reminders, at_clock(due_day - Duration::days(3), 10, 0), now);
        }
    }

    // Eve-of-deadline nudge for every category.
    if days_left > 1 {
        push_future(&mut reminders, at_clock(due_day - Duration::days(1), 14, 0), now);
    }

    // Urgent tasks get hit again, morning and afternoon.
    if priority == Priority::Urgent && days_left > 0 {
        push_future(&mut reminders, at_clock(due_day, 8, 0), now);
        push_future(&mut reminders, at_clock(due_day, 14, 0), now);
    }

    reminders.sort();
    reminders
}

fn push_future(reminders: &mut Vec<NaiveDateTime>, candidate: NaiveDateTime, now: NaiveDateTime) {
    if candidate > now {
        reminders.push(candidate);
    }
}

/// The given day at the given wall-clock time.
pub(crate) fn at_clock(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, minute, 0).expect("in-range wall clock time")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_days_until_due_rounds_up() {
        let now = at(2024, 1, 10, 12, 0);
        assert_eq!(days_until_due(at(2024, 1, 11, 12, 0), now), 1);
        assert_eq!(days_until_due(at(2024, 1, 11, 12, 1), now), 2);
        assert_eq!(days_until_due(at(2024, 1, 10, 12, 0), now), 0);
        assert_eq!(days_until_due(at(2024, 1, 9, 11, 0), now), -1);
    }

    #[test]
    fn test_far_exam_gets_the_full_runway() {
        let now = at(2024, 1, 1, 8, 0);
        let due = at(2024, 1, 21, 0, 0);

        let reminders = schedule(due, Category::Exam, Priority::Medium, now);
        assert_eq!(
            reminders,
            vec![
                at(2024, 1, 14, 10, 0),
                at(2024, 1, 18, 10, 0),
                at(2024, 1, 20, 14, 0),
                at(2024, 1, 21, 9, 0),
            ]
        );
    }

    #[test]
    fn test_far_personal_task_gets_no_pre_reminders() {
        let now = at(2024, 1, 1, 8, 0);
        let due = at(2024, 1, 21, 0, 0);

        let reminders = schedule(due, Category::Personal, Priority::Medium, now);
        assert_eq!(reminders, vec![at(2024, 1, 20, 14, 0), at(2024, 1, 21, 9, 0)]);
    }

    #[test]
    fn test_urgent_task_is_hit_three_times_on_the_due_day() {
        let now = at(2024, 6, 1, 12, 0);
        let due = at(2024, 6, 2, 23, 59);

        let reminders = schedule(due, Category::Exam, Priority::Urgent, now);
        assert_eq!(
            reminders,
            vec![
                at(2024, 6, 1, 14, 0),
                at(2024, 6, 2, 8, 0),
                at(2024, 6, 2, 9, 0),
                at(2024, 6, 2, 14, 0),
            ]
        );
    }

    #[test]
    fn test_candidates_in_the_past_are_dropped() {
        // 9:00 has gone by; only the urgent afternoon slot is still ahead.
        let now = at(2024, 5, 5, 9, 30);
        let due = at(2024, 5, 5, 10, 0);

        let reminders = schedule(due, Category::Personal, Priority::Urgent, now);
        assert_eq!(reminders, vec![at(2024, 5, 5, 14, 0)]);
    }

    #[test]
    fn test_overdue_task_yields_nothing() {
        let now = at(2024, 5, 5, 9, 30);
        let due = at(2024, 5, 4, 10, 0);

        assert!(schedule(due, Category::Exam, Priority::Urgent, now).is_empty());
    }

    #[test]
    fn test_output_is_sorted_and_strictly_future() {
        let now = at(2024, 3, 14, 22, 45);
        for (category, priority, days_out) in [
            (Category::Exam, Priority::Urgent, 12),
            (Category::Form, Priority::Low, 5),
            (Category::Travel, Priority::Urgent, 2),
            (Category::Personal, Priority::Medium, 0),
        ] {
            let due = now + Duration::days(days_out);
            let reminders = schedule(due, category, priority, now);
            assert!(reminders.iter().all(|time| *time > now));
            assert!(reminders.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }

    #[test]
    fn test_boundary_days_are_excluded_from_pre_reminders() {
        let now = at(2024, 1, 1, 0, 0);
        // Exactly 7 days out: no week-before reminder, but the 3-day one fires.
        let due = at(2024, 1, 8, 0, 0);

        let reminders = schedule(due, Category::Form, Priority::Medium, now);
        assert_eq!(
            reminders,
            vec![at(2024, 1, 5, 10, 0), at(2024, 1, 7, 14, 0), at(2024, 1, 8, 9, 0)]
        );
    }
}
