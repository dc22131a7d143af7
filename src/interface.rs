use anyhow::{anyhow, Result};
use chrono::{Duration, Local, NaiveDateTime};
use humantime::format_duration;
use prettytable::Table;
use rusqlite::Connection;
use std::cmp::Ordering;
use std::time::Duration as StdDuration;

use crate::infer;
use crate::model;
use crate::model::Task;

/// Infer a task from free text and append it to the journal, echoing what
/// the engine decided.
pub fn add(db: Connection, text: String) -> Result<()> {
    if text.trim().is_empty() {
        return Err(anyhow!("Nothing to add: the task text is empty."));
    }

    let now = Local::now().naive_local();
    let draft = infer::parse_task(&text, now);
    let id = model::add_task(&db, &draft, now)?;

    println!("{}. {} [{}/{}]", id, draft.title, draft.category, draft.priority);
    println!("   due {}", draft.due_date.format("%Y-%m-%d %H:%M"));

    let reminders = model::reminders_for(&db, id)?;
    if reminders.is_empty() {
        println!("   no reminders scheduled");
    } else {
        let times: Vec<String> = reminders
            .iter()
            .map(|r| r.time.format("%Y-%m-%d %H:%M").to_string())
            .collect();
        println!("   reminders: {}", times.join(", "));
    }
    Ok(())
}

/// Print the task table. Open tasks come first, most pressing priority on
/// top and nearest due date inside a priority; completed tasks follow,
/// latest completion first.
pub fn list(db: Connection) -> Result<()> {
    let now = Local::now().naive_local();
    let mut tasks = model::tasks(&db)?;

    if tasks.is_empty() {
        println!("No tasks yet. Use 'nudge add' to capture one.");
        return Ok(());
    }

    tasks.sort_by(display_order);

    let mut table = Table::new();
    table.add_row(row!["id", "task", "category", "priority", "due", "status"]);
    for task in &tasks {
        table.add_row(row![
            task.id,
            task_cell(task),
            task.category,
            task.priority,
            format!(
                "{}\n{}",
                task.due_date.format("%Y-%m-%d %H:%M"),
                due_label(task, now)
            ),
            if task.completed { "done" } else { "open" }
        ]);
    }
    table.printstd();

    Ok(())
}

/// Toggle a task between open and done.
pub fn done(db: Connection, id: u32) -> Result<()> {
    let now = Local::now().naive_local();
    match model::toggle_complete(&db, id, now)? {
        Some(task) if task.completed => println!("Done: {}", task.title),
        Some(task) => println!("Reopened: {}", task.title),
        None => println!("No task with id {}.", id),
    }
    Ok(())
}

/// Remove a task and its reminders.
pub fn remove(db: Connection, id: u32) -> Result<()> {
    if model::remove_task(&db, id)? {
        println!("Removed task {}.", id);
    } else {
        println!("No task with id {}.", id);
    }
    Ok(())
}

/// Print the day digest.
pub fn summary(db: Connection) -> Result<()> {
    let now = Local::now().naive_local();
    let tasks = model::tasks(&db)?;
    let digest = model::summarize(&tasks, now);

    if digest.active == 0 && digest.completed_today == 0 {
        println!("Nothing on your plate. Use 'nudge add' to capture a task.");
        return Ok(());
    }

    println!("due today     {}", digest.due_today);
    println!("due tomorrow  {}", digest.due_tomorrow);
    println!("this week     {}", digest.due_this_week);
    println!("overdue       {}", digest.overdue);
    println!("urgent        {}", digest.urgent);
    println!("done today    {}", digest.completed_today);

    if digest.overdue > 0 {
        println!(
            "You have {} overdue task{}. Don't let them pile up!",
            digest.overdue,
            if digest.overdue > 1 { "s" } else { "" }
        );
    }
    Ok(())
}

/// Print reminders that have come due and mark them sent.
pub fn remind(db: Connection) -> Result<()> {
    let now = Local::now().naive_local();
    let due = model::due_reminders(&db, now)?;

    if due.is_empty() {
        println!("No reminders due.");
        return Ok(());
    }

    for (reminder, title) in due {
        println!("{}  {}", reminder.time.format("%Y-%m-%d %H:%M"), title);
        model::mark_sent(&db, reminder.id)?;
    }
    Ok(())
}

fn display_order(a: &Task, b: &Task) -> Ordering {
    match (a.completed, b.completed) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (false, false) => a
            .priority
            .rank()
            .cmp(&b.priority.rank())
            .then(a.due_date.cmp(&b.due_date)),
        (true, true) => b.completed_at.cmp(&a.completed_at),
    }
}

/// Title plus optional description, wrapped to the table column.
fn task_cell(task: &Task) -> String {
    let mut cell = textwrap::fill(&task.title, 40);
    if let Some(description) = &task.description {
        cell.push('\n');
        cell.push_str(&textwrap::fill(description, 40));
    }
    cell
}

/// Relative label for the due column: today, tomorrow, overdue, or a
/// rounded distance for anything further out.
fn due_label(task: &Task, now: NaiveDateTime) -> String {
    if task.completed {
        return "-".to_string();
    }
    let due_day = task.due_date.date();
    if due_day == now.date() {
        return "today".to_string();
    }
    if due_day == now.date() + Duration::days(1) {
        return "tomorrow".to_string();
    }
    if task.due_date < now {
        return "overdue".to_string();
    }
    // Anything past tomorrow is at least a day out; whole days are enough.
    let days = (task.due_date - now).num_days().max(1) as u64;
    format!("in {}", format_duration(StdDuration::from_secs(days * 86_400)))
}
