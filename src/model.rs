use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::infer::TaskDraft;

/// Task categories recognized by the inference rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Exam,
    Travel,
    Payment,
    Form,
    Personal,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Exam => "exam",
            Category::Travel => "travel",
            Category::Payment => "payment",
            Category::Form => "form",
            Category::Personal => "personal",
        }
    }

    /// Read back a stored category. Anything unrecognized degrades to
    /// Personal rather than failing the row.
    pub fn from_store(value: &str) -> Category {
        match value {
            "exam" => Category::Exam,
            "travel" => Category::Travel,
            "payment" => Category::Payment,
            "form" => Category::Form,
            _ => Category::Personal,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task priorities recognized by the inference rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Read back a stored priority; unrecognized values degrade to Medium.
    pub fn from_store(value: &str) -> Priority {
        match value {
            "low" => Priority::Low,
            "high" => Priority::High,
            "urgent" => Priority::Urgent,
            _ => Priority::Medium,
        }
    }

    /// Display rank: the most pressing priority sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single task, saved as an entry in the task table.
#[derive(Debug)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub priority: Priority,
    pub due_date: NaiveDateTime,
    pub completed: bool,
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// A scheduled prompt for a task, saved as an entry in the reminder table.
#[derive(Debug)]
pub struct Reminder {
    pub id: u32,
    pub task_id: u32,
    pub time: NaiveDateTime,
    pub sent: bool,
}

/// Initialize the journal database.
pub fn init_journal(db: &Connection) -> Result<()> {
    db.execute(
        "CREATE TABLE if not exists task (
                  id              INTEGER PRIMARY KEY AUTOINCREMENT,
                  title           TEXT NOT NULL,
                  description     TEXT,
                  category        TEXT NOT NULL,
                  priority        TEXT NOT NULL,
                  due_date        TEXT NOT NULL,
                  completed       INTEGER NOT NULL DEFAULT 0,
                  completed_at    TEXT,
                  created_at      TEXT NOT NULL
                  )",
        [],
    )
    .context("Failed to create task table.")?;

    db.execute(
        "CREATE TABLE if not exists reminder (
                  id              INTEGER PRIMARY KEY AUTOINCREMENT,
                  task_id         INTEGER NOT NULL,
                  time            TEXT NOT NULL,
                  sent            INTEGER NOT NULL DEFAULT 0
                  )",
        [],
    )
    .context("Failed to create reminder table.")?;

    db.execute("CREATE INDEX reminder_task ON reminder (task_id)", [])
        .context("Failed to create index on reminder table.")?;

    Ok(())
}

/// Append a task drafted by the inference engine, together with one reminder
/// row per suggested time. Returns the id of the new task.
pub fn add_task(db: &Connection, draft: &TaskDraft, now: NaiveDateTime) -> Result<u32> {
    db.execute(
        "INSERT INTO task (title, description, category, priority, due_date, completed, created_at)
         VALUES(?1, ?2, ?3, ?4, ?5, 0, ?6)",
        params![
            draft.title,
            draft.description,
            draft.category.as_str(),
            draft.priority.as_str(),
            draft.due_date,
            now
        ],
    )
    .context("Failed to insert task into database.")?;

    let task_id = db.last_insert_rowid() as u32;

    for time in &draft.suggested_reminders {
        db.execute(
            "INSERT INTO reminder (task_id, time, sent) VALUES(?1, ?2, 0)",
            params![task_id, time],
        )
        .context("Failed to insert reminder into database.")?;
    }

    Ok(task_id)
}

/// All tasks in the journal, ordered by due date. Display ordering is
/// applied by the caller.
pub fn tasks(db: &Connection) -> Result<Vec<Task>> {
    let mut stmt = db.prepare(
        "SELECT id, title, description, category, priority, due_date, completed, completed_at, created_at
         FROM task ORDER BY due_date",
    )?;
    let mapped_rows = stmt.query_map([], |row| task_from_row(row))?;

    let mut tasks = Vec::new();
    for task in mapped_rows {
        tasks.push(task?);
    }

    Ok(tasks)
}

/// Get the task with the given id, if any.
pub fn task_at(db: &Connection, id: u32) -> Result<Option<Task>> {
    let task = db
        .query_row(
            "SELECT id, title, description, category, priority, due_date, completed, completed_at, created_at
             FROM task WHERE id = ?1",
            params![id],
            |row| task_from_row(row),
        )
        .optional()
        .context("Failed to look up task in database.")?;
    Ok(task)
}

/// Flip the completion state of a task. Completing stamps completed_at,
/// reopening clears it. Returns the updated task, or None for an unknown id.
pub fn toggle_complete(db: &Connection, id: u32, now: NaiveDateTime) -> Result<Option<Task>> {
    let task = match task_at(db, id)? {
        Some(task) => task,
        None => return Ok(None),
    };

    if task.completed {
        db.execute(
            "UPDATE task SET completed = 0, completed_at = NULL WHERE id = ?1",
            params![id],
        )
        .context("Failed to reopen task in database.")?;
    } else {
        db.execute(
            "UPDATE task SET completed = 1, completed_at = ?2 WHERE id = ?1",
            params![id, now],
        )
        .context("Failed to finish task in database.")?;
    }

    task_at(db, id)
}

/// Remove a task and its reminders. Returns whether a task was deleted.
pub fn remove_task(db: &Connection, id: u32) -> Result<bool> {
    db.execute("DELETE FROM reminder WHERE task_id = ?1", params![id])
        .context("Failed to remove reminders from database.")?;
    let removed = db
        .execute("DELETE FROM task WHERE id = ?1", params![id])
        .context("Failed to remove task from database.")?;
    Ok(removed > 0)
}

/// A task's reminders, earliest first.
pub fn reminders_for(db: &Connection, task_id: u32) -> Result<Vec<Reminder>> {
    let mut stmt = db.prepare(
        "SELECT id, task_id, time, sent FROM reminder WHERE task_id = ?1 ORDER BY time",
    )?;
    let mapped_rows = stmt.query_map(params![task_id], |row| reminder_from_row(row))?;

    let mut reminders = Vec::new();
    for reminder in mapped_rows {
        reminders.push(reminder?);
    }

    Ok(reminders)
}

/// Unsent reminders that have come due, paired with the title of the task
/// they belong to. Reminders of completed tasks are skipped.
pub fn due_reminders(db: &Connection, now: NaiveDateTime) -> Result<Vec<(Reminder, String)>> {
    let mut stmt = db.prepare(
        "SELECT reminder.id, reminder.task_id, reminder.time, reminder.sent, task.title
         FROM reminder JOIN task ON task.id = reminder.task_id
         WHERE reminder.sent = 0 AND reminder.time <= ?1 AND task.completed = 0
         ORDER BY reminder.time",
    )?;
    let mapped_rows = stmt.query_map(params![now], |row| {
        Ok((reminder_from_row(row)?, row.get::<_, String>(4)?))
    })?;

    let mut due = Vec::new();
    for entry in mapped_rows {
        due.push(entry?);
    }

    Ok(due)
}

/// Flag a reminder as sent so it is not surfaced again.
pub fn mark_sent(db: &Connection, reminder_id: u32) -> Result<()> {
    db.execute(
        "UPDATE reminder SET sent = 1 WHERE id = ?1",
        params![reminder_id],
    )
    .context("Failed to mark reminder as sent in database.")?;
    Ok(())
}

/// Return a task from a row in this order: [id, title, description, category,
/// priority, due_date, completed, completed_at, created_at]
pub fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    let task = Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get::<_, String>(2).ok(),
        category: Category::from_store(&row.get::<_, String>(3)?),
        priority: Priority::from_store(&row.get::<_, String>(4)?),
        due_date: row.get(5)?,
        completed: row.get(6)?,
        completed_at: row.get::<_, NaiveDateTime>(7).ok(),
        created_at: row.get(8)?,
    };
    Ok(task)
}

/// Return a reminder from a row in this order: [id, task_id, time, sent]
pub fn reminder_from_row(row: &Row) -> rusqlite::Result<Reminder> {
    let reminder = Reminder {
        id: row.get(0)?,
        task_id: row.get(1)?,
        time: row.get(2)?,
        sent: row.get(3)?,
    };
    Ok(reminder)
}

/// Counts for the daily digest.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub active: usize,
    pub due_today: usize,
    pub due_tomorrow: usize,
    pub due_this_week: usize,
    pub overdue: usize,
    pub urgent: usize,
    pub completed_today: usize,
}

/// Classify tasks into the digest buckets, relative to `now`. The buckets
/// are independent filters: a long-overdue task counts as overdue and also
/// falls inside the week window.
pub fn summarize(tasks: &[Task], now: NaiveDateTime) -> Summary {
    let today = now.date();
    let tomorrow = today + Duration::days(1);
    let week_ahead = now + Duration::days(7);

    let mut summary = Summary::default();
    for task in tasks {
        if task.completed {
            if task.completed_at.map(|at| at.date()) == Some(today) {
                summary.completed_today += 1;
            }
            continue;
        }

        summary.active += 1;
        let due_day = task.due_date.date();
        if due_day == today {
            summary.due_today += 1;
        }
        if due_day == tomorrow {
            summary.due_tomorrow += 1;
        }
        if task.due_date <= week_ahead && due_day != today && due_day != tomorrow {
            summary.due_this_week += 1;
        }
        if task.due_date < now && due_day != today {
            summary.overdue += 1;
        }
        if task.priority == Priority::Urgent {
            summary.urgent += 1;
        }
    }

    summary
}
