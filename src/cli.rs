use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Add a task from a free-text description.
    Add {
        /// The task text; category, priority, due date and reminders are
        /// inferred from it.
        #[structopt()]
        text: String,
    },
    /// List all tasks.
    List,
    /// Toggle a task between open and done.
    Done {
        #[structopt()]
        id: u32,
    },
    /// Remove a task by id.
    Rm {
        #[structopt()]
        id: u32,
    },
    /// Show a digest of the day: due, overdue, urgent and finished tasks.
    Summary,
    /// Print reminders that have come due and mark them as sent.
    Remind,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "nudge",
    about = "The minimalistic free-text task planner."
)]
pub struct CommandLineArgs {
    #[structopt(subcommand)]
    pub action: Command,

    /// Use a different journal file.
    #[structopt(parse(from_os_str), short, long)]
    pub journal_file: Option<PathBuf>,
}
