use clap::{value_parser, Args, Parser, Subcommand};

use todo_sync_core::model::FilterMode;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "todo-sync",
    version,
    about = "Keep a personal todo list in sync with a remote todo service.",
    after_help = "Examples:\n  todo-sync --user-id 42 list --filter active\n  todo-sync add Buy milk\n  todo-sync delete 17 18\n  todo-sync clear-completed --log debug"
)]
pub struct Cli {
    /// Base url of the todo service (defaults to TODO_SYNC_API_URL or the public students api)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Owner whose todos are shown (defaults to TODO_SYNC_USER_ID)
    #[arg(long = "user-id", value_name = "ID", global = true, value_parser = value_parser!(u64).range(1..))]
    pub user_id: Option<u64>,

    /// Tracing filter for diagnostics written to stderr (e.g. "info", "todo_sync_session=debug")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    /// Unlock input after a failed delete instead of keeping the todo marked as deleting
    #[arg(long = "release-lock-on-delete-failure", global = true)]
    pub release_lock_on_delete_failure: bool,

    /// Print the resulting view as JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Show the todo list (default command)
    List(ListArgs),
    /// Add a todo with the given title
    Add(AddArgs),
    /// Delete one or more todos by id
    Delete(DeleteArgs),
    /// Delete every completed todo
    ClearCompleted,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Which todos to show
    #[arg(long, value_enum, default_value_t = FilterMode::All)]
    pub filter: FilterMode,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Todo title; surrounding whitespace is trimmed
    #[arg(value_name = "TITLE", required = true)]
    pub text: Vec<String>,
}

impl AddArgs {
    pub fn title(&self) -> String {
        self.text.join(" ")
    }
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// One or more todo ids to delete
    #[arg(value_name = "ID", required = true, value_parser = value_parser!(u64))]
    pub ids: Vec<u64>,
}
