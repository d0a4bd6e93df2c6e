use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Result};

use todo_sync_core::client::{HttpTaskService, TaskService};
use todo_sync_core::model::Task;
use todo_sync_core::notifications::{NotificationFlag, LOAD_FAILED_MESSAGE};
use todo_sync_session::{SessionHandle, SessionOptions, SessionView};

use crate::cli::{CliCommand, DeleteArgs, ListArgs};
use crate::config::AppConfig;

/// Talk to the configured service and run one command against a fresh session.
pub async fn run<W: Write>(
    config: &AppConfig,
    command: CliCommand,
    json: bool,
    writer: W,
) -> Result<()> {
    tracing::debug!(
        api_url = config.api_url(),
        owner_id = config.owner_id(),
        ?command,
        "running command"
    );
    let service: Arc<dyn TaskService> = Arc::new(HttpTaskService::new(config)?);
    execute(service, SessionOptions::from(config), command, json, writer).await
}

/// Load the collection, apply the command's intents, wait for every call to settle and
/// print the resulting view.
pub async fn execute<W: Write>(
    service: Arc<dyn TaskService>,
    options: SessionOptions,
    command: CliCommand,
    json: bool,
    mut writer: W,
) -> Result<()> {
    let mut session = todo_sync_session::spawn(service, options);
    session.load()?;
    let loaded = session.settled().await?;
    if loaded.active_notifications.contains(&NotificationFlag::LoadFailed) {
        bail!(LOAD_FAILED_MESSAGE);
    }

    let (view, summary) = match command {
        CliCommand::List(args) => (handle_list(&mut session, &args).await?, None),
        CliCommand::Add(args) => {
            session.submit(args.title())?;
            (session.settled().await?, None)
        }
        CliCommand::Delete(args) => {
            let (view, summary) = handle_delete(&mut session, &loaded, &args).await?;
            (view, Some(summary))
        }
        CliCommand::ClearCompleted => {
            let (view, summary) = handle_clear_completed(&mut session, &loaded).await?;
            (view, Some(summary))
        }
    };

    if json {
        serde_json::to_writer_pretty(&mut writer, &view)?;
        writeln!(writer)?;
    } else {
        if let Some(summary) = summary {
            summary.write_to(&mut writer)?;
        }
        write_view(&view, &mut writer)?;
    }
    Ok(())
}

async fn handle_list(session: &mut SessionHandle, args: &ListArgs) -> Result<SessionView> {
    session.set_filter(args.filter)?;
    session.settled().await
}

async fn handle_delete(
    session: &mut SessionHandle,
    loaded: &SessionView,
    args: &DeleteArgs,
) -> Result<(SessionView, DeleteSummary)> {
    let known: HashSet<u64> = loaded.tasks.iter().map(|task| task.id).collect();
    let mut requested = Vec::new();
    let mut missing = Vec::new();
    for id in &args.ids {
        if known.contains(id) && !requested.contains(id) {
            session.delete(*id)?;
            session.settled().await?;
            requested.push(*id);
        } else if !known.contains(id) {
            missing.push(*id);
        }
    }

    let view = session.settled().await?;
    let summary = DeleteSummary::from_outcome(&requested, &view.tasks, missing);
    Ok((view, summary))
}

async fn handle_clear_completed(
    session: &mut SessionHandle,
    loaded: &SessionView,
) -> Result<(SessionView, DeleteSummary)> {
    let requested: Vec<u64> = loaded
        .tasks
        .iter()
        .filter(|task| task.completed)
        .map(|task| task.id)
        .collect();

    session.clear_completed()?;
    let view = session.settled().await?;
    let summary = DeleteSummary::from_outcome(&requested, &view.tasks, Vec::new());
    Ok((view, summary))
}

#[derive(Debug, PartialEq, Eq)]
struct DeleteSummary {
    deleted: usize,
    failed: Vec<u64>,
    missing: Vec<u64>,
}

impl DeleteSummary {
    fn from_outcome(requested: &[u64], remaining: &[Task], missing: Vec<u64>) -> Self {
        let remaining: HashSet<u64> = remaining.iter().map(|task| task.id).collect();
        let (failed, deleted): (Vec<u64>, Vec<u64>) =
            requested.iter().copied().partition(|id| remaining.contains(id));
        Self {
            deleted: deleted.len(),
            failed,
            missing,
        }
    }

    fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", SummaryLine::deleted(self.deleted))?;
        if !self.failed.is_empty() {
            writeln!(writer, "Failed: {}", join_ids(&self.failed))?;
        }
        if !self.missing.is_empty() {
            writeln!(writer, "Not found: {}", join_ids(&self.missing))?;
        }
        Ok(())
    }
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

enum SummaryLine {
    Deleted(usize),
    NoneDeleted,
}

impl SummaryLine {
    fn deleted(count: usize) -> Self {
        if count > 0 {
            SummaryLine::Deleted(count)
        } else {
            SummaryLine::NoneDeleted
        }
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryLine::Deleted(count) => {
                write!(f, "Deleted {} {}", count, plural(*count, "todo", "todos"))
            }
            SummaryLine::NoneDeleted => write!(f, "No todos deleted"),
        }
    }
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}

/// Plain-text rendering of one session view.
fn write_view<W: Write>(view: &SessionView, mut writer: W) -> Result<()> {
    if view.tasks.is_empty() {
        writeln!(writer, "No todos")?;
    }
    let width = view
        .tasks
        .iter()
        .map(|task| task.id.to_string().len())
        .max()
        .unwrap_or(1);
    for task in &view.tasks {
        let mark = if task.completed { 'x' } else { ' ' };
        writeln!(writer, "[{mark}] {:>width$}  {}", task.id, task.title)?;
    }

    writeln!(
        writer,
        "{} {} left, {} completed ({})",
        view.open_count,
        plural(view.open_count, "item", "items"),
        view.closed_count,
        view.filter_mode.title()
    )?;
    if let Some(message) = view.notification.message {
        writeln!(writer, "! {message}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::AddArgs;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use todo_sync_core::error::ServiceError;
    use todo_sync_core::model::{FilterMode, NewTask};

    const OWNER: u64 = 7;

    struct MemoryService {
        tasks: Mutex<Vec<Task>>,
        failing_deletes: Vec<u64>,
        fail_list: bool,
    }

    impl MemoryService {
        fn seeded(failing_deletes: Vec<u64>) -> Arc<Self> {
            let task = |id, title: &str, completed| Task {
                id,
                owner_id: OWNER,
                title: title.to_string(),
                completed,
            };
            Arc::new(Self {
                tasks: Mutex::new(vec![
                    task(1, "Buy milk", true),
                    task(2, "Walk the dog", false),
                    task(10, "File taxes", true),
                ]),
                failing_deletes,
                fail_list: false,
            })
        }
    }

    #[async_trait]
    impl TaskService for MemoryService {
        async fn list(&self) -> Result<Vec<Task>, ServiceError> {
            if self.fail_list {
                return Err(ServiceError::InvalidResponse("offline".into()));
            }
            Ok(self.tasks.lock().unwrap().clone())
        }

        async fn create(&self, draft: &NewTask) -> Result<Task, ServiceError> {
            let mut tasks = self.tasks.lock().unwrap();
            let task = Task {
                id: tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1,
                owner_id: draft.owner_id,
                title: draft.title.clone(),
                completed: draft.completed,
            };
            tasks.push(task.clone());
            Ok(task)
        }

        async fn delete(&self, id: u64) -> Result<(), ServiceError> {
            if self.failing_deletes.contains(&id) {
                return Err(ServiceError::Status {
                    method: "DELETE",
                    url: format!("/todos/{id}"),
                    status: 500,
                });
            }
            self.tasks.lock().unwrap().retain(|task| task.id != id);
            Ok(())
        }
    }

    async fn run_command(service: Arc<MemoryService>, command: CliCommand) -> String {
        let mut output = Vec::new();
        execute(
            service,
            SessionOptions::new(OWNER),
            command,
            false,
            &mut output,
        )
        .await
        .expect("execute command");
        String::from_utf8(output).expect("utf8")
    }

    #[tokio::test]
    async fn list_renders_filtered_rows_and_counts() {
        let output = run_command(
            MemoryService::seeded(vec![]),
            CliCommand::List(ListArgs {
                filter: FilterMode::Completed,
            }),
        )
        .await;

        assert_eq!(
            output,
            "[x]  1  Buy milk\n[x] 10  File taxes\n1 item left, 2 completed (Completed)\n"
        );
    }

    #[tokio::test]
    async fn add_appends_trimmed_title() {
        let service = MemoryService::seeded(vec![]);
        let output = run_command(
            service.clone(),
            CliCommand::Add(AddArgs {
                text: vec!["  Pay".into(), "rent ".into()],
            }),
        )
        .await;

        assert!(output.contains("[ ] 11  Pay rent"));
        assert!(output.contains("2 items left"));
        assert_eq!(service.tasks.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn blank_add_reports_message() {
        let service = MemoryService::seeded(vec![]);
        let output = run_command(
            service.clone(),
            CliCommand::Add(AddArgs {
                text: vec!["   ".into()],
            }),
        )
        .await;

        assert!(output.ends_with("! Title should not be empty\n"));
        assert_eq!(service.tasks.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_reports_deleted_failed_and_missing() {
        let output = run_command(
            MemoryService::seeded(vec![10]),
            CliCommand::Delete(DeleteArgs {
                ids: vec![1, 10, 99],
            }),
        )
        .await;

        assert!(output.starts_with("Deleted 1 todo\nFailed: 10\nNot found: 99\n"));
        assert!(!output.contains("Buy milk"));
        assert!(output.contains("! Unable to delete a todo"));
    }

    #[tokio::test]
    async fn clear_completed_keeps_open_rows() {
        let service = MemoryService::seeded(vec![]);
        let output = run_command(service.clone(), CliCommand::ClearCompleted).await;

        assert!(output.starts_with("Deleted 2 todos\n"));
        assert!(output.contains("[ ] 2  Walk the dog"));
        let remaining: Vec<u64> = service.tasks.lock().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![2]);
    }

    #[tokio::test]
    async fn json_output_serializes_view() {
        let mut output = Vec::new();
        execute(
            MemoryService::seeded(vec![]),
            SessionOptions::new(OWNER),
            CliCommand::List(ListArgs::default()),
            true,
            &mut output,
        )
        .await
        .expect("execute list");

        let value: serde_json::Value = serde_json::from_slice(&output).expect("json");
        assert_eq!(value["openCount"], 1);
        assert_eq!(value["closedCount"], 2);
        assert_eq!(value["tasks"][0]["userId"], OWNER);
        assert_eq!(value["filterMode"], "all");
    }

    #[tokio::test]
    async fn failed_load_is_an_error() {
        let service = Arc::new(MemoryService {
            tasks: Mutex::new(Vec::new()),
            failing_deletes: Vec::new(),
            fail_list: true,
        });
        let err = execute(
            service,
            SessionOptions::new(OWNER),
            CliCommand::ClearCompleted,
            false,
            Vec::<u8>::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), LOAD_FAILED_MESSAGE);
    }

    #[test]
    fn summary_without_deletions() {
        let mut output = Vec::new();
        DeleteSummary::from_outcome(&[], &[], vec![4])
            .write_to(&mut output)
            .unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "No todos deleted\nNot found: 4\n"
        );
    }
}
