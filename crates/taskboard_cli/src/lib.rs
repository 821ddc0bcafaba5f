//! # taskboard
//!
//! Command-line front end over the task board.
//!
//! Each invocation opens the SQLite slot store, runs one board operation and
//! renders the resulting board.
//!
//! ## Configuration
//!
//! - `TASKBOARD_DB` - SQLite file (default: `taskboard.sqlite3`)
//! - `TASKBOARD_SLOT_KEY` - slot the board lives in (default: `taskmate-tasks`)
//! - `TASKBOARD_LOG_LEVEL` - `trace|debug|info|warn|error`
//! - `TASKBOARD_LOG_DIR` - absolute directory for rolling log files

use clap::{Parser, Subcommand};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter, Write as _};
use std::path::PathBuf;
use taskboard_core::db::{open_db, DbError};
use taskboard_core::logging::LoggingError;
use taskboard_core::{
    init_logging, Board, BoardConfig, BoardError, BoardView, LanePosition, MutationOutcome,
    Priority, SlotTaskRepository, SqliteSlotStore, TaskId, TaskPatch, TaskRepository, TaskStatus,
    TaskValidationError,
};

/// Task board CLI.
#[derive(Debug, Parser)]
#[command(name = "taskboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite file holding the board [env: TASKBOARD_DB].
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Slot key the board is stored under [env: TASKBOARD_SLOT_KEY].
    #[arg(long)]
    pub slot_key: Option<String>,

    /// Log level for file logging [env: TASKBOARD_LOG_LEVEL].
    #[arg(long)]
    pub log_level: Option<String>,

    /// Absolute directory for log files; file logging is off when unset
    /// [env: TASKBOARD_LOG_DIR].
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Board settings: defaults, then `TASKBOARD_*` environment, then flags.
    pub fn config(&self) -> BoardConfig {
        self.apply_flags(BoardConfig::from_env())
    }

    /// Overrides `config` with the flags given on the command line.
    pub fn apply_flags(&self, mut config: BoardConfig) -> BoardConfig {
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(key) = self.slot_key.as_deref().filter(|key| !key.trim().is_empty()) {
            config.slot_key = key.trim().to_string();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = Some(dir.clone());
        }
        config
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a task to the end of the to-do lane.
    Add {
        /// Task title.
        title: String,
        /// Low, Medium or High (default Medium).
        #[arg(long)]
        priority: Option<String>,
    },
    /// Edit the title and/or priority of a task.
    Edit {
        /// Task id.
        id: String,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New priority.
        #[arg(long)]
        priority: Option<String>,
    },
    /// Delete a task.
    Delete {
        /// Task id.
        id: String,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Move a task to a lane position.
    Move {
        /// Task id.
        id: String,
        /// Destination lane: todo, inprogress or done.
        status: String,
        /// 0-based position in the destination lane.
        index: usize,
    },
    /// Show the board.
    List {
        /// Case-insensitive title search.
        #[arg(long)]
        search: Option<String>,
        /// Only show tasks with this priority.
        #[arg(long)]
        priority: Option<String>,
    },
    /// Show lane counts.
    Stats,
    /// Print the CLI and core versions.
    Version,
}

/// CLI failures.
#[derive(Debug)]
pub enum CliError {
    Logging(LoggingError),
    Db(DbError),
    Board(BoardError),
    /// Argument text that does not parse.
    InvalidArgument(TaskValidationError),
    /// `edit` without `--title` or `--priority`.
    EmptyEdit,
    /// `delete` without `--yes`.
    ConfirmationRequired(TaskId),
    /// No task has this id.
    NotFound(TaskId),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "database error: {err}"),
            Self::Board(err) => write!(f, "{err}"),
            Self::InvalidArgument(err) => write!(f, "{err}"),
            Self::EmptyEdit => write!(f, "nothing to edit; pass --title and/or --priority"),
            Self::ConfirmationRequired(id) => {
                write!(f, "refusing to delete task {id} without --yes")
            }
            Self::NotFound(id) => write!(f, "no task with id {id}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Board(err) => Some(err),
            Self::InvalidArgument(err) => Some(err),
            Self::EmptyEdit | Self::ConfirmationRequired(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<BoardError> for CliError {
    fn from(value: BoardError) -> Self {
        Self::Board(value)
    }
}

impl From<TaskValidationError> for CliError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidArgument(value)
    }
}

/// Runs one command and returns the text to print.
pub fn run(cli: &Cli) -> Result<String, CliError> {
    if let Commands::Version = cli.command {
        return Ok(version_line());
    }

    let config = cli.config();
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path)?;
    let store = SqliteSlotStore::try_new(&conn)?;
    let mut board = Board::open(SlotTaskRepository::with_key(store, config.slot_key.as_str()))?;
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );

    execute(&mut board, &cli.command)
}

fn execute<R: TaskRepository>(board: &mut Board<R>, command: &Commands) -> Result<String, CliError> {
    match command {
        Commands::Add { title, priority } => {
            let task = board.create(title, priority.as_deref())?;
            Ok(format!("added {}\n{}", task.id(), render_board(&board.view())))
        }
        Commands::Edit {
            id,
            title,
            priority,
        } => {
            let id = TaskId::parse(id.as_str())?;
            let patch = TaskPatch {
                title: title.clone(),
                priority: priority
                    .as_deref()
                    .map(str::parse::<Priority>)
                    .transpose()?,
            };
            if patch.is_empty() {
                return Err(CliError::EmptyEdit);
            }
            expect_applied(board.update(&id, &patch)?, id)?;
            Ok(render_board(&board.view()))
        }
        Commands::Delete { id, yes } => {
            let id = TaskId::parse(id.as_str())?;
            if !yes {
                return Err(CliError::ConfirmationRequired(id));
            }
            expect_applied(board.delete(&id)?, id)?;
            Ok(render_board(&board.view()))
        }
        Commands::Move { id, status, index } => {
            let id = TaskId::parse(id.as_str())?;
            let status = status.parse::<TaskStatus>()?;
            if !board.begin_reorder(&id)? {
                return Err(CliError::NotFound(id));
            }
            board.end_reorder(Some(LanePosition::new(status, *index)))?;
            Ok(render_board(&board.view()))
        }
        Commands::List { search, priority } => {
            if let Some(search) = search {
                board.set_search(search.as_str());
            }
            if let Some(priority) = priority {
                board.set_priority_filter(priority)?;
            }
            Ok(render_board(&board.view()))
        }
        Commands::Stats => Ok(render_stats(&board.view())),
        Commands::Version => Ok(version_line()),
    }
}

fn version_line() -> String {
    format!(
        "taskboard {} (core {})",
        env!("CARGO_PKG_VERSION"),
        taskboard_core::core_version()
    )
}

fn expect_applied(outcome: MutationOutcome, id: TaskId) -> Result<(), CliError> {
    if outcome.is_applied() {
        Ok(())
    } else {
        Err(CliError::NotFound(id))
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Add { .. } => "add",
        Commands::Edit { .. } => "edit",
        Commands::Delete { .. } => "delete",
        Commands::Move { .. } => "move",
        Commands::List { .. } => "list",
        Commands::Stats => "stats",
        Commands::Version => "version",
    }
}

/// Renders lanes in display order followed by the stats line.
pub fn render_board(view: &BoardView) -> String {
    let mut out = String::new();
    for (status, tasks) in view.lanes.iter() {
        let _ = writeln!(out, "{} ({})", status.label(), tasks.len());
        for task in tasks {
            let _ = writeln!(
                out,
                "  [{}] {}  {}",
                task.priority(),
                task.title(),
                task.id()
            );
        }
    }
    out.push_str(&render_stats(view));
    out
}

fn render_stats(view: &BoardView) -> String {
    let stats = view.stats;
    format!(
        "total={} todo={} inprogress={} done={}",
        stats.total, stats.todo, stats.in_progress, stats.done
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_for(db: &std::path::Path, args: &[&str]) -> Cli {
        let mut argv = vec!["taskboard", "--db", db.to_str().unwrap(), "--slot-key", "test"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn flags_override_config_defaults() {
        let cli = Cli::parse_from([
            "taskboard",
            "--db",
            "/tmp/board.sqlite3",
            "--slot-key",
            "work",
            "--log-level",
            "warn",
            "list",
            "--search",
            "milk",
        ]);

        let config = cli.config();
        assert_eq!(config.db_path, PathBuf::from("/tmp/board.sqlite3"));
        assert_eq!(config.slot_key, "work");
        assert_eq!(config.log_level, "warn");
        assert!(matches!(
            cli.command,
            Commands::List { ref search, priority: None } if search.as_deref() == Some("milk")
        ));
    }

    #[test]
    fn flags_win_over_environment_and_unset_flags_keep_it() {
        let env = BoardConfig::default().with_overrides(|name| match name {
            "TASKBOARD_DB" => Some("/srv/env.sqlite3".to_string()),
            "TASKBOARD_SLOT_KEY" => Some("from-env".to_string()),
            _ => None,
        });
        let cli = Cli::parse_from(["taskboard", "--db", "/tmp/flag.sqlite3", "stats"]);

        let config = cli.apply_flags(env);
        assert_eq!(config.db_path, PathBuf::from("/tmp/flag.sqlite3"));
        assert_eq!(config.slot_key, "from-env");
    }

    #[test]
    fn add_move_and_list_round_trip_through_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("board.sqlite3");

        let added = run(&cli_for(&db, &["add", "Buy milk", "--priority", "High"])).unwrap();
        let id = added
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("added "))
            .unwrap()
            .to_string();
        run(&cli_for(&db, &["add", "Call bank"])).unwrap();

        let moved = run(&cli_for(&db, &["move", id.as_str(), "done", "0"])).unwrap();
        assert!(moved.contains("Done (1)\n  [High] Buy milk"));

        let listed = run(&cli_for(&db, &["list", "--search", "BANK"])).unwrap();
        assert!(listed.contains("[Medium] Call bank"));
        assert!(!listed.contains("Buy milk"));
        assert!(listed.ends_with("total=2 todo=1 inprogress=0 done=1"));
    }

    #[test]
    fn delete_requires_confirmation_and_unknown_ids_fail() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("board.sqlite3");

        assert!(matches!(
            run(&cli_for(&db, &["delete", "missing"])),
            Err(CliError::ConfirmationRequired(_))
        ));
        assert!(matches!(
            run(&cli_for(&db, &["delete", "missing", "--yes"])),
            Err(CliError::NotFound(_))
        ));
        assert!(matches!(
            run(&cli_for(&db, &["edit", "missing"])),
            Err(CliError::EmptyEdit)
        ));
    }

    #[test]
    fn invalid_priority_and_status_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("board.sqlite3");

        assert!(matches!(
            run(&cli_for(&db, &["add", "Odd", "--priority", "Urgent"])),
            Err(CliError::Board(BoardError::Validation(_)))
        ));
        assert!(matches!(
            run(&cli_for(&db, &["move", "any", "later", "0"])),
            Err(CliError::InvalidArgument(_))
        ));
        assert_eq!(
            run(&cli_for(&db, &["stats"])).unwrap(),
            "total=0 todo=0 inprogress=0 done=0"
        );
    }
}
