use std::path::PathBuf;
use std::process::ExitCode;

use board_schedule::persistence::load_snapshot_from_json;
use board_schedule::{
    BoardError, BoardId, BoardScheduler, EngineConfig, GanttView, MemoryBoardStore, WorkloadView,
    schedule_boards,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cli", about = "Critical-path and workload views for project boards")]
struct Cli {
    /// Engine config (JSON)
    #[arg(long, global = true, env = "BOARD_SCHEDULE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Earliest/latest dates, float and the critical path of a board
    Gantt(BoardArgs),
    /// Assigned hours against weekly capacity
    Workload(BoardArgs),
    /// One summary line per board in the snapshot
    Boards {
        snapshot: PathBuf,
    },
}

#[derive(Debug, Args)]
struct BoardArgs {
    /// Board snapshot (JSON)
    snapshot: PathBuf,
    /// Board to render; defaults to the lowest board id in the snapshot
    #[arg(long)]
    board: Option<BoardId>,
    /// Print the JSON payload instead of a table
    #[arg(long)]
    json: bool,
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &mut dyn Iterator<Item = &str>| {
        let mut line = String::from("|");
        for (ci, cell) in cells.enumerate() {
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&mut headers.iter().copied()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(&mut row.iter().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn gantt_table(view: &GanttView) -> String {
    let rows: Vec<Vec<String>> = view
        .tasks
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.name.clone(),
                t.start.to_string(),
                t.end.to_string(),
                t.es.to_string(),
                t.ef.to_string(),
                t.ls.to_string(),
                t.lf.to_string(),
                t.slack.to_string(),
                if t.critical { "yes".into() } else { String::new() },
            ]
        })
        .collect();
    let mut out = render_text_table(
        &["id", "name", "start", "end", "es", "ef", "ls", "lf", "slack", "critical"],
        &rows,
    );
    let chain = view
        .critical_path
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ");
    out.push_str(&format!(
        "Project duration: {} days from {}\nCritical path: {}\n",
        view.project_duration_days, view.anchor_date, chain
    ));
    if view.skipped_dependencies > 0 {
        out.push_str(&format!(
            "Skipped {} dependencies referencing missing tasks\n",
            view.skipped_dependencies
        ));
    }
    out
}

fn workload_table(view: &WorkloadView) -> String {
    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|r| {
            vec![
                r.user_id.to_string(),
                r.username.clone(),
                format!("{:.2}", r.assigned_hours),
                format!("{:.2}", r.weekly_capacity_hours),
                format!("{:.2}", r.remaining_hours()),
                format!("{:.2}", r.utilization),
                if r.overallocated { "OVER".into() } else { String::new() },
            ]
        })
        .collect();
    render_text_table(
        &["user_id", "username", "assigned", "capacity", "remaining", "utilization", "status"],
        &rows,
    )
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| err.to_string())
}

fn run(cli: Cli) -> Result<String, String> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path).map_err(|err| err.to_string())?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Gantt(args) => {
            let (scheduler, board) = open_board(&args, config)?;
            let view = scheduler.gantt(board).map_err(describe)?;
            if args.json { to_json(&view) } else { Ok(gantt_table(&view)) }
        }
        Command::Workload(args) => {
            let (scheduler, board) = open_board(&args, config)?;
            let view = scheduler.workload(board).map_err(describe)?;
            if args.json { to_json(&view) } else { Ok(workload_table(&view)) }
        }
        Command::Boards { snapshot } => {
            let snapshot = load_snapshot_from_json(&snapshot).map_err(|err| err.to_string())?;
            let mut out = String::new();
            for (board_id, result) in schedule_boards(&snapshot.boards, &config) {
                let line = match result {
                    Ok(schedule) => schedule.summary().to_cli_summary(),
                    Err(err) => err.user_message(),
                };
                out.push_str(&format!("board {board_id}: {line}\n"));
            }
            Ok(out)
        }
    }
}

fn open_board(
    args: &BoardArgs,
    config: EngineConfig,
) -> Result<(BoardScheduler<MemoryBoardStore>, BoardId), String> {
    let snapshot = load_snapshot_from_json(&args.snapshot).map_err(|err| err.to_string())?;
    let store = MemoryBoardStore::from_snapshot(snapshot);
    let board = match args.board {
        Some(id) => id,
        None => *store
            .board_ids()
            .first()
            .ok_or_else(|| "snapshot contains no boards".to_string())?,
    };
    Ok((BoardScheduler::with_config(store, config), board))
}

fn describe(err: BoardError) -> String {
    match err {
        BoardError::Schedule(err) => err.user_message(),
        other => other.to_string(),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
