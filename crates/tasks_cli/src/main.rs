use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use tasks_cli::cli::{Cli, Command, collect_config_overrides};
use tasks_cli::render::{OutputFormat, TerminalRenderer};
use tasks_core::config::{load_config_with_fallback, merge_overrides, palette_for_theme};
use tasks_core::error::AppError;
use tasks_core::model::ListKind;
use tasks_core::storage::json_store;
use tasks_core::task_list::{TaskCommands, TaskList};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "TASKS_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

/// Startup sequence: resolve configuration, load the store, report a
/// missing or unreadable store as information only.
fn open_tasks(
    json: bool,
    config_override: &[String],
) -> Result<TaskList<TerminalRenderer>, AppError> {
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error {
        warn!(error = %err, "ignoring configuration file");
    }
    let overrides = collect_config_overrides(config_override)?;
    let config = merge_overrides(&loaded.config, &overrides);

    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Plain
    };
    let renderer = TerminalRenderer::new(palette_for_theme(config.theme.as_deref()), format);

    let opened = TaskList::open(json_store::store_path(&config), renderer)?;
    if let Some(notice) = opened.notice {
        eprintln!("INFO: {notice}");
    }
    Ok(opened.tasks)
}

/// Maps a command-line position onto `kind`'s list; negative positions are
/// out of range like any other.
fn list_index(
    tasks: &TaskList<TerminalRenderer>,
    kind: ListKind,
    index: i64,
) -> Result<usize, AppError> {
    usize::try_from(index)
        .map_err(|_| AppError::negative_index(kind, index, tasks.state().list(kind).len()))
}

fn run_command(command: Command, tasks: &mut TaskList<TerminalRenderer>) -> Result<(), AppError> {
    match command {
        Command::Add { text } => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(AppError::invalid_input("task text is required"));
            }
            tasks.add_task(trimmed);
        }
        Command::Delete { index } => {
            let index = list_index(tasks, ListKind::Pending, index)?;
            tasks.delete_task(index)?;
        }
        Command::Done { index, text } => {
            let index = list_index(tasks, ListKind::Pending, index)?;
            match text {
                Some(text) => tasks.complete_task(&text, index)?,
                None => tasks.complete_task_at(index)?,
            }
        }
        Command::DeleteCompleted { index } => {
            let index = list_index(tasks, ListKind::Completed, index)?;
            tasks.delete_completed_task(index)?;
        }
        Command::List => tasks.refresh(),
        Command::Save => {
            tasks.save()?;
            println!("Saved tasks to {}", tasks.store_path().display());
        }
    }

    Ok(())
}

/// One command between startup and shutdown. The store is written even when
/// the command fails; a failed command leaves the lists untouched. A
/// successful `save` already wrote it.
fn run_once(cli: Cli) -> Result<(), AppError> {
    let mut tasks = open_tasks(cli.json, &cli.config_override)?;
    let explicit_save = matches!(cli.command, Command::Save);
    let outcome = run_command(cli.command, &mut tasks);
    if explicit_save && outcome.is_ok() {
        return Ok(());
    }

    finish(outcome, tasks.close())
}

/// The command's error wins; a shutdown save failure behind it is logged.
fn finish(outcome: Result<(), AppError>, saved: Result<(), AppError>) -> Result<(), AppError> {
    match (outcome, saved) {
        (Err(err), Err(save_err)) => {
            warn!(error = %save_err, "saving task store failed");
            Err(err)
        }
        (outcome, saved) => outcome.and(saved),
    }
}

fn run_interactive() -> Result<(), AppError> {
    let mut tasks = open_tasks(false, &[])?;
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tasks".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                println!("{err}");
                continue;
            }
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if cli.json || !cli.config_override.is_empty() {
            eprintln!(
                "ERROR: {}",
                AppError::invalid_input(
                    "--json and --config-override are only accepted when starting tasks"
                )
            );
            continue;
        }

        if let Err(err) = run_command(cli.command, &mut tasks) {
            eprintln!("ERROR: {}", err);
        }
    }

    tasks.close()
}

fn main() {
    init_tracing();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_once(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{finish, split_command_line};
    use tasks_core::error::AppError;
    use tasks_core::model::ListKind;

    #[test]
    fn finish_prefers_command_error_over_save_error() {
        let command_err = AppError::index_out_of_range(ListKind::Pending, 3, 1);
        let result = finish(Err(command_err.clone()), Err(AppError::io("disk full")));
        assert_eq!(result, Err(command_err));
    }

    #[test]
    fn finish_reports_save_error_after_successful_command() {
        let result = finish(Ok(()), Err(AppError::io("disk full")));
        assert_eq!(result.unwrap_err().code(), "io_error");
        assert!(finish(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn split_command_line_honours_quotes() {
        let args = split_command_line("add \"Buy  milk\" extra").unwrap();
        assert_eq!(args, vec!["add", "Buy  milk", "extra"]);
    }

    #[test]
    fn split_command_line_keeps_empty_quoted_argument() {
        let args = split_command_line("add \"\"").unwrap();
        assert_eq!(args, vec!["add", ""]);
    }

    #[test]
    fn split_command_line_unescapes_quotes() {
        let args = split_command_line(r#"add "say \"hi\"""#).unwrap();
        assert_eq!(args, vec!["add", "say \"hi\""]);
    }

    #[test]
    fn split_command_line_rejects_unterminated_quote() {
        let err = split_command_line("add \"open").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }
}
