use std::io::{IsTerminal, Write};
use std::sync::{Arc, Mutex};

use tokio::io::AsyncBufReadExt;
use tracing::info;

use messmate_core::http::{EndpointConfig, HttpDatasetFetcher};
use messmate_core::login::{recover_id, sign_in, FormFeedback};
use messmate_core::nav::{Navigator, RenderSink, Target};
use messmate_core::page::PageId;
use messmate_core::store::{resolve_state_dir, FsKeyValueStore};
use messmate_core::view::Frame;
use messmate_tui::render::render_frame_lines;

/// Environment variable pointing structured logs at a file.
const LOG_FILE_ENV: &str = "MESSMATE_LOG_FILE";

// ---------------------------------------------------------------------------
// Incremental repaint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct RenderDiffPlan {
    changed_rows: Vec<usize>,
    clear_start_row: Option<usize>,
    clear_end_row: usize,
}

impl RenderDiffPlan {
    fn is_noop(&self) -> bool {
        self.changed_rows.is_empty() && self.clear_start_row.is_none()
    }
}

#[derive(Debug, Default)]
struct IncrementalRenderEngine {
    previous_lines: Vec<String>,
}

impl IncrementalRenderEngine {
    fn repaint<W: Write>(&mut self, mut out: W, next_lines: &[String]) -> std::io::Result<()> {
        let plan = plan_render_diff(&self.previous_lines, next_lines);
        if plan.is_noop() {
            return Ok(());
        }

        for row in plan.changed_rows {
            let line = next_lines.get(row - 1).map_or("", String::as_str);
            write!(out, "\x1b[{row};1H\x1b[2K{line}")?;
        }

        if let Some(start_row) = plan.clear_start_row {
            for row in start_row..=plan.clear_end_row {
                write!(out, "\x1b[{row};1H\x1b[2K")?;
            }
        }

        write!(out, "\x1b[{};1H", next_lines.len().saturating_add(1))?;
        out.flush()?;
        self.previous_lines = next_lines.to_vec();
        Ok(())
    }
}

fn plan_render_diff(previous: &[String], next: &[String]) -> RenderDiffPlan {
    let shared = previous.len().min(next.len());
    let mut changed_rows = Vec::new();

    for idx in 0..shared {
        if previous[idx] != next[idx] {
            changed_rows.push(idx + 1);
        }
    }
    if next.len() > shared {
        changed_rows.extend((shared + 1)..=next.len());
    }

    let clear_start_row = (next.len() < previous.len()).then_some(next.len() + 1);

    RenderDiffPlan {
        changed_rows,
        clear_start_row,
        clear_end_row: previous.len(),
    }
}

// ---------------------------------------------------------------------------
// Terminal sink
// ---------------------------------------------------------------------------

struct TerminalSink {
    engine: Mutex<IncrementalRenderEngine>,
    interactive: bool,
}

impl TerminalSink {
    fn new(interactive: bool) -> Self {
        Self {
            engine: Mutex::new(IncrementalRenderEngine::default()),
            interactive,
        }
    }
}

impl RenderSink for TerminalSink {
    fn render(&self, frame: &Frame) {
        let lines = render_frame_lines(frame);
        if self.interactive {
            let mut engine = match self.engine.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let mut out = std::io::stdout();
            let _ = write!(out, "\x1b]0;{}\x07", frame.header.window_title);
            let _ = engine.repaint(&mut out, &lines);
        } else {
            println!("{}", lines.join("\n"));
            println!();
        }
    }
}

// ---------------------------------------------------------------------------
// Command parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Go(Target),
    Login { name: String, id: String },
    Recover { key: String, name: String },
    Logout,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_command(line: &str) -> ShellCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ShellCommand::Empty;
    }

    let mut words = trimmed.split_whitespace();
    let head = match words.next() {
        Some(head) => head,
        None => return ShellCommand::Empty,
    };
    let rest: Vec<&str> = words.collect();

    match head {
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        "logout" => ShellCommand::Logout,
        "open" => match rest.as_slice() {
            [id] => ShellCommand::Go(Target::parse(id)),
            _ => ShellCommand::Unknown(trimmed.to_string()),
        },
        "login" => {
            if rest.len() >= 2 {
                ShellCommand::Login {
                    name: rest[..rest.len() - 1].join(" "),
                    id: rest[rest.len() - 1].to_string(),
                }
            } else {
                ShellCommand::Unknown(trimmed.to_string())
            }
        }
        "recover" => match rest.split_first() {
            Some((key, name_words)) if !name_words.is_empty() => ShellCommand::Recover {
                key: (*key).to_string(),
                name: name_words.join(" "),
            },
            _ => ShellCommand::Unknown(trimmed.to_string()),
        },
        other => {
            if rest.is_empty() {
                if let Some(page) = PageId::from_str(other) {
                    return ShellCommand::Go(Target::Page(page));
                }
            }
            ShellCommand::Unknown(trimmed.to_string())
        }
    }
}

fn help_lines() -> Vec<String> {
    vec![
        "home | notice | report | account   switch page".to_string(),
        "open <id>                          visit any page id".to_string(),
        "login <name...> <id>               sign in with your five-digit ID".to_string(),
        "recover <key> <name...>            look up the ID for a registered name".to_string(),
        "logout                             sign out and reset".to_string(),
        "help                               this list".to_string(),
        "quit                               leave".to_string(),
    ]
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

fn main() {
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: start runtime: {err}");
            std::process::exit(1);
        }
    };
    runtime.block_on(run());
}

async fn run() {
    let interactive = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();

    let endpoints = EndpointConfig::from_env();
    let state_dir = resolve_state_dir();
    info!(state_dir = %state_dir.display(), "starting messmate-tui");

    let nav = Arc::new(Navigator::new(
        Arc::new(HttpDatasetFetcher::new(endpoints)),
        Arc::new(FsKeyValueStore::new(&state_dir)),
        Arc::new(TerminalSink::new(interactive)),
    ));

    if interactive {
        print!("\x1b[2J");
        let _ = std::io::stdout().flush();
    }

    nav.start().await;

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(interactive);
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                eprintln!("error: read command: {err}");
                break;
            }
        };

        match parse_command(&line) {
            ShellCommand::Empty => {}
            ShellCommand::Go(target) => nav.navigate_to(target).await,
            ShellCommand::Login { name, id } => {
                report_feedback(&sign_in(&nav, &name, &id).await);
            }
            ShellCommand::Recover { key, name } => report_feedback(&recover_id(&key, &name)),
            ShellCommand::Logout => {
                if let Err(err) = nav.logout().await {
                    eprintln!("error: {err}");
                }
            }
            ShellCommand::Help => {
                for line in help_lines() {
                    println!("{line}");
                }
            }
            ShellCommand::Unknown(raw) => println!("unknown command: {raw} (try 'help')"),
            ShellCommand::Quit => break,
        }
    }

    info!("messmate-tui exiting");
}

fn prompt(interactive: bool) {
    if interactive {
        print!("> ");
        let _ = std::io::stdout().flush();
    }
}

fn report_feedback(feedback: &FormFeedback) {
    if feedback.is_error() {
        println!("error: {}", feedback.text);
    } else {
        println!("{}", feedback.text);
    }
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    fn env_filter() -> tracing_subscriber::EnvFilter {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    }

    if let Ok(path) = std::env::var(LOG_FILE_ENV) {
        let path = path.trim();
        if !path.is_empty() {
            match std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
            {
                Ok(file) => {
                    tracing_subscriber::registry()
                        .with(env_filter())
                        .with(
                            tracing_subscriber::fmt::layer()
                                .with_writer(Arc::new(file))
                                .with_ansi(false),
                        )
                        .init();
                    return;
                }
                Err(err) => {
                    eprintln!("warning: could not open log file {path}: {err}");
                }
            }
        }
    }

    // Frames own stdout, so opt-in logs go to stderr.
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::{parse_command, plan_render_diff, IncrementalRenderEngine, ShellCommand};
    use messmate_core::nav::Target;
    use messmate_core::page::PageId;

    fn lines<const N: usize>(rows: [&str; N]) -> Vec<String> {
        rows.into_iter().map(str::to_owned).collect()
    }

    // -- command parsing --

    #[test]
    fn bare_page_ids_navigate() {
        assert_eq!(
            parse_command("report"),
            ShellCommand::Go(Target::Page(PageId::Report))
        );
        assert_eq!(
            parse_command("  home  "),
            ShellCommand::Go(Target::Page(PageId::Home))
        );
    }

    #[test]
    fn open_accepts_any_page_id() {
        assert_eq!(
            parse_command("open notice"),
            ShellCommand::Go(Target::Page(PageId::Notice))
        );
        assert_eq!(
            parse_command("open settings"),
            ShellCommand::Go(Target::Unknown("settings".to_string()))
        );
        assert_eq!(
            parse_command("open"),
            ShellCommand::Unknown("open".to_string())
        );
    }

    #[test]
    fn login_takes_the_last_word_as_the_identifier() {
        assert_eq!(
            parse_command("login abid ahmed 26870"),
            ShellCommand::Login {
                name: "abid ahmed".to_string(),
                id: "26870".to_string(),
            }
        );
        assert_eq!(
            parse_command("login bob"),
            ShellCommand::Unknown("login bob".to_string())
        );
    }

    #[test]
    fn recover_takes_the_key_then_the_name() {
        assert_eq!(
            parse_command("recover @@id abid ahmed"),
            ShellCommand::Recover {
                key: "@@id".to_string(),
                name: "abid ahmed".to_string(),
            }
        );
        assert_eq!(
            parse_command("recover @@id"),
            ShellCommand::Unknown("recover @@id".to_string())
        );
    }

    #[test]
    fn control_words_and_noise_parse_as_expected() {
        assert_eq!(parse_command("logout"), ShellCommand::Logout);
        assert_eq!(parse_command("help"), ShellCommand::Help);
        assert_eq!(parse_command("quit"), ShellCommand::Quit);
        assert_eq!(parse_command("   "), ShellCommand::Empty);
        assert_eq!(
            parse_command("report extra"),
            ShellCommand::Unknown("report extra".to_string())
        );
    }

    // -- repaint engine --

    #[test]
    fn render_diff_plan_marks_changed_and_appended_rows() {
        let plan = plan_render_diff(
            &lines(["header", "stable", "tail-old"]),
            &lines(["header", "changed", "tail-old", "new-row"]),
        );
        assert_eq!(plan.changed_rows, vec![2, 4]);
        assert_eq!(plan.clear_start_row, None);
        assert_eq!(plan.clear_end_row, 3);
    }

    #[test]
    fn render_diff_plan_marks_clear_range_when_next_is_shorter() {
        let plan = plan_render_diff(
            &lines(["alpha", "beta", "gamma"]),
            &lines(["alpha", "beta"]),
        );
        assert!(plan.changed_rows.is_empty());
        assert_eq!(plan.clear_start_row, Some(3));
        assert_eq!(plan.clear_end_row, 3);
    }

    #[test]
    fn incremental_repaint_noop_for_identical_frames() {
        let mut engine = IncrementalRenderEngine::default();
        let frame = lines(["row-1", "row-2"]);

        let mut first = Vec::new();
        engine.repaint(&mut first, &frame).expect("first repaint");
        assert!(!first.is_empty());

        let mut second = Vec::new();
        engine.repaint(&mut second, &frame).expect("second repaint");
        assert!(second.is_empty());
    }

    #[test]
    fn incremental_repaint_updates_changed_rows_and_clears_removed_tail() {
        let mut engine = IncrementalRenderEngine::default();

        let mut seed = Vec::new();
        engine
            .repaint(&mut seed, &lines(["alpha", "beta", "gamma"]))
            .expect("seed repaint");

        let mut out = Vec::new();
        engine
            .repaint(&mut out, &lines(["alpha", "BETA"]))
            .expect("incremental repaint");

        let ansi = String::from_utf8(out).expect("valid utf8");
        assert!(!ansi.contains("\x1b[1;1H\x1b[2Kalpha"));
        assert!(ansi.contains("\x1b[2;1H\x1b[2KBETA"));
        assert!(ansi.contains("\x1b[3;1H\x1b[2K"));
        assert!(ansi.ends_with("\x1b[3;1H"));
    }
}
