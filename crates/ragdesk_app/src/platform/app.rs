use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use anyhow::{anyhow, Context};
use clap::Parser;
use colored::Colorize;
use desk_logging::{desk_debug, desk_info, desk_warn};
use ragdesk_core::{update, AppState, Msg};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Cmd, Editor, ExternalPrinter, KeyCode, KeyEvent, Modifiers};

use super::config::{AppConfig, Cli};
use super::effects::EffectRunner;
use super::export::export_transcript;
use super::input::{parse_line, Action};
use super::ui::constants::{HELP_TEXT, PROMPT};
use super::ui::helper::CliHelper;
use super::ui::render::TerminalRenderer;

/// Work for the dispatcher thread, which owns the application state.
pub(crate) enum Command {
    Dispatch(Msg),
    Export(PathBuf),
    Shutdown,
}

/// Prints a block of lines without tearing the prompt.
type Output = Box<dyn FnMut(String) + Send>;

pub fn run_app() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = AppConfig::from(Cli::parse());

    let log_file = desk_logging::initialize(config.log_destination, config.log_level);
    desk_info!(
        "ragdesk starting api={} log_file={:?}",
        config.api.base_url,
        log_file
    );

    let mut rl: Editor<CliHelper, DefaultHistory> =
        Editor::new().context("failed to open the line editor")?;
    rl.set_helper(Some(CliHelper));
    rl.bind_sequence(KeyEvent(KeyCode::Enter, Modifiers::SHIFT), Cmd::Newline);
    rl.bind_sequence(KeyEvent(KeyCode::Enter, Modifiers::ALT), Cmd::Newline);

    let output: Output = match rl.create_external_printer() {
        Ok(mut printer) => Box::new(move |text: String| {
            if let Err(err) = printer.print(text) {
                desk_warn!("terminal print failed: {}", err);
            }
        }),
        Err(err) => {
            desk_warn!("no external printer ({}); printing directly", err);
            Box::new(|text: String| println!("{text}"))
        }
    };

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    let runner = EffectRunner::new(&config.api, cmd_tx.clone())
        .with_context(|| format!("cannot use backend address {:?}", config.api.base_url))?;

    println!("{}", "=== RagDesk ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Backend {}. Type /help for commands.", config.api.base_url).bright_black()
    );
    println!();

    let dispatcher = thread::Builder::new()
        .name("ragdesk-dispatch".to_string())
        .spawn(move || dispatch_loop(AppState::new(), runner, cmd_rx, output))
        .context("failed to start the dispatcher")?;

    let send = |command: Command| {
        let _ = cmd_tx.send(command);
    };
    send(Command::Dispatch(Msg::Started));

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                match parse_line(&line, Path::is_file) {
                    Action::Chat(text) => {
                        send(Command::Dispatch(Msg::InputChanged(text)));
                        send(Command::Dispatch(Msg::EnterPressed { shift: false }));
                    }
                    Action::Drop(files) => {
                        send(Command::Dispatch(Msg::DragEntered));
                        send(Command::Dispatch(Msg::FilesDropped(files)));
                    }
                    Action::Browse { files, missing } => {
                        for name in &missing {
                            println!("{}", format!("Not a file: {name}").yellow());
                        }
                        send(Command::Dispatch(Msg::FilesChosen(files)));
                    }
                    Action::Refresh => send(Command::Dispatch(Msg::RefreshRequested)),
                    Action::Export(path) => send(Command::Export(path)),
                    Action::Help => println!("{HELP_TEXT}"),
                    Action::Quit => break,
                    Action::Usage(usage) => println!("{}", format!("Usage: {usage}").yellow()),
                    Action::Unknown(command) => println!(
                        "{}",
                        format!("Unknown command {command}. Type /help.").bright_black()
                    ),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                desk_warn!("line editor failed: {}", err);
                break;
            }
        }
    }

    send(Command::Shutdown);
    let state = dispatcher
        .join()
        .map_err(|_| anyhow!("dispatcher thread panicked"))?;

    if let Some(path) = &config.transcript {
        export_transcript(&state.view(), path)
            .with_context(|| format!("failed to write transcript to {}", path.display()))?;
        println!("{}", format!("Transcript saved to {}", path.display()).green());
    }

    println!("{}", "Goodbye!".bright_green());
    desk_info!("ragdesk exiting");
    Ok(())
}

fn dispatch_loop(
    mut state: AppState,
    runner: EffectRunner,
    cmd_rx: mpsc::Receiver<Command>,
    mut output: Output,
) -> AppState {
    let mut renderer = TerminalRenderer::new();

    while let Ok(command) = cmd_rx.recv() {
        match command {
            Command::Dispatch(msg) => {
                desk_debug!("dispatch {:?}", msg);
                let (next, effects) = update(state, msg);
                state = next;
                runner.run(effects);
                if state.consume_dirty() {
                    let lines = renderer.render(&state.view());
                    if !lines.is_empty() {
                        output(lines.join("\n"));
                    }
                }
            }
            Command::Export(path) => {
                let notice = match export_transcript(&state.view(), &path) {
                    Ok(()) => format!("Transcript saved to {}", path.display()).green(),
                    Err(err) => format!("Export failed: {err}").red(),
                };
                output(notice.to_string());
            }
            Command::Shutdown => break,
        }
    }

    state
}
