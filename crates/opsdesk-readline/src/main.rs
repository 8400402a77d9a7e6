mod command;
mod helper;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use command::Command;
use helper::CliHelper;
use opsdesk_application::{SessionStore, TurnOrchestrator, TurnOutcome, TurnSettings};
use opsdesk_core::config::AssistantSettings;
use opsdesk_core::session::{AssistantApi, ChatMessage, DeepThinkPhase, MessageRole};
use opsdesk_infrastructure::{ConfigService, HttpAssistantApi};

/// The main entry point for the opsdesk REPL.
///
/// 1. Loads settings from `~/.config/opsdesk/config.toml` and `OPSDESK_*`
/// 2. Initializes logging (`RUST_LOG` wins over the configured level)
/// 3. Wires the HTTP backend into the session store and turn orchestrator
/// 4. Runs the read-eval loop on a single-threaded runtime
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config_service = ConfigService::with_default_path()?;
    let settings = config_service
        .load()
        .context("Failed to load opsdesk settings")?;
    init_tracing(&settings);
    tracing::debug!("[opsdesk] Config file {}", config_service.path().display());

    // ===== Backend Initialization =====
    let http_api = HttpAssistantApi::from_settings(&settings)?;
    tracing::info!(
        "[opsdesk] Backend {} (provider={})",
        http_api.base_url(),
        settings.model_provider
    );
    let api: Arc<dyn AssistantApi> = Arc::new(http_api);
    let store = Arc::new(SessionStore::new(api.clone()));
    let orchestrator = TurnOrchestrator::new(api, store.clone(), TurnSettings::from(&settings));
    store.list_sessions().await;

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== opsdesk ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message, '/deepthink on' to plan first, or '/quit' to exit.".bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        let prompt = prompt_for(orchestrator.phase().await);
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        };

        let command = match command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                println!("{}", usage.yellow());
                continue;
            }
        };
        let _ = rl.add_history_entry(line.trim());

        if command == Command::Quit {
            println!("{}", "Goodbye!".bright_green());
            break;
        }
        run_command(&orchestrator, &store, command).await;
    }

    Ok(())
}

async fn run_command(orchestrator: &TurnOrchestrator, store: &SessionStore, command: Command) {
    match command {
        Command::Say(text) => {
            let outcome = orchestrator.submit(&text, None).await;
            report_turn(orchestrator, outcome).await;
        }
        Command::Approve => {
            let outcome = orchestrator.approve().await;
            if matches!(outcome, Ok(TurnOutcome::Ignored)) {
                println!("{}", "No plan is awaiting approval.".yellow());
            }
            report_turn(orchestrator, outcome).await;
        }
        Command::DeepThink(enabled) => match orchestrator.set_deep_think(enabled).await {
            Ok(()) => println!(
                "{}",
                format!("DeepThink {}", if enabled { "on" } else { "off" }).bright_black()
            ),
            Err(err) => println!("{}", err.to_string().yellow()),
        },
        Command::NewSession => {
            store.start_new_session().await;
            println!("{}", "Started a new session.".bright_black());
        }
        Command::ListSessions => {
            let sessions = store.list_sessions().await;
            if sessions.is_empty() {
                println!("{}", "No sessions.".bright_black());
            }
            let active = store.active_session_id().await;
            for session in sessions {
                let marker = if Some(session.id) == active { "*" } else { " " };
                println!(
                    "{} {:>5}  {}  {}",
                    marker,
                    session.id,
                    session.title.bold(),
                    session.updated_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
                );
            }
        }
        Command::Load(id) => match store.load_session(id).await {
            Ok(Some(messages)) => {
                println!("{}", format!("Loaded session {id}").bright_black());
                for message in &messages {
                    print_message(message);
                }
            }
            Ok(None) => {}
            Err(err) => println!("{}", format!("Could not load session {id}: {err}").red()),
        },
        Command::Phase => {
            let deep_think = orchestrator.deep_think().await;
            println!(
                "{}",
                format!(
                    "DeepThink {} (phase: {})",
                    if deep_think.is_enabled() { "on" } else { "off" },
                    deep_think.phase()
                )
                .bright_black()
            );
        }
        Command::Html => {
            let rendered = orchestrator.rendered_transcript().await;
            match rendered.iter().rev().find(|m| m.role == MessageRole::Assistant) {
                Some(message) => println!("{}", message.html),
                None => println!("{}", "No assistant message yet.".bright_black()),
            }
        }
        Command::Quit => {}
    }
}

async fn report_turn(
    orchestrator: &TurnOrchestrator,
    outcome: opsdesk_core::error::Result<TurnOutcome>,
) {
    match outcome {
        Ok(TurnOutcome::Completed { phase }) => {
            if let Some(reply) = orchestrator.transcript().await.last() {
                print_message(reply);
            }
            if phase == DeepThinkPhase::AwaitingApproval {
                println!(
                    "{}",
                    "Plan ready. Type '/approve' to execute, or reply to refine it.".bright_yellow()
                );
            }
        }
        Ok(TurnOutcome::Failed { .. }) => {
            if let Some(reply) = orchestrator.transcript().await.last() {
                println!("{}", reply.content.red());
            }
        }
        Ok(TurnOutcome::Ignored) | Ok(TurnOutcome::Superseded) => {}
        Err(err) => println!("{}", err.to_string().yellow()),
    }
}

fn print_message(message: &ChatMessage) {
    match message.role {
        MessageRole::User => println!("{}", format!("> {}", message.content).green()),
        MessageRole::Assistant => {
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
            for call in &message.function_calls {
                println!(
                    "{}",
                    format!("[{}] {}", call.name, call.arguments).bright_magenta()
                );
            }
        }
    }
}

fn prompt_for(phase: DeepThinkPhase) -> String {
    match phase {
        DeepThinkPhase::Idle => ">> ".to_string(),
        phase => format!("[{phase}] >> "),
    }
}

fn init_tracing(settings: &AssistantSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
