mod config;
mod terminal;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use services::{SessionError, SessionRunner, session_channel};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::terminal::{AnswerWindow, TerminalView};

/// Timed multiple-choice quiz in the terminal.
#[derive(Debug, Parser)]
#[command(name = "quiz", version, about)]
struct Args {
    /// JSON file with the questions (array of {prompt, options, correct_index}).
    #[arg(long, env = "QUIZ_QUESTIONS")]
    questions: Option<PathBuf>,

    /// Seconds allowed per question.
    #[arg(long, env = "QUIZ_COUNTDOWN")]
    countdown: Option<u32>,

    /// Seconds the correct answer stays on screen before the next question.
    #[arg(long, env = "QUIZ_DELAY")]
    delay: Option<u32>,
}

/// Logs go to stderr so they never interleave with the quiz on stdout.
/// `RUST_LOG` overrides the default `warn` level.
fn init_logging() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()?;

    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging().context("failed to initialise logging")?;

    let bank = config::load_bank(args.questions.as_deref())?;
    let settings = config::settings(args.countdown, args.delay)?;
    info!(
        questions = bank.count(),
        countdown = settings.countdown_secs(),
        delay = settings.transition_delay_secs(),
        "configuration loaded"
    );

    TerminalView::show_intro(bank.count(), &settings);

    let window = AnswerWindow::default();
    let (handle, events) = session_channel();
    let mut runner = SessionRunner::new(
        bank,
        settings,
        TerminalView::new(window.clone()),
        &handle,
        events,
    );

    terminal::spawn_input(handle.clone(), window).context("failed to start the input reader")?;

    // `handle` stays alive until the runner returns so timeouts can finish the
    // quiz after stdin closes.
    let finished = tokio::select! {
        result = runner.run() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    drop(handle);
    match finished {
        Some(Ok(report)) => {
            info!(score = report.score(), total = report.total(), "quiz finished");
            Ok(())
        }
        Some(Err(SessionError::Aborted)) => {
            warn!("quiz session aborted");
            Ok(())
        }
        Some(Err(err)) => Err(err.into()),
        None => {
            runner.shutdown();
            println!();
            info!(
                answered = runner.controller().outcomes().len(),
                "quiz interrupted"
            );
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}
