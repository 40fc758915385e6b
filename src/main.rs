use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mood_journal::analysis::TextAnalyzer;
use mood_journal::api::{self, AppState, SecurityConfig};
use mood_journal::config::AnalysisConfig;
use mood_journal::db::Database;
use mood_journal::interactive::{InteractiveSession, SubmitOutcome};
use mood_journal::journal::JournalService;
use mood_journal::models::Question;

#[derive(Parser)]
#[command(name = "moodj")]
#[command(about = "Mood journal: analyze writing, reflect, and follow your mood over time")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Analyze a piece of text and print the result as JSON
    Analyze {
        /// Text to analyze
        text: String,
    },
    /// Answer the guided reflection questions on the terminal
    Reflect,
    /// Print a user's mood trend from the local database
    Trend {
        /// Journal owner
        #[arg(short, long)]
        user: String,
    },
}

/// Server logs go to stdout; the one-shot commands log to stderr so their
/// output stays clean.
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "mood_journal=debug,tower_http=debug".into()),
    );

    if use_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    let analyzer = AnalysisConfig::from_env().build_analyzer()?;

    match cli.command {
        Some(Commands::Serve { port }) => serve(analyzer, port).await?,
        Some(Commands::Analyze { text }) => {
            let result = analyzer.analyze_or_default(&text).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Some(Commands::Reflect) => reflect(&analyzer).await?,
        Some(Commands::Trend { user }) => {
            let db = Database::open_default()?;
            db.migrate()?;

            let journal = JournalService::new(Arc::new(db), analyzer);
            let points = journal.trend(&user)?;
            println!("{}", serde_json::to_string_pretty(&points)?);
        }
        None => serve(analyzer, 3000).await?,
    }

    Ok(())
}

async fn serve(analyzer: TextAnalyzer, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting mood journal server on port {}", port);

    let db = Database::open_default()?;
    db.migrate()?;

    let config = SecurityConfig::from_env();
    if config.api_key.is_some() {
        tracing::info!("API key authentication enabled");
    }

    let app = api::create_router_with_config(AppState::new(Arc::new(db), analyzer), config);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Mood journal server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Run the six reflection questions over stdin/stdout and print the feedback.
async fn reflect(analyzer: &TextAnalyzer) -> anyhow::Result<()> {
    let mut session = InteractiveSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut question = session
        .current_question()
        .copied()
        .ok_or_else(|| anyhow::anyhow!("reflection script is empty"))?;

    let synthesis = loop {
        print_question(&question, session.current_index());

        let Some(line) = lines.next_line().await? else {
            anyhow::bail!("input ended before the reflection was complete");
        };

        match session.submit_answer(&line) {
            Ok(SubmitOutcome::Next(next)) => question = next,
            Ok(SubmitOutcome::Complete(synthesis)) => break synthesis,
            Err(e) => println!("{}", e),
        }
    };

    let feedback = analyzer
        .feedback_or_fallback(
            &synthesis.composite_text,
            &synthesis.mood_hint,
            &synthesis.emotion_hint,
        )
        .await;
    println!("\n{}", feedback);
    Ok(())
}

fn print_question(question: &Question, index: usize) {
    println!("\n{}. {}", index + 1, question.prompt);
    if !question.options.is_empty() {
        println!("   [{}]", question.options.join(" / "));
    }
}
