// Operator console for the computer-use browser agent.
//
// Opens one Chrome window at the configured viewport, then reads goals from
// the terminal and runs each as a fresh goal session against that page.

use anyhow::{Context, Result};
use browser_computer_use::agent::safety::read_console_line;
use browser_computer_use::{
    Agent, BrowserManager, Config, ConsoleSafetyGate, DoneReason, GeminiClient, SessionConfig,
    credential_from_env,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "computer-use-browser", version, about = "Drive Chrome with a computer-use model")]
struct Cli {
    /// YAML config file; defaults apply when it does not exist
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Run Chrome without a window
    #[arg(long)]
    headless: bool,

    /// Run a single goal and exit instead of prompting
    #[arg(long)]
    goal: Option<String>,

    /// Page to open before the first goal
    #[arg(long)]
    start_url: Option<String>,
}

const EXAMPLE_GOALS: &[&str] = &[
    "Search for the latest Rust release notes and summarize the headline features",
    "Find the weather forecast for Berlin this weekend",
    "Open example.com and tell me what the page says",
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Existing environment variables win over .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    if cli.headless {
        config.browser.headless = true;
    }
    if let Some(url) = cli.start_url {
        config.start_url = url;
    }

    let Some(api_key) = credential_from_env() else {
        eprintln!("Error: set GOOGLE_API_KEY (or GENAI_API_KEY) in the environment or a .env file.");
        std::process::exit(1);
    };

    let session_config = SessionConfig::try_from(&config)?;
    let model = GeminiClient::new(
        api_key,
        config.api_base.clone(),
        config.model.clone(),
        config.request_timeout()?,
    )?;

    info!("Using model {}", model.model());

    let manager = BrowserManager::launch(&config).await?;
    let agent = Agent::new(
        manager.driver(),
        Arc::new(model),
        Arc::new(ConsoleSafetyGate),
        session_config,
    );

    let outcome = match cli.goal {
        Some(goal) => run_goal(&agent, &goal).await,
        None => goal_loop(&agent).await,
    };

    if let Err(e) = manager.shutdown().await {
        error!("Browser shutdown failed: {}", e);
    }
    outcome
}

async fn goal_loop(agent: &Agent) -> Result<()> {
    println!("Browser is ready. Example goals:");
    for example in EXAMPLE_GOALS {
        println!("  - {example}");
    }
    println!("Type 'exit' or 'quit' to stop.");

    loop {
        let Some(line) = read_console_line("\nGoal> ".to_string()).await? else {
            break;
        };
        let goal = line.trim();
        if goal.is_empty() {
            continue;
        }
        if goal.eq_ignore_ascii_case("exit") || goal.eq_ignore_ascii_case("quit") {
            break;
        }
        if let Err(e) = run_goal(agent, goal).await {
            error!("Goal failed: {:#}", e);
        }
    }

    info!("Goodbye");
    Ok(())
}

async fn run_goal(agent: &Agent, goal: &str) -> Result<()> {
    let report = agent.run(goal).await?;
    match &report.reason {
        DoneReason::FinalAnswer(text) => println!("Agent: {text}"),
        DoneReason::UserTerminated => println!("Stopped: the operator declined an action."),
        DoneReason::TurnLimitReached => println!(
            "Stopped: turn limit of {} reached without an answer.",
            agent.config().turn_limit
        ),
    }
    info!(
        "Session {} took {:.1}s over {} turn(s)",
        report.session_id,
        (report.finished_at - report.started_at).num_milliseconds() as f64 / 1000.0,
        report.turns
    );
    Ok(())
}
