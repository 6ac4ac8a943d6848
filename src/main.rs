use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use roadmap_client::{
    api::RoadmapApiClient,
    config::{Config, LogFormat},
    session::{ChatMessage, ChatSession},
};

/// Terminal front end for the chat/roadmap API
#[derive(Parser, Debug)]
#[command(name = "roadmap-client", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the roadmap and print its graph as JSON
    Roadmap,

    /// Send one chat message and print the reply
    Chat {
        /// Message text
        message: String,

        /// Also print the resulting graph as JSON
        #[arg(long)]
        graph: bool,
    },

    /// Print the detail panel for a node as JSON
    Detail {
        /// Node id
        id: String,
    },

    /// Chat interactively; `:graph`, `:detail <id>` and `:quit` are commands
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "Roadmap client starting"
    );

    let client = match RoadmapApiClient::new(&config.api, config.request.clone()) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to initialize API client");
            return Err(e.into());
        }
    };

    let mut session = ChatSession::new(client, config.display.clone());
    session.load_roadmap().await;

    match cli.command {
        Command::Roadmap => print_json(session.store().view())?,
        Command::Chat { message, graph } => {
            let seen = session.transcript().len();
            session.send_message(&message).await;
            print_messages(&session.transcript()[seen..]);
            if graph {
                print_json(session.store().view())?;
            }
        }
        Command::Detail { id } => {
            let view = session.detail_view(&id)?;
            print_json(&view)?;
        }
        Command::Repl => run_repl(&mut session).await?,
    }

    Ok(())
}

async fn run_repl(session: &mut ChatSession<RoadmapApiClient>) -> anyhow::Result<()> {
    print_messages(session.transcript());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line.split_once(' ').unwrap_or((line, "")) {
            (":quit", _) => break,
            (":graph", _) => print_json(session.store().view())?,
            (":detail", id) => match session.detail_view(id.trim()) {
                Ok(view) => print_json(&view)?,
                Err(e) => eprintln!("{}", e),
            },
            _ => {
                let seen = session.transcript().len();
                session.send_message(line).await;
                print_messages(&session.transcript()[seen..]);
            }
        }
    }

    info!("Session ended");
    Ok(())
}

fn print_messages(messages: &[ChatMessage]) {
    for message in messages {
        println!("{}: {}", message.sender, message.text);
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
