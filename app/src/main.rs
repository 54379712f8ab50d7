//! Interactive console front end for a remote todo collection.
//!
//! Reads one command per line from stdin, sends the matching actions to the
//! store and waits for each cascade to finish before prompting again.

use std::io::Write;
use std::sync::Arc;
use todo_sync::command::HELP;
use todo_sync::{
    Command, Config, ConsolePresenter, Reconciler, ReconcilerEnvironment, TodoAction, TodoAppState,
};
use todo_sync_http::HttpTodoStore;
use todo_sync_runtime::Store;
use todo_sync_runtime::metrics::MetricsServer;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Initialize tracing (stderr, stdout belongs to the presenter)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(api_url = %config.api_url, "Starting todo-sync");

    let _metrics = match config.metrics_addr {
        Some(addr) => {
            let mut server = MetricsServer::new(addr);
            server.start()?;
            Some(server)
        },
        None => None,
    };

    let env = ReconcilerEnvironment::new(
        Arc::new(HttpTodoStore::new(config.api_url.as_str())),
        Arc::new(ConsolePresenter::stdout()),
    );
    let store = Store::new(TodoAppState::new(), Reconciler::new(), env);

    println!("=== todo-sync ===");
    println!("{HELP}");
    store.send(TodoAction::Load).await?.wait().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{HELP}"),
            Ok(command) => {
                for action in command.into_actions() {
                    store.send(action).await?.wait().await;
                }
            },
            Err(error) => eprintln!("{error}"),
        }
    }

    tracing::info!("Shutting down");
    store.shutdown(config.shutdown_timeout).await?;
    println!("\nGoodbye!");
    Ok(())
}
