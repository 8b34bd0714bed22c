//! Serverless web application entry point.
//!
//! ```text
//!   API Gateway event                        Local browser
//!         │                                        │
//!         ▼                                        ▼
//!   ┌──────────────┐                       ┌──────────────┐
//!   │  lambda.rs   │  X-Forwarded-Host     │  HttpServer  │
//!   │  adapter     │  → Host               │  (serve)     │
//!   └──────┬───────┘                       └──────┬───────┘
//!          └───────────────┬──────────────────────┘
//!                          ▼
//!                 ┌─────────────────┐     ┌──────────────────┐
//!                 │  axum Router    │     │ response policy  │
//!                 │  /, /example_*  │ ──▶ │ headers + log    │
//!                 └─────────────────┘     └──────────────────┘
//!
//!   Cold start: config → logging → SECRET_KEY get-or-create in S3
//! ```

use clap::{Parser, Subcommand};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

use serverless_web::config::ConfigLoader;
use serverless_web::http::{build_router, HttpServer};
use serverless_web::lifecycle::{bootstrap, Shutdown};
use serverless_web::storage::{MemoryStore, ObjectStore};

#[derive(Parser)]
#[command(name = "serverless-web")]
#[command(about = "Serverless web application for AWS Lambda", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve invocations from the Lambda runtime (default)
    Lambda,
    /// Run a local development server
    Serve {
        #[arg(short, long, default_value = "127.0.0.1:5000")]
        bind: String,

        /// Keep the session secret in memory instead of S3
        #[arg(long)]
        memory_store: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Lambda) {
        Commands::Lambda => {
            let config = bootstrap(&ConfigLoader::from_env(), None)
                .await
                .inspect_err(|e| tracing::error!(error = %e, "Startup failed"))?;
            serverless_web::lambda::run(build_router(config)).await
        }
        Commands::Serve { bind, memory_store } => {
            let mut loader = ConfigLoader::from_env();
            let mut store: Option<Arc<dyn ObjectStore>> = None;
            if memory_store {
                loader = loader.with_overrides(json!({"S3_BUCKET": "local-dev"}));
                store = Some(Arc::new(MemoryStore::new()));
            }

            let config = bootstrap(&loader, store)
                .await
                .inspect_err(|e| tracing::error!(error = %e, "Startup failed"))?;

            let listener = TcpListener::bind(&bind).await?;
            let shutdown = Shutdown::new();
            shutdown.trigger_on_ctrl_c();

            HttpServer::new(config)
                .run(listener, shutdown.subscribe())
                .await?;

            tracing::info!("Shutdown complete");
            Ok(())
        }
    }
}
