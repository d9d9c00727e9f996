//! Command-line interface for the shelfwatch alerting pipeline.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use shelfwatch_core::{AlertEvent, Channel, EventType};
use shelfwatch_notify::UserPreferences;
use shelfwatch_queue::{Pipeline, PipelineConfig};

/// Shelfwatch - inventory alerting and notification pipeline.
#[derive(Parser, Debug)]
#[command(name = "shelfwatch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web server.
    Serve {
        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to bind to.
        #[arg(short, long, default_value_t = 8095)]
        port: u16,
    },
    /// Run a scripted demonstration of the pipeline and exit.
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Serve { host, port } => run_server(host, port).await,
        Command::Demo => run_demo().await,
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "shelfwatch=debug"
    } else {
        "shelfwatch=info"
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

async fn run_server(host: String, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    shelfwatch_api::run(addr).await
}

/// Push a handful of representative events through a local pipeline and
/// print what arrived.
async fn run_demo() -> Result<()> {
    let pipeline = Arc::new(Pipeline::new(PipelineConfig::default()).await);

    if !pipeline.dispatcher().validate_all_adapters().await {
        tracing::warn!("one or more channel adapters failed configuration validation");
    }

    let user_id = "demo-user";
    pipeline
        .preferences()
        .update(
            UserPreferences::new(user_id)
                .with_email("demo@example.com")
                .with_phone_number("+15550001111")
                .with_channels(
                    EventType::LowStock,
                    vec![Channel::Email, Channel::Sms, Channel::InApp],
                )
                .with_channels(EventType::ImminentExpiration, vec![Channel::Email, Channel::InApp])
                .with_channels(EventType::SupplierOrderUpdate, vec![Channel::InApp]),
        )
        .await;

    pipeline.start().await;

    let events = vec![
        AlertEvent::new(EventType::LowStock, user_id)
            .with_field("product_name", json!("Whole Milk"))
            .with_field("stock", json!(3)),
        AlertEvent::new(EventType::LowStock, user_id)
            .with_field("product_name", json!("Flour"))
            .with_field("stock", json!(25)),
        AlertEvent::new(EventType::ImminentExpiration, user_id)
            .with_field("product_name", json!("Yogurt"))
            .with_field("days_until_expiration", json!(2)),
        AlertEvent::new(EventType::SupplierOrderUpdate, user_id)
            .with_field("order_id", json!("PO-1042"))
            .with_field("status", json!("DELAYED")),
    ];
    let submitted = events.len() as u64;

    for event in events {
        pipeline.submit_event(event).await?;
    }

    // Three of the four events alert; wait for the pipeline to settle.
    let expected_notifications = 3;
    for _ in 0..100 {
        let stats = pipeline.stats().await;
        if stats.event_queue.completed + stats.event_queue.failed >= submitted
            && stats.notification_queue.completed + stats.notification_queue.failed
                >= expected_notifications
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    pipeline.stop().await;

    let stats = pipeline.stats().await;
    println!("Queue stats:");
    println!("{}", serde_json::to_string_pretty(&stats)?);

    let inbox = pipeline.dispatcher().in_app_notifications(user_id).await;
    println!("\nIn-app inbox for {} ({} message(s)):", user_id, inbox.len());
    for message in &inbox {
        println!("  [{}] {}", message.channel, message.subject);
    }

    Ok(())
}
