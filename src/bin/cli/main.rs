use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use daily_copy::{
    adapters::inbound::http::{DeliveryReportDto, GeneratedDraftDto},
    app::{config_from_env, migrate_database, AppBuilder, AppServices},
    domain::{DeliveryFrequency, DeliveryProfile, DeliveryTime},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "daily-copy-cli")]
#[command(about = "Run daily copy jobs and maintenance tasks", long_about = None)]
struct Cli {
    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Push the latest published entry to every subscriber that is due
    Deliver,

    /// Generate a draft entry with the configured copy generator
    Generate,

    /// Create the database tables if they do not exist
    Migrate {
        /// PostgreSQL connection string
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },

    /// Register a messaging subscriber for daily delivery
    Subscribe {
        /// Messaging user id of the subscriber
        line_user_id: String,
        /// Local delivery time, HH:MM
        #[arg(short, long, default_value = "08:00")]
        time: String,
    },
}

fn init_logging(level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Invalid log level")?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

async fn build_app() -> Result<(AppServices, chrono::FixedOffset)> {
    let config = config_from_env().context("Failed to read configuration")?;
    let offset = config.delivery_offset;
    let app = AppBuilder::new()
        .with_config(config)
        .build()
        .await
        .context("Failed to build application")?;
    Ok((app, offset))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Deliver => {
            let (app, _) = build_app().await?;
            let report = app
                .delivery_service
                .deliver_due()
                .await
                .context("Delivery run failed")?;
            let dto = DeliveryReportDto::from(report);
            println!("{}", serde_json::to_string_pretty(&dto)?);
        }
        Commands::Generate => {
            let (app, _) = build_app().await?;
            let draft = app
                .generation_service
                .generate_draft()
                .await
                .context("Generation failed")?;
            let dto = GeneratedDraftDto::from(draft);
            println!("{}", serde_json::to_string_pretty(&dto)?);
        }
        Commands::Migrate { database_url } => {
            migrate_database(&database_url)
                .await
                .context("Failed to migrate database")?;
            println!("Database schema is up to date");
        }
        Commands::Subscribe { line_user_id, time } => {
            let delivery_time = DeliveryTime::parse(&time)
                .context("Invalid delivery time")?;
            let (app, offset) = build_app().await?;

            let profile = DeliveryProfile {
                id: Uuid::new_v4(),
                line_user_id,
                frequency: DeliveryFrequency::Daily,
                delivery_time,
                next_scheduled_at: delivery_time.next_after(Utc::now(), offset),
            };
            app.dependencies
                .profile_repository
                .save(&profile)
                .await
                .context("Failed to save profile")?;
            println!(
                "Subscribed {} at {}, first delivery {}",
                profile.line_user_id, profile.delivery_time, profile.next_scheduled_at
            );
        }
    }

    Ok(())
}
