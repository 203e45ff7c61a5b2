use anyhow::{Context, Result};
use chrono::FixedOffset;
use clap::Parser;
use daily_copy::{
    adapters::{inbound::http::router::create_router, outbound::storage::S3Settings},
    app::{
        default_delivery_offset, migrate_database, AppBuilder, AppConfig, GeneratorBackend,
        MessagingBackend, RepositoryBackend, StorageBackend,
    },
    BucketName,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "daily-copy-server")]
#[command(about = "Admin, public and job endpoints for the daily copy archive", long_about = None)]
struct Cli {
    /// Server port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value = "3000")]
    port: u16,

    /// Server host to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Storage backend type (memory or s3)
    #[arg(long, env = "STORAGE_BACKEND", default_value = "memory")]
    storage_backend: String,

    /// Repository backend type (memory or database)
    #[arg(long, env = "REPOSITORY_BACKEND", default_value = "memory")]
    repository_backend: String,

    /// S3 endpoint URL for S3-compatible services
    #[arg(long, env = "S3_ENDPOINT")]
    s3_endpoint: Option<String>,

    /// Key-visual bucket name
    #[arg(long, env = "S3_BUCKET", default_value = "key-visuals")]
    s3_bucket: String,

    /// S3 region
    #[arg(long, env = "S3_REGION", default_value = "us-east-1")]
    s3_region: String,

    /// S3 access key
    #[arg(long, env = "S3_ACCESS_KEY")]
    s3_access_key: Option<String>,

    /// S3 secret key
    #[arg(long, env = "S3_SECRET_KEY")]
    s3_secret_key: Option<String>,

    /// Secret used to sign media URLs served by this server
    #[arg(long, env = "MEDIA_SIGNING_SECRET", default_value = "development-secret")]
    media_secret: String,

    /// Public base URL of this server, used in signed media URLs
    #[arg(long, env = "PUBLIC_BASE_URL", default_value = "http://localhost:3000")]
    public_base_url: String,

    /// Database URL for repository backend (PostgreSQL)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Create missing tables before serving
    #[arg(long, env = "RUN_MIGRATIONS", default_value = "false")]
    migrate: bool,

    /// LINE Messaging API channel access token
    #[arg(long, env = "LINE_CHANNEL_ACCESS_TOKEN")]
    line_access_token: Option<String>,

    /// API key for the copy generator
    #[arg(long, env = "OPENAI_API_KEY")]
    openai_api_key: Option<String>,

    /// Chat model used for generation
    #[arg(long, env = "OPENAI_MODEL", default_value = daily_copy::adapters::outbound::generation::DEFAULT_MODEL)]
    openai_model: String,

    /// UTC offset subscribers' delivery times are expressed in
    #[arg(long, env = "DELIVERY_UTC_OFFSET")]
    delivery_offset: Option<FixedOffset>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn to_app_config(&self) -> Result<AppConfig> {
        let storage_backend = match self.storage_backend.as_str() {
            "memory" => StorageBackend::InMemory {
                media_secret: self.media_secret.clone(),
                public_base_url: self.public_base_url.clone(),
            },
            "s3" => {
                let bucket = BucketName::new(self.s3_bucket.clone())
                    .context("S3_BUCKET is not a valid bucket name")?;

                StorageBackend::S3(S3Settings {
                    bucket,
                    region: self.s3_region.clone(),
                    access_key_id: self.s3_access_key.clone(),
                    secret_access_key: self.s3_secret_key.clone(),
                    endpoint: self.s3_endpoint.clone(),
                })
            }
            _ => anyhow::bail!("Unknown storage backend: {}", self.storage_backend),
        };

        let repository_backend = match self.repository_backend.as_str() {
            "memory" => RepositoryBackend::InMemory,
            "database" | "db" => {
                let connection_string = self
                    .database_url
                    .clone()
                    .context("DATABASE_URL is required for database backend")?;
                RepositoryBackend::Database { connection_string }
            }
            _ => anyhow::bail!("Unknown repository backend: {}", self.repository_backend),
        };

        let messaging_backend = match &self.line_access_token {
            Some(access_token) => MessagingBackend::Line {
                access_token: access_token.clone(),
            },
            None => MessagingBackend::Recording,
        };

        let generator_backend = match &self.openai_api_key {
            Some(api_key) => GeneratorBackend::OpenAi {
                api_key: api_key.clone(),
                model: self.openai_model.clone(),
            },
            None => GeneratorBackend::Unconfigured,
        };

        Ok(AppConfig {
            storage_backend,
            repository_backend,
            messaging_backend,
            generator_backend,
            delivery_offset: self.delivery_offset.unwrap_or_else(default_delivery_offset),
        })
    }

    fn init_logging(&self) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .context("Invalid log level")?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    info!("Starting daily copy server");
    info!("Storage backend: {}", cli.storage_backend);
    info!("Repository backend: {}", cli.repository_backend);

    let config = cli.to_app_config()?;

    if cli.migrate {
        if let RepositoryBackend::Database { connection_string } = &config.repository_backend {
            migrate_database(connection_string)
                .await
                .context("Failed to migrate database")?;
        }
    }

    let app_services = AppBuilder::new()
        .with_config(config)
        .build()
        .await
        .context("Failed to build application")?;

    let router = create_router(app_services.state());

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, router)
        .await
        .context("Failed to start server")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "daily-copy-server",
            "--port",
            "8080",
            "--storage-backend",
            "s3",
            "--s3-bucket",
            "campaign-visuals",
            "--delivery-offset",
            "+09:00",
        ]);

        assert_eq!(cli.port, 8080);
        assert_eq!(cli.storage_backend, "s3");
        assert_eq!(cli.s3_bucket, "campaign-visuals");
        assert_eq!(cli.delivery_offset.unwrap().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_memory_config() {
        let cli = Cli::parse_from(["daily-copy-server"]);

        let config = cli.to_app_config().unwrap();
        match config.storage_backend {
            StorageBackend::InMemory { .. } => (),
            _ => panic!("Expected InMemory backend"),
        }
        assert!(matches!(config.messaging_backend, MessagingBackend::Recording));
    }

    #[test]
    fn test_database_backend_requires_url() {
        let cli = Cli::parse_from(["daily-copy-server", "--repository-backend", "database"]);
        if cli.database_url.is_none() {
            assert!(cli.to_app_config().is_err());
        }
    }
}
