use chrono::{FixedOffset, Offset, Utc};
use object_store::memory::InMemory;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

use crate::{
    adapters::{
        inbound::http::AppState,
        outbound::{
            generation::{OpenAiCopyGenerator, UnconfiguredGenerator, DEFAULT_MODEL},
            messaging::{LineMessagingClient, RecordingMessenger},
            persistence::{
                InMemoryEntryRepository, InMemoryProfileRepository, SqlEntryRepository,
                SqlProfileRepository,
            },
            storage::{
                build_s3_adapter, LocalUrlSigner, ObjectStoreAdapter, S3Settings, UrlSigning,
            },
        },
    },
    domain::value_objects::BucketName,
    ports::{
        external::{CopyGenerator, MessagingClient},
        repositories::{EntryRepository, ProfileRepository},
        services::{
            DeliveryService, EntryLifecycleService, GenerationService, ListingService,
            WebhookService,
        },
        storage::ObjectStore,
    },
    services::{
        DeliveryServiceImpl, EntryLifecycleServiceImpl, GenerationServiceImpl, ListingServiceImpl,
        WebhookServiceImpl,
    },
};

/// Delivery times are expressed in Japan Standard Time unless configured
const DEFAULT_DELIVERY_OFFSET_SECS: i32 = 9 * 3600;

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    pub repository_backend: RepositoryBackend,
    pub messaging_backend: MessagingBackend,
    pub generator_backend: GeneratorBackend,
    /// Offset subscribers' delivery times are expressed in
    pub delivery_offset: FixedOffset,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::InMemory {
                media_secret: "development-secret".to_string(),
                public_base_url: "http://localhost:3000".to_string(),
            },
            repository_backend: RepositoryBackend::InMemory,
            messaging_backend: MessagingBackend::Recording,
            generator_backend: GeneratorBackend::Unconfigured,
            delivery_offset: default_delivery_offset(),
        }
    }
}

pub fn default_delivery_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_DELIVERY_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// Process-local store; media URLs are signed and served by this server
    InMemory {
        media_secret: String,
        public_base_url: String,
    },
    S3(S3Settings),
}

/// Repository backend configuration
#[derive(Debug, Clone)]
pub enum RepositoryBackend {
    InMemory,
    Database { connection_string: String },
}

/// Messaging backend configuration
#[derive(Debug, Clone)]
pub enum MessagingBackend {
    /// Keep messages in memory
    Recording,
    Line { access_token: String },
}

/// Copy generator configuration
#[derive(Debug, Clone)]
pub enum GeneratorBackend {
    Unconfigured,
    OpenAi { api_key: String, model: String },
}

/// Application dependencies container
#[derive(Clone)]
pub struct AppDependencies {
    pub store: Arc<dyn ObjectStore>,
    pub media_signer: Option<LocalUrlSigner>,
    pub entry_repository: Arc<dyn EntryRepository>,
    pub profile_repository: Arc<dyn ProfileRepository>,
    pub messenger: Arc<dyn MessagingClient>,
    pub generator: Arc<dyn CopyGenerator>,
}

/// Application services container
#[derive(Clone)]
pub struct AppServices {
    pub lifecycle_service: Arc<dyn EntryLifecycleService>,
    pub listing_service: Arc<dyn ListingService>,
    pub delivery_service: Arc<dyn DeliveryService>,
    pub generation_service: Arc<dyn GenerationService>,
    pub webhook_service: Arc<dyn WebhookService>,
    pub dependencies: AppDependencies,
}

impl AppServices {
    /// Router state wired to these services
    pub fn state(&self) -> AppState {
        AppState {
            lifecycle_service: self.lifecycle_service.clone(),
            listing_service: self.listing_service.clone(),
            delivery_service: self.delivery_service.clone(),
            generation_service: self.generation_service.clone(),
            webhook_service: self.webhook_service.clone(),
            store: self.dependencies.store.clone(),
            media_signer: self.dependencies.media_signer.clone(),
        }
    }
}

/// Application builder for dependency injection
#[derive(Default)]
pub struct AppBuilder {
    config: AppConfig,
    store: Option<Arc<dyn ObjectStore>>,
    entry_repository: Option<Arc<dyn EntryRepository>>,
    profile_repository: Option<Arc<dyn ProfileRepository>>,
    messenger: Option<Arc<dyn MessagingClient>>,
    generator: Option<Arc<dyn CopyGenerator>>,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    pub fn with_repository_backend(mut self, backend: RepositoryBackend) -> Self {
        self.config.repository_backend = backend;
        self
    }

    pub fn with_delivery_offset(mut self, offset: FixedOffset) -> Self {
        self.config.delivery_offset = offset;
        self
    }

    /// Use this store instead of the configured backend
    pub fn with_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use this entry repository instead of the configured backend
    pub fn with_entry_repository(mut self, repository: Arc<dyn EntryRepository>) -> Self {
        self.entry_repository = Some(repository);
        self
    }

    pub fn with_profile_repository(mut self, repository: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repository = Some(repository);
        self
    }

    pub fn with_messenger(mut self, messenger: Arc<dyn MessagingClient>) -> Self {
        self.messenger = Some(messenger);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn CopyGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Build the application dependencies
    pub async fn build_dependencies(self) -> Result<AppDependencies, AppError> {
        let (configured_store, media_signer) = self.create_store()?;
        let store = self.store.clone().unwrap_or(configured_store);

        let (entry_repository, profile_repository) = self.create_repositories().await?;
        let entry_repository = self.entry_repository.clone().unwrap_or(entry_repository);
        let profile_repository = self.profile_repository.clone().unwrap_or(profile_repository);

        let messenger = match self.messenger.clone() {
            Some(messenger) => messenger,
            None => self.create_messenger()?,
        };
        let generator = match self.generator.clone() {
            Some(generator) => generator,
            None => self.create_generator()?,
        };

        Ok(AppDependencies {
            store,
            media_signer,
            entry_repository,
            profile_repository,
            messenger,
            generator,
        })
    }

    /// Build the complete application with services
    pub async fn build(self) -> Result<AppServices, AppError> {
        let delivery_offset = self.config.delivery_offset;
        let deps = self.build_dependencies().await?;

        let lifecycle_service: Arc<dyn EntryLifecycleService> = Arc::new(
            EntryLifecycleServiceImpl::new(deps.entry_repository.clone(), deps.store.clone()),
        );
        let listing_service = Arc::new(ListingServiceImpl::new(
            deps.entry_repository.clone(),
            deps.store.clone(),
        ));
        let delivery_service = Arc::new(DeliveryServiceImpl::new(
            deps.entry_repository.clone(),
            deps.profile_repository.clone(),
            deps.messenger.clone(),
            delivery_offset,
        ));
        let generation_service = Arc::new(GenerationServiceImpl::new(
            deps.generator.clone(),
            lifecycle_service.clone(),
        ));
        let webhook_service = Arc::new(WebhookServiceImpl::new(deps.messenger.clone()));

        Ok(AppServices {
            lifecycle_service,
            listing_service,
            delivery_service,
            generation_service,
            webhook_service,
            dependencies: deps,
        })
    }

    fn create_store(&self) -> Result<(Arc<dyn ObjectStore>, Option<LocalUrlSigner>), AppError> {
        match &self.config.storage_backend {
            StorageBackend::InMemory {
                media_secret,
                public_base_url,
            } => {
                let signer = LocalUrlSigner::new(media_secret.clone(), public_base_url.clone());
                let adapter = ObjectStoreAdapter::new(
                    Arc::new(InMemory::new()),
                    UrlSigning::Local(signer.clone()),
                );
                Ok((Arc::new(adapter), Some(signer)))
            }
            StorageBackend::S3(settings) => {
                let adapter =
                    build_s3_adapter(settings).map_err(|e| AppError::StorageInit {
                        message: e.to_string(),
                    })?;
                info!(bucket = settings.bucket.as_str(), "Using S3 key-visual storage");
                Ok((Arc::new(adapter), None))
            }
        }
    }

    async fn create_repositories(
        &self,
    ) -> Result<(Arc<dyn EntryRepository>, Arc<dyn ProfileRepository>), AppError> {
        match &self.config.repository_backend {
            RepositoryBackend::InMemory => Ok((
                Arc::new(InMemoryEntryRepository::new()),
                Arc::new(InMemoryProfileRepository::new()),
            )),
            RepositoryBackend::Database { connection_string } => {
                let pool = connect(connection_string).await?;
                Ok((
                    Arc::new(SqlEntryRepository::new(pool.clone())),
                    Arc::new(SqlProfileRepository::new(pool)),
                ))
            }
        }
    }

    fn create_messenger(&self) -> Result<Arc<dyn MessagingClient>, AppError> {
        match &self.config.messaging_backend {
            MessagingBackend::Recording => Ok(Arc::new(RecordingMessenger::new())),
            MessagingBackend::Line { access_token } => {
                let client = LineMessagingClient::new(access_token.clone()).map_err(|e| {
                    AppError::ServiceInit {
                        message: e.to_string(),
                    }
                })?;
                Ok(Arc::new(client))
            }
        }
    }

    fn create_generator(&self) -> Result<Arc<dyn CopyGenerator>, AppError> {
        match &self.config.generator_backend {
            GeneratorBackend::Unconfigured => Ok(Arc::new(UnconfiguredGenerator)),
            GeneratorBackend::OpenAi { api_key, model } => {
                let generator = OpenAiCopyGenerator::new(api_key.clone(), model.clone())
                    .map_err(|e| AppError::ServiceInit {
                        message: e.to_string(),
                    })?;
                Ok(Arc::new(generator))
            }
        }
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },

    #[error("Repository initialization error: {message}")]
    RepositoryInit { message: String },

    #[error("Service initialization error: {message}")]
    ServiceInit { message: String },
}

async fn connect(connection_string: &str) -> Result<sqlx::PgPool, AppError> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(connection_string)
        .await
        .map_err(|e| AppError::RepositoryInit {
            message: e.to_string(),
        })
}

/// Create the `copy_entries` and `profiles` tables if they do not exist
pub async fn migrate_database(connection_string: &str) -> Result<(), AppError> {
    let pool = connect(connection_string).await?;
    let to_init_error = |e: sqlx::Error| AppError::RepositoryInit {
        message: e.to_string(),
    };

    SqlEntryRepository::new(pool.clone())
        .migrate()
        .await
        .map_err(to_init_error)?;
    SqlProfileRepository::new(pool)
        .migrate()
        .await
        .map_err(to_init_error)?;

    info!("Database schema is up to date");
    Ok(())
}

/// Create an in-memory application for testing and development
pub async fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new().build().await
}

fn required_env(name: &str) -> Result<String, AppError> {
    std::env::var(name).map_err(|_| AppError::Configuration {
        message: format!("{} environment variable required", name),
    })
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read the application configuration from environment variables
pub fn config_from_env() -> Result<AppConfig, AppError> {
    let defaults = AppConfig::default();

    let storage_backend = match std::env::var("STORAGE_BACKEND").as_deref() {
        Ok("s3") => {
            let bucket = match optional_env("S3_BUCKET") {
                Some(name) => BucketName::new(name).map_err(|e| AppError::Configuration {
                    message: e.to_string(),
                })?,
                None => BucketName::key_visuals(),
            };
            StorageBackend::S3(S3Settings {
                bucket,
                region: required_env("S3_REGION")?,
                access_key_id: optional_env("S3_ACCESS_KEY"),
                secret_access_key: optional_env("S3_SECRET_KEY"),
                endpoint: optional_env("S3_ENDPOINT"),
            })
        }
        Ok("memory") | Err(_) => match defaults.storage_backend {
            StorageBackend::InMemory {
                media_secret,
                public_base_url,
            } => StorageBackend::InMemory {
                media_secret: optional_env("MEDIA_SIGNING_SECRET").unwrap_or(media_secret),
                public_base_url: optional_env("PUBLIC_BASE_URL").unwrap_or(public_base_url),
            },
            other => other,
        },
        Ok(other) => {
            return Err(AppError::Configuration {
                message: format!("unknown storage backend: {}", other),
            })
        }
    };

    let repository_backend = match std::env::var("REPOSITORY_BACKEND").as_deref() {
        Ok("database") => RepositoryBackend::Database {
            connection_string: required_env("DATABASE_URL")?,
        },
        _ => RepositoryBackend::InMemory,
    };

    let messaging_backend = match optional_env("LINE_CHANNEL_ACCESS_TOKEN") {
        Some(access_token) => MessagingBackend::Line { access_token },
        None => MessagingBackend::Recording,
    };

    let generator_backend = match optional_env("OPENAI_API_KEY") {
        Some(api_key) => GeneratorBackend::OpenAi {
            api_key,
            model: optional_env("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        },
        None => GeneratorBackend::Unconfigured,
    };

    let delivery_offset = match optional_env("DELIVERY_UTC_OFFSET") {
        Some(raw) => raw.parse::<FixedOffset>().map_err(|_| AppError::Configuration {
            message: format!("invalid DELIVERY_UTC_OFFSET: {}", raw),
        })?,
        None => defaults.delivery_offset,
    };

    Ok(AppConfig {
        storage_backend,
        repository_backend,
        messaging_backend,
        generator_backend,
        delivery_offset,
    })
}

/// Create application from environment variables
pub async fn create_app_from_env() -> Result<AppServices, AppError> {
    AppBuilder::new().with_config(config_from_env()?).build().await
}
