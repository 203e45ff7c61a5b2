pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core business entities and value objects
pub use domain::{
    // Value objects
    BucketName,
    // Models
    CopyEntry,
    DeliveryProfile,
    DeliveryReport,
    // Errors
    EntryLifecycleError,
    EntryContent,
    EntryDeletion,
    EntryDetail,
    EntryForm,
    EntryId,
    EntryQuery,
    EntryStatus,
    EntryUpdate,
    ImagePath,
    ImageUpload,
    Listing,
    RepositoryError,
    StorageError,
    StorageWarning,
    TagFilter,
    TagSet,
    ValidationError,
};

// Port types - interfaces for external systems
pub use ports::{
    // External ports
    CopyGenerator,
    DeliveryService,
    // Service ports
    EntryLifecycleService,
    // Repository ports
    EntryRepository,
    GenerationService,
    ListingService,
    MessagingClient,
    // Storage ports
    ObjectStore,
    ProfileRepository,
    WebhookService,
};

// Service implementations - business logic
pub use services::{
    DeliveryServiceImpl, EntryLifecycleServiceImpl, GenerationServiceImpl, ListingServiceImpl,
    WebhookServiceImpl,
};

// Application factory and configuration
pub use app::{
    create_app_from_env, create_in_memory_app, migrate_database, AppBuilder, AppConfig,
    AppDependencies, AppError, AppServices, GeneratorBackend, MessagingBackend,
    RepositoryBackend, StorageBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{LocalUrlSigner, ObjectStoreAdapter};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_in_memory_app, AppBuilder, AppServices, CopyEntry, EntryForm, EntryId,
        EntryLifecycleService, ImagePath, ImageUpload, ListingService, ObjectStore,
        ObjectStoreAdapter, TagFilter,
    };
}
