pub mod external;
pub mod repositories;
pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use external::{CopyGenerator, GeneratorError, MessagingClient, MessagingError};
pub use repositories::{EntryRepository, ProfileRepository};
pub use services::{
    DeliveryService, EntryLifecycleService, GeneratedDraft, GenerationService, ListingService,
    WebhookEvent, WebhookService,
};
pub use storage::{ObjectStore, SignedUrl, StoredObject};
