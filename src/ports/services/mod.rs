mod entry_lifecycle_service;
mod job_services;
mod listing_service;

pub use entry_lifecycle_service::EntryLifecycleService;
pub use job_services::{
    DeliveryService, GeneratedDraft, GenerationService, WebhookEvent, WebhookService,
};
pub use listing_service::ListingService;
