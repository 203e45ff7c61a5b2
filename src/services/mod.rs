mod delivery_service_impl;
mod entry_lifecycle_service_impl;
mod generation_service_impl;
mod listing_service_impl;
mod webhook_service_impl;

pub use delivery_service_impl::DeliveryServiceImpl;
pub use entry_lifecycle_service_impl::EntryLifecycleServiceImpl;
pub use generation_service_impl::GenerationServiceImpl;
pub use listing_service_impl::ListingServiceImpl;
pub use webhook_service_impl::{WebhookServiceImpl, WELCOME_MESSAGE};
