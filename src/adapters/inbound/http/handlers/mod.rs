pub mod entry_handlers;
pub mod job_handlers;
pub mod media_handlers;
pub mod public_handlers;

pub use entry_handlers::*;
pub use job_handlers::*;
pub use media_handlers::*;
pub use public_handlers::*;
