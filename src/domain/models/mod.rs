pub mod delivery;
pub mod entry;
pub mod filter;
pub mod form;
pub mod generated;
pub mod lifecycle;
pub mod listing;

pub use delivery::*;
pub use entry::*;
pub use filter::*;
pub use form::*;
pub use generated::*;
pub use lifecycle::*;
pub use listing::*;
