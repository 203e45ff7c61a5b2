mod copy_generator;
mod messaging;

pub use copy_generator::{CopyGenerator, GeneratorError};
pub use messaging::{MessagingClient, MessagingError};
