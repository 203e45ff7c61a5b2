mod in_memory_entry_repository;
mod in_memory_profile_repository;
mod sql_entry_repository;
mod sql_profile_repository;

pub use in_memory_entry_repository::InMemoryEntryRepository;
pub use in_memory_profile_repository::InMemoryProfileRepository;
pub use sql_entry_repository::SqlEntryRepository;
pub use sql_profile_repository::SqlProfileRepository;
