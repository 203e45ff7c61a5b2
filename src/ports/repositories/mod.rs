mod entry_repository;
mod profile_repository;

pub use entry_repository::EntryRepository;
pub use profile_repository::ProfileRepository;
