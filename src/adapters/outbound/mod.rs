pub mod generation;
pub mod messaging;
pub mod persistence;
pub mod storage;
