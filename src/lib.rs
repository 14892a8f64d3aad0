pub mod config;
pub mod index;
pub mod query;
pub mod storage;
