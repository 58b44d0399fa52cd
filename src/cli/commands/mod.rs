pub mod add;
pub mod config;
pub mod list;
pub mod migrate;
pub mod summary;
