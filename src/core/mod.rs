pub mod migration;
pub mod paths;
pub mod summary;
