pub mod collections;
pub mod dashboard;
pub mod list;
