pub mod entry;
pub mod exec;
