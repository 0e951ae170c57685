pub mod dump;
pub mod tag;
