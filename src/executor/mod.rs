pub mod executor;
pub mod options;
