pub mod browser;
pub mod cli;
pub mod dom;
pub mod error;
pub mod executor;
pub mod matcher;
pub mod oracle;
pub mod pilot;
pub mod profile;
pub mod report;
pub mod trace;
