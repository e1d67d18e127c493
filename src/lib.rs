pub mod cli;
pub mod config;
pub mod folder;
pub mod imap;
pub mod output;
pub mod secret;
pub mod tracing;
