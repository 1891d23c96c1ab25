pub mod changelog;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod models;
pub mod organizer;
pub mod session;
pub mod translator;
pub mod tui;
