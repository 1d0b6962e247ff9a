// Public API - data types, probing and report functions
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod monitor;
pub mod probe;
pub mod state;

// Front-end plumbing used by the binary
pub mod cli;
pub mod prefs;
pub mod tui;
