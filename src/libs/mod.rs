//! Supporting modules around the database layer.
//!
//! - **Time**: the clock the store reads "now" from, local day bounds
//! - **Storage**: data directory, configuration, UI preferences
//! - **View state**: the observable tracking session used by front ends
//! - **Console**: messages, formatting and table rendering for the CLI

pub mod clock;
pub mod config;
pub mod data_storage;
pub mod formatter;
pub mod messages;
pub mod preferences;
pub mod session;
pub mod view;
