//! CLI module for the check_kafka_connector plugin
//!
//! Holds the handlers for the two modes of the plugin.

pub mod commands;

pub use commands::{handle_check_command, handle_list_command};
