//! Command handlers for the check_kafka_connector plugin

pub mod check;
pub mod list;

pub use check::handle_check_command;
pub use list::handle_list_command;
