// Core commands module - line parsing, the command table and the dispatcher.

pub mod command_parser;
pub mod command_service;
pub mod command_table;
pub mod responses;

pub use command_service::{CommandService, IncomingMessage};
