pub mod aggregation;
pub mod commands;
pub mod database;
pub mod options;
pub mod request_manager;
pub mod table;
pub mod utils;
