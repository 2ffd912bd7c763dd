pub mod config;
pub mod db;
pub mod error;
pub mod fanout;
pub mod models;
pub mod repo;
pub mod routes;
pub mod ui_state;
