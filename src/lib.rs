pub mod analysis;
pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod interactive;
pub mod journal;
pub mod models;
pub mod store;
pub mod trend;
