pub mod config;
pub mod entities;
pub mod error;
pub mod handler;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
