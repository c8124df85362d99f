pub mod config;
pub mod error;
pub mod handlers;
pub mod job;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

pub use config::{AppState, Config};
pub use error::{AppError, ErrorKind};
