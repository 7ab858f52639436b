pub mod api;
pub mod args;
mod auth;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod report;
pub mod storage;
pub mod store;
mod utils;

#[cfg(test)]
mod test;

pub use api::Mode;
pub use auth::Auth;
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use store::{Snapshot, Store};
