pub mod client;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod pagination;
pub mod paths;
pub mod routine;
pub mod runner;
pub mod script;
pub mod storage;
pub mod types;

pub use error::{AstromechError, Result};
