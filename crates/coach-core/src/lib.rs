pub mod block;
pub mod config;
pub mod draft;
pub mod error;
pub mod gateway;
pub mod io;
pub mod paths;
pub mod payload;
pub mod session;
pub mod state;
pub mod store;
pub mod types;
pub mod validation;
pub mod view;
pub mod wizard;

pub use error::{CoachError, Result};
