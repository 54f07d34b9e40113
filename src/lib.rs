pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod hand;
pub mod projection;
pub mod report;
pub mod rig;

pub use error::{Error, Result};
