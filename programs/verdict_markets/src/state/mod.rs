//! Account state for the verdict-markets protocol

pub mod config;
pub mod market;
pub mod pool;
pub mod stake;
pub mod vote;

pub use config::*;
pub use market::*;
pub use pool::*;
pub use stake::*;
pub use vote::*;
