#![doc = include_str!("../README.md")]

mod config;
mod error;
mod pool;
mod worker;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::pool::EagerPool;
pub use crate::worker::Job;
