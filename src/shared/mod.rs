pub mod config;
pub mod contracts;
pub mod definitions;
pub mod error;
