//! Command implementations for authkeys CLI

pub mod apply;
pub mod completion;
pub mod config;
pub mod list;
pub mod version;
