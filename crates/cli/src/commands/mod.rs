//! CLI command implementations

pub mod config;
pub mod convert;
pub mod doctor;
pub mod publish;
