//! Command handlers for the capstan binary

pub mod deploy;
pub mod releases;
pub mod resolve;
