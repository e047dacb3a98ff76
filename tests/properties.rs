//! Property tests for Capstan.
//!
//! Properties use randomized input generation to protect the invariants the
//! deploy engine relies on.
//!
//! Run with: `cargo test --test properties`

#[path = "properties/retention.rs"]
mod retention;

#[path = "properties/revision.rs"]
mod revision;
