//! Session environment composition

pub mod composer;
pub mod platform;

pub use composer::{compose, compose_at, ComposeContext, ResolvedEnv};
