//! Selection pipeline
//!
//! Selected cell -> AgentView -> prompt -> TextGenerator -> Perspective

pub mod inspector;

pub use inspector::{Inspector, Perspective};
