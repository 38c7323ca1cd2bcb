//! Schelling Voices - segregation model with agent perspectives

pub mod command;
pub mod core;
pub mod entity;
pub mod llm;
pub mod render;
pub mod simulation;
pub mod spatial;
pub mod ui;
