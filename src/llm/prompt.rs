//! Prompt construction and perspective report formatting
//!
//! Both are pure functions of an [`AgentView`].

use crate::core::types::CellPos;
use crate::llm::context::AgentView;

/// Shown when a selection lands outside the grid
pub const OUTSIDE_GRID_MESSAGE: &str = "Clicked outside the grid.";

/// Prefix for a failed service call shown in place of the response
pub const FAILURE_PREFIX: &str = "(LLM call failed)";

/// Build the prompt asking the agent to explain itself in first person
pub fn build_prompt(view: &AgentView) -> String {
    format!(
        "You are a {color} agent in a Schelling segregation model.\n\
         You have {same} same-color neighbors out of {total} total.\n\
         Your personal threshold is {threshold}. You are currently {mood} with your location.\n\n\
         Your personality is that you are {personality}.\n\n\
         Explain your reasoning briefly in first person, \
         given your personality and your tolerance threshold.",
        color = view.color_name(),
        same = view.neighborhood.same,
        total = view.neighborhood.occupied,
        threshold = view.threshold,
        mood = if view.satisfied { "happy" } else { "unhappy" },
        personality = view.personality,
    )
}

/// Report shown to the user after a selection
///
/// `response` is the generated text, or the failure text from
/// [`failure_text`].
pub fn format_report(view: &AgentView, response: &str) -> String {
    format!(
        "Agent at {pos}: {color}\n  \
         Personality: {personality}\n  \
         Threshold: {threshold}\n  \
         fraction_same: {fraction:.2}\n  \
         Unhappy: {unhappy}\n\
         LLM says:\n{response}",
        pos = view.pos,
        color = view.color_name(),
        personality = view.personality,
        threshold = view.threshold,
        fraction = view.neighborhood.fraction_same(),
        unhappy = !view.satisfied,
        response = response,
    )
}

pub fn failure_text(err: &impl std::fmt::Display) -> String {
    format!("{} {}", FAILURE_PREFIX, err)
}

pub fn empty_cell_message(pos: CellPos) -> String {
    format!("Cell {} is empty. No agent perspective to show.", pos)
}
