//! Selection handling - turns a selected cell into displayable text
//!
//! Nothing here fails: service errors, empty cells and off-grid selections
//! all become text for the display surface.

use crate::core::error::SchellingError;
use crate::core::types::CellPos;
use crate::llm::context::AgentView;
use crate::llm::prompt::{
    build_prompt, empty_cell_message, failure_text, format_report, OUTSIDE_GRID_MESSAGE,
};
use crate::llm::TextGenerator;
use crate::simulation::world::SchellingGrid;

/// Result of inspecting one selection
#[derive(Debug, Clone, PartialEq)]
pub enum Perspective {
    /// Selection was not on the grid
    Outside,
    /// Selected cell has no agent
    Empty { pos: CellPos },
    /// Selected cell has an agent; `response` holds the service error text
    /// when the call failed
    Agent {
        view: AgentView,
        response: Result<String, String>,
    },
}

impl Perspective {
    /// Text to display for this selection
    pub fn text(&self) -> String {
        match self {
            Perspective::Outside => OUTSIDE_GRID_MESSAGE.to_string(),
            Perspective::Empty { pos } => empty_cell_message(*pos),
            Perspective::Agent { view, response } => match response {
                Ok(text) => format_report(view, text),
                Err(error) => format_report(view, error),
            },
        }
    }

    pub fn pos(&self) -> Option<CellPos> {
        match self {
            Perspective::Outside => None,
            Perspective::Empty { pos } => Some(*pos),
            Perspective::Agent { view, .. } => Some(view.pos),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Perspective::Agent { response: Err(_), .. })
    }
}

/// Pairs a text generator with the model to ask
pub struct Inspector<G> {
    generator: G,
    model: String,
}

impl<G: TextGenerator> Inspector<G> {
    pub fn new(generator: G, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Inspect a selection that may have missed the grid
    pub async fn inspect_selection(
        &self,
        grid: &SchellingGrid,
        selection: Option<CellPos>,
    ) -> Perspective {
        match selection {
            Some(pos) => self.inspect(grid, pos).await,
            None => Perspective::Outside,
        }
    }

    /// Ask the agent at `pos` for its perspective
    ///
    /// Only occupied cells reach the generator.
    pub async fn inspect(&self, grid: &SchellingGrid, pos: CellPos) -> Perspective {
        let view = match AgentView::from_grid(grid, pos) {
            Ok(view) => view,
            Err(SchellingError::EmptyCell(pos)) => return Perspective::Empty { pos },
            Err(SchellingError::OutOfBounds(_)) => return Perspective::Outside,
            Err(e) => {
                tracing::error!(%pos, error = %e, "Failed to build agent view");
                return Perspective::Outside;
            }
        };

        let prompt = build_prompt(&view);
        tracing::info!(%pos, color = view.color_name(), satisfied = view.satisfied, "Requesting agent perspective");

        let response = match self.generator.generate(&self.model, &prompt).await {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!(%pos, error = %e, "Perspective request failed");
                Err(failure_text(&e))
            }
        };

        Perspective::Agent { view, response }
    }
}
