pub mod population;
pub mod satisfaction;
pub mod world;

pub use population::{assign_personalities, populate_cells, PopulationLayout};
pub use satisfaction::{Neighborhood, SatisfactionSummary};
pub use world::{Census, SchellingGrid};
