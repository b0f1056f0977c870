//! Scenario domain module.

mod model;
mod repository;

pub use model::Scenario;
pub use repository::ScenarioRepository;
