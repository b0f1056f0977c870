use super::model::Scenario;
use crate::error::Result;

/// Read-only access to scenarios.
///
/// The persona id is query context only; it is not part of a scenario's
/// identity.
#[async_trait::async_trait]
pub trait ScenarioRepository: Send + Sync {
    /// Lists the scenarios available for `persona_id`, in API order.
    async fn list(&self, persona_id: &str) -> Result<Vec<Scenario>>;
}
