//! Persona repository trait.
//!
//! Defines the interface for the remote persona operations.

use super::model::Persona;
use super::request::CreatePersonaRequest;
use crate::error::Result;

/// An abstract repository for the personas owned by the remote API.
///
/// This trait decouples the selection flow from the concrete transport
/// (HTTP client, in-memory fake, ...).
#[async_trait::async_trait]
pub trait PersonaRepository: Send + Sync {
    /// Lists all personas in the order the API returns them.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Persona>)`: All personas (possibly empty)
    /// - `Err(ParleyError)`: Error if the request fails
    async fn list(&self) -> Result<Vec<Persona>>;

    /// Creates a persona from an already validated request.
    ///
    /// # Returns
    ///
    /// - `Ok(Persona)`: The persona with its server-assigned id
    /// - `Err(ParleyError)`: Error if the request fails
    async fn create(&self, request: &CreatePersonaRequest) -> Result<Persona>;
}
