//! Persona domain module.
//!
//! This module contains persona domain models, the creation request and the
//! repository interface for the remote persona API.
//!
//! # Module Structure
//!
//! - `model`: Core persona domain models (`Persona`, `Gender`)
//! - `repository`: Repository trait for remote persona operations
//! - `request`: Creation request and its validation

mod model;
mod repository;
pub mod request;

// Re-export public API
pub use model::{Gender, Persona};
pub use repository::PersonaRepository;
pub use request::CreatePersonaRequest;
