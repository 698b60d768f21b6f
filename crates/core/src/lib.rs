//! # Agenda Core
//!
//! Domain types shared by the persistence and HTTP layers: entity models,
//! request and response shapes, the error taxonomy, and the validation rules
//! applied to every write.

pub mod errors;
pub mod models;
pub mod slug;
pub mod validation;
