//! Persisted record shapes.

mod historial;
mod user;

pub use historial::{ChatHistorial, HistorialUpdate};
pub use user::UserRecord;
