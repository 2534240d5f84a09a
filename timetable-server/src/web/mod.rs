//! Web layer for the timetable service.
//!
//! JSON endpoints over the active timetable index.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
