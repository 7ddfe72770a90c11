//! Service layer
//!
//! - `LinkService`: link lifecycle (create, visit, update, delete, purge)
//! - `UserService`: user registration and lookup
//! - `Reaper`: background sweep of expired links

mod link_service;
mod reaper;
mod user_service;

pub use link_service::{LinkService, VisitOutcome, VisitStatus};
pub use reaper::Reaper;
pub use user_service::{UserService, parse_user_id};
