//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Services orchestrate the entity stores and the broadcaster.

mod account;
mod events;
mod post;
mod timeline;

pub use account::{AccountService, Credentials, Registration, Session};
pub use events::{DomainEvent, EventPublisher};
pub use post::PostService;
pub use timeline::TimelineService;
