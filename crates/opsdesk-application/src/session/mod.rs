//! Session application services.
//!
//! This module contains the application-layer store for backend sessions:
//! listing, loading, starting fresh, and post-turn list refresh.

mod store;

pub use store::{SessionStore, SharedConversation};
