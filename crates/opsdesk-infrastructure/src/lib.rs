//! Infrastructure for the opsdesk assistant: HTTP access to the remote
//! assistant backend and configuration loading.

pub mod config_service;
pub mod dto;
pub mod http_assistant_api;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::http_assistant_api::HttpAssistantApi;
pub use crate::paths::OpsdeskPaths;
