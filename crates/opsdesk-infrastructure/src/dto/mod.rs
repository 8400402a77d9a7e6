//! Data transfer objects for the remote assistant API.

pub mod session;

pub use session::{
    ChatResponseDto, ErrorBodyDto, FunctionCallDto, MessageDto, SessionDto, SessionListDto,
};
