//! # monkeybet_web
//!
//! Network side of the monkey betting game:
//!
//! - a room-code lobby relay on `GET /ws` that forwards opaque state blobs
//!   between browsers ([`relay`], [`protocol`])
//! - hosted games over HTTP whose bot seats move on their own
//!   ([`session`], [`handlers`]), with engine events streamed over SSE
//!   ([`events`])

pub mod errors;
pub mod events;
pub mod handlers;
pub mod logging;
pub mod protocol;
pub mod relay;
pub mod server;
pub mod session;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use events::{EventBus, SessionEvent};
pub use logging::{init_logging, LogEntry, TestLogSubscriber};
pub use protocol::{ClientMsg, ServerMsg};
pub use relay::{LobbyRegistry, RelayError};
pub use server::{routes, AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
pub use session::{GameConfig, SessionError, SessionId, SessionManager, SessionState};
