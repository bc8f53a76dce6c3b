pub mod game;
pub mod health;
pub mod sse;

pub use game::{
    create_session, delete_session, get_session_state, reset_session, submit_action,
    ActionResponse, CreateSessionRequest, PlayerActionRequest,
};
pub use health::health;
pub use sse::stream_events;
