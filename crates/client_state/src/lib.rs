//! Client-side session and events state for the event board.

pub mod api;
pub mod events;
pub mod memory;
pub mod scope;
pub mod session;
mod store;

pub use api::{ApiResult, AuthApi, EventsApi};
pub use events::{EventsAction, EventsState, EventsStore};
pub use memory::InMemoryBackend;
pub use scope::{
    use_auth, use_events, AuthProvider, EventsProvider, MountedEvents, MountedSession,
    ScopeError, UiScope,
};
pub use session::{Identity, SessionAction, SessionState, SessionStore};
pub use store::Action;
