//! # llm-handlers
//!
//! Platform-facing router: maps inbound chat commands and reactions to the user store, the
//! history store, and the completion client, and drives the per-conversation profiling opt-in
//! state machine ([`ConversationState`]).

mod context;
pub mod replies;
mod router;
mod state;

pub use context::AppContext;
pub use router::{ChatCommand, ChatRouter, RouteOutcome};
pub use state::{ConversationState, ProfilingReaction};
