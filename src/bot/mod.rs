pub mod commands;
pub mod content;
pub mod context;
pub mod handlers;
pub mod keyboards;
pub mod permissions;
pub mod state;

pub use context::AppContext;
pub use handlers::BotHandler;
pub use state::{HandlerResult, VerifyDialogue, VerifyState, VerifyStorage};
