pub mod bot_settings;
pub mod channel;
pub mod group;
pub mod group_settings;
pub mod keyword_response;
pub mod message_log;
pub mod phone_verification;

pub use bot_settings::*;
pub use channel::*;
pub use group::*;
pub use group_settings::*;
pub use keyword_response::*;
pub use message_log::*;
pub use phone_verification::*;
