use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
pub type VerifyStorage = InMemStorage<VerifyState>;
pub type VerifyDialogue = Dialogue<VerifyState, VerifyStorage>;

/// Per-chat progress through `/verify`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum VerifyState {
    #[default]
    Idle,
    AwaitingPhone,
    AwaitingCode {
        phone: String,
    },
}
