//! Phone verification codes: issue, deliver, match, expire.

pub mod clock;
pub mod registry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use registry::{
    generate_code, IssuedCode, VerificationError, VerificationRecord, VerificationRegistry,
    DEFAULT_CODE_LENGTH, DEFAULT_TTL_MINUTES, MAX_TTL_MINUTES,
};
