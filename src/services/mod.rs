/// Health check HTTP endpoints and shared bot status
pub mod health;
/// Scheduled sweep of expired verification codes
pub mod cleanup;
