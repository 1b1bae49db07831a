//! # Group Admin Bot
//!
//! A Telegram bot for running public groups: keyword auto-replies, an admin
//! panel, a private-chat group directory and SMS phone verification.
//!
//! ## Features
//! - Keyword auto-replies from the database with a built-in fallback table
//! - Admin-only moderation commands (`/ban`, `/mute`, `/unmute`) and panel
//! - Group directory search by number or keyword in private chats
//! - One-time SMS verification codes with expiry and periodic cleanup
//! - Persistent storage with SQLite

/// Bot command handlers and message processing
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Keyword auto-reply tables and resolution
pub mod keywords;
/// Background services: health endpoint and code cleanup
pub mod services;
/// SMS delivery of verification codes
pub mod sms;
/// Utility functions for validation, logging, and reply formatting
pub mod utils;
/// Pending phone verification codes
pub mod verification;
