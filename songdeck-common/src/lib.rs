//! # Songdeck Common Library
//!
//! Shared code for the songdeck catalog client and its front ends:
//! - Song models and cover image payloads
//! - Song form validation
//! - Notification events
//! - Message catalog (English / Spanish)
//! - Configuration loading

pub mod config;
pub mod error;
pub mod events;
pub mod forms;
pub mod i18n;
pub mod models;

pub use error::{Error, Result};
pub use events::{Notification, NotificationKind};
pub use i18n::{Language, MessageKey};
pub use models::{ImageSource, ImageUpload, Song, SongFormData};
