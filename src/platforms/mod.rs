//! Speech platform backends.
//!
//! This module contains implementations of [`SpeechPlatform`](crate::SpeechPlatform).
//!
//! # Available Platforms
//!
//! - `scripted` - In-memory platform with a voice list you control
//!
//! Enable further platforms via Cargo features:
//! - `native` - OS speech engine (SAPI/WinRT, AVFoundation, Speech Dispatcher)

pub mod scripted;

#[cfg(feature = "native")]
pub mod native;
