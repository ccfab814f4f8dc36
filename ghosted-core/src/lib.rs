//! # ghosted-core
//!
//! Core library for ghosted - a chat with someone who will never text back.
//!
//! This library provides:
//! - Domain types for conversations, messages, and history snapshots
//! - The conversation engine: receipt scheduling, typing simulation,
//!   presence-status and encouragement tickers
//! - A monotonic timer queue with per-conversation cancellation
//! - History persistence as JSON
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! The engine is a pure state machine over injected time: hosts pass an
//! [`std::time::Instant`] into every call and the engine never reads the
//! system clock for scheduling. Display effects flow out through the
//! [`Renderer`] trait, so the same engine drives an interactive terminal,
//! a headless simulation, or a test recorder.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Instant;
//! use ghosted_core::{Config, Engine, NullRenderer};
//!
//! let config = Config::load().expect("failed to load config");
//! let mut engine = Engine::new(config.engine, Instant::now());
//! let mut renderer = NullRenderer;
//!
//! engine.send("hey, you up?", Instant::now(), &mut renderer);
//! engine.tick(Instant::now(), &mut renderer);
//! // No reply will ever arrive. That is the product.
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use engine::Engine;
pub use error::{Error, Result};
pub use render::{NullRenderer, Renderer};
pub use types::*;

// Public modules
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod levels;
pub mod logging;
pub mod render;
pub mod storage;
pub mod timer;
pub mod types;
