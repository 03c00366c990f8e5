//! # Meadow
//!
//! The walkable scene on top of `meadow_procedural`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           FRAME LOOP                             │
//! ├──────────────────────────────────────────────────────────────────┤
//! │                                                                  │
//! │  InputSnapshot ──> Camera::step ──> player cell                  │
//! │                                         │                        │
//! │                                         v                        │
//! │                          WorldCache::ensure_around               │
//! │                                         │                        │
//! │                                         v                        │
//! │   Renderer <── draw_ground / draw <── WorldCache::visible        │
//! │                                                                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `camera`: Input snapshot, pointer lock and the pure camera update
//! - `render`: The renderer seam and a counting renderer
//! - `frame_loop`: Frame orchestration and timing
//! - `config`: Application configuration and errors

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod camera;
pub mod config;
pub mod frame_loop;
pub mod render;

// Re-export the generator
pub use meadow_procedural as procedural;

// Re-export commonly used types
pub use camera::{Camera, CameraConfig, InputSnapshot, PointerLock};
pub use config::{AppConfig, AppError, AppResult};
pub use frame_loop::{FrameLoop, FrameLoopConfig, FrameStats, FrameStatsAccumulator};
pub use render::{DrawTally, Renderer};
