//! chatvid Render Engine
//!
//! Compiles a project's overlays into an ffmpeg filter graph and drives the
//! encoder.
//!
//! # Pipeline Architecture
//!
//! ```text
//! bg video ──► scale (fit, no upscale) ──► pad ──► [base]
//!                                                    │
//! chat-0-0.png ──► scale=w:-1 ──► overlay(t in window) ──► [v1]
//!                                                    │
//! chat-0-1.png ──► scale=w:-1 ──► overlay(t in window) ──► [v2]
//!                                                    │
//!                                                    ▼
//!                                      Encode (H.264, optional AAC)
//!                                                    │
//!                                                    ▼
//!                                                output.mp4
//! ```

pub mod export;
pub mod filter_graph;

pub use export::*;
pub use filter_graph::{compile, FilterGraph, FilterStage, StageKind};
