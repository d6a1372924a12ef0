//! chatvid Chat Render
//!
//! Turns message ranges of a chat transcript into transparent,
//! tightly-cropped PNG screenshots.
//!
//! ```text
//! ChatConfig + key ──► HTML page ──► headless browser ──► trim ──► out/chat/chat-S-E.png
//! ```
//!
//! The browser is an external process; [`Rasterizer`] is the seam that
//! lets everything around it run without one.

pub mod rasterizer;
pub mod template;
pub mod trim;

pub use rasterizer::*;
