//! Terminal UI layer for interactive chat sessions.
//!
//! The UI module owns rendering, keyboard handling, and loop control for the
//! text user interface:
//! - [`chat_loop`]: the main interaction loop that dispatches user input and
//!   drains settled completion outcomes.
//! - [`app`]: shared interaction state driven by the loop and read by the
//!   renderer.
//! - [`renderer`] and [`scroll`]: view composition and wrap-aware scrolling.
//! - [`settings`]: the model and temperature overlay.
//!
//! Ownership boundary: this layer presents and captures interaction state,
//! while [`crate::core`] owns domain logic and backend coordination.

pub mod app;
pub mod chat_loop;
pub mod renderer;
pub mod scroll;
pub mod settings;
