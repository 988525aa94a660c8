//! Causerie is a terminal chat client for OpenAI-compatible gateways.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation state machine, persisted preferences,
//!   and the HTTP transport that talks to the gateway.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`commands`] implements the slash commands available from the input
//!   line.
//! - [`api`] defines the request and response payloads on the wire.
//!
//! The binary entrypoint (`src/main.rs`) parses arguments via [`cli`] and
//! hands control to [`ui::chat_loop::run_chat`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;

#[cfg(test)]
pub mod test_support;
