//! Flava is a terminal chat client for the Flava AI retrieval (RAG) and
//! multi-agent consensus backends.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the persisted chat history ([`core::session`]), the
//!   backend request path ([`core::dispatcher`]), mode selection and
//!   configuration.
//! - [`ui`] renders transcripts and runs the line-oriented chat loop.
//! - [`commands`] implements slash-command parsing and execution used by the
//!   chat loop.
//! - [`api`] defines the wire payloads exchanged with the backend.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which resolves settings and dispatches into
//! [`core::app`] and [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
