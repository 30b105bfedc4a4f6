//! Confab is the orchestration core of a chat client that can talk to a
//! hosted generative model or to any number of user-configured
//! webhook-backed agents.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the conversation collection, the agent
//!   registry, the pending model selection, and the theme, plus the
//!   UI-facing surface in [`core::app::App`].
//! - [`api`] defines the wire payloads and the two backend adapters
//!   (hosted model and webhook), the response normalizer, and the
//!   dispatch router that picks between them.
//! - [`storage`] persists application state as JSON key-value files.
//! - [`logging`] initializes tracing output for host applications.
//!
//! The presentation layer (rendering, input widgets, file pickers) lives
//! outside this crate and drives it exclusively through
//! [`core::app::App`].

pub mod api;
pub mod core;
pub mod logging;
pub mod storage;

pub use crate::core::app::App;
