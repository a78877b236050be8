//! # rb-api
//!
//! The orchestration layer for Rusty-Board: owns the in-memory board,
//! applies user actions to it, persists after every mutation and renders
//! the affected view.

pub mod board;
pub mod handlers;

pub use board::{Board, Page, View};
pub use handlers::{navigate, open_catalog_item, submit_reply, submit_thread, Submission};
