//! Clipboard Diff library
//!
//! Diffs the current selection against the last copied text or the system
//! clipboard. The editor side is abstracted behind [`host::EditorHost`].

pub mod buffer;
pub mod commands;
pub mod config;
pub mod constant;
pub mod diff;
pub mod host;
pub mod lines;
pub mod matcher;
pub mod terminal;
