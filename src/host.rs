//! Editor host adapter
//!
//! Everything the triggers need from the editor goes through [`EditorHost`],
//! so the same commands run against a real editor, the terminal host or a
//! test double.

use crate::constant::{DIFF_SYNTAX, DIFF_VIEW_NAME};
use std::fmt;

/// Editor command the triggers forward to after capturing the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeCommand {
    Copy,
    Cut,
}

impl fmt::Display for NativeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeCommand::Copy => f.write_str("copy"),
            NativeCommand::Cut => f.write_str("cut"),
        }
    }
}

/// New unsaved view holding a diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchView {
    pub name: String,
    pub syntax: String,
    /// Closing the view never prompts to save
    pub scratch: bool,
    pub content: String,
}

impl ScratchView {
    pub fn diff(content: String) -> Self {
        Self {
            name: DIFF_VIEW_NAME.to_string(),
            syntax: DIFF_SYNTAX.to_string(),
            scratch: true,
            content,
        }
    }
}

pub trait EditorHost {
    /// Text of each selected region, in selection order
    fn selection_regions(&self) -> Vec<String>;

    /// Current clipboard text, `None` when there is none
    fn clipboard_text(&mut self) -> Option<String>;

    /// Run the editor's own copy or cut on the current selection
    fn run_native(&mut self, command: NativeCommand);

    /// Open and focus a new view showing `view.content` from offset 0
    fn open_scratch_view(&mut self, view: ScratchView);
}

/// All selected regions joined in order, with nothing in between
pub fn selection_to_string<H: EditorHost + ?Sized>(host: &H) -> String {
    host.selection_regions().concat()
}
