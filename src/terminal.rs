//! Terminal host
//!
//! Stands in for an editor on the command line: the selection comes from a
//! file or stdin, the clipboard is the system clipboard, and scratch views are
//! printed instead of opened in a tab.

use crate::host::{EditorHost, NativeCommand, ScratchView};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Path argument that means standard input
pub const STDIN_PATH: &str = "-";

#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("Failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub struct TerminalHost {
    selection: String,
    clipboard: Option<arboard::Clipboard>,
    views: Vec<ScratchView>,
}

impl TerminalHost {
    pub fn new(selection: impl Into<String>) -> Self {
        Self {
            selection: selection.into(),
            clipboard: None,
            views: Vec::new(),
        }
    }

    /// Host whose selection is the contents of `path`, or stdin for `-`
    pub fn from_path(path: &Path) -> Result<Self, TerminalError> {
        Ok(Self::new(read_text(path)?))
    }

    /// Replace the selection, as if the user selected different text
    pub fn select(&mut self, text: impl Into<String>) {
        self.selection = text.into();
    }

    /// Views opened so far, oldest first
    pub fn views(&self) -> &[ScratchView] {
        &self.views
    }

    /// Print every opened view's content to `out`
    pub fn write_views<W: Write>(&self, out: &mut W) -> Result<(), TerminalError> {
        for view in &self.views {
            out.write_all(view.content.as_bytes())?;
        }
        out.flush()?;
        Ok(())
    }

    fn system_clipboard(&mut self) -> Option<&mut arboard::Clipboard> {
        if self.clipboard.is_none() {
            match arboard::Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    warn!("System clipboard unavailable: {}", e);
                    return None;
                }
            }
        }
        self.clipboard.as_mut()
    }
}

impl EditorHost for TerminalHost {
    fn selection_regions(&self) -> Vec<String> {
        vec![self.selection.clone()]
    }

    fn clipboard_text(&mut self) -> Option<String> {
        let clipboard = self.system_clipboard()?;
        match clipboard.get_text() {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Could not read clipboard text: {}", e);
                None
            }
        }
    }

    fn run_native(&mut self, command: NativeCommand) {
        debug!("No editor buffer to {}, skipping", command);
    }

    fn open_scratch_view(&mut self, view: ScratchView) {
        debug!("Opening {} ({} bytes)", view.name, view.content.len());
        self.views.push(view);
    }
}

/// Read a whole file, or stdin when `path` is `-`
pub fn read_text(path: &Path) -> Result<String, TerminalError> {
    let read = if path.as_os_str() == STDIN_PATH {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        fs::read_to_string(path)
    };

    read.map_err(|source| TerminalError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::selection_to_string;
    use uuid::Uuid;

    #[test]
    fn test_selection_from_file() {
        let path = std::env::temp_dir().join(format!("test_selection_{}.txt", Uuid::new_v4()));
        fs::write(&path, "line A\nline 1").unwrap();

        let host = TerminalHost::from_path(&path).unwrap();
        assert_eq!(selection_to_string(&host), "line A\nline 1");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_names_path() {
        let path = std::env::temp_dir().join(format!("missing_{}.txt", Uuid::new_v4()));
        let err = TerminalHost::from_path(&path).err().unwrap();
        assert!(matches!(err, TerminalError::Read { .. }));
        assert!(err.to_string().contains("missing_"));
    }

    #[test]
    fn test_views_are_written_in_order() {
        let mut host = TerminalHost::new("");
        host.open_scratch_view(ScratchView::diff("first\n".to_string()));
        host.open_scratch_view(ScratchView::diff("second\n".to_string()));
        host.run_native(NativeCommand::Copy);

        let mut out = Vec::new();
        host.write_views(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "first\nsecond\n");
        assert_eq!(host.views().len(), 2);
    }
}
