//! Copy, cut and diff triggers

use crate::buffer::StoredBuffer;
use crate::config::{ComparisonSource, Settings};
use crate::diff::{DiffResult, format_diff};
use crate::host::{EditorHost, NativeCommand, ScratchView, selection_to_string};
use crate::lines::split_lines;
use tracing::debug;

/// One plugin session: the stored buffer plus the settings it diffs with
pub struct ClipboardDiff {
    buffer: StoredBuffer,
    settings: Settings,
    source: ComparisonSource,
}

impl ClipboardDiff {
    /// Build a session from settings, correcting any invalid values first
    pub fn new(mut settings: Settings) -> Self {
        settings.validate();
        let source = settings.comparison_source();
        Self {
            buffer: StoredBuffer::new(),
            settings,
            source,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn source(&self) -> ComparisonSource {
        self.source
    }

    pub fn stored_buffer(&self) -> &str {
        self.buffer.get()
    }

    /// Remember the selection, then let the editor copy it
    pub fn copy<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        self.capture_then(host, NativeCommand::Copy);
    }

    /// Remember the selection, then let the editor cut it
    pub fn cut<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        self.capture_then(host, NativeCommand::Cut);
    }

    fn capture_then<H: EditorHost + ?Sized>(&mut self, host: &mut H, command: NativeCommand) {
        // Must read before the native command runs; a cut empties the selection
        let text = selection_to_string(host);
        debug!("Storing {} bytes on {}", text.len(), command);
        self.buffer.reset(text);
        host.run_native(command);
    }

    /// Diff the comparison source against the selection and open the result
    pub fn diff<H: EditorHost + ?Sized>(&self, host: &mut H) -> ScratchView {
        let selection = selection_to_string(host);
        let previous = match self.source {
            ComparisonSource::StoredBuffer => self.buffer.get().to_string(),
            ComparisonSource::Clipboard => host.clipboard_text().unwrap_or_default(),
        };

        let result = self.compute(&previous, &selection);
        debug!(
            "Diffed {} against selection: {} output lines",
            self.source,
            result.len()
        );

        let view = ScratchView::diff(result.into_string());
        host.open_scratch_view(view.clone());
        view
    }

    /// Diff `previous` against `current` with the configured labels and style
    pub fn compute(&self, previous: &str, current: &str) -> DiffResult {
        format_diff(
            &split_lines(previous).terminated(),
            &split_lines(current).terminated(),
            &self.settings.clipboard_file_name,
            &self.settings.selection_file_name,
            self.settings.diff_style(),
        )
    }
}

impl Default for ClipboardDiff {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
