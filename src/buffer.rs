/// Text captured by the most recent copy or cut.
///
/// A single slot: each `reset` replaces the previous contents outright and
/// reads never clear it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredBuffer {
    buffer: String,
}

impl StoredBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored text
    pub fn reset(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Current stored text, empty if nothing was copied yet
    pub fn get(&self) -> &str {
        &self.buffer
    }
}
