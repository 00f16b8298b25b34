/// Application name, also the `confy` configuration name
pub const APP_NAME: &str = "clipboard-diff";

// Settings defaults
pub const DEFAULT_CLIPBOARD_FILE_NAME: &str = "Clipboard";
pub const DEFAULT_SELECTION_FILE_NAME: &str = "Selection";

// Scratch view presentation
pub const DIFF_VIEW_NAME: &str = "Select Diff";
pub const DIFF_SYNTAX: &str = "Packages/Diff/Diff.tmLanguage";

/// Lines of unchanged context around each hunk
pub const DIFF_CONTEXT_LINES: usize = 3;
