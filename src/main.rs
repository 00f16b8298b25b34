use clipboard_diff::commands::ClipboardDiff;
use clipboard_diff::config::{ComparisonSource, Config};
use clipboard_diff::terminal::{TerminalError, TerminalHost, read_text};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "usage: clipboard-diff SELECTION [PREVIOUS]

Diff SELECTION against PREVIOUS, or against the system clipboard when
PREVIOUS is omitted. Use - to read SELECTION from stdin.";

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the diff
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let Some(selection_path) = args.next() else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };
    let previous_path = args.next();

    let config = Config::load().unwrap_or_else(|e| {
        tracing::error!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    match run(config, &selection_path, previous_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(
    config: Config,
    selection_path: &Path,
    previous_path: Option<&Path>,
) -> Result<(), TerminalError> {
    let mut settings = config.settings;
    let source = match previous_path {
        Some(_) => ComparisonSource::StoredBuffer,
        None => ComparisonSource::Clipboard,
    };
    settings.compare_against = source.to_string();
    let mut session = ClipboardDiff::new(settings);

    let mut host = match previous_path {
        Some(previous_path) => {
            // Copy the previous text, then select the new one
            let mut host = TerminalHost::new(read_text(previous_path)?);
            session.copy(&mut host);
            host.select(read_text(selection_path)?);
            host
        }
        None => TerminalHost::from_path(selection_path)?,
    };

    session.diff(&mut host);
    host.write_views(&mut std::io::stdout().lock())
}
