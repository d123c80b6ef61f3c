//! Terminal shell over the QuickNote store.
//!
//! # Responsibility
//! - Initialize the store once per run and render `list()` results.
//! - Map each subcommand onto exactly one store call (plus a refresh after delete).

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::error;
use quicknote_core::{
    default_log_level, init_logging, Note, NoteId, NoteStore, StoreConfig, StoreError, StoreHandle,
};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "quicknote", version, about = "Keep short notes in a local database")]
struct Cli {
    /// Database file. Defaults to $QUICKNOTE_DB_PATH or the user data dir.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every note.
    List {
        /// Print a JSON array instead of tab-separated lines.
        #[arg(long)]
        json: bool,
    },
    /// Store a new note and print its id.
    Add { text: String },
    /// Replace the text of an existing note.
    Edit { id: NoteId, text: String },
    /// Remove a note, then show the remaining ones.
    Delete { id: NoteId },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        if let Err(err) = init_logging(&level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    } else if cli.log_level.is_some() {
        eprintln!("warning: logging disabled: --log-level has no effect without --log-dir");
    }

    let config = match &cli.db {
        Some(path) => StoreConfig::file(path),
        None => StoreConfig::from_env(),
    };
    let store = StoreHandle::spawn(NoteStore::new(config))
        .context("failed to start note store worker")?;

    if let Err(err) = store.initialize().await {
        if let StoreError::Schema(cause) = &err {
            error!("event=cli_init module=cli status=error error_code=schema_error error={cause}");
        }
        return Err(err).context("note store unavailable");
    }

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::List { json } => {
            let notes = store.list().await.context("failed to load notes")?;
            write_notes(&mut stdout, &notes, json)?;
        }
        Command::Add { text } => {
            let id = store.create(text).await.context("failed to save note")?;
            writeln!(stdout, "{id}")?;
        }
        Command::Edit { id, text } => {
            store
                .update(id, text)
                .await
                .with_context(|| format!("failed to update note {id}"))?;
        }
        Command::Delete { id } => {
            store
                .delete(id)
                .await
                .with_context(|| format!("failed to delete note {id}"))?;
            let notes = store.list().await.context("failed to reload notes")?;
            write_notes(&mut stdout, &notes, false)?;
        }
    }

    Ok(())
}

fn write_notes(out: &mut impl Write, notes: &[Note], json: bool) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, notes)?;
        writeln!(out)?;
        return Ok(());
    }
    for note in notes {
        writeln!(out, "{}", render_line(note))?;
    }
    Ok(())
}

/// One note per output line; embedded line breaks are escaped.
fn render_line(note: &Note) -> String {
    let text = note.text.replace('\\', "\\\\").replace('\n', "\\n").replace('\r', "\\r");
    format!("{}\t{}", note.id, text)
}

#[cfg(test)]
mod tests {
    use super::{render_line, write_notes, Cli};
    use clap::CommandFactory;
    use quicknote_core::Note;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_line_escapes_line_breaks() {
        let note = Note::new(4, "first\nsecond\\third");
        assert_eq!(render_line(&note), "4\tfirst\\nsecond\\\\third");
    }

    #[test]
    fn json_output_is_an_array_of_notes() {
        let mut out = Vec::new();
        write_notes(&mut out, &[Note::new(1, "Buy milk")], true).unwrap();
        let parsed: Vec<Note> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, vec![Note::new(1, "Buy milk")]);
    }
}
