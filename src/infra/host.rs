use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::app::{EditorSink, HostError, Notifier};

/// Inserts generated text into a document file at a byte offset.
///
/// Without an explicit cursor the text is appended at the end of the file.
/// A missing file is treated as an empty document.
#[derive(Debug, Clone)]
pub struct FileEditorSink {
    path: PathBuf,
    cursor: Option<usize>,
}

impl FileEditorSink {
    pub fn new(path: impl Into<PathBuf>, cursor: Option<usize>) -> Self {
        Self {
            path: path.into(),
            cursor,
        }
    }
}

impl EditorSink for FileEditorSink {
    fn insert_at_cursor(&mut self, text: &str) -> Result<(), HostError> {
        let mut document = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => String::new(),
            Err(error) => return Err(error.into()),
        };

        let cursor = self.cursor.unwrap_or(document.len());
        if cursor > document.len() || !document.is_char_boundary(cursor) {
            return Err(HostError::InvalidCursor {
                cursor,
                len: document.len(),
            });
        }

        document.insert_str(cursor, text);
        fs::write(&self.path, document)?;
        // Later inserts land after the text just written.
        self.cursor = Some(cursor + text.len());
        Ok(())
    }
}

/// Writes generated text to any `Write` target, typically stdout.
pub struct WriterEditorSink<W> {
    writer: W,
}

impl<W: Write> WriterEditorSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EditorSink for WriterEditorSink<W> {
    fn insert_at_cursor(&mut self, text: &str) -> Result<(), HostError> {
        self.writer.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Shows notices on stderr, mirroring transient UI notices.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&mut self, message: &str) {
        let mut stderr = io::stderr().lock();
        if writeln!(stderr, "{message}").is_err() {
            tracing::warn!(%message, "failed to write notice to stderr");
        }
    }
}
