use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Path in the temp directory that is removed when dropped. Nothing is created up front.
pub(crate) fn temp_path(prefix: &str, extension: &str) -> TestFile {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock should be after UNIX_EPOCH")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("{prefix}-{nanos}-{id}.{extension}"));

    TestFile { path }
}

pub(crate) fn write_text_file(prefix: &str, extension: &str, contents: &str) -> TestFile {
    let file = temp_path(prefix, extension);
    fs::write(file.path(), contents).expect("test fixture file must be writable");
    file
}

pub(crate) struct TestFile {
    path: PathBuf,
}

impl TestFile {
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn read(&self) -> String {
        fs::read_to_string(&self.path).expect("test fixture file must be readable")
    }
}

impl Drop for TestFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
