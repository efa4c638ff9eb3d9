//! issue-scribe context collector.
//!
//! Implements [`pipeline::ContextSource`] over the local file system: walks a
//! scan root recursively and reads every matching source file as UTF-8 text.
//!
//! Collection never fails. A missing root yields an empty context with a
//! warning, and any file or directory entry that cannot be read (permissions,
//! invalid encoding, broken links) is logged and left out while the rest of
//! the tree is still collected.

use std::path::{Path, PathBuf};

use pipeline::{ContextSource, SourceContext};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

/// Scan root used when none is configured.
pub const DEFAULT_SCAN_ROOT: &str = "src";

/// File extensions collected when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "py", "rs", "go", "java", "kt", "js", "jsx", "ts", "tsx", "rb", "php", "cs", "c", "h", "cpp",
    "hpp", "swift",
];

/// Reads source files under a scan root.
#[derive(Debug, Clone)]
pub struct FilesystemContextSource {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FilesystemContextSource {
    /// A collector for `root` using [`DEFAULT_EXTENSIONS`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Restricts collection to the given extensions (leading `.` optional,
    /// case-insensitive). An empty list collects every regular file.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    fn matches(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| self.extensions.iter().any(|x| *x == e))
    }
}

impl ContextSource for FilesystemContextSource {
    #[instrument(skip_all, fields(root = %self.root.display()))]
    fn collect(&self) -> SourceContext {
        if !self.root.is_dir() {
            warn!("scan root not found, continuing with empty context");
            return SourceContext::empty();
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.matches(entry.path()) {
                continue;
            }

            let label = relative_label(&self.root, entry.path());
            match std::fs::read_to_string(entry.path()) {
                Ok(text) => files.push((label, text)),
                Err(e) => warn!(path = %label, error = %e, "skipping unreadable file"),
            }
        }

        debug!(files = files.len(), "scan complete");
        files.into_iter().collect()
    }
}

/// Path of `path` relative to `root`, `/`-separated on every platform.
fn relative_label(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
