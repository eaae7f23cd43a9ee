//! [`TestProject`] builder for settings resolution scenarios.

use serde_json::Value;
use settings_fs::NormalizedPath;
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use tempfile::TempDir;

/// A temporary project root with helpers for writing settings files and
/// asserting on what the resolver left behind.
///
/// # Example
///
/// ```rust,no_run
/// use settings_test_utils::TestProject;
/// use serde_json::json;
///
/// let project = TestProject::new();
/// project.write_json("cypress.json", &json!({"visitTimeout": 5000}));
/// project.assert_file_exists("cypress.json");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary project directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The root as the resolver expects it.
    pub fn normalized_root(&self) -> NormalizedPath {
        NormalizedPath::new(self.root())
    }

    /// Write `value` as pretty JSON at `path` (relative to the root).
    pub fn write_json(&self, path: &str, value: &Value) {
        self.write_text(path, &serde_json::to_string_pretty(value).unwrap());
    }

    /// Write raw text at `path` (relative to the root), creating parents.
    pub fn write_text(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }

    /// Parse the JSON file at `path` (relative to the root).
    pub fn read_json(&self, path: &str) -> Value {
        serde_json::from_str(&self.read_text(path)).unwrap_or_else(|e| {
            panic!("File {} is not valid JSON: {}", path, e);
        })
    }

    /// Read the file at `path` (relative to the root).
    pub fn read_text(&self, path: &str) -> String {
        let full_path = self.root().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Names of all entries directly under the root, sorted.
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Capture content and modification time of `path` for later comparison.
    pub fn snapshot(&self, path: &str) -> FileSnapshot {
        let full_path = self.root().join(path);
        FileSnapshot {
            content: fs::read(&full_path).unwrap(),
            modified: fs::metadata(&full_path).unwrap().modified().unwrap(),
        }
    }

    /// Assert that `path` was not rewritten since `before` was taken.
    ///
    /// # Panics
    /// Panics if either the content or the modification time changed.
    pub fn assert_unchanged(&self, path: &str, before: &FileSnapshot) {
        let after = self.snapshot(path);
        assert!(
            after == *before,
            "Expected {} to be left untouched",
            path
        );
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}

/// Content and modification time of a file at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    content: Vec<u8>,
    modified: SystemTime,
}
