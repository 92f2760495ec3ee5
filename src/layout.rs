use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Directory layout shared by the fixture generator and the test runner.
///
/// All fixture and oracle files live flat under three subdirectories of a
/// single root; nothing is nested further. The layout is built once in `main`
/// and passed by reference everywhere it is needed.
pub struct TestLayout {
    pub root: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub expected: PathBuf,
}

impl TestLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            input: root.join("input"),
            output: root.join("output"),
            expected: root.join("expected"),
            root,
        }
    }

    /// Delete the whole tree and recreate it empty. Destructive on purpose:
    /// every run starts from a clean slate so stale fixtures from a previous
    /// run can never leak into comparisons.
    pub fn rebuild(&self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)
                .with_context(|| format!("removing {}", self.root.display()))?;
        }
        for dir in [&self.root, &self.input, &self.output, &self.expected] {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        Ok(())
    }

    pub fn input_file(&self, name: &str) -> PathBuf {
        self.input.join(name)
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output.join(name)
    }

    pub fn expected_file(&self, name: &str) -> PathBuf {
        self.expected.join(name)
    }
}
