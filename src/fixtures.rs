use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::{Comment, Credentials, Task};

/// Seed data for the in-memory collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub comments: Vec<Comment>,
    pub tasks: Vec<Task>,
    pub users: Vec<Credentials>,
}

impl Fixtures {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read fixtures file '{}'", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("failed to parse fixtures file '{}'", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("invalid fixtures JSON")
    }

    /// Small data set used when no fixtures file is configured.
    pub fn demo() -> Self {
        Self {
            comments: vec![
                Comment::new("1", "Welcome to taskdeck"),
                Comment::new("2", "Press F1-F4 to switch views"),
            ],
            tasks: vec![
                Task::new(1u64, "Write release notes").with_user("1"),
                Task::new(2u64, "Review open pull requests"),
                Task::new(3u64, "Tidy the backlog").with_status(true),
            ],
            users: vec![Credentials::new("demo", "demo")],
        }
    }
}
