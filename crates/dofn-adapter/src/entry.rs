use std::fs;
use std::io;
use std::path::Path;

/// Token replaced with the import path of the emitted server module.
pub const SERVER_PLACEHOLDER: &str = "%SERVER%";

/// Import path of the server module relative to the rendered entry file.
pub const SERVER_IMPORT_PATH: &str = "./server";

const DEFAULT_TEMPLATE: &str = include_str!("templates/entry.js");

/// Entry shim template, embedded by default or loaded from a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryTemplate {
    source: String,
}

impl EntryTemplate {
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        fs::read_to_string(path).map(Self::from_source)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace every placeholder occurrence with `server_path`.
    pub fn render(&self, server_path: &str) -> String {
        self.source.replace(SERVER_PLACEHOLDER, server_path)
    }
}

impl Default for EntryTemplate {
    fn default() -> Self {
        Self::from_source(DEFAULT_TEMPLATE)
    }
}
