use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// The framework's build pipeline, as far as the adapter is concerned.
pub trait FrameworkBuilder {
    /// Remove `path` recursively. Missing paths are not an error.
    fn rimraf(&self, path: &Path) -> io::Result<()>;

    /// Staging directory reserved for the adapter called `name`.
    fn build_directory(&self, name: &str) -> io::Result<PathBuf>;

    fn write_client(&self, dest: &Path) -> io::Result<()>;

    fn write_prerendered(&self, dest: &Path) -> io::Result<()>;

    fn write_server(&self, dest: &Path) -> io::Result<()>;
}

/// Copies framework output that already exists on disk.
///
/// `output` must contain `client/`, `prerendered/` and `server/`; each write
/// copies the matching tree into the requested destination.
#[derive(Clone, Debug)]
pub struct FsBuilder {
    output: PathBuf,
    staging: PathBuf,
}

impl FsBuilder {
    pub fn new(output: impl Into<PathBuf>, staging: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            staging: staging.into(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    fn copy_section(&self, section: &str, dest: &Path) -> io::Result<()> {
        let source = self.output.join(section);
        if !source.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("framework output {} not found", source.display()),
            ));
        }
        log::debug!("copying {} -> {}", source.display(), dest.display());
        copy_tree(&source, dest)
    }
}

impl FrameworkBuilder for FsBuilder {
    fn rimraf(&self, path: &Path) -> io::Result<()> {
        match fs::remove_dir_all(path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn build_directory(&self, name: &str) -> io::Result<PathBuf> {
        let dir = self.staging.join(name);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn write_client(&self, dest: &Path) -> io::Result<()> {
        self.copy_section("client", dest)
    }

    fn write_prerendered(&self, dest: &Path) -> io::Result<()> {
        self.copy_section("prerendered", dest)
    }

    fn write_server(&self, dest: &Path) -> io::Result<()> {
        self.copy_section("server", dest)
    }
}

fn copy_tree(source: &Path, dest: &Path) -> io::Result<()> {
    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|err| io::Error::other(err.to_string()))?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
