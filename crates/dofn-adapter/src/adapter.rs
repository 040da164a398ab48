use std::fs;
use std::path::{Path, PathBuf};

use crate::builder::FrameworkBuilder;
use crate::bundler::{Bundle, BundleInput, Bundler, OutputOptions, Plugin};
use crate::config::AdapterOptions;
use crate::entry::{EntryTemplate, SERVER_IMPORT_PATH};
use crate::error::AdapterError;

pub const ADAPTER_NAME: &str = "digitalocean";
pub const BUNDLE_FILE_NAME: &str = "server.js";
const ENTRY_FILE_NAME: &str = "entry.js";

/// Packages framework output into `<out_dir>/server.js`.
#[derive(Clone, Debug)]
pub struct Adapter {
    options: AdapterOptions,
    out_dir: PathBuf,
    template: EntryTemplate,
}

impl Adapter {
    /// Validates `options` before anything touches the filesystem.
    pub fn new(options: AdapterOptions) -> Result<Self, AdapterError> {
        options.check()?;
        let out_dir = absolutize(options.out_dir())?;
        Ok(Self {
            options,
            out_dir,
            template: EntryTemplate::default(),
        })
    }

    #[must_use]
    pub fn with_template(mut self, template: EntryTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn name(&self) -> &'static str {
        ADAPTER_NAME
    }

    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn bundle_path(&self) -> PathBuf {
        self.out_dir.join(BUNDLE_FILE_NAME)
    }

    /// Run the build and return the path of the written bundle.
    ///
    /// The output directory is removed first; if a later step fails it stays
    /// removed. Errors are returned as produced.
    pub fn adapt<F, B>(&self, builder: &F, bundler: &B) -> Result<PathBuf, AdapterError>
    where
        F: FrameworkBuilder,
        B: Bundler,
    {
        log::info!(
            "[dofn] adapting {} for {} ({})",
            self.options.app_name(),
            self.options.domain(),
            self.options.region()
        );
        builder.rimraf(&self.out_dir)?;

        let tmp = builder.build_directory(ADAPTER_NAME)?;
        builder.write_client(&tmp.join("client"))?;
        builder.write_prerendered(&tmp.join("prerendered"))?;
        builder.write_server(&tmp.join("server"))?;

        let entry = tmp.join(ENTRY_FILE_NAME);
        fs::write(&entry, self.template.render(SERVER_IMPORT_PATH))?;
        log::debug!("wrote entry shim {}", entry.display());

        let build = bundler.build(&BundleInput {
            input: entry,
            plugins: vec![Plugin::CommonJs, Plugin::NodeResolve],
        })?;

        let bundle = self.bundle_path();
        build.write(&OutputOptions::single_file_cjs(&bundle))?;
        log::info!("[dofn] bundle written to {}", bundle.display());
        Ok(bundle)
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, AdapterError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
