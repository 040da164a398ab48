use std::path::PathBuf;

use anyhow::Context;
use dofn_adapter::config::find_config_upwards;
use dofn_adapter::{
    Adapter, AdapterOptions, AppSpec, Config, EntryTemplate, FsBuilder, LogLevel, RollupBundler,
};

use crate::args::ProjectArgs;

/// Configuration for one CLI run: `dofn.toml` (if any) plus flag overrides.
pub struct Project {
    config: Config,
    options: AdapterOptions,
}

impl Project {
    pub fn load(args: &ProjectArgs) -> anyhow::Result<Self> {
        let config_path = match &args.config {
            Some(path) => Some(path.clone()),
            None => find_config_upwards(
                &std::env::current_dir().context("failed to read current directory")?,
            ),
        };

        let config = match config_path {
            Some(path) => Config::from_path(&path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => Config::default(),
        };
        let options = config.app.clone().merge(args.overrides());
        Ok(Self { config, options })
    }

    pub fn log_level(&self) -> LogLevel {
        self.config.logging.level
    }

    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }

    fn builder(&self) -> FsBuilder {
        let framework = &self.config.framework;
        FsBuilder::new(
            self.config.resolve(&framework.output),
            self.config.resolve(&framework.staging),
        )
    }

    fn bundler(&self) -> RollupBundler {
        RollupBundler::new(self.config.bundler.command.clone())
    }

    fn template(&self) -> anyhow::Result<EntryTemplate> {
        match &self.config.framework.entry_template {
            Some(path) => {
                let path = self.config.resolve(path);
                EntryTemplate::load(&path)
                    .with_context(|| format!("failed to read entry template {}", path.display()))
            }
            None => Ok(EntryTemplate::default()),
        }
    }

    pub fn build(&self) -> anyhow::Result<PathBuf> {
        let adapter = Adapter::new(self.options.clone())?.with_template(self.template()?);
        let bundle = adapter.adapt(&self.builder(), &self.bundler())?;
        Ok(bundle)
    }

    pub fn app_spec(&self) -> anyhow::Result<AppSpec> {
        Ok(AppSpec::from_options(&self.options)?)
    }
}
