use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::BundleError;

/// Bundler plugins the adapter relies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plugin {
    /// CommonJS to ES module interop.
    CommonJs,
    /// Node-style resolution of bare module specifiers.
    NodeResolve,
}

impl Plugin {
    pub fn rollup_name(&self) -> &'static str {
        match self {
            Plugin::CommonJs => "commonjs",
            Plugin::NodeResolve => "node-resolve",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Cjs,
    Esm,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Cjs => "cjs",
            Format::Esm => "es",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleInput {
    pub input: PathBuf,
    pub plugins: Vec<Plugin>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputOptions {
    pub file: PathBuf,
    pub format: Format,
    pub compact: bool,
    pub inline_dynamic_imports: bool,
    pub es_module: bool,
}

impl OutputOptions {
    /// One compact CommonJS file with every dynamic import inlined and no
    /// `__esModule` marker.
    pub fn single_file_cjs(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            format: Format::Cjs,
            compact: true,
            inline_dynamic_imports: true,
            es_module: false,
        }
    }
}

pub trait Bundler {
    type Bundle: Bundle;

    fn build(&self, input: &BundleInput) -> Result<Self::Bundle, BundleError>;
}

pub trait Bundle {
    fn write(&self, output: &OutputOptions) -> Result<(), BundleError>;
}

/// Drives the rollup command line.
#[derive(Clone, Debug)]
pub struct RollupBundler {
    command: Vec<String>,
}

impl RollupBundler {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl Default for RollupBundler {
    fn default() -> Self {
        Self::new(
            ["npx", "--yes", "rollup"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }
}

impl Bundler for RollupBundler {
    type Bundle = RollupBuild;

    fn build(&self, input: &BundleInput) -> Result<RollupBuild, BundleError> {
        if self.command.is_empty() {
            return Err(BundleError::EmptyCommand);
        }
        if !input.input.is_file() {
            return Err(BundleError::MissingInput(input.input.clone()));
        }
        Ok(RollupBuild {
            command: self.command.clone(),
            input: input.clone(),
        })
    }
}

/// A validated rollup invocation waiting for its output options.
#[derive(Clone, Debug)]
pub struct RollupBuild {
    command: Vec<String>,
    input: BundleInput,
}

impl RollupBuild {
    pub fn args(&self, output: &OutputOptions) -> Vec<String> {
        rollup_args(&self.input, output)
    }
}

impl Bundle for RollupBuild {
    fn write(&self, output: &OutputOptions) -> Result<(), BundleError> {
        if let Some(parent) = output.file.parent() {
            fs::create_dir_all(parent).map_err(BundleError::Output)?;
        }

        let (program, leading) = self.command.split_first().ok_or(BundleError::EmptyCommand)?;
        let args = self.args(output);
        log::info!(
            "[dofn] bundling {} -> {}",
            self.input.input.display(),
            output.file.display()
        );
        log::debug!("executing `{} {} {}`", program, leading.join(" "), args.join(" "));

        let status = Command::new(program)
            .args(leading)
            .args(&args)
            .status()
            .map_err(|source| BundleError::Spawn {
                program: program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(BundleError::Failed {
                program: program.clone(),
                status,
            });
        }
        Ok(())
    }
}

fn rollup_args(input: &BundleInput, output: &OutputOptions) -> Vec<String> {
    let mut args = vec![
        path_arg(&input.input),
        "--file".to_string(),
        path_arg(&output.file),
        "--format".to_string(),
        output.format.as_str().to_string(),
    ];
    if output.compact {
        args.push("--compact".to_string());
    }
    if output.inline_dynamic_imports {
        args.push("--inlineDynamicImports".to_string());
    }
    if !output.es_module {
        args.push("--no-esModule".to_string());
    }
    for plugin in &input.plugins {
        args.push("--plugin".to_string());
        args.push(plugin.rollup_name().to_string());
    }
    args
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
