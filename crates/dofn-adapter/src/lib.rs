//! Build-time adapter packaging a web application as one DigitalOcean Function.
//!
//! [`Adapter::adapt`] stages the framework output, renders the entry shim and
//! asks a [`Bundler`] for a single CommonJS `server.js`.

mod adapter;
pub mod app_spec;
mod builder;
mod bundler;
pub mod config;
mod entry;
mod error;

pub use adapter::{Adapter, ADAPTER_NAME, BUNDLE_FILE_NAME};
pub use app_spec::AppSpec;
pub use builder::{FrameworkBuilder, FsBuilder};
pub use bundler::{
    Bundle, BundleInput, Bundler, Format, OutputOptions, Plugin, RollupBuild, RollupBundler,
};
pub use config::{AdapterOptions, Config, LogLevel};
pub use entry::{EntryTemplate, SERVER_IMPORT_PATH, SERVER_PLACEHOLDER};
pub use error::{AdapterError, BundleError};
