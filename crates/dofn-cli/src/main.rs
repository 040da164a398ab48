//! dofn CLI.

mod args;
mod project;

use anyhow::Context;
use args::{Args, Command};
use clap::Parser;
use log::LevelFilter;
use project::Project;
use simple_logger::SimpleLogger;

fn main() {
    let args = Args::parse();
    let name = match &args.cmd {
        Command::Build(_) => "build",
        Command::AppSpec { .. } => "app-spec",
    };

    if let Err(err) = run(args) {
        eprintln!("[dofn] {name} error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    match args.cmd {
        Command::Build(project_args) => {
            let project = Project::load(&project_args)?;
            init_logger(&project, args.verbose);
            let bundle = project.build()?;
            println!("[dofn] DigitalOcean build artifact -> {}", bundle.display());
        }
        Command::AppSpec {
            project: project_args,
            output,
        } => {
            let project = Project::load(&project_args)?;
            init_logger(&project, args.verbose);
            let spec = project.app_spec()?;
            match output {
                Some(path) => {
                    spec.write_to(&path)?;
                    println!("[dofn] app spec -> {}", path.display());
                }
                None => println!(
                    "{}",
                    spec.to_json_pretty().context("failed to serialize app spec")?
                ),
            }
        }
    }
    Ok(())
}

fn init_logger(project: &Project, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        project.log_level().into()
    };
    SimpleLogger::new().with_level(level).init().ok();
}
