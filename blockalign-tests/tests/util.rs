use std::{env, path::Path};

use anyhow::{Result, anyhow};
use blockalign::{build, extract};
use clap::Parser;

pub fn run_in_repo_root(args: &str) -> Result<()> {
    // simulate a call from the repo root, the parent of this crate
    env::set_current_dir(
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .ok_or(anyhow!("No parent directory"))?,
    )?;

    if args.starts_with("build ") {
        let args = build::Cli::parse_from(args.split_whitespace());
        build::cli(args)
    } else if args.starts_with("extract ") {
        let args = extract::Cli::parse_from(args.split_whitespace());
        extract::cli(args)
    } else {
        Err(anyhow!("Unknown subcommand in {args:?}"))
    }
}

/// A path in the temporary directory for output files of a test.
pub fn output_path(name: &str) -> String {
    env::temp_dir()
        .join(format!("blockalign-tests-{}-{name}", std::process::id()))
        .to_string_lossy()
        .into_owned()
}

pub fn read_toml(path: &str) -> Result<toml::Table> {
    Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
}
