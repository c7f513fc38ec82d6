// SPDX-License-Identifier: MIT OR Apache-2.0
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use schemars::schema_for;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "xtask", version, about = "Repo maintenance tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate JSON Schemas for the config and error-code types.
    Schema {
        /// Output directory.
        #[arg(long, default_value = "contracts/schemas")]
        out_dir: PathBuf,
    },
    /// Print the predefined error catalog as a Markdown table.
    Catalog,
    /// Load and validate a faultline config file.
    CheckConfig {
        /// Path to the TOML file.
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Schema { out_dir } => schema(out_dir),
        Command::Catalog => catalog(),
        Command::CheckConfig { path } => check_config(&path),
    }
}

fn schema(out_dir: PathBuf) -> Result<()> {
    std::fs::create_dir_all(&out_dir).context("create schema output dir")?;

    let config = schema_for!(faultline_config::FaultlineConfig);
    let code = schema_for!(faultline_error::ErrorCode);

    write_schema(&out_dir.join("faultline_config.schema.json"), &config)?;
    write_schema(&out_dir.join("error_code.schema.json"), &code)?;

    eprintln!("wrote schemas to {}", out_dir.display());
    Ok(())
}

fn write_schema(path: &Path, schema: &schemars::Schema) -> Result<()> {
    let s = serde_json::to_string_pretty(schema)?;
    std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn catalog() -> Result<()> {
    println!("| code | message | status | type |");
    println!("|------|---------|--------|------|");
    for code in faultline_error::catalog::ALL {
        println!(
            "| `{}` | {} | {} | `{}` |",
            code.code(),
            code.message(),
            code.http_status(),
            code.err_type()
        );
    }
    Ok(())
}

fn check_config(path: &Path) -> Result<()> {
    let config = faultline_config::load_config(Some(path))
        .with_context(|| format!("load {}", path.display()))?;
    let warnings = match faultline_config::validate_config(&config) {
        Ok(warnings) => warnings,
        Err(e) => bail!("{}: {e}", path.display()),
    };
    for w in &warnings {
        println!("warning: {w}");
    }
    println!(
        "ok: capture={} stack_depth={} full_stack_depth={}",
        config.capture_enabled(),
        config.effective_stack_depth(),
        config.effective_full_stack_depth()
    );
    Ok(())
}
