//! `ironbind` command line tool.
//!
//! ```text
//! ironbind [-p PREFIX] [--unsafe] [--target rust|haskell|cpp] SCHEMA OUT
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use ironbind_codegen::{Generator, GeneratorConfig, TargetLanguage};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ironbind")]
#[command(about = "Generates typed bindings from an IronBind XML schema.", long_about = None)]
struct Cli {
    /// Prefix prepended to generated type and file names.
    #[arg(short = 'p', long, default_value = "")]
    prefix: String,

    /// Omit runtime type and length checks from generated setters.
    #[arg(long = "unsafe", default_value_t = false)]
    unsafe_mode: bool,

    /// Target language.
    #[arg(short, long, default_value_t = TargetLanguage::Rust)]
    target: TargetLanguage,

    /// XML schema file.
    schema: PathBuf,

    /// Output root; units are written to <OUT>/<target>/.
    out: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    try_main().map_err(|err| {
        tracing::error!("{:#}", err);
        err
    })
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    let schema = ironbind_schema::parse_schema_file(&cli.schema)
        .with_context(|| format!("failed to load schema {}", cli.schema.display()))?;
    tracing::info!(
        "Loaded {} declarations from {}",
        schema.len(),
        cli.schema.display()
    );

    let config = GeneratorConfig::new(cli.out, cli.target)
        .with_prefix(cli.prefix)
        .safe(!cli.unsafe_mode);
    let paths = Generator::new(&schema, &config)
        .generate()
        .context("generation failed")?;

    for path in &paths {
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::parse_from([
            "ironbind", "-p", "Sk", "--unsafe", "--target", "haskell", "schema.xml", "out",
        ]);
        assert_eq!(cli.prefix, "Sk");
        assert!(cli.unsafe_mode);
        assert_eq!(cli.target, TargetLanguage::Haskell);
        assert_eq!(cli.schema, PathBuf::from("schema.xml"));
        assert_eq!(cli.out, PathBuf::from("out"));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["ironbind", "schema.xml", "out"]);
        assert_eq!(cli.prefix, "");
        assert!(!cli.unsafe_mode);
        assert_eq!(cli.target, TargetLanguage::Rust);
    }

    #[test]
    fn test_unknown_target_rejected() {
        assert!(Cli::try_parse_from(["ironbind", "--target", "cobol", "s.xml", "out"]).is_err());
    }
}
