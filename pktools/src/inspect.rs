use anyhow::Context;
use clap::Args;
use pkparse::{tables::Tables, Options};
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable naming the lookup tables when `--tables` is not given.
pub const TABLES_ENV: &str = "PKPARSE_TABLES";

#[derive(Debug, Args)]
pub struct Opts {
    #[arg(short, long)]
    pub pk6: PathBuf,
    /// Resolve display names for every id in the record
    #[arg(short, long)]
    pub names: bool,
    /// JSON lookup tables, overriding $PKPARSE_TABLES
    #[arg(short, long)]
    pub tables: Option<PathBuf>,
    #[arg(long)]
    pub pretty: bool,
}

pub fn run(opts: Opts) -> anyhow::Result<()> {
    let tables_path = tables_path(opts.tables.clone(), std::env::var_os(TABLES_ENV));
    println!("{}", render(&opts, tables_path)?);
    Ok(())
}

pub fn tables_path(flag: Option<PathBuf>, env: Option<OsString>) -> Option<PathBuf> {
    flag.or_else(|| env.filter(|value| !value.is_empty()).map(PathBuf::from))
}

/// Decodes the record named by `opts` and renders it as JSON.
pub fn render(opts: &Opts, tables_path: Option<PathBuf>) -> anyhow::Result<String> {
    let tables = match tables_path {
        Some(path) => Tables::from_path(&path)
            .with_context(|| format!("Failed to load tables from {}", path.display()))?,
        None => {
            if opts.names {
                log::warn!("No lookup tables given, names will not resolve");
            }
            Tables::default()
        }
    };

    let pk6 = std::fs::read(&opts.pk6)
        .with_context(|| format!("Failed to read {}", opts.pk6.display()))?;
    let options = Options {
        parse_names: opts.names,
    };
    let record = pkparse::decode(&pk6, &options, &tables)
        .with_context(|| format!("Failed to decode {}", opts.pk6.display()))?;

    let json = if opts.pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    Ok(json)
}
