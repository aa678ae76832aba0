use anyhow::Context;
use clap::Args;
use pkparse::cipher;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct Opts {
    #[arg(short, long)]
    pub pk6: PathBuf,
    #[arg(long)]
    pub dest: PathBuf,
}

/// Writes the decrypted, unshuffled bytes of a stored record.
pub fn run(opts: Opts) -> anyhow::Result<()> {
    let stored = std::fs::read(&opts.pk6)
        .with_context(|| format!("Failed to read {}", opts.pk6.display()))?;
    let decrypted = cipher::decrypt(&stored)?;
    if !decrypted.checksum_valid {
        println!("Checksum mismatch, writing the record anyway");
    }

    println!("Saving to {}", opts.dest.display());
    std::fs::write(&opts.dest, decrypted.data)?;
    Ok(())
}
