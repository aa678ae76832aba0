use clap::{Parser, Subcommand};
use pktools::{decrypt, inspect};

#[derive(Parser)]
struct Opts {
    #[command(subcommand)]
    tool: ToolOpts,
}

#[derive(Subcommand)]
enum ToolOpts {
    Decrypt(decrypt::Opts),
    Inspect(inspect::Opts),
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().filter("RUST_LOG"));

    let opts = Opts::parse();
    match opts.tool {
        ToolOpts::Decrypt(opts) => decrypt::run(opts),
        ToolOpts::Inspect(opts) => inspect::run(opts),
    }
}
