mod cli;
mod info_cmd;
mod lookup_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        cli::Commands::Info { ref file } => info_cmd::run(file),
        cli::Commands::Lookup {
            ref file,
            ref path,
            emit_ref,
        } => lookup_cmd::run(file, path, emit_ref),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
