use clap::Parser;
use metalseal::cli::{init_logging, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Seal { ref paths, force } => {
            metalseal::cli::commands::seal::execute(&cli, paths, force)
        }
        Commands::Unseal { ref paths, force } => {
            metalseal::cli::commands::unseal::execute(&cli, paths, force)
        }
        Commands::Inspect { ref path } => metalseal::cli::commands::inspect::execute(&cli, path),
        Commands::Age {
            ref paths,
            max_days,
        } => metalseal::cli::commands::age::execute(&cli, paths, max_days),
        Commands::Completions { shell } => metalseal::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        metalseal::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
