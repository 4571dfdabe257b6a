use clap::Parser;
use sso::cli::{
    handle_config_init, handle_extract, handle_reconcile, reconcile::load_config_with_overrides,
    Cli, Commands, ConfigCommands,
};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract(args) => handle_extract(&args),
        Commands::Reconcile(args) => match load_config_with_overrides(&args) {
            Ok(config) => {
                if let Err(e) = sso::logging::init_tracing(&config.logging) {
                    eprintln!("Warning: Failed to initialize logging: {}", e);
                }
                handle_reconcile(&args, &config)
            }
            Err(e) => Err(e),
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
