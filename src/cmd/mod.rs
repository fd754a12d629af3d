//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`] or [`health`].

pub mod health;
pub mod run;

use crate::cli::{Cli, Commands};
use crate::error::CorsairError;

pub async fn dispatch(cli: Cli) -> Result<(), CorsairError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  corsair v{version} \u{2014} single-hop HTTP relay with permissive CORS\n\n  \
         No command provided. To get started:\n\n    \
         corsair run                       Start the relay on 0.0.0.0:3000\n    \
         corsair health                    Check a running instance\n    \
         corsair --help                    See all commands and options\n"
    );
}
