//! Helpdesk Control - terminal front end for the support desk

use clap::Parser;
use helpdeskctl::cli::Cli;
use helpdeskctl::errors::EXIT_SUCCESS;
use helpdeskctl::{app, display, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let code = match app::run(cli).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            display::print_error(&format!("{:#}", e));
            app::exit_code_for(&e)
        }
    };

    std::process::exit(code);
}
