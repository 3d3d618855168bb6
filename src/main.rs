use clap::Parser;
use lanes::cli::commands::{Cli, Commands};
use lanes::cli::handlers;

fn main() {
    let cli = Cli::parse();
    let board_dir = cli.board_dir.clone();

    match cli.command {
        None => {
            // No subcommand: launch the TUI
            if let Err(e) = lanes::tui::run(board_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Init(args)) => {
            // Init runs before board discovery
            if let Err(e) = handlers::cmd_init(args, board_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
