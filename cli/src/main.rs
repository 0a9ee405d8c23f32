mod argparse;
mod commands;
mod utils;

use argparse::parse_args;

fn main() {
    dotenv::dotenv().ok();
    let cli = parse_args();
    utils::init_logger(cli.verbose);

    if let Err(e) = commands::handle_command(cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
