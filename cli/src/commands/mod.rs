mod compile;
mod lex;
mod parse;

use crate::argparse::Commands;
pub use compile::handle_compile_command;
pub use lex::handle_lex_command;
pub use parse::handle_parse_command;
use std::error::Error;

pub fn handle_command(command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Lex(args) => handle_lex_command(args),
        Commands::Parse(args) => handle_parse_command(args),
        Commands::Compile(args) => handle_compile_command(args),
    }
}
