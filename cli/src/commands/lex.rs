use crate::argparse::LexArgs;
use sieve_cli::render::render_tokens;

pub fn handle_lex_command(args: LexArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tokens = query_parser::tokenize(&args.query);
    print!("{}", render_tokens(&tokens));
    Ok(())
}
