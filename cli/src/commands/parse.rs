use crate::argparse::ParseArgs;
use log::debug;
use sieve_cli::render::render_tree;

pub fn handle_parse_command(args: ParseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let node = query_parser::parse(&args.query)?;
    debug!("Parsed {} comparisons", node.expression_count());
    println!("{}", render_tree(&node, args.json)?);
    Ok(())
}
