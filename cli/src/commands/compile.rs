use crate::argparse::CompileArgs;
use sieve_cli::config::{build_adaptor, resolve_config_path, CONFIG_ENV_VAR};
use sieve_cli::render::render_fragment;

pub fn handle_compile_command(args: CompileArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = resolve_config_path(args.config, std::env::var_os(CONFIG_ENV_VAR))?;
    let adaptor = build_adaptor(&config_path)?;
    let fragment = adaptor.compile_query(&args.query)?;

    let numbered = args.numbered.then(|| args.offset.unwrap_or(0));
    println!("{}", render_fragment(&fragment, args.format, numbered)?);
    Ok(())
}
