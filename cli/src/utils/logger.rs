const CRATES: [&str; 4] = ["sieve", "sieve_cli", "query_parser", "sql_adaptor"];

/// `RUST_LOG` wins when set. Otherwise our crates log at info, or debug
/// with `--verbose`, and everything else at warn.
pub fn init_logger(verbose: bool) {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filters(verbose));
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
}

fn default_filters(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut filters = vec!["warn".to_string()];
    filters.extend(CRATES.iter().map(|krate| format!("{krate}={level}")));
    filters.join(",")
}
