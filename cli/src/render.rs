use clap::ValueEnum;
use query_parser::{Node, Token};
use serde::Serialize;
use sql_adaptor::SqlFragment;
use tabular::{Row, Table};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub fn render_tokens(tokens: &[Token]) -> String {
    let mut table = Table::new("{:>}  {:<}  {:<}")
        .with_row(Row::from_cells(["#", "Kind", "Literal"].iter().cloned()));
    for (idx, token) in tokens.iter().enumerate() {
        let literal = if token.quoted {
            format!("\"{}\" (quoted)", token.literal)
        } else {
            format!("{:?}", token.literal)
        };
        table.add_row(
            Row::new()
                .with_cell(idx)
                .with_cell(token.kind)
                .with_cell(literal),
        );
    }
    table.to_string()
}

pub fn render_tree(node: &Node, json: bool) -> anyhow::Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(node)?)
    } else {
        Ok(node.to_string())
    }
}

#[derive(Serialize)]
struct FragmentOutput<'a> {
    raw: String,
    values: &'a [String],
}

/// Renders a compiled fragment. `numbered` switches `?` for `$n`
/// placeholders counted from the given offset.
pub fn render_fragment(
    fragment: &SqlFragment,
    format: OutputFormat,
    numbered: Option<usize>,
) -> anyhow::Result<String> {
    let raw = match numbered {
        Some(offset) => fragment.numbered(offset),
        None => fragment.raw.clone(),
    };
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&FragmentOutput {
            raw,
            values: &fragment.values,
        })?),
        OutputFormat::Table => {
            let first = numbered.unwrap_or(0) + 1;
            let mut table = Table::new("{:>}  {:<}")
                .with_row(Row::from_cells(["Param", "Value"].iter().cloned()));
            for (idx, value) in fragment.values.iter().enumerate() {
                let param = match numbered {
                    Some(_) => format!("${}", first + idx),
                    None => format!("{}", idx + 1),
                };
                table.add_row(Row::new().with_cell(param).with_cell(format!("{value:?}")));
            }
            Ok(format!("{raw}\n\n{table}"))
        }
    }
}
