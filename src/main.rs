use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use prettytable::{Cell, Row, Table};
use tracing_subscriber::EnvFilter;
use truthtab::{
    render::TableRenderer, EvaluatorConfig, OptionKey, OptionStore, Selection, Session,
    TruthTester, DEFAULT_MAX_VARIABLES,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Boolean expression, e.g. "(a -> b) and a -> b"
    #[arg(required_unless_present = "list_options")]
    expression: Option<String>,
    /// Only print the verdict
    #[arg(long, short, default_value_t = false)]
    no_table: bool,
    /// Which rows to print
    #[arg(long, short, value_enum, default_value_t = Selection::All)]
    show: Selection,
    /// Override an operator symbol, e.g. `--set and=&`
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    overrides: Vec<(OptionKey, String)>,
    /// Refuse expressions with more distinct variables than this
    #[arg(long, default_value_t = DEFAULT_MAX_VARIABLES)]
    max_vars: usize,
    /// Print the operator symbols in effect and exit
    #[arg(long, default_value_t = false)]
    list_options: bool,
}

fn parse_override(s: &str) -> Result<(OptionKey, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    let key = key.trim().parse::<OptionKey>().map_err(|e| e.to_string())?;
    Ok((key, value.to_string()))
}

fn print_options(session: &Session<TableRenderer>) -> truthtab::Result<()> {
    let mut table = Table::new();
    table.add_row(Row::new(vec![Cell::new("option"), Cell::new("symbols")]));
    for key in OptionKey::ALL {
        table.add_row(Row::new(vec![
            Cell::new(key.id()),
            Cell::new(&session.get_value(key.id())?),
        ]));
    }
    table.printstd();
    Ok(())
}

fn run(args: Cli) -> truthtab::Result<()> {
    let store = Arc::new(OptionStore::new());
    let config = EvaluatorConfig {
        max_variables: args.max_vars,
    };
    let renderer = TableRenderer {
        no_table: args.no_table,
    };
    let mut session = Session::new(store, config, renderer);
    session.init_storage()?;

    for (key, value) in &args.overrides {
        session.change_value(key.id(), value)?;
    }

    if args.list_options {
        print_options(&session)?;
    }

    let Some(expression) = args.expression else {
        return Ok(());
    };

    match args.show {
        Selection::All => session.render_all(&expression),
        Selection::Successes => session.render_successes(&expression),
        Selection::Failures => session.render_failures(&expression),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_splits_on_the_first_equals_sign() {
        assert_eq!(
            parse_override("equality==="),
            Ok((OptionKey::Equality, "==".to_string()))
        );
        assert_eq!(
            parse_override(" and =&, *"),
            Ok((OptionKey::And, "&, *".to_string()))
        );
    }

    #[test]
    fn override_needs_an_equals_sign() {
        assert!(parse_override("and").is_err());
    }

    #[test]
    fn override_rejects_unknown_keys() {
        let err = parse_override("nand=↑").unwrap_err();
        assert!(err.contains("nand"), "{err}");
    }

    #[test]
    fn max_vars_is_clamped() {
        let args = Cli::parse_from(["truthtab", "--max-vars", "100", "a"]);
        assert_eq!(args.max_vars, 100);
        let config = EvaluatorConfig {
            max_variables: args.max_vars,
        };
        assert_eq!(config.limit(), truthtab::HARD_MAX_VARIABLES);
    }
}
