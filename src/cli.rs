//! CLI definition and startup wiring: argument parsing, configuration,
//! exchange selection and loop entry.

use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::mtgox_adapter::{self, MtGoxAdapter};
use crate::adapters::stdin_console::StdinConsole;
use crate::domain::commands;
use crate::domain::error::CoinshError;
use crate::domain::repl::{Repl, Session};
use crate::ports::config_port::ConfigPort;
use crate::ports::exchange_port::ExchangePort;

const USER_AGENT: &str = concat!("coinsh/", env!("CARGO_PKG_VERSION"));

#[derive(Parser, Debug)]
#[command(name = "coinsh", about = "Interactive cryptocurrency exchange shell")]
pub struct Cli {
    /// Path to an INI configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Exchange to connect to, by short name
    #[arg(long)]
    pub exchange: Option<String>,

    /// Execute a single command line and exit
    #[arg(short = 'e', long)]
    pub execute: Option<String>,
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match cli.config {
        Some(path) => match FileConfigAdapter::from_file(&path) {
            Ok(adapter) => Some(adapter),
            Err(e) => {
                let err = CoinshError::ConfigParse {
                    file: path.display().to_string(),
                    reason: e.to_string(),
                };
                eprintln!("error: {err}");
                return ExitCode::from(&err);
            }
        },
        None => None,
    };

    let exchange = match select_exchange(cli.exchange.as_deref(), config.as_ref()) {
        Ok(exchange) => exchange,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(&err);
        }
    };

    let session = Session {
        exchange,
        console: Box::new(StdinConsole::new()),
    };
    let mut repl = Repl::new(session, commands::default_registry());

    if let Some(line) = cli.execute {
        repl.run_line(&line);
        return ExitCode::SUCCESS;
    }

    println!("Welcome to coinsh!");
    println!("Type 'help' to get started.");
    repl.run();
    ExitCode::SUCCESS
}

type ExchangeFactory = fn(Option<&dyn ConfigPort>, &str) -> Result<Box<dyn ExchangePort>, CoinshError>;

fn build_mtgox(
    config: Option<&dyn ConfigPort>,
    user_agent: &str,
) -> Result<Box<dyn ExchangePort>, CoinshError> {
    let adapter = match config {
        Some(config) => MtGoxAdapter::from_config(config, user_agent)?,
        None => MtGoxAdapter::new(user_agent, mtgox_adapter::DEFAULT_BASE_URL)?,
    };
    Ok(Box::new(adapter))
}

/// Available exchange adapters by short name. An exchange without a
/// working adapter is simply absent from the table.
fn exchange_table() -> BTreeMap<&'static str, ExchangeFactory> {
    BTreeMap::from([(mtgox_adapter::SHORT_NAME, build_mtgox as ExchangeFactory)])
}

/// Pick the exchange by short name: command-line override first, then
/// configuration, then the default, looked up in the table by key.
pub fn select_exchange(
    override_name: Option<&str>,
    config: Option<&FileConfigAdapter>,
) -> Result<Box<dyn ExchangePort>, CoinshError> {
    let config = config.map(|config| config as &dyn ConfigPort);
    let user_agent = config
        .and_then(|config| config.get_string("shell", "user_agent"))
        .unwrap_or_else(|| USER_AGENT.to_string());

    let name = override_name
        .map(str::to_string)
        .or_else(|| config.and_then(|config| config.get_string("shell", "exchange")))
        .unwrap_or_else(|| mtgox_adapter::SHORT_NAME.to_string());

    match exchange_table().get(name.as_str()) {
        Some(factory) => factory(config, &user_agent),
        None => Err(CoinshError::UnknownExchange { name }),
    }
}
