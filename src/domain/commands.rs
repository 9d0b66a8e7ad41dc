//! The built-in command set: session commands plus the exchange
//! surface, registered as an explicit table at startup.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::credentials::Credentials;
use crate::domain::error::ShellError;
use crate::domain::market::OrderKind;
use crate::domain::registry::{Arity, CommandDescriptor, CommandRegistry};
use crate::domain::repl::{Flow, Session};
use crate::ports::console_port::ReadEvent;

/// BTC amounts are carried to 8 decimal places, USD prices to 5.
const BTC_SCALE: u32 = 8;
const USD_SCALE: u32 = 5;

/// The full command table, registered once at startup.
pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(CommandDescriptor {
        name: "balance",
        params: "",
        arity: Arity::exactly(0),
        doc: "Display account balance.",
        handler: cmd_balance,
    });
    registry.register(CommandDescriptor {
        name: "buy",
        params: "<amount> <price>",
        arity: Arity::exactly(2),
        doc: "Buy bitcoins.\nPrefix the amount with a '$' to spend that many USD and calculate\nthe BTC amount automatically.",
        handler: cmd_buy,
    });
    registry.register(CommandDescriptor {
        name: "cancel",
        params: "<kind> <order-id>",
        arity: Arity::exactly(2),
        doc: "Cancel the order with the specified kind (buy or sell) and order ID.",
        handler: cmd_cancel,
    });
    registry.register(CommandDescriptor {
        name: "exit",
        params: "",
        arity: Arity::exactly(0),
        doc: "Exit the shell.",
        handler: cmd_exit,
    });
    registry.register(CommandDescriptor {
        name: "help",
        params: "[command]",
        arity: Arity::range(0, 1),
        doc: "Show help for the specified command or, if none is given, list all\ncommands for the current exchange.",
        handler: cmd_help,
    });
    registry.register(CommandDescriptor {
        name: "login",
        params: "[username]",
        arity: Arity::range(0, 1),
        doc: "Set login credentials. Prompts for whatever is not supplied;\nthe password is never echoed.",
        handler: cmd_login,
    });
    registry.register(CommandDescriptor {
        name: "logout",
        params: "",
        arity: Arity::exactly(0),
        doc: "Unset login credentials.",
        handler: cmd_logout,
    });
    registry.register(CommandDescriptor {
        name: "orders",
        params: "[kind]",
        arity: Arity::range(0, 1),
        doc: "List open orders.\nSpecifying a kind (buy or sell) will list only orders of that kind.",
        handler: cmd_orders,
    });
    registry.register(CommandDescriptor {
        name: "profit",
        params: "<price>",
        arity: Arity::exactly(1),
        doc: "Calculate profitable short/long prices for a given initial price,\ntaking the exchange commission into account.",
        handler: cmd_profit,
    });
    registry.register(CommandDescriptor {
        name: "sell",
        params: "<amount> <price>",
        arity: Arity::exactly(2),
        doc: "Sell bitcoins.\nPrefix the amount with a '$' to receive that many USD and calculate\nthe BTC amount automatically.",
        handler: cmd_sell,
    });
    registry.register(CommandDescriptor {
        name: "ticker",
        params: "",
        arity: Arity::exactly(0),
        doc: "Display ticker.",
        handler: cmd_ticker,
    });
    registry.register(CommandDescriptor {
        name: "withdraw",
        params: "<address> <amount>",
        arity: Arity::exactly(2),
        doc: "Withdraw bitcoins.",
        handler: cmd_withdraw,
    });
    registry
}

fn cmd_exit(_: &mut Session, _: &CommandRegistry, _: &[String]) -> Result<Flow, ShellError> {
    Ok(Flow::Exit)
}

fn cmd_help(
    session: &mut Session,
    registry: &CommandRegistry,
    args: &[String],
) -> Result<Flow, ShellError> {
    session
        .console
        .write_line(&format!("---- {} help ----", session.exchange.name()));
    match args.first() {
        None => {
            let names: Vec<&'static str> = registry.names().collect();
            for name in names {
                print_command_info(session, registry, name);
            }
        }
        Some(name) => print_command_info(session, registry, name),
    }
    Ok(Flow::Continue)
}

fn print_command_info(session: &mut Session, registry: &CommandRegistry, name: &str) {
    match registry.get(name) {
        Some(descriptor) => {
            if descriptor.params.is_empty() {
                session.console.write_line(descriptor.name);
            } else {
                session
                    .console
                    .write_line(&format!("{} {}", descriptor.name, descriptor.params));
            }
            for line in descriptor.doc.lines() {
                session.console.write_line(&format!("    {line}"));
            }
        }
        None => session
            .console
            .write_line(&format!("{name}: Unknown command.")),
    }
}

enum PromptOutcome {
    Value(String),
    Interrupted,
    Eof,
}

/// Re-prompt until a non-empty line arrives.
fn prompt_required(
    session: &mut Session,
    prompt: &str,
    secret: bool,
) -> Result<PromptOutcome, ShellError> {
    loop {
        let event = if secret {
            session.console.read_secret(prompt)?
        } else {
            session.console.read_line(prompt)?
        };
        match event {
            ReadEvent::Line(value) if !value.is_empty() => return Ok(PromptOutcome::Value(value)),
            ReadEvent::Line(_) => {}
            ReadEvent::Interrupted => return Ok(PromptOutcome::Interrupted),
            ReadEvent::Eof => return Ok(PromptOutcome::Eof),
        }
    }
}

fn cmd_login(
    session: &mut Session,
    _: &CommandRegistry,
    args: &[String],
) -> Result<Flow, ShellError> {
    let username = match args.first() {
        Some(name) => name.clone(),
        None => match prompt_required(session, "Username: ", false)? {
            PromptOutcome::Value(name) => name,
            PromptOutcome::Eof => return Ok(Flow::Exit),
            PromptOutcome::Interrupted => {
                session.console.write_line("");
                return Ok(Flow::Continue);
            }
        },
    };
    let password = match prompt_required(session, "Password: ", true)? {
        PromptOutcome::Value(password) => password,
        PromptOutcome::Eof => return Ok(Flow::Exit),
        PromptOutcome::Interrupted => {
            session.console.write_line("");
            return Ok(Flow::Continue);
        }
    };
    session
        .exchange
        .set_credentials(Credentials::new(username, password)?);
    Ok(Flow::Continue)
}

fn cmd_logout(session: &mut Session, _: &CommandRegistry, _: &[String]) -> Result<Flow, ShellError> {
    session.exchange.unset_credentials();
    Ok(Flow::Continue)
}

fn cmd_balance(
    session: &mut Session,
    _: &CommandRegistry,
    _: &[String],
) -> Result<Flow, ShellError> {
    let balance = session.exchange.balance()?;
    session.console.write_line(&balance.to_string());
    Ok(Flow::Continue)
}

fn cmd_ticker(session: &mut Session, _: &CommandRegistry, _: &[String]) -> Result<Flow, ShellError> {
    let ticker = session.exchange.ticker()?;
    session.console.write_line(&ticker.to_string());
    Ok(Flow::Continue)
}

fn cmd_buy(session: &mut Session, _: &CommandRegistry, args: &[String]) -> Result<Flow, ShellError> {
    place_order(session, OrderKind::Buy, &args[0], &args[1])
}

fn cmd_sell(
    session: &mut Session,
    _: &CommandRegistry,
    args: &[String],
) -> Result<Flow, ShellError> {
    place_order(session, OrderKind::Sell, &args[0], &args[1])
}

fn place_order(
    session: &mut Session,
    kind: OrderKind,
    amount_text: &str,
    price_text: &str,
) -> Result<Flow, ShellError> {
    let price = parse_price(price_text)?;
    let amount = resolve_amount(amount_text, price)?;
    let receipt = match kind {
        OrderKind::Buy => session.exchange.buy(amount, price)?,
        OrderKind::Sell => session.exchange.sell(amount, price)?,
    };
    for message in &receipt.messages {
        session.console.write_line(message);
    }
    for order in &receipt.open_orders {
        session.console.write_line(&order.to_string());
    }
    Ok(Flow::Continue)
}

fn cmd_cancel(
    session: &mut Session,
    _: &CommandRegistry,
    args: &[String],
) -> Result<Flow, ShellError> {
    let kind = parse_kind(&args[0])?;
    let order_id = &args[1];
    let remaining = session.exchange.cancel_order(kind, order_id)?;
    session
        .console
        .write_line(&format!("Canceled {kind} {order_id}."));
    if remaining.is_empty() {
        session.console.write_line("No remaining orders.");
    } else {
        for order in &remaining {
            session.console.write_line(&order.to_string());
        }
    }
    Ok(Flow::Continue)
}

fn cmd_orders(
    session: &mut Session,
    _: &CommandRegistry,
    args: &[String],
) -> Result<Flow, ShellError> {
    let filter = match args.first() {
        Some(kind) => Some(parse_kind(kind)?),
        None => None,
    };
    let orders = session.exchange.orders()?;
    if orders.is_empty() {
        session.console.write_line("No orders.");
        return Ok(Flow::Continue);
    }
    for order in orders
        .iter()
        .filter(|order| filter.is_none_or(|kind| order.kind == kind))
    {
        session.console.write_line(&order.to_string());
    }
    Ok(Flow::Continue)
}

fn cmd_withdraw(
    session: &mut Session,
    _: &CommandRegistry,
    args: &[String],
) -> Result<Flow, ShellError> {
    let address = &args[0];
    let amount = parse_btc_amount(&args[1])?;
    let receipt = session.exchange.withdraw(address, amount)?;
    session.console.write_line(&receipt.status);
    session.console.write_line("Updated balance:");
    session.console.write_line(&receipt.balance.to_string());
    Ok(Flow::Continue)
}

fn cmd_profit(
    session: &mut Session,
    _: &CommandRegistry,
    args: &[String],
) -> Result<Flow, ShellError> {
    let text = &args[0];
    let price: Decimal = text
        .parse()
        .map_err(|_| ShellError::Command(format!("{text}: Invalid price.")))?;
    if price < Decimal::ZERO {
        return Err(ShellError::Command(format!("{text}: Invalid price.")));
    }
    let (short, long) = profit_bounds(price, session.exchange.commission_rate());
    session.console.write_line(&format!("Short: < {short}"));
    session.console.write_line(&format!("Long: > {long}"));
    Ok(Flow::Continue)
}

/// Prices at which a round trip from `price` breaks even, given a
/// commission charged on both legs: short below, long above.
fn profit_bounds(price: Decimal, commission_rate: Decimal) -> (Decimal, Decimal) {
    let kept = Decimal::ONE - commission_rate;
    let round_trip = kept * kept;
    let short = (price * round_trip).round_dp_with_strategy(USD_SCALE, RoundingStrategy::ToZero);
    let long =
        (price / round_trip).round_dp_with_strategy(USD_SCALE, RoundingStrategy::AwayFromZero);
    (short, long)
}

fn parse_kind(text: &str) -> Result<OrderKind, ShellError> {
    OrderKind::parse(text).ok_or_else(|| ShellError::Command(format!("{text}: Invalid order kind.")))
}

fn parse_price(text: &str) -> Result<Decimal, ShellError> {
    let invalid = || ShellError::Command(format!("{text}: Invalid price."));
    let price: Decimal = text.parse().map_err(|_| invalid())?;
    if price <= Decimal::ZERO {
        return Err(invalid());
    }
    Ok(price)
}

fn parse_btc_amount(text: &str) -> Result<Decimal, ShellError> {
    let invalid = || ShellError::Command(format!("{text}: Invalid amount."));
    let amount: Decimal = text.parse().map_err(|_| invalid())?;
    if amount <= Decimal::ZERO {
        return Err(invalid());
    }
    Ok(amount)
}

/// A `$`-prefixed amount is a USD sum: convert to BTC at `price`,
/// carried to 8 decimal places.
fn resolve_amount(text: &str, price: Decimal) -> Result<Decimal, ShellError> {
    match text.strip_prefix('$') {
        Some(usd_text) => {
            let invalid = || ShellError::Command(format!("{text}: Invalid amount."));
            let usd: Decimal = usd_text.parse().map_err(|_| invalid())?;
            if usd <= Decimal::ZERO {
                return Err(invalid());
            }
            Ok((usd / price).round_dp(BTC_SCALE))
        }
        None => parse_btc_amount(text),
    }
}
