#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use rust_decimal::Decimal;

use coinsh::domain::credentials::Credentials;
use coinsh::domain::error::ExchangeError;
use coinsh::domain::market::{Balance, Order, OrderKind, Ticker, TradeReceipt, WithdrawReceipt};
use coinsh::ports::console_port::{ConsolePort, ReadEvent};
use coinsh::ports::exchange_port::ExchangePort;

pub type Tap = Rc<RefCell<Vec<String>>>;

/// Console that replays scripted input and records everything written,
/// so a whole session can be asserted on after the fact.
pub struct ScriptConsole {
    lines: VecDeque<ReadEvent>,
    secrets: VecDeque<ReadEvent>,
    prompts: Tap,
    output: Tap,
    errors: Tap,
}

impl ScriptConsole {
    pub fn new(lines: &[&str]) -> Self {
        Self::from_events(
            lines
                .iter()
                .map(|line| ReadEvent::Line(line.to_string()))
                .collect(),
        )
    }

    pub fn from_events(lines: VecDeque<ReadEvent>) -> Self {
        Self {
            lines,
            secrets: VecDeque::new(),
            prompts: Rc::new(RefCell::new(Vec::new())),
            output: Rc::new(RefCell::new(Vec::new())),
            errors: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn with_secrets(mut self, secrets: &[&str]) -> Self {
        self.secrets = secrets
            .iter()
            .map(|secret| ReadEvent::Line(secret.to_string()))
            .collect();
        self
    }

    /// Shared handles to the recorded prompts, output and errors,
    /// usable after the console has moved into a session.
    pub fn taps(&self) -> (Tap, Tap, Tap) {
        (
            Rc::clone(&self.prompts),
            Rc::clone(&self.output),
            Rc::clone(&self.errors),
        )
    }
}

impl ConsolePort for ScriptConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadEvent> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self.lines.pop_front().unwrap_or(ReadEvent::Eof))
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<ReadEvent> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self.secrets.pop_front().unwrap_or(ReadEvent::Eof))
    }

    fn write_line(&mut self, text: &str) {
        self.output.borrow_mut().push(text.to_string());
    }

    fn write_error(&mut self, text: &str) {
        self.errors.borrow_mut().push(text.to_string());
    }
}

/// Exchange double with scriptable results and a call log recording
/// each operation with the exact arguments it received.
pub struct MockExchange {
    credentials: Option<Credentials>,
    pub commission: Decimal,
    pub balance_result: Result<Balance, ExchangeError>,
    pub ticker_result: Result<Ticker, ExchangeError>,
    pub orders_result: Result<Vec<Order>, ExchangeError>,
    pub trade_result: Result<TradeReceipt, ExchangeError>,
    pub cancel_result: Result<Vec<Order>, ExchangeError>,
    pub withdraw_result: Result<WithdrawReceipt, ExchangeError>,
    calls: Tap,
    credentials_mirror: Rc<RefCell<Option<Credentials>>>,
}

impl Default for MockExchange {
    fn default() -> Self {
        let zero = Balance {
            btc: Decimal::ZERO,
            usd: Decimal::ZERO,
        };
        Self {
            credentials: None,
            commission: Decimal::ZERO,
            balance_result: Ok(zero),
            ticker_result: Ok(Ticker {
                last: Decimal::ONE,
                buy: Decimal::ONE,
                sell: Decimal::ONE,
                high: Decimal::ONE,
                low: Decimal::ONE,
                volume: Decimal::ONE,
            }),
            orders_result: Ok(Vec::new()),
            trade_result: Ok(TradeReceipt {
                messages: vec!["Order placed.".to_string()],
                open_orders: Vec::new(),
            }),
            cancel_result: Ok(Vec::new()),
            withdraw_result: Ok(WithdrawReceipt {
                status: "Withdrawal sent.".to_string(),
                balance: zero,
            }),
            calls: Rc::new(RefCell::new(Vec::new())),
            credentials_mirror: Rc::new(RefCell::new(None)),
        }
    }
}

impl MockExchange {
    /// Shared handle to the call log.
    pub fn call_log(&self) -> Tap {
        Rc::clone(&self.calls)
    }

    /// Shared view of the credentials the shell has set or unset.
    pub fn credentials_view(&self) -> Rc<RefCell<Option<Credentials>>> {
        Rc::clone(&self.credentials_mirror)
    }
}

impl ExchangePort for MockExchange {
    fn name(&self) -> &str {
        "Mockchange"
    }

    fn short_name(&self) -> &str {
        "mock"
    }

    fn commission_rate(&self) -> Decimal {
        self.commission
    }

    fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(Credentials::username)
    }

    fn set_credentials(&mut self, credentials: Credentials) {
        *self.credentials_mirror.borrow_mut() = Some(credentials.clone());
        self.credentials = Some(credentials);
    }

    fn unset_credentials(&mut self) {
        *self.credentials_mirror.borrow_mut() = None;
        self.credentials = None;
    }

    fn balance(&self) -> Result<Balance, ExchangeError> {
        self.calls.borrow_mut().push("balance".to_string());
        self.balance_result.clone()
    }

    fn ticker(&self) -> Result<Ticker, ExchangeError> {
        self.calls.borrow_mut().push("ticker".to_string());
        self.ticker_result.clone()
    }

    fn orders(&self) -> Result<Vec<Order>, ExchangeError> {
        self.calls.borrow_mut().push("orders".to_string());
        self.orders_result.clone()
    }

    fn buy(&self, amount: Decimal, price: Decimal) -> Result<TradeReceipt, ExchangeError> {
        self.calls.borrow_mut().push(format!("buy {amount} {price}"));
        self.trade_result.clone()
    }

    fn sell(&self, amount: Decimal, price: Decimal) -> Result<TradeReceipt, ExchangeError> {
        self.calls
            .borrow_mut()
            .push(format!("sell {amount} {price}"));
        self.trade_result.clone()
    }

    fn cancel_order(&self, kind: OrderKind, order_id: &str) -> Result<Vec<Order>, ExchangeError> {
        self.calls
            .borrow_mut()
            .push(format!("cancel {kind} {order_id}"));
        self.cancel_result.clone()
    }

    fn withdraw(&self, address: &str, amount: Decimal) -> Result<WithdrawReceipt, ExchangeError> {
        self.calls
            .borrow_mut()
            .push(format!("withdraw {address} {amount}"));
        self.withdraw_result.clone()
    }
}

pub fn sample_order(kind: OrderKind, id: &str) -> Order {
    Order {
        kind,
        id: id.to_string(),
        amount: "1".parse().unwrap(),
        price: "10".parse().unwrap(),
        timestamp: 1_300_000_000,
        dark: false,
        insufficient_funds: false,
    }
}
