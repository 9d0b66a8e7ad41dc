//! Exchange-agnostic market data types and their shell rendering.

use chrono::{Local, TimeZone};
use rust_decimal::Decimal;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    Buy,
    Sell,
}

impl OrderKind {
    /// Parse the user-facing kind words. Case-sensitive, like command
    /// names.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "buy" => Some(OrderKind::Buy),
            "sell" => Some(OrderKind::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Buy => write!(f, "buy"),
            OrderKind::Sell => write!(f, "sell"),
        }
    }
}

/// Account balance in the two currencies the shell deals in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub btc: Decimal,
    pub usd: Decimal,
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BTC: {}\nUSD: {}", self.btc, self.usd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    pub last: Decimal,
    pub buy: Decimal,
    pub sell: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub volume: Decimal,
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Last: {}\nBuy: {}\nSell: {}\nHigh: {}\nLow: {}\nVolume: {}",
            self.last, self.buy, self.sell, self.high, self.low, self.volume
        )
    }
}

/// An open order as reported by the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub kind: OrderKind,
    pub id: String,
    pub amount: Decimal,
    pub price: Decimal,
    /// Unix timestamp of order placement.
    pub timestamp: i64,
    /// Hidden from the public order book.
    pub dark: bool,
    pub insufficient_funds: bool,
}

impl Order {
    fn placed_at(&self) -> String {
        Local
            .timestamp_opt(self.timestamp, 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| self.timestamp.to_string())
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut properties = Vec::new();
        if self.dark {
            properties.push("dark");
        }
        if self.insufficient_funds {
            properties.push("not enough funds");
        }
        let annotation = if properties.is_empty() {
            String::new()
        } else {
            format!(" ({})", properties.join(", "))
        };
        write!(
            f,
            "[{}] {} {}: {}BTC @ {}USD{}",
            self.placed_at(),
            self.kind,
            self.id,
            self.amount,
            self.price,
            annotation
        )
    }
}

/// What the exchange reports back after placing an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeReceipt {
    pub messages: Vec<String>,
    pub open_orders: Vec<Order>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawReceipt {
    pub status: String,
    pub balance: Balance,
}
