//! Exchange client port trait.

use rust_decimal::Decimal;

use crate::domain::credentials::Credentials;
use crate::domain::error::ExchangeError;
use crate::domain::market::{Balance, Order, OrderKind, Ticker, TradeReceipt, WithdrawReceipt};

/// The capability set command handlers need from a trading venue,
/// independent of its wire protocol. One adapter per exchange; an
/// exchange without a working adapter simply is not registered at
/// startup.
///
/// Authenticated operations fail with [`ExchangeError::NoCredentials`]
/// when no login is set, before any network traffic.
pub trait ExchangePort {
    fn name(&self) -> &str;
    fn short_name(&self) -> &str;

    /// Commission rate charged on executed trades, as a fraction.
    fn commission_rate(&self) -> Decimal;

    fn username(&self) -> Option<&str>;
    fn have_credentials(&self) -> bool {
        self.username().is_some()
    }
    fn set_credentials(&mut self, credentials: Credentials);
    fn unset_credentials(&mut self);

    fn balance(&self) -> Result<Balance, ExchangeError>;
    fn ticker(&self) -> Result<Ticker, ExchangeError>;
    fn orders(&self) -> Result<Vec<Order>, ExchangeError>;
    fn buy(&self, amount: Decimal, price: Decimal) -> Result<TradeReceipt, ExchangeError>;
    fn sell(&self, amount: Decimal, price: Decimal) -> Result<TradeReceipt, ExchangeError>;
    fn cancel_order(&self, kind: OrderKind, order_id: &str) -> Result<Vec<Order>, ExchangeError>;
    fn withdraw(&self, address: &str, amount: Decimal)
    -> Result<WithdrawReceipt, ExchangeError>;
}

impl std::fmt::Debug for dyn ExchangePort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangePort")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}
