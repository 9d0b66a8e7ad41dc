//! Mt. Gox exchange adapter (historical v0 HTTP API).
//!
//! Wire specifics stay in this module: form-encoded POSTs with the
//! credentials appended as `name`/`pass` for authenticated calls,
//! plain GETs for public data, JSON responses with an `error` field
//! on failure and decimal amounts carried as strings.

use reqwest::blocking::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use url::Url;

use crate::domain::credentials::Credentials;
use crate::domain::error::{CoinshError, ExchangeError};
use crate::domain::market::{Balance, Order, OrderKind, Ticker, TradeReceipt, WithdrawReceipt};
use crate::ports::config_port::ConfigPort;
use crate::ports::exchange_port::ExchangePort;

pub const SHORT_NAME: &str = "mtgox";
pub const DEFAULT_BASE_URL: &str = "https://mtgox.com/code/";

pub struct MtGoxAdapter {
    http: Client,
    base_url: Url,
    credentials: Option<Credentials>,
    commission_rate: Decimal,
}

impl MtGoxAdapter {
    pub fn new(user_agent: &str, base_url: &str) -> Result<Self, CoinshError> {
        let base_url = Url::parse(base_url).map_err(|e| CoinshError::Client {
            reason: format!("invalid base url {base_url}: {e}"),
        })?;
        let http = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| CoinshError::Client {
                reason: e.to_string(),
            })?;
        Ok(Self {
            http,
            base_url,
            credentials: None,
            // 0.65% commission on executed trades
            commission_rate: Decimal::new(65, 4),
        })
    }

    pub fn from_config(config: &dyn ConfigPort, user_agent: &str) -> Result<Self, CoinshError> {
        let base_url = config
            .get_string(SHORT_NAME, "base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(user_agent, &base_url)
    }

    fn endpoint(&self, rel_path: &str) -> Result<Url, ExchangeError> {
        self.base_url
            .join(rel_path)
            .map_err(|e| ExchangeError::Transport(e.to_string()))
    }

    fn get_public(&self, rel_path: &str) -> Result<Value, ExchangeError> {
        let response = self
            .http
            .get(self.endpoint(rel_path)?)
            .send()
            .map_err(transport)?;
        postprocess(response.json().map_err(transport)?)
    }

    fn post_authenticated(
        &self,
        rel_path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ExchangeError> {
        // credentials are checked before any network traffic
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ExchangeError::NoCredentials)?;
        let mut form: Vec<(&str, String)> = params.to_vec();
        form.push(("name", credentials.username().to_string()));
        form.push(("pass", credentials.password().to_string()));
        let response = self
            .http
            .post(self.endpoint(rel_path)?)
            .form(&form)
            .send()
            .map_err(transport)?;
        postprocess(response.json().map_err(transport)?)
    }
}

fn transport(err: reqwest::Error) -> ExchangeError {
    ExchangeError::Transport(err.to_string())
}

fn malformed(detail: impl std::fmt::Display) -> ExchangeError {
    ExchangeError::Transport(format!("malformed response: {detail}"))
}

/// Map the API's `error` field onto the port error taxonomy. A
/// response without one passes through unchanged.
fn postprocess(data: Value) -> Result<Value, ExchangeError> {
    match data.get("error").and_then(Value::as_str) {
        Some("Must be logged in") => Err(ExchangeError::LoginRejected),
        Some(message) => Err(ExchangeError::Remote(message.to_string())),
        None => Ok(data),
    }
}

fn field<'a>(value: &'a Value, name: &str) -> Result<&'a Value, ExchangeError> {
    value
        .get(name)
        .ok_or_else(|| malformed(format!("missing field {name}")))
}

fn string_field(value: &Value, name: &str) -> Result<String, ExchangeError> {
    match field(value, name)? {
        Value::String(text) => Ok(text.clone()),
        other => Ok(other.to_string()),
    }
}

// Numbers arrive as JSON numbers or as decimal/integer strings,
// depending on the endpoint.
fn as_int(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|text| text.parse().ok()))
}

fn int_field(value: &Value, name: &str) -> Result<i64, ExchangeError> {
    as_int(field(value, name)?).ok_or_else(|| malformed(format!("bad integer in {name}")))
}

fn decimal_field(value: &Value, name: &str) -> Result<Decimal, ExchangeError> {
    let text = string_field(value, name)?;
    text.parse()
        .map_err(|_| malformed(format!("bad decimal in {name}: {text}")))
}

fn parse_order(value: &Value) -> Result<Order, ExchangeError> {
    let kind = match int_field(value, "type")? {
        1 => OrderKind::Sell,
        2 => OrderKind::Buy,
        other => return Err(malformed(format!("unknown order type {other}"))),
    };
    Ok(Order {
        kind,
        id: string_field(value, "oid")?,
        amount: decimal_field(value, "amount")?,
        price: decimal_field(value, "price")?,
        timestamp: int_field(value, "date")?,
        dark: int_field(value, "dark")? != 0,
        insufficient_funds: value.get("status").and_then(as_int) == Some(2),
    })
}

fn parse_orders(value: &Value) -> Result<Vec<Order>, ExchangeError> {
    value
        .as_array()
        .ok_or_else(|| malformed("orders is not an array"))?
        .iter()
        .map(parse_order)
        .collect()
}

fn parse_balance(value: &Value) -> Result<Balance, ExchangeError> {
    Ok(Balance {
        btc: decimal_field(value, "btcs")?,
        usd: decimal_field(value, "usds")?,
    })
}

fn parse_ticker(value: &Value) -> Result<Ticker, ExchangeError> {
    Ok(Ticker {
        last: decimal_field(value, "last")?,
        buy: decimal_field(value, "buy")?,
        sell: decimal_field(value, "sell")?,
        high: decimal_field(value, "high")?,
        low: decimal_field(value, "low")?,
        volume: decimal_field(value, "vol")?,
    })
}

/// Order placement responds with `<br>`-separated status text plus the
/// updated open order list.
fn parse_receipt(value: &Value) -> Result<TradeReceipt, ExchangeError> {
    let status = string_field(value, "status")?;
    let messages = status
        .split("<br>")
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();
    Ok(TradeReceipt {
        messages,
        open_orders: parse_orders(field(value, "orders")?)?,
    })
}

impl ExchangePort for MtGoxAdapter {
    fn name(&self) -> &str {
        "Mt. Gox"
    }

    fn short_name(&self) -> &str {
        SHORT_NAME
    }

    fn commission_rate(&self) -> Decimal {
        self.commission_rate
    }

    fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(Credentials::username)
    }

    fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    fn unset_credentials(&mut self) {
        self.credentials = None;
    }

    fn balance(&self) -> Result<Balance, ExchangeError> {
        parse_balance(&self.post_authenticated("getFunds.php", &[])?)
    }

    fn ticker(&self) -> Result<Ticker, ExchangeError> {
        let data = self.get_public("data/ticker.php")?;
        parse_ticker(field(&data, "ticker")?)
    }

    fn orders(&self) -> Result<Vec<Order>, ExchangeError> {
        let data = self.post_authenticated("getOrders.php", &[])?;
        parse_orders(field(&data, "orders")?)
    }

    fn buy(&self, amount: Decimal, price: Decimal) -> Result<TradeReceipt, ExchangeError> {
        let data = self.post_authenticated(
            "buyBTC.php",
            &[("amount", amount.to_string()), ("price", price.to_string())],
        )?;
        parse_receipt(&data)
    }

    fn sell(&self, amount: Decimal, price: Decimal) -> Result<TradeReceipt, ExchangeError> {
        let data = self.post_authenticated(
            "sellBTC.php",
            &[("amount", amount.to_string()), ("price", price.to_string())],
        )?;
        parse_receipt(&data)
    }

    fn cancel_order(&self, kind: OrderKind, order_id: &str) -> Result<Vec<Order>, ExchangeError> {
        let type_code = match kind {
            OrderKind::Sell => "1",
            OrderKind::Buy => "2",
        };
        let data = self.post_authenticated(
            "cancelOrder.php",
            &[
                ("oid", order_id.to_string()),
                ("type", type_code.to_string()),
            ],
        )?;
        parse_orders(field(&data, "orders")?)
    }

    fn withdraw(
        &self,
        address: &str,
        amount: Decimal,
    ) -> Result<WithdrawReceipt, ExchangeError> {
        let data = self.post_authenticated(
            "withdraw.php",
            &[
                ("group1", "BTC".to_string()),
                ("btca", address.to_string()),
                ("amount", amount.to_string()),
            ],
        )?;
        Ok(WithdrawReceipt {
            status: string_field(&data, "status")?,
            balance: parse_balance(&data)?,
        })
    }
}
