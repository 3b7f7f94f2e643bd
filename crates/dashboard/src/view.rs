// In crates/dashboard/src/view.rs

use crate::table::SignalTable;
use core_types::{ActionClass, Signal};
use indexmap::IndexMap;
use rust_decimal::Decimal;

/// One displayed row, fully formatted. Building a view from the same signal
/// twice yields identical cells, which is what makes upserts idempotent at
/// the display level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub time: String,
    pub symbol: String,
    pub action: String,
    pub action_class: ActionClass,
    pub entry_price: String,
    pub quantity: String,
    pub position_percent: String,
    pub take_profit_price: String,
    pub stop_loss_price: String,
    pub confidence: String,
    pub votes: String,
}

impl RowView {
    pub fn from_signal(signal: &Signal) -> Self {
        Self {
            time: signal.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            symbol: signal.symbol.clone(),
            action: signal.action.as_str().to_string(),
            action_class: signal.action.class(),
            entry_price: fmt_price(signal.entry_price),
            quantity: fmt_quantity(signal.quantity),
            position_percent: fmt_percent(signal.position_percent),
            take_profit_price: fmt_price(signal.take_profit_price),
            stop_loss_price: fmt_price(signal.stop_loss_price),
            confidence: fmt_confidence(signal.confidence),
            votes: fmt_votes(&signal.strategy_votes),
        }
    }
}

/// Prices carry four decimal places. Absence renders as the empty string,
/// never "0.0000".
fn fmt_price(value: Option<Decimal>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_default()
}

/// Percentages carry two decimal places plus the sign. Absence renders as
/// the empty string.
fn fmt_percent(value: Option<Decimal>) -> String {
    value.map(|v| format!("{v:.2}%")).unwrap_or_default()
}

/// Quantity is one of the two numerics that default instead of blanking.
fn fmt_quantity(value: Option<Decimal>) -> String {
    value.unwrap_or_default().to_string()
}

fn fmt_confidence(value: Option<u8>) -> String {
    format!("{}%", value.unwrap_or(0))
}

/// Space-joined "name:vote" tokens in the mapping's insertion order.
fn fmt_votes(votes: &IndexMap<String, String>) -> String {
    votes
        .iter()
        .map(|(name, vote)| format!("{name}:{vote}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders the whole table as fixed-width text: the connection status, a
/// header, and one line per row in visual order.
pub fn render(table: &SignalTable, status: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("status: {status}\n"));
    out.push_str(&format!(
        "{:<19}  {:<8}  {:<6}  {:>12}  {:>10}  {:>8}  {:>12}  {:>12}  {:>5}  {}\n",
        "TIME", "SYMBOL", "ACTION", "ENTRY", "QTY", "POS%", "TP", "SL", "CONF", "VOTES"
    ));
    for row in table.views() {
        out.push_str(&format!(
            "{:<19}  {:<8}  {:<6}  {:>12}  {:>10}  {:>8}  {:>12}  {:>12}  {:>5}  {}\n",
            row.time,
            row.symbol,
            row.action,
            row.entry_price,
            row.quantity,
            row.position_percent,
            row.take_profit_price,
            row.stop_loss_price,
            row.confidence,
            row.votes
        ));
    }
    out
}
