// In crates/dashboard/src/table.rs

use crate::view::{self, RowView};
use core_types::{Signal, SignalKey};
use events::StreamMessage;
use std::collections::HashMap;

/// The dashboard's source of truth: an owned row per signal key plus the
/// visual insertion order, newest first.
///
/// Rendering is a pure function of this state and nothing else; no display
/// structure is consulted or mutated. Visual order is an insertion-order
/// property, not a timestamp sort, so out-of-order upserts produce a
/// visually out-of-order table.
#[derive(Debug, Default)]
pub struct SignalTable {
    rows: HashMap<SignalKey, Signal>,
    order: Vec<SignalKey>,
}

impl SignalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one stream message. Heartbeats and unknown kinds are no-ops,
    /// server error notes are logged, signal kinds upsert. Returns the
    /// number of rows touched so callers know whether to re-render.
    pub fn apply(&mut self, message: &StreamMessage) -> usize {
        match message {
            StreamMessage::Heartbeat { ts } => {
                tracing::trace!(?ts, "Heartbeat received.");
                0
            }
            StreamMessage::Signal { data } => {
                self.upsert(data.clone());
                1
            }
            StreamMessage::Signals { data } => {
                // Array order is authoritative: later entries overwrite
                // earlier ones sharing a key.
                for signal in data {
                    self.upsert(signal.clone());
                }
                data.len()
            }
            StreamMessage::Error { payload } => {
                let message = payload
                    .as_ref()
                    .and_then(|p| p.message.as_deref())
                    .unwrap_or("unspecified");
                tracing::warn!(message, "Server reported an error on the stream.");
                0
            }
            StreamMessage::Unknown => 0,
        }
    }

    /// Insert-if-absent-else-update. New keys go to the top; existing keys
    /// are replaced in place, keeping their visual position.
    pub fn upsert(&mut self, signal: Signal) {
        let key = signal.key();
        if self.rows.insert(key.clone(), signal).is_none() {
            self.order.insert(0, key);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Rows in visual order, newest inserted first.
    pub fn rows(&self) -> impl Iterator<Item = &Signal> {
        self.order.iter().map(|key| &self.rows[key])
    }

    /// The fully formatted view of every row, in visual order.
    pub fn views(&self) -> Vec<RowView> {
        self.rows().map(RowView::from_signal).collect()
    }

    /// Renders the table as fixed-width text with the given connection
    /// status on top.
    pub fn render(&self, status: &str) -> String {
        view::render(self, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ActionClass;

    fn sig(minute: u32, symbol: &str, action: &str) -> Signal {
        serde_json::from_str(&format!(
            r#"{{"timestamp": "2026-08-04T12:{minute:02}:00Z", "symbol": "{symbol}", "action": "{action}"}}"#
        ))
        .unwrap()
    }

    fn single(signal: &Signal) -> StreamMessage {
        StreamMessage::Signal {
            data: signal.clone(),
        }
    }

    #[test]
    fn row_count_tracks_distinct_keys() {
        let mut table = SignalTable::new();
        let a = sig(0, "BTC", "BUY");
        let b = sig(1, "BTC", "SELL");
        let c = sig(0, "ETH", "HOLD");

        table.apply(&single(&a));
        table.apply(&single(&b));
        table.apply(&single(&c));
        table.apply(&single(&a)); // duplicate key
        table.apply(&StreamMessage::Signals {
            data: vec![b.clone(), c.clone()],
        });

        assert_eq!(table.len(), 3);
    }

    #[test]
    fn redelivery_of_an_identical_signal_is_idempotent() {
        let mut table = SignalTable::new();
        let a = sig(0, "BTC", "BUY");
        table.apply(&single(&a));
        let before = table.views();
        table.apply(&single(&a));
        assert_eq!(table.views(), before);
    }

    #[test]
    fn new_rows_are_inserted_at_the_top() {
        let mut table = SignalTable::new();
        table.upsert(sig(0, "BTC", "BUY"));
        table.upsert(sig(1, "ETH", "SELL"));

        let symbols: Vec<_> = table.rows().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ETH", "BTC"]);
    }

    #[test]
    fn upsert_replaces_in_place_without_moving_the_row() {
        let mut table = SignalTable::new();
        table.upsert(sig(0, "BTC", "BUY"));
        table.upsert(sig(1, "ETH", "SELL"));
        // BTC gets a fresh action; it must keep its (bottom) position.
        table.upsert(sig(0, "BTC", "SELL"));

        let rows: Vec<_> = table
            .rows()
            .map(|s| (s.symbol.as_str(), s.action.as_str()))
            .collect();
        assert_eq!(rows, vec![("ETH", "SELL"), ("BTC", "SELL")]);
    }

    #[test]
    fn batch_applies_in_array_order_newest_inserted_first() {
        let mut table = SignalTable::new();
        let a = sig(0, "BTC", "BUY");
        let b = sig(1, "ETH", "SELL");
        table.apply(&StreamMessage::Signals {
            data: vec![a, b],
        });

        // B was upserted last, so it sits on top.
        let symbols: Vec<_> = table.rows().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ETH", "BTC"]);
    }

    #[test]
    fn later_batch_entries_overwrite_earlier_ones_sharing_a_key() {
        let mut table = SignalTable::new();
        table.apply(&StreamMessage::Signals {
            data: vec![sig(0, "BTC", "BUY"), sig(0, "BTC", "SELL")],
        });

        assert_eq!(table.len(), 1);
        assert_eq!(table.views()[0].action, "SELL");
    }

    // The stream makes no ordering promise beyond "apply in arrival order":
    // a stale batch arriving after a newer single update clobbers it. That
    // is the documented tradeoff, preserved here deliberately.
    #[test]
    fn stale_batch_overwrites_newer_single_row() {
        let mut table = SignalTable::new();
        table.apply(&single(&sig(0, "BTC", "SELL")));
        table.apply(&StreamMessage::Signals {
            data: vec![sig(0, "BTC", "BUY")],
        });

        assert_eq!(table.len(), 1);
        assert_eq!(table.views()[0].action, "BUY");
    }

    #[test]
    fn heartbeats_errors_and_unknown_kinds_touch_nothing() {
        let mut table = SignalTable::new();
        table.apply(&single(&sig(0, "BTC", "BUY")));
        let before = table.views();

        assert_eq!(
            table.apply(&StreamMessage::Heartbeat {
                ts: Some("2026-08-04T12:00:00Z".into())
            }),
            0
        );
        assert_eq!(table.apply(&StreamMessage::Error { payload: None }), 0);
        assert_eq!(table.apply(&StreamMessage::Unknown), 0);
        assert_eq!(table.views(), before);
    }

    #[test]
    fn action_classes_are_mutually_exclusive() {
        let mut table = SignalTable::new();
        table.upsert(sig(0, "A", "SELL"));
        table.upsert(sig(1, "B", "HOLD"));
        table.upsert(sig(2, "C", "ACCUMULATE"));
        table.upsert(sig(3, "D", "BUY"));

        let classes: Vec<_> = table.views().iter().map(|v| v.action_class).collect();
        assert_eq!(
            classes,
            vec![
                ActionClass::Buy,
                ActionClass::Hold,
                ActionClass::Hold,
                ActionClass::Sell
            ]
        );
        // The unrecognized label is still displayed verbatim.
        assert_eq!(table.views()[1].action, "ACCUMULATE");
    }
}
