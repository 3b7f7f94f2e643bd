use axum::Router;
use axum::response::sse::{Event, Sse};
use axum::routing::get;
use events::StreamMessage;
use futures_util::{StreamExt, stream};
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use stream_client::{BackoffPolicy, ConnectionStatus, StreamConnector};
use tokio::net::TcpListener;
use tokio::sync::watch;

const SIGNAL_A: &str = r#"{"type": "signal", "data": {"timestamp": "2026-08-04T12:00:00Z", "symbol": "BTC", "action": "BUY"}}"#;
const SIGNAL_B: &str = r#"{"type": "signal", "data": {"timestamp": "2026-08-04T12:01:00Z", "symbol": "ETH", "action": "SELL"}}"#;

fn fast_policy() -> BackoffPolicy {
    BackoffPolicy {
        initial: Duration::from_millis(10),
        max: Duration::from_millis(40),
        factor: 2.0,
    }
}

/// Serve the router on an ephemeral port, returning the base URL.
async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn malformed_event_does_not_kill_the_stream() {
    let app = Router::new().route(
        "/events",
        get(|| async {
            let frames = vec![
                Ok::<_, Infallible>(Event::default().data(r#"{"type": "heartbeat"}"#)),
                Ok(Event::default().data(SIGNAL_A)),
                Ok(Event::default().data("{this is not json")),
                Ok(Event::default().data(SIGNAL_B)),
            ];
            Sse::new(stream::iter(frames))
        }),
    );
    let base = serve(app).await;

    let (status_tx, _status_rx) = watch::channel(ConnectionStatus::Connecting);
    let connector = StreamConnector::new(&base, fast_policy());
    let messages = connector.subscribe(status_tx);

    // If the malformed frame had torn the connection down, the client would
    // reconnect and replay SIGNAL_A, making the second symbol "BTC" again.
    let signals: Vec<_> = tokio::time::timeout(
        Duration::from_secs(5),
        messages
            .filter_map(|m| async move {
                match m {
                    StreamMessage::Signal { data } => Some(data),
                    _ => None,
                }
            })
            .take(2)
            .collect::<Vec<_>>(),
    )
    .await
    .expect("stream stalled");

    let symbols: Vec<_> = signals.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BTC", "ETH"]);
}

#[tokio::test]
async fn server_close_triggers_reconnect() {
    let connections = Arc::new(AtomicUsize::new(0));
    let seen = connections.clone();
    let app = Router::new().route(
        "/events",
        get(move || {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            async move {
                // One frame per connection, then the server hangs up.
                let frame = if n == 0 { SIGNAL_A } else { SIGNAL_B };
                Sse::new(stream::iter(vec![
                    Ok::<_, Infallible>(Event::default().data(frame)),
                ]))
            }
        }),
    );
    let base = serve(app).await;

    let (status_tx, _status_rx) = watch::channel(ConnectionStatus::Connecting);
    let connector = StreamConnector::new(&base, fast_policy());
    let messages = connector.subscribe(status_tx);

    let signals: Vec<_> = tokio::time::timeout(
        Duration::from_secs(5),
        messages
            .filter_map(|m| async move {
                match m {
                    StreamMessage::Signal { data } => Some(data),
                    _ => None,
                }
            })
            .take(2)
            .collect::<Vec<_>>(),
    )
    .await
    .expect("client never reconnected");

    let symbols: Vec<_> = signals.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BTC", "ETH"]);
    assert!(connections.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn status_reflects_connection_lifecycle() {
    let app = Router::new().route(
        "/events",
        get(|| async {
            Sse::new(stream::iter(vec![Ok::<_, Infallible>(
                Event::default().data(r#"{"type": "heartbeat"}"#),
            )]))
        }),
    );
    let base = serve(app).await;

    let (status_tx, mut status_rx) = watch::channel(ConnectionStatus::Connecting);
    let connector = StreamConnector::new(&base, fast_policy());
    let messages = connector.subscribe(status_tx);
    tokio::spawn(async move {
        let mut messages = Box::pin(messages);
        while messages.next().await.is_some() {}
    });

    let mut saw_connected = false;
    let mut saw_retrying = false;
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            status_rx.changed().await.unwrap();
            let status = *status_rx.borrow();
            match status {
                ConnectionStatus::Connected => saw_connected = true,
                ConnectionStatus::Retrying => saw_retrying = true,
                ConnectionStatus::Connecting => {}
            }
            if saw_connected && saw_retrying {
                break;
            }
        }
    })
    .await
    .expect("never observed both connected and retrying");
}

#[test]
fn status_indicator_text() {
    assert_eq!(ConnectionStatus::Connected.to_string(), "connected");
    assert_eq!(
        ConnectionStatus::Retrying.to_string(),
        "disconnected (retrying)"
    );
    assert_eq!(ConnectionStatus::Connecting.to_string(), "connecting");
}
