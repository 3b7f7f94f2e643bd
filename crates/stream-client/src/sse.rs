// In crates/stream-client/src/sse.rs

/// Incremental parser for the `text/event-stream` wire format.
///
/// Bytes are fed as they arrive off the socket; completed events come out as
/// their joined `data` payloads. An event ends at a blank line; multiple
/// `data:` lines within one event are joined with `\n`. Comment lines and
/// fields other than `data` are skipped. Partial lines are buffered across
/// feeds, so chunk boundaries can fall anywhere.
#[derive(Debug, Default)]
pub struct SseParser {
    buf: Vec<u8>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk from the wire, returning the data payload of every
    /// event the chunk completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let mut line = String::from_utf8_lossy(&raw[..pos]).into_owned();
            if line.ends_with('\r') {
                line.pop();
            }

            if line.is_empty() {
                // Blank line: the current event is complete.
                if !self.data.is_empty() {
                    events.push(self.data.join("\n"));
                    self.data.clear();
                }
                continue;
            }
            if line.starts_with(':') {
                // Comment, commonly used as a keep-alive.
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line.as_str(), ""),
            };
            if field == "data" {
                self.data.push(value.to_string());
            }
            // `event`, `id` and `retry` are not used by this client.
        }
        events
    }
}
