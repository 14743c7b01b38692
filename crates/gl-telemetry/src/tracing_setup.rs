use tracing::field::Empty;
use uuid::Uuid;

/// Generate an OpenTelemetry-compatible trace ID (32 hex characters).
pub fn generate_trace_id() -> String {
    Uuid::new_v4().as_simple().to_string()
}

/// Generate a span ID (16 hex characters).
pub fn generate_span_id() -> String {
    Uuid::new_v4().as_simple().to_string()[..16].to_string()
}

/// Root span for one `growline` command. Returns the span and its trace ID so
/// nested spans and log lines can be correlated.
pub fn create_operation_span(command: &str) -> (tracing::Span, String) {
    let trace_id = generate_trace_id();
    let span = tracing::info_span!(
        "command",
        trace_id = %trace_id,
        span_id = %generate_span_id(),
        command = %command,
    );
    (span, trace_id)
}

/// Span around one snapshot fetch under an existing trace.
///
/// `source` is the item source's description (`file grows.json`,
/// `http http://host/api/grows`). The `items` field starts empty; record it
/// with [`record_fetched_items`] once the snapshot is in.
pub fn create_fetch_span(trace_id: &str, source: &str) -> tracing::Span {
    tracing::info_span!(
        "fetch_snapshot",
        trace_id = %trace_id,
        span_id = %generate_span_id(),
        source = %source,
        items = Empty,
    )
}

/// Fill in the `items` field of a span made by [`create_fetch_span`].
pub fn record_fetched_items(span: &tracing::Span, items: usize) {
    span.record("items", items);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_id_format() {
        let id = generate_trace_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_span_id_format() {
        let id = generate_span_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_trace_ids_are_unique() {
        assert_ne!(generate_trace_id(), generate_trace_id());
    }

    #[test]
    fn test_command_span_returns_its_trace_id() {
        let (span, trace_id) = create_operation_span("layout");
        assert_eq!(trace_id.len(), 32);
        let _guard = span.enter();
    }

    #[test]
    fn test_fetch_span_records_item_count() {
        let (_root, trace_id) = create_operation_span("status");
        let span = create_fetch_span(&trace_id, "file grows.json");
        record_fetched_items(&span, 3);
        let _guard = span.enter();
    }
}
