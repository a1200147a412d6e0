//! Shared logging setup for tokengate binaries and tests: JSON line output
//! with a `service` field, level taken from `RUST_LOG`/`LOG_LEVEL`.

use std::fmt::{self, Write as _};
use std::io;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::field::Visit;
use tracing_subscriber::{
    fmt::{self as tsfmt, format::Writer, FmtContext, FormatEvent, FormatFields, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    EnvFilter, Registry,
};

#[derive(Debug, thiserror::Error)]
pub enum LogInitError {
    #[error("tracing subscriber already initialized")]
    AlreadyInitialized,
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize logging for a binary.
pub struct LogInit;

impl LogInit {
    /// Install a global tracing subscriber writing JSON lines to stderr.
    pub fn init(service: &str) -> Result<(), LogInitError> {
        let subscriber = Self::subscriber_with_writer(service, io::stderr);
        tracing::subscriber::set_global_default(subscriber).map_err(|err| {
            if tracing::dispatcher::has_been_set() {
                LogInitError::AlreadyInitialized
            } else {
                LogInitError::Install(err)
            }
        })
    }

    /// Build a tracing subscriber using the provided writer.
    pub fn subscriber_with_writer<W>(service: &str, writer: W) -> impl tracing::Subscriber
    where
        W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
    {
        let env_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(env_level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let service: Arc<str> = Arc::from(service.to_string());
        let fmt_layer = tsfmt::layer()
            .with_ansi(false)
            .event_format(JsonLineFormat { service })
            .with_writer(writer);

        Registry::default().with(env_filter).with(fmt_layer)
    }
}

struct JsonLineFormat {
    service: Arc<str>,
}

impl<S, N> FormatEvent<S, N> for JsonLineFormat
where
    S: tracing::Subscriber + for<'span> LookupSpan<'span>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);

        let line = json!({
            "level": metadata.level().as_str().to_ascii_lowercase(),
            "target": metadata.target(),
            "service": self.service.as_ref(),
            "fields": Value::Object(visitor.fields),
        });
        writeln!(writer, "{line}")
    }
}

#[derive(Default)]
struct FieldCollector {
    fields: Map<String, Value>,
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), Value::String(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields
            .insert(field.name().to_string(), Value::String(value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::Bool(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::LogInit;

    #[derive(Clone, Default)]
    struct CaptureWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    struct CaptureGuard(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CaptureGuard {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("lock poisoned").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CaptureWriter {
        type Writer = CaptureGuard;

        fn make_writer(&'a self) -> Self::Writer {
            CaptureGuard(self.buffer.clone())
        }
    }

    #[test]
    fn events_are_emitted_as_json_lines() {
        let writer = CaptureWriter::default();
        let buffer = writer.buffer.clone();
        let subscriber = LogInit::subscriber_with_writer("test-svc", writer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(event = "demo_event", attempts = 2u64, "hello");
        });

        let output = String::from_utf8(buffer.lock().expect("lock poisoned").clone())
            .expect("utf8 output");
        let line = output.lines().next().expect("one log line");
        let parsed: serde_json::Value = serde_json::from_str(line).expect("valid json");

        assert_eq!(parsed["service"], "test-svc");
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["fields"]["event"], "demo_event");
        assert_eq!(parsed["fields"]["attempts"], 2);
        assert_eq!(parsed["fields"]["message"], "hello");
    }
}
