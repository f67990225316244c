//! `tracing` output for the browser: events go to the devtools console at
//! the matching level.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// Install the console subscriber at `info`. Calling it again is harmless.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(ConsoleLayer::new(write_to_console))
        .with(LevelFilter::INFO)
        .try_init();
}

fn write_to_console(level: &Level, line: String) {
    let line = wasm_bindgen::JsValue::from_str(&line);
    match *level {
        Level::ERROR => web_sys::console::error_1(&line),
        Level::WARN => web_sys::console::warn_1(&line),
        Level::INFO => web_sys::console::info_1(&line),
        _ => web_sys::console::debug_1(&line),
    }
}

/// Formats each event as one line and hands it to `sink`.
pub struct ConsoleLayer<F> {
    sink: F,
}

impl<F> ConsoleLayer<F>
where
    F: Fn(&Level, String) + Send + Sync + 'static,
{
    pub fn new(sink: F) -> Self {
        Self { sink }
    }
}

impl<S, F> Layer<S> for ConsoleLayer<F>
where
    S: Subscriber,
    F: Fn(&Level, String) + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut fields = FieldCollector::default();
        event.record(&mut fields);
        (self.sink)(
            metadata.level(),
            format_line(metadata.level(), metadata.target(), &fields.message, &fields.extra),
        );
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    extra: Vec<String>,
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.extra.push(format!("{}={:?}", field.name(), value));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.extra.push(format!("{}={}", field.name(), value));
        }
    }
}

/// `LEVEL target: message key=value ...`
fn format_line(level: &Level, target: &str, message: &str, extra: &[String]) -> String {
    let mut line = format!("{} {}: {}", level, target, message);
    for field in extra {
        let _ = write!(line, " {}", field);
    }
    line
}
