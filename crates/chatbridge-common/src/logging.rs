//! Tagged console logging on top of `tracing`.
//!
//! Every line is rendered as `[ Tag ] message`, where the tag comes from a
//! `tag` field on the event (falling back to one derived from the level) and
//! an optional `layer` field indents the message with spacer marks:
//!
//! ```text
//! [   Client ] Setting up commands
//! [   Client ]-- Imported `/help`
//! ```
//!
//! Use it through the regular `tracing` macros:
//!
//! ```rust
//! tracing::info!(tag = "client", layer = 2, "Imported help");
//! ```

use crate::utils::{capitalize, first_line, wrap_words};
use crate::BridgeError;
use crossterm::style::{style, Color, Stylize};
use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as subscriber_fmt, EnvFilter};

/// Column width used by [`log_wrapped`].
pub const WRAP_WIDTH: usize = 80;

const EDGE_COLOR: Color = Color::Rgb { r: 0x4f, g: 0x54, b: 0x5c };
const TIME_COLOR: Color = Color::Rgb { r: 0x72, g: 0x89, b: 0xda };
const SPACER: char = '-';
const MAX_LAYER: u64 = 8;

/// The known log tags and their colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    /// Discord client lifecycle and command deployment.
    Client,
    /// Gateway events.
    Events,
    /// Startup steps.
    Setup,
    /// Failures.
    Error,
    /// Command usage.
    Commands,
    /// Process-level messages (arguments, shutdown, relay).
    Process,
    /// Warnings.
    Warn,
    /// Debug output.
    Debug,
}

impl LogTag {
    /// All tags, used to compute padding.
    pub const ALL: [Self; 8] = [
        Self::Client,
        Self::Events,
        Self::Setup,
        Self::Error,
        Self::Commands,
        Self::Process,
        Self::Warn,
        Self::Debug,
    ];

    /// Lowercase name as written in the `tag` field.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Events => "events",
            Self::Setup => "setup",
            Self::Error => "error",
            Self::Commands => "commands",
            Self::Process => "process",
            Self::Warn => "warn",
            Self::Debug => "debug",
        }
    }

    /// Parses a `tag` field value.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }

    /// Tag used when an event carries no `tag` field.
    pub fn for_level(level: Level) -> Self {
        if level == Level::ERROR {
            Self::Error
        } else if level == Level::WARN {
            Self::Warn
        } else if level == Level::INFO {
            Self::Process
        } else {
            Self::Debug
        }
    }

    const fn color(self) -> Color {
        match self {
            Self::Client => Color::Rgb { r: 0x58, g: 0x65, b: 0xf2 },
            Self::Events => Color::Rgb { r: 0xeb, g: 0x45, b: 0x9e },
            Self::Setup => Color::Rgb { r: 0x57, g: 0xf2, b: 0x87 },
            Self::Error => Color::Rgb { r: 0xed, g: 0x42, b: 0x45 },
            Self::Commands => Color::Rgb { r: 0xfe, g: 0xe7, b: 0x5c },
            Self::Process => Color::Rgb { r: 0x9b, g: 0x59, b: 0xb6 },
            Self::Warn => Color::Rgb { r: 0xf0, g: 0xb2, b: 0x32 },
            Self::Debug => Color::Rgb { r: 0x99, g: 0xaa, b: 0xb5 },
        }
    }

    fn padding(self) -> usize {
        let longest = Self::ALL.iter().map(|tag| tag.name().len()).max().unwrap_or(0);
        longest - self.name().len()
    }
}

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset (e.g. "info", "debug")
    pub level: String,
    /// Whether to prefix every line with the local time
    pub include_timestamps: bool,
    /// Whether to colourise the output
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,serenity=warn,poise=warn,tracing::span=warn".to_string(),
            include_timestamps: false,
            ansi: true,
        }
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// `RUST_LOG` takes precedence over `config.level`.
pub fn init_logging(config: &LoggingConfig) -> crate::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| BridgeError::Logging(e.to_string()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber_fmt::layer().event_format(TaggedFormat::new(config)))
        .try_init()
        .map_err(|e| BridgeError::Logging(e.to_string()))
}

/// Event formatter producing `[ Tag ]-- message` lines.
#[derive(Debug, Clone)]
pub struct TaggedFormat {
    timestamps: bool,
    ansi: bool,
}

impl TaggedFormat {
    /// Creates a formatter from the logging configuration.
    pub fn new(config: &LoggingConfig) -> Self {
        Self {
            timestamps: config.include_timestamps,
            ansi: config.ansi,
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.ansi {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// Renders the line prefix for a tag at the given layer.
    pub fn prefix(&self, tag: LogTag, layer: u64) -> String {
        let mut out = String::new();

        if self.timestamps {
            let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            out.push_str(&self.paint(&now, TIME_COLOR));
            out.push(' ');
        }

        let name = capitalize(tag.name());
        let _ = write!(
            out,
            "{} {}{} {}",
            self.paint("[", EDGE_COLOR),
            " ".repeat(tag.padding()),
            self.paint(&name, tag.color()),
            self.paint("]", EDGE_COLOR),
        );

        if layer == 0 {
            out.push(' ');
        } else {
            let depth = usize::try_from(layer.min(MAX_LAYER)).unwrap_or(0);
            let marks: String = std::iter::repeat(SPACER).take(depth).collect();
            out.push_str(&self.paint(&marks, EDGE_COLOR));
            out.push(' ');
        }

        out
    }
}

impl<S, N> FormatEvent<S, N> for TaggedFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = TagVisitor::default();
        event.record(&mut fields);

        let tag = fields
            .tag
            .as_deref()
            .and_then(LogTag::from_name)
            .unwrap_or_else(|| LogTag::for_level(*event.metadata().level()));

        write!(writer, "{}{}", self.prefix(tag, fields.layer), fields.message)?;
        for (name, value) in &fields.extra {
            write!(writer, " {name}={value}")?;
        }
        writeln!(writer)
    }
}

#[derive(Default)]
struct TagVisitor {
    message: String,
    tag: Option<String>,
    layer: u64,
    extra: Vec<(&'static str, String)>,
}

impl Visit for TagVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "tag" => self.tag = Some(value.to_string()),
            "message" => self.message = value.to_string(),
            name => self.extra.push((name, value.to_string())),
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == "layer" {
            self.layer = value;
        } else {
            self.extra.push((field.name(), value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == "layer" {
            self.layer = u64::try_from(value).unwrap_or(0);
        } else {
            self.extra.push((field.name(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "tag" => self.tag = Some(format!("{value:?}").trim_matches('"').to_string()),
            name => self.extra.push((name, format!("{value:?}"))),
        }
    }
}

/// Logs `message` word-wrapped to [`WRAP_WIDTH`] columns, one event per line.
///
/// `warn` and `error` tags are emitted at the matching level, every other tag
/// at `INFO`.
pub fn log_wrapped(tag: LogTag, layer: u64, message: &str) {
    for line in wrap_words(message, WRAP_WIDTH) {
        match tag {
            LogTag::Warn => tracing::warn!(tag = tag.name(), layer, "{line}"),
            LogTag::Error => tracing::error!(tag = tag.name(), layer, "{line}"),
            _ => tracing::info!(tag = tag.name(), layer, "{line}"),
        }
    }
}

/// Reports an error to the operator log.
///
/// Only the first line of the message is shown on the main line, followed by
/// every cause in the `source()` chain and the full debug representation at
/// `DEBUG`.
pub fn report_error<E>(err: &E)
where
    E: std::error::Error + ?Sized,
{
    tracing::error!(tag = "error", "{}", first_line(&err.to_string()));

    let mut source = err.source();
    while let Some(cause) = source {
        tracing::error!(tag = "error", layer = 1, "caused by: {}", first_line(&cause.to_string()));
        source = cause.source();
    }

    tracing::debug!(tag = "error", "{err:?}");
}
