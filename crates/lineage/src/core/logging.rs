//! Logging for the layout pipeline
//!
//! Each stage opens a `tracing` span (`parse_people`, `layout_family_tree`,
//! `build_connectors`, `render_svg`, `render_preview`) and records counts and
//! extents as fields. Installing a subscriber is left to the caller:
//!
//! ```rust
//! use lineage::core::logging::init_logging;
//!
//! let _ = init_logging(Some("debug"), Some("pretty"));
//! ```
//!
//! Unset arguments fall back to `LINEAGE_LOG_LEVEL` / `LINEAGE_LOG_FORMAT`.
//! A `RUST_LOG` filter such as `info,lineage::tree::layout=trace` wins over
//! the level. On wasm32 events go to the browser console and the format is
//! ignored.

use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

const LEVEL_VAR: &str = "LINEAGE_LOG_LEVEL";
const FORMAT_VAR: &str = "LINEAGE_LOG_FORMAT";

/// Output shape of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One line per event, no targets or spans
    #[default]
    Compact,
    /// Multi-line with source locations and span activity
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Level filter and format once arguments and environment are merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// Explicit arguments first, then the `LINEAGE_LOG_*` variables, then
    /// `info` and compact output
    pub fn resolve(level: Option<&str>, format: Option<&str>) -> Result<Self, String> {
        let level = level
            .map(str::to_string)
            .or_else(|| std::env::var(LEVEL_VAR).ok())
            .unwrap_or_else(|| "info".to_string());
        let format = match format.map(str::to_string).or_else(|| std::env::var(FORMAT_VAR).ok()) {
            Some(name) => name
                .parse()
                .map_err(|e| format!("Invalid log format: {}", e))?,
            None => LogFormat::default(),
        };
        Ok(Self { level, format })
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn filter(&self) -> EnvFilter {
        if self.level.eq_ignore_ascii_case("off") {
            return EnvFilter::new("off");
        }
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global subscriber.
///
/// Fails on an unknown format, or when a global subscriber is already set.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = LogSettings::resolve(level, format)?;

    #[cfg(target_arch = "wasm32")]
    {
        let _ = settings;
        tracing_wasm::set_as_global_default_with_config(tracing_wasm::WASMLayerConfig::default());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let registry = Registry::default().with(settings.filter());
        let layer = fmt::Layer::default().with_writer(std::io::stderr).with_level(true);
        match settings.format {
            LogFormat::Compact => registry
                .with(layer.with_target(false).with_span_events(FmtSpan::NONE))
                .try_init()?,
            LogFormat::Pretty => registry
                .with(
                    layer
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?,
            LogFormat::Json => registry
                .with(layer.with_span_events(FmtSpan::ACTIVE).json())
                .try_init()?,
        }
        Ok(())
    }
}
