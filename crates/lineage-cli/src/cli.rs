//! Command-line interface for the lineage utility
//!
//! Lays out family trees from JSON person lists and exports SVG, JSON
//! layout dumps, terminal previews and validation reports.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::colorizer::{colorize_preview, paint_report_line, ReportLevel};
use lineage::core::logging::init_logging;
use lineage::tree::{
    Command, Diagnostic, DiagnosticPolicy, Effect, FamilyGraph, LayoutConfig, RenderConfig,
    TreeExplorer, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP,
};
use lineage::{CharacterSet, Database, ExportSpace};

/// Lineage - lay out family trees and export them as SVG
#[derive(Parser)]
#[command(name = "lineage")]
#[command(about = "A Rust utility to lay out family trees and render them as SVG")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a family tree to SVG
    Render {
        /// Input JSON person list (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output SVG file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Collapse the descendants of this person (repeatable)
        #[arg(long = "collapse", value_name = "ID")]
        collapse: Vec<String>,

        /// JSON file overriding layout settings
        #[arg(long)]
        config: Option<PathBuf>,

        /// Coordinate space of the exported geometry
        #[arg(long, value_enum, default_value_t = SpaceChoice::Model)]
        export_space: SpaceChoice,

        /// Zoom steps to apply before a viewport-space export (negative zooms out)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        zoom_steps: i32,
    },

    /// Print computed positions, extents and diagnostics as JSON
    Layout {
        /// Input JSON person list (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output JSON file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Collapse the descendants of this person (repeatable)
        #[arg(long = "collapse", value_name = "ID")]
        collapse: Vec<String>,

        /// JSON file overriding layout settings
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Draw the tree in the terminal
    Preview {
        /// Input JSON person list (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Collapse the descendants of this person (repeatable)
        #[arg(long = "collapse", value_name = "ID")]
        collapse: Vec<String>,

        /// Character set to use for the preview
        #[arg(long, value_enum, default_value_t = StyleChoice::Unicode)]
        style: StyleChoice,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Report dangling references, cycles and duplicate ids
    Validate {
        /// Input JSON person list (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },
}

/// Supported preview character sets
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum StyleChoice {
    Ascii,
    Unicode,
}

impl From<StyleChoice> for CharacterSet {
    fn from(value: StyleChoice) -> Self {
        match value {
            StyleChoice::Ascii => CharacterSet::Ascii,
            StyleChoice::Unicode => CharacterSet::Unicode,
        }
    }
}

/// Export coordinate spaces
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum SpaceChoice {
    /// Un-zoomed model coordinates
    #[default]
    Model,
    /// Wrapped in the current zoom/pan transform
    Viewport,
}

impl From<SpaceChoice> for ExportSpace {
    fn from(value: SpaceChoice) -> Self {
        match value {
            SpaceChoice::Model => ExportSpace::Model,
            SpaceChoice::Viewport => ExportSpace::Viewport,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
pub struct LineageApp {
    layout_config: LayoutConfig,
}

impl LineageApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    /// Create a new application instance with a layout config
    pub fn with_config(layout_config: LayoutConfig) -> Self {
        Self { layout_config }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level_str = std::env::var("LINEAGE_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("LINEAGE_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Lineage v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Render {
                input,
                output,
                collapse,
                config,
                export_space,
                zoom_steps,
            } => self.render_command(
                input,
                output,
                &collapse,
                config,
                export_space,
                zoom_steps,
                cli.verbose,
            ),
            Commands::Layout {
                input,
                output,
                collapse,
                config,
            } => self.layout_command(input, output, &collapse, config, cli.verbose),
            Commands::Preview {
                input,
                output,
                collapse,
                style,
                color,
            } => self.preview_command(input, output, &collapse, style, color, cli.verbose),
            Commands::Validate { input, color } => self.validate_command(input, color, cli.verbose),
        }
    }

    /// Handle the render command
    #[allow(clippy::too_many_arguments)]
    fn render_command(
        &mut self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        collapse: &[String],
        config: Option<PathBuf>,
        export_space: SpaceChoice,
        zoom_steps: i32,
        verbose: bool,
    ) -> Result<()> {
        if let Some(path) = config {
            self.layout_config = self.load_config(&path)?;
        }
        let graph = self.read_graph(input, verbose)?;
        let render_config = RenderConfig::default().with_export_space(export_space.into());
        let mut explorer = TreeExplorer::with_config(graph, self.layout_config, render_config);
        Self::apply_collapse(&mut explorer, collapse);

        let step = if zoom_steps >= 0 {
            Command::ZoomIn
        } else {
            Command::ZoomOut
        };
        for _ in 0..Self::zoom_dispatches(zoom_steps) {
            explorer.dispatch(step.clone());
        }

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                let file = fs::File::create(&path).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
                let mut writer = BufWriter::new(file);
                explorer.export_to(&mut writer)?;
                if verbose {
                    eprintln!("Wrote SVG to {}", path.display());
                }
            }
            _ => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                explorer.export_to(&mut handle)?;
                writeln!(handle)?;
            }
        }
        Ok(())
    }

    /// Handle the layout command
    fn layout_command(
        &mut self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        collapse: &[String],
        config: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        if let Some(path) = config {
            self.layout_config = self.load_config(&path)?;
        }
        let graph = self.read_graph(input, verbose)?;
        let layout_config = self.layout_config.with_diagnostics(DiagnosticPolicy::Collect);
        let mut explorer = TreeExplorer::with_config(graph, layout_config, RenderConfig::default());
        Self::apply_collapse(&mut explorer, collapse);

        let diagnostics = Self::all_diagnostics(&explorer);
        let layout = explorer.layout();
        let report = serde_json::json!({
            "nodes": layout.nodes,
            "extents": layout.extents,
            "connectors": explorer.connectors(),
            "collapsed": Self::sorted(explorer.collapsed().iter()),
            "diagnostics": diagnostics,
        });
        self.write_output(output, &serde_json::to_string_pretty(&report)?)
    }

    /// Handle the preview command
    fn preview_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        collapse: &[String],
        style: StyleChoice,
        color: ColorChoice,
        verbose: bool,
    ) -> Result<()> {
        let graph = self.read_graph(input, verbose)?;
        let mut explorer = TreeExplorer::with_config(graph, self.layout_config, RenderConfig::default());
        Self::apply_collapse(&mut explorer, collapse);

        let text = explorer.preview(style.into())?;
        let text = if self.should_colorize(&output, color) {
            colorize_preview(&text)
        } else {
            text
        };
        self.write_output(output, &text)
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, color: ColorChoice, verbose: bool) -> Result<()> {
        let graph = self.read_graph(input, verbose)?;
        let layout_config = self.layout_config.with_diagnostics(DiagnosticPolicy::Collect);
        let explorer = TreeExplorer::with_config(graph, layout_config, RenderConfig::default());
        let diagnostics = Self::all_diagnostics(&explorer);
        let colored = self.should_colorize(&None, color);

        let count = explorer.graph().node_count();
        if diagnostics.is_empty() {
            let line = format!("✓ {} people, no problems found", count);
            println!("{}", paint_report_line(&line, ReportLevel::Ok, colored));
            return Ok(());
        }

        for diagnostic in &diagnostics {
            let level = match diagnostic {
                Diagnostic::CyclicRelation { .. } => ReportLevel::Problem,
                _ => ReportLevel::Warning,
            };
            let line = format!("{} {}", level.symbol(), diagnostic);
            println!("{}", paint_report_line(&line, level, colored));
        }
        Err(anyhow!(
            "{} problem(s) found in {} people",
            diagnostics.len(),
            count
        ))
    }

    fn apply_collapse(explorer: &mut TreeExplorer, ids: &[String]) {
        for id in ids {
            if explorer.dispatch(Command::Collapse(id.clone())) == Effect::None {
                warn!(person_id = %id, "Cannot collapse: unknown id or no children");
            }
        }
    }

    /// Zoom saturates after a full sweep of the range, so larger counts are cut
    fn zoom_dispatches(zoom_steps: i32) -> u32 {
        let sweep = ((MAX_ZOOM - MIN_ZOOM) / ZOOM_STEP).round() as u32;
        zoom_steps.unsigned_abs().min(sweep)
    }

    fn all_diagnostics(explorer: &TreeExplorer) -> Vec<Diagnostic> {
        let mut all = explorer.graph().diagnostics(DiagnosticPolicy::Collect);
        for d in &explorer.layout().diagnostics {
            if !all.contains(d) {
                all.push(d.clone());
            }
        }
        all
    }

    fn sorted<'a>(ids: impl Iterator<Item = &'a String>) -> Vec<&'a String> {
        let mut v: Vec<_> = ids.collect();
        v.sort();
        v
    }

    /// Load a layout config file; missing keys keep their defaults
    pub fn load_config(&self, path: &Path) -> Result<LayoutConfig> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: LayoutConfig = serde_json::from_str(&raw).map_err(|e| {
            lineage::LineageError::config_error(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        debug!(path = %path.display(), "Loaded layout config");
        Ok(config)
    }

    fn read_graph(&self, input: Option<PathBuf>, verbose: bool) -> Result<FamilyGraph> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }
        let graph = lineage::parse(&content)?;
        if verbose {
            eprintln!("Parsed {} people", graph.node_count());
        }
        Ok(graph)
    }

    /// Determine if we should colorize the output based on color choice and output destination
    fn should_colorize(&self, output: &Option<PathBuf>, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                match output {
                    None => crossterm::tty::IsTty::is_tty(&std::io::stdout()),
                    Some(ref p) if p.to_str() == Some("-") => {
                        crossterm::tty::IsTty::is_tty(&std::io::stdout())
                    }
                    Some(_) => false,
                }
            }
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for LineageApp {
    fn default() -> Self {
        Self::new()
    }
}
