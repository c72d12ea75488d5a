//! Trellis CLI - check, measure and lay out grid documents.

#![allow(
    clippy::needless_pass_by_value,
    clippy::uninlined_format_args,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;
use trellis_core::Size;
use trellis_layout::Coordinates;
use trellis_yaml::{DocumentGrid, GridDocument, Placement};

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Constraint-based grid layout CLI")]
#[command(version)]
struct Cli {
    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a grid document
    Check {
        /// Path to the YAML document
        document: PathBuf,
    },

    /// Print minimum and preferred sizes
    Measure {
        /// Path to the YAML document
        document: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Lay the document out and print element bounds
    Layout {
        /// Path to the YAML document
        document: PathBuf,

        /// Container width (default: preferred width)
        #[arg(short = 'W', long)]
        width: Option<i32>,

        /// Container height (default: preferred height)
        #[arg(short = 'H', long)]
        height: Option<i32>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct MeasureReport {
    minimum: Size,
    preferred: Size,
}

#[derive(Debug, Serialize)]
struct LayoutReport {
    size: Size,
    coordinates: Coordinates,
    elements: Vec<Placement>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = match cli.command {
        Commands::Check { document } => render_check(&load(&document)?)?,
        Commands::Measure { document, format } => {
            let mut grid = load(&document)?.build()?;
            render_measure(&mut grid, format)?
        }
        Commands::Layout {
            document,
            width,
            height,
            format,
        } => {
            let mut grid = load(&document)?.build()?;
            render_layout(&mut grid, width, height, format)?
        }
    };
    print!("{output}");
    Ok(())
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(verbose))
        .init();
}

/// `RUST_LOG` directives plus the level picked by `-v`.
fn log_filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    EnvFilter::from_default_env().add_directive(level.into())
}

fn load(path: &Path) -> Result<GridDocument> {
    debug!(path = %path.display(), "loading grid document");
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    GridDocument::from_yaml(&content)
        .with_context(|| format!("invalid document {}", path.display()))
}

fn render_check(document: &GridDocument) -> Result<String> {
    let grid = document.build()?;
    let visible = grid
        .placements()
        .iter()
        .filter(|placement| placement.visible)
        .count();
    let mut out = String::from("Document valid!\n");
    writeln!(out, "  Grid: {} x {}", document.rows, document.columns)?;
    writeln!(out, "  Elements: {} ({} visible)", grid.ids.len(), visible)?;
    Ok(out)
}

fn render_measure(grid: &mut DocumentGrid, format: OutputFormat) -> Result<String> {
    let report = MeasureReport {
        minimum: grid.minimum_size(),
        preferred: grid.preferred_size(),
    };
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)? + "\n"),
        OutputFormat::Text => {
            let mut out = String::new();
            let MeasureReport { minimum, preferred } = report;
            writeln!(out, "minimum:   {}x{}", minimum.width, minimum.height)?;
            writeln!(out, "preferred: {}x{}", preferred.width, preferred.height)?;
            Ok(out)
        }
    }
}

fn render_layout(
    grid: &mut DocumentGrid,
    width: Option<i32>,
    height: Option<i32>,
    format: OutputFormat,
) -> Result<String> {
    let preferred = grid.preferred_size();
    let size = Size::new(
        width.unwrap_or(preferred.width),
        height.unwrap_or(preferred.height),
    );
    grid.layout(size);
    let report = LayoutReport {
        size,
        coordinates: grid.grid.coordinates().clone(),
        elements: grid.placements(),
    };

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)? + "\n"),
        OutputFormat::Text => {
            let mut out = String::new();
            writeln!(out, "layout {}x{}", size.width, size.height)?;
            let pad = report.elements.iter().map(|p| p.id.len()).max().unwrap_or(0);
            for placement in &report.elements {
                let b = placement.bounds;
                write!(
                    out,
                    "  {:<pad$}  x={} y={} w={} h={}",
                    placement.id, b.x, b.y, b.width, b.height
                )?;
                if !placement.visible {
                    out.push_str(" (hidden)");
                }
                out.push('\n');
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW_YAML: &str = r#"
rows: 1
columns: 2
elements:
  - id: a
    minimum: [40, 20]
  - id: bb
    minimum: [60, 20]
    constraints: { column: 1 }
  - id: c
    visible: false
    constraints: { column: 1 }
"#;

    fn grid() -> DocumentGrid {
        GridDocument::from_yaml(ROW_YAML).unwrap().build().unwrap()
    }

    // =========================================================================
    // Check
    // =========================================================================

    #[test]
    fn test_render_check_counts_elements() {
        let doc = GridDocument::from_yaml(ROW_YAML).unwrap();
        let out = render_check(&doc).unwrap();
        assert!(out.starts_with("Document valid!"));
        assert!(out.contains("Grid: 1 x 2"));
        assert!(out.contains("Elements: 3 (2 visible)"));
    }

    #[test]
    fn test_render_check_rejects_bad_document() {
        let yaml = "rows: 1\ncolumns: 1\nelements:\n  - id: a\n  - id: a\n";
        let doc = GridDocument::from_yaml(yaml).unwrap();
        let err = render_check(&doc).unwrap_err();
        assert!(err.to_string().contains("duplicate element id: a"));
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = load(Path::new("/nonexistent/trellis/grid.yaml")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }

    #[test]
    fn test_log_filter_follows_verbosity() {
        let quiet = log_filter(0).to_string().to_lowercase();
        assert!(quiet.contains("warn"));
        let debug = log_filter(1).to_string().to_lowercase();
        assert!(debug.contains("debug"));
        let trace = log_filter(3).to_string().to_lowercase();
        assert!(trace.contains("trace"));
    }

    // =========================================================================
    // Measure
    // =========================================================================

    #[test]
    fn test_render_measure_text() {
        let out = render_measure(&mut grid(), OutputFormat::Text).unwrap();
        assert_eq!(out, "minimum:   100x20\npreferred: 100x20\n");
    }

    #[test]
    fn test_render_measure_json() {
        let out = render_measure(&mut grid(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["preferred"]["width"], 100);
        assert_eq!(value["minimum"]["height"], 20);
    }

    // =========================================================================
    // Layout
    // =========================================================================

    #[test]
    fn test_render_layout_text_defaults_to_preferred() {
        let out = render_layout(&mut grid(), None, None, OutputFormat::Text).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "layout 100x20");
        assert_eq!(lines[1], "  a   x=0 y=0 w=40 h=20");
        assert_eq!(lines[2], "  bb  x=40 y=0 w=60 h=20");
        assert!(lines[3].ends_with("(hidden)"));
    }

    #[test]
    fn test_render_layout_json() {
        let out = render_layout(&mut grid(), Some(100), Some(30), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["size"]["height"], 30);
        assert_eq!(value["coordinates"]["xs"], serde_json::json!([0, 40]));
        assert_eq!(value["elements"][1]["id"], "bb");
        assert_eq!(value["elements"][1]["bounds"]["x"], 40);
        assert_eq!(value["elements"][2]["visible"], false);
    }
}
