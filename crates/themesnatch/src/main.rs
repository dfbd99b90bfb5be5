use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use themesnatch::boundary::{Controller, SnapshotHost};
use themesnatch::{
    export_with, spacing_scale_summary, Document, ExportFormat, ExportOptions, ExtractionConfig,
    ThemeSnapshot,
};
use tracing_subscriber::EnvFilter;

/// Infer the design theme of a rendered page snapshot
#[derive(Parser)]
#[command(name = "themesnatch")]
#[command(version)]
#[command(about = "Infer the palette, type, spacing and components of a rendered page")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a theme from a page snapshot and export it
    Extract(ExtractArgs),

    /// Export a previously extracted theme
    Export(ExportArgs),

    /// Print a human-readable summary of a page's theme
    Summary(SummaryArgs),
}

#[derive(Args)]
struct ExtractArgs {
    /// Page snapshot (JSON)
    #[arg(value_name = "SNAPSHOT")]
    snapshot: PathBuf,

    /// Output format: configObject, variableSheet or customProperties
    #[arg(short, long, default_value = "customProperties")]
    format: ExportFormat,

    /// Extraction settings (YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Emit the theme itself as JSON instead of an export format
    #[arg(long, conflicts_with = "format")]
    json: bool,

    /// Leave out the 50-900 tonal scale of each color
    #[arg(long)]
    no_scale: bool,
}

#[derive(Args)]
struct ExportArgs {
    /// Theme JSON, as written by `extract --json`
    #[arg(value_name = "THEME")]
    theme: PathBuf,

    /// Output format: configObject, variableSheet or customProperties
    #[arg(short, long)]
    format: ExportFormat,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Leave out the 50-900 tonal scale of each color
    #[arg(long)]
    no_scale: bool,
}

#[derive(Args)]
struct SummaryArgs {
    /// Page snapshot (JSON)
    #[arg(value_name = "SNAPSHOT")]
    snapshot: PathBuf,

    /// Extraction settings (YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        Command::Extract(args) => {
            let theme = extract(&args.snapshot, args.config.as_deref())?;
            let output = if args.json {
                let mut json = theme.to_json_pretty().context("failed to serialize theme")?;
                json.push('\n');
                json
            } else {
                render(&theme, args.format, args.no_scale)?
            };
            emit(&output, args.out.as_deref())
        }
        Command::Export(args) => {
            let json = fs::read_to_string(&args.theme)
                .with_context(|| format!("failed to read theme {}", args.theme.display()))?;
            let theme = ThemeSnapshot::from_json(&json)
                .with_context(|| format!("{} is not a theme", args.theme.display()))?;
            let output = render(&theme, args.format, args.no_scale)?;
            emit(&output, args.out.as_deref())
        }
        Command::Summary(args) => {
            let theme = extract(&args.snapshot, args.config.as_deref())?;
            print!("{}", Summary(&theme));
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout carries only the exported text.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("THEMESNATCH_LOG")
        .unwrap_or_else(|_| EnvFilter::new("themesnatch=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Opens the snapshot as the active page and asks it for its theme.
fn extract(snapshot: &Path, config: Option<&Path>) -> Result<ThemeSnapshot> {
    let config = match config {
        Some(path) => ExtractionConfig::from_path(path)?,
        None => ExtractionConfig::default(),
    };
    let document = Document::from_path(snapshot)?;

    let mut host = SnapshotHost::new();
    host.open(document, config);
    let theme = Controller::new(host)
        .extract_active()
        .with_context(|| format!("no theme for {}", snapshot.display()))?;
    Ok(theme)
}

fn render(theme: &ThemeSnapshot, format: ExportFormat, no_scale: bool) -> Result<String> {
    let options = ExportOptions {
        tonal_scale: !no_scale,
    };
    export_with(theme, format, &options).with_context(|| format!("failed to render {}", format))
}

fn emit(output: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            print!("{}", output);
            Ok(())
        }
    }
}

/// Human-readable overview of a theme.
struct Summary<'a>(&'a ThemeSnapshot);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let theme = self.0;
        let mode = match theme.is_dark_mode {
            Some(true) => "dark",
            Some(false) => "light",
            None => "unknown",
        };
        let url = if theme.url.is_empty() {
            "(no url)"
        } else {
            theme.url.as_str()
        };
        writeln!(f, "{} ({} mode)", url, mode)?;

        writeln!(f, "\nPalette")?;
        if theme.colors.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for color in &theme.colors {
            let role = color.role.map(|r| r.as_str()).unwrap_or("-");
            write!(f, "  {:<15} {}  x{}", role, color.value, color.frequency)?;
            if let Some(name) = &color.source_variable_name {
                write!(f, "  --{}", name)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\nFonts")?;
        if theme.fonts.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for font in &theme.fonts {
            let role = font.role.map(|r| r.as_str()).unwrap_or("-");
            writeln!(
                f,
                "  {:<15} {} {} {}  x{}",
                role, font.family, font.weight, font.size, font.frequency
            )?;
        }

        let scale = spacing_scale_summary(
            theme
                .spacing
                .iter()
                .map(|s| (s.raw_value.as_str(), s.frequency)),
        );
        writeln!(f, "\nSpacing scale")?;
        if scale.is_empty() {
            writeln!(f, "  (none)")?;
        } else {
            writeln!(f, "  {}", scale.join(", "))?;
        }

        writeln!(f, "\nComponents")?;
        if theme.components.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for component in &theme.components {
            writeln!(
                f,
                "  {:<15} {}  x{}",
                component.kind.as_str(),
                component.selector,
                component.frequency
            )?;
        }
        Ok(())
    }
}
