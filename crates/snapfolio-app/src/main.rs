// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Snapfolio — export rendered document pages as paginated PDFs.
//
// Entry point. Initialises logging, loads the export config, applies
// command-line overrides and runs one export.

mod services;

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use snapfolio_core::error::Result;
use snapfolio_core::types::{
    DocumentKind, ExportMode, MarginSet, MarginSide, Orientation, PageGeometry, PaperSize,
};
use snapfolio_core::{ExportConfig, ExportOptions};
use snapfolio_document::{EmitOptions, RecordingWriter, SnapshotProcessor, compute_plan, emit};
use snapfolio_export::{ExportOutcome, ExportRequest, Exporter};
use tracing::{error, info};

use services::capture::ImageFileCapture;
use services::download::DirectoryDownload;
use services::feedback::TerminalFeedback;
use services::margin_host::MarginHost;

#[derive(Parser)]
#[command(name = "snapfolio")]
#[command(version)]
#[command(about = "Lay rendered document pages across paginated PDFs", long_about = None)]
struct Cli {
    /// Export settings file (JSON)
    #[arg(short, long, global = true, env = "SNAPFOLIO_CONFIG", default_value = "snapfolio.json")]
    config: PathBuf,

    /// Output directory (overrides the config)
    #[arg(short, long, global = true, value_name = "DIR")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export meeting minutes
    Minutes(ExportArgs),

    /// Export a material list (two pages by default)
    #[command(alias = "materials")]
    MaterialList {
        #[command(flatten)]
        args: ExportArgs,

        /// Number of rows in the list; 0 refuses to export
        #[arg(long)]
        rows: Option<usize>,
    },

    /// Export a daily report
    DailyReport(ExportArgs),

    /// Print the pagination plan without writing a PDF
    Plan {
        /// Document kind whose settings to use
        #[arg(value_enum)]
        kind: KindArg,

        #[command(flatten)]
        args: PlanArgs,
    },

    /// Write the default settings file
    InitConfig {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct ExportArgs {
    /// Rendered page image (PNG, JPEG, ...)
    #[arg(value_name = "IMAGE")]
    input: PathBuf,

    /// Document title (defaults to the file stem)
    #[arg(short, long)]
    title: Option<String>,

    #[command(flatten)]
    layout: LayoutArgs,

    /// Skip the margin dialog and use the margins as given
    #[arg(short, long)]
    yes: bool,
}

#[derive(Args)]
struct PlanArgs {
    /// Rendered page image (PNG, JPEG, ...)
    #[arg(value_name = "IMAGE")]
    input: PathBuf,

    #[command(flatten)]
    layout: LayoutArgs,
}

/// Page and capture overrides shared by exporting and planning.
#[derive(Args)]
struct LayoutArgs {
    /// Paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Landscape pages
    #[arg(long)]
    landscape: bool,

    /// Fit onto exactly this many pages
    #[arg(long, value_name = "N")]
    pages: Option<NonZeroUsize>,

    /// Capture scale (device-pixel ratio)
    #[arg(long)]
    scale: Option<f32>,

    /// All four margins, in mm
    #[arg(long, value_name = "MM")]
    margin: Option<f32>,

    #[arg(long, value_name = "MM")]
    top: Option<f32>,

    #[arg(long, value_name = "MM")]
    right: Option<f32>,

    #[arg(long, value_name = "MM")]
    bottom: Option<f32>,

    #[arg(long, value_name = "MM")]
    left: Option<f32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Minutes,
    MaterialList,
    DailyReport,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Minutes => Self::Minutes,
            KindArg::MaterialList => Self::MaterialList,
            KindArg::DailyReport => Self::DailyReport,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

impl From<PaperArg> for PaperSize {
    fn from(paper: PaperArg) -> Self {
        match paper {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
        }
    }
}

impl LayoutArgs {
    /// Fold command-line overrides into the options for one kind.
    fn apply(&self, options: &mut ExportOptions) {
        if let Some(paper) = self.paper {
            options.page_size = paper.into();
        }
        if self.landscape {
            options.orientation = Orientation::Landscape;
        }
        if let Some(pages) = self.pages {
            options.mode = ExportMode::FixedPages(pages);
        }
        options.default_margins = self.margins(options.default_margins);
    }

    fn margins(&self, base: MarginSet) -> MarginSet {
        let mut margins = match self.margin {
            Some(all) => MarginSet::uniform(all),
            None => base,
        };
        for (side, value) in [
            (MarginSide::Top, self.top),
            (MarginSide::Right, self.right),
            (MarginSide::Bottom, self.bottom),
            (MarginSide::Left, self.left),
        ] {
            if let Some(value) = value {
                margins.set(side, value);
            }
        }
        margins
    }
}

impl ExportArgs {
    fn title(&self) -> String {
        self.title.clone().unwrap_or_else(|| {
            self.input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "snapfolio failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::InitConfig { force } = cli.command {
        return init_config(&cli.config, force);
    }

    let mut config = ExportConfig::load(&cli.config)?;
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }

    let (kind, args, rows) = match &cli.command {
        Commands::Minutes(args) => (DocumentKind::Minutes, args, None),
        Commands::MaterialList { args, rows } => (DocumentKind::MaterialList, args, *rows),
        Commands::DailyReport(args) => (DocumentKind::DailyReport, args, None),
        Commands::Plan { kind, args } => {
            let kind = DocumentKind::from(*kind);
            args.layout.apply(config.options_mut(kind));
            return print_plan(&config, kind, args);
        }
        Commands::InitConfig { .. } => return Ok(()),
    };

    args.layout.apply(config.options_mut(kind));
    if let Some(scale) = args.layout.scale {
        config.capture_scale = scale;
    }

    let host = if args.yes {
        MarginHost::auto_confirm()
    } else {
        MarginHost::Terminal
    };
    let download = DirectoryDownload::new(&config.output_dir);
    let exporter = Exporter::new(ImageFileCapture, download, TerminalFeedback, host, config);

    let title = args.title();
    let mut request = ExportRequest::new(args.input.as_path(), &title);
    request.row_count = rows;

    match exporter.export_document(kind, request).await? {
        ExportOutcome::Delivered {
            filename,
            page_count,
        } => {
            let path = exporter.config().output_dir.join(&filename);
            println!("{} ({page_count} page(s))", path.display());
        }
        ExportOutcome::Cancelled => println!("export cancelled"),
    }
    Ok(())
}

/// Plan with the configured margins and report what would be written.
fn print_plan(config: &ExportConfig, kind: DocumentKind, args: &PlanArgs) -> Result<()> {
    let options = config.options(kind);
    let scale = args.layout.scale.unwrap_or(config.capture_scale);
    let snapshot = SnapshotProcessor::open(&args.input)?
        .flatten(config.background)
        .scale(scale)
        .into_snapshot();

    let geometry = PageGeometry::new(options.page_size, options.orientation, options.default_margins);
    let plan = compute_plan(snapshot.size(), &geometry, options.mode)?;

    let mut writer = RecordingWriter::new();
    emit(
        &mut writer,
        &snapshot,
        &plan,
        options.footer.as_ref(),
        &EmitOptions {
            mask_margins: options.mask_margins,
            background: config.background,
        },
    )?;
    info!(pages = writer.page_count(), draw_calls = writer.calls().len(), "dry run emitted");

    let json = serde_json::to_string_pretty(&plan)?;
    println!("{json}");
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("{} already exists (use --force to replace it)", path.display());
        return Ok(());
    }
    ExportConfig::default().save(path)?;
    info!(path = %path.display(), "default config written");
    println!("{}", path.display());
    Ok(())
}
