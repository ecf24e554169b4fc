use std::io::Write as _;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slidecast::{
    CaptureMethodKind, Category, Encoder, EncoderSource, ExportConfig, ExportOverrides,
    ProjectFile, RunSummary, SlidecastError,
    browser::chrome::find_chrome,
    guide::guide_path,
    interactive::Menu,
    library::{LISTING_LIMIT, list_exports, render_listing},
};

#[derive(Parser, Debug)]
#[command(
    name = "slidecast",
    version,
    about = "Export animated Arctic slide backgrounds to looping MP4 videos"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export background videos (requires `ffmpeg` and Chromium).
    Export(ExportArgs),
    /// Export still frames only (requires Chromium).
    Still(StillArgs),
    /// List files in the output directory.
    List(ListArgs),
    /// Check that the encoder, the browser and the slide files are available.
    Check(SourceArgs),
    /// Guided, menu-driven export.
    Interactive(SourceArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Directory slide paths are resolved against.
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// JSON project file with default settings and an optional slide catalog.
    #[arg(long)]
    project: Option<PathBuf>,

    /// Chromium/Chrome executable (auto-detected when omitted).
    #[arg(long)]
    chrome: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SelectArgs {
    /// Export classic-style slides only.
    #[arg(long, conflicts_with = "modern_only")]
    classic_only: bool,

    /// Export modern-style slides only.
    #[arg(long)]
    modern_only: bool,
}

impl SelectArgs {
    fn category(&self) -> Option<Category> {
        if self.classic_only {
            Some(Category::Classic)
        } else if self.modern_only {
            Some(Category::Modern)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MethodArg {
    /// Timed screenshots into a frame directory, encoded afterwards.
    Screenshot,
    /// Frames piped straight into the encoder.
    Stream,
}

impl From<MethodArg> for CaptureMethodKind {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Screenshot => CaptureMethodKind::Screenshot,
            MethodArg::Stream => CaptureMethodKind::Stream,
        }
    }
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    select: SelectArgs,

    /// Resolution preset (hd|fhd|uhd|presentation).
    #[arg(long)]
    resolution: Option<String>,

    /// Quality preset (low|medium|high|ultra).
    #[arg(long)]
    quality: Option<String>,

    /// Clip duration in seconds.
    #[arg(long)]
    duration: Option<u64>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Skip still frame export.
    #[arg(long, default_value_t = false)]
    no_stills: bool,

    /// Skip the animation restart before capture.
    #[arg(long, default_value_t = false)]
    no_sync: bool,

    /// Capture strategy.
    #[arg(long, value_enum)]
    method: Option<MethodArg>,
}

#[derive(Args, Debug)]
struct StillArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    select: SelectArgs,

    /// Resolution preset (hd|fhd|uhd|presentation).
    #[arg(long)]
    resolution: Option<String>,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Directory to list (defaults to the configured output directory).
    dir: Option<PathBuf>,

    /// JSON project file providing the output directory.
    #[arg(long)]
    project: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Still(args) => cmd_still(args),
        Command::List(args) => cmd_list(args),
        Command::Check(args) => cmd_check(args),
        Command::Interactive(args) => cmd_interactive(args),
    };
    if let Err(e) = &result {
        print_hints(e);
    }
    result
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_hints(err: &anyhow::Error) {
    let Some(err) = err.downcast_ref::<SlidecastError>() else {
        return;
    };
    eprintln!();
    eprintln!("Troubleshooting:");
    for (i, hint) in err.hints().iter().enumerate() {
        eprintln!("{}. {hint}", i + 1);
    }
}

fn load_config(project: Option<&Path>) -> anyhow::Result<ExportConfig> {
    let cfg = ExportConfig::default();
    let Some(path) = project else {
        return Ok(cfg);
    };
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(ProjectFile::from_path(path)?.apply(cfg, root))
}

fn source_overrides(src: &SourceArgs) -> ExportOverrides {
    ExportOverrides {
        base_dir: src.base_dir.clone(),
        output_dir: src.out_dir.clone(),
        chrome_path: src.chrome.clone(),
        ..ExportOverrides::default()
    }
}

fn report(summary: &RunSummary) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    write!(out, "{summary}")?;
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let overrides = ExportOverrides {
        resolution: args.resolution.clone(),
        quality: args.quality.clone(),
        duration_secs: args.duration,
        fps: args.fps,
        only: args.select.category(),
        no_stills: args.no_stills,
        no_sync: args.no_sync,
        method: args.method.map(CaptureMethodKind::from),
        ..source_overrides(&args.source)
    };
    let cfg = load_config(args.source.project.as_deref())?.with_overrides(&overrides);

    let summary = slidecast::run_export(&cfg)?;
    report(&summary)?;
    println!("Usage guide: {}", guide_path(&cfg.output_dir).display());
    Ok(())
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let overrides = ExportOverrides {
        resolution: args.resolution.clone(),
        only: args.select.category(),
        ..source_overrides(&args.source)
    };
    let cfg = load_config(args.source.project.as_deref())?.with_overrides(&overrides);
    let summary = slidecast::run_stills(&cfg)?;
    report(&summary)
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let dir = match args.dir {
        Some(dir) => dir,
        None => load_config(args.project.as_deref())?.output_dir,
    };
    let entries = list_exports(&dir);
    print!("{}", render_listing(&dir, &entries, LISTING_LIMIT));
    Ok(())
}

fn cmd_check(args: SourceArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.project.as_deref())?.with_overrides(&source_overrides(&args));
    let mut missing = Vec::new();

    match Encoder::locate(cfg.bundled_ffmpeg.as_deref()) {
        Ok(enc) => {
            let source = match enc.source() {
                EncoderSource::System => "system",
                EncoderSource::Bundled => "bundled",
            };
            println!("ffmpeg:   ok ({source}, {})", enc.program().display());
        }
        Err(e) => {
            println!("ffmpeg:   MISSING ({e})");
            missing.push("ffmpeg");
        }
    }

    match find_chrome(cfg.chrome_path.as_deref()) {
        Ok(path) => println!("chromium: ok ({})", path.display()),
        Err(e) => {
            println!("chromium: MISSING ({e})");
            missing.push("chromium");
        }
    }

    println!("slides in {}:", cfg.base_dir.display());
    for slide in cfg.selected_slides() {
        let path = slide.source_path(&cfg.base_dir);
        let state = if path.is_file() { "ok" } else { "missing" };
        println!("  {state:<7} {} ({})", slide.name, path.display());
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SlidecastError::dependency(format!("missing: {}", missing.join(", "))).into())
    }
}

fn cmd_interactive(args: SourceArgs) -> anyhow::Result<()> {
    let base = load_config(args.project.as_deref())?.with_overrides(&source_overrides(&args));
    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    let mut menu = Menu::new(stdin, stdout);
    menu.run(&base, &mut |cfg| slidecast::run_export(cfg))?;
    Ok(())
}
