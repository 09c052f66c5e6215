use crate::{
    discover::discover,
    pipeline::Pipeline,
    printer::PrintOptions,
    render::RedocRenderer,
    report::RunSummary,
    tools::ToolPaths,
    util::{ensure_dir, now_rfc3339},
};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "openapi2pdf")]
#[command(about = "Batch-convert OpenAPI YAML/JSON specs to PDF (ReDoc + headless browser / wkhtmltopdf)")]
pub struct Args {
    /// Source folder containing .yaml/.yml/.json specs.
    #[arg(long, required_unless_present = "doctor")]
    pub src: Option<PathBuf>,

    /// Output folder for the generated PDFs.
    #[arg(long, default_value = "./pdf")]
    pub out: PathBuf,

    /// Horizontal page layout.
    #[arg(long)]
    pub landscape: bool,

    /// Page margin; applies to the wkhtmltopdf backend only (headless
    /// browser printing has no margin flag).
    #[arg(long, default_value = "12mm")]
    pub margin: String,

    /// Recurse into subfolders; the output tree mirrors the source tree.
    #[arg(long)]
    pub recursive: bool,

    /// Keep the generated HTML next to the PDFs.
    #[arg(long)]
    pub keep_html: bool,

    /// Explicit Chrome/Edge/Chromium executable.
    #[arg(long)]
    pub chrome_path: Option<PathBuf>,

    /// Explicit wkhtmltopdf executable.
    #[arg(long)]
    pub wkhtml_path: Option<PathBuf>,

    /// Extra arguments forwarded verbatim to redoc-cli, whitespace-separated.
    #[arg(long)]
    pub redoc_args: Option<String>,

    /// Per-subprocess timeout in seconds.
    #[arg(long, default_value_t = 300)]
    pub timeout: u64,

    /// Print the resolved tool locations as JSON and exit.
    #[arg(long)]
    pub doctor: bool,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Runs the whole batch. The returned code is the process exit code:
/// 0 = every job converted (or nothing to do), 1 = at least one job failed.
pub fn dispatch(args: Args) -> Result<i32> {
    init_logging(&args.log_level)?;

    let tools = ToolPaths::locate(args.chrome_path.as_deref(), args.wkhtml_path.as_deref());

    if args.doctor {
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(0);
    }

    let src = args
        .src
        .as_deref()
        .ok_or_else(|| anyhow!("--src is required"))?;

    let specs = discover(src, args.recursive)?;
    if specs.is_empty() {
        info!("no .yaml/.yml/.json specs found in {}", src.display());
        let summary = RunSummary::new(now_rfc3339(), now_rfc3339(), Vec::new());
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(0);
    }
    info!("found {} spec file(s) in {}", specs.len(), src.display());

    ensure_dir(&args.out)?;

    let timeout = Duration::from_secs(args.timeout);
    let extra_args: Vec<String> = args
        .redoc_args
        .as_deref()
        .map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    let renderer = RedocRenderer::new(&tools, extra_args, timeout);
    let backends = tools.backends(timeout);
    let pipeline = Pipeline::new(
        renderer,
        backends,
        args.out.clone(),
        PrintOptions {
            landscape: args.landscape,
            margin: args.margin.clone(),
        },
        args.keep_html,
    );

    let summary = pipeline.run(&specs).context("running conversion batch")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(if summary.all_ok() { 0 } else { 1 })
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;
    Ok(())
}
