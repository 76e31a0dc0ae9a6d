use anyhow::Context;
use clap::Parser;
use log::error;
use rfenhance::{ChartRenderer, EmbeddedConfigRenderer, EnhancerConfig, NoopChartRenderer, Page};
use std::io::Write;
use std::path::PathBuf;

/// Run the page-ready enhancement on a rendered report page.
#[derive(Parser, Debug)]
#[command(name = "rfenhance", version, about)]
struct Cli {
    /// HTML file to enhance (a URL when --url is given)
    input: String,

    /// Fetch INPUT over HTTP instead of reading a file
    #[arg(long)]
    url: bool,

    /// Base URL used to resolve navigation targets
    #[arg(long)]
    base_url: Option<String>,

    /// Write the enhanced HTML here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Click the first element matching SELECTOR after the page is ready (repeatable)
    #[arg(long = "click", value_name = "SELECTOR")]
    clicks: Vec<String>,

    /// Clamp numeric scores into [0, 100]
    #[arg(long)]
    clamp_scores: bool,

    /// Treat malformed chart JSON as empty series
    #[arg(long)]
    lenient_chart_json: bool,

    /// Store the chart config JSON in the chart host's data-chart-config attribute
    #[arg(long)]
    embed_chart: bool,

    /// Print a JSON report (tasks and navigations) to stderr
    #[arg(long)]
    report: bool,
}

fn load_page(cli: &Cli, config: EnhancerConfig) -> anyhow::Result<Page> {
    if cli.url {
        #[cfg(feature = "fetch")]
        {
            return Ok(Page::load_url(&cli.input, config)?);
        }
        #[cfg(not(feature = "fetch"))]
        {
            anyhow::bail!("--url requires the `fetch` feature");
        }
    }

    let html = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input))?;
    Ok(Page::from_html(&html, cli.base_url.as_deref(), config)?)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = EnhancerConfig {
        clamp_scores: cli.clamp_scores,
        lenient_chart_json: cli.lenient_chart_json,
        ..Default::default()
    };
    let mut page = load_page(&cli, config)?;

    let renderer: Box<dyn ChartRenderer> = if cli.embed_chart {
        Box::new(EmbeddedConfigRenderer)
    } else {
        Box::new(NoopChartRenderer)
    };

    // A chart failure leaves the other tasks applied; still write the page.
    let ready = page.on_ready(renderer.as_ref());
    if let Err(e) = &ready {
        error!("page-ready tasks did not complete: {}", e);
    }

    for selector in &cli.clicks {
        page.click(selector)
            .with_context(|| format!("click on {} failed", selector))?;
    }

    let html = page.html();
    match &cli.output {
        Some(path) => std::fs::write(path, html)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            out.write_all(html.as_bytes())?;
            out.flush()?;
        }
    }

    if cli.report {
        let report = serde_json::json!({
            "tasks": page.report(),
            "navigations": page.navigations(),
            "location": page.location(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }

    ready?;
    Ok(())
}
