//! siteprobe 命令行入口
//! 读取本地 HTML 文件（或配合 --fetch 拉取远程页面），执行内置检测规则，
//! 以文本或 JSON 形式输出报告
//!
//! 运行命令：
//! cargo run --features="cli" -- page.html --location https://example.com/ --global jQuery
//! cargo run --features="cli remote-fetch" -- https://example.com/ --fetch --json

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use env_logger::{Builder, Env, Target};
use serde::Serialize;

use siteprobe::{
    CustomConfigBuilder, DetectorConfig, DetectorEngine, DetectorReport, PageSnapshot, ProbeResult,
};

#[derive(Debug, Parser)]
#[command(name = "siteprobe", version, about = "Detect front-end frameworks, CMS and servers behind a page")]
struct Args {
    /// HTML 文件路径；配合 --fetch 时为页面 URL
    input: String,

    /// 页面地址，用于解析相对脚本/样式地址
    #[arg(long)]
    location: Option<String>,

    /// 声明页面上存在的全局标识（可重复，例如 --global jQuery --global React）
    #[arg(long = "global", value_name = "NAME")]
    globals: Vec<String>,

    /// 报告中 generator 字段读取的 meta 名称
    #[arg(long)]
    meta_name: Option<String>,

    /// 报告中脚本预览的数量上限
    #[arg(long)]
    preview_limit: Option<usize>,

    /// 以 JSON 输出
    #[arg(long)]
    json: bool,

    /// 将 INPUT 视为 URL 并远程拉取
    #[arg(long)]
    fetch: bool,
}

/// 一次 CLI 运行的完整输出
#[derive(Debug, Serialize)]
struct CliReport {
    #[serde(flatten)]
    report: DetectorReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    important_headers: Vec<(String, String)>,
}

/// 加载得到的页面：快照加（远程拉取时的）重要 Header
struct LoadedPage {
    snapshot: PageSnapshot,
    important_headers: Vec<(String, String)>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args);

    let page = if args.fetch {
        load_remote(&args, &config).await?
    } else {
        load_local(&args, &config).await?
    };
    let snapshot = page.snapshot.with_globals(args.globals.iter().cloned());

    let engine = DetectorEngine::with_builtin_rules();
    let report = CliReport {
        report: DetectorReport::build(&engine, &snapshot, &config),
        important_headers: page.important_headers,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }
    Ok(())
}

fn build_config(args: &Args) -> DetectorConfig {
    let mut builder = CustomConfigBuilder::new();
    if let Some(name) = &args.meta_name {
        builder = builder.meta_name(name.clone());
    }
    if let Some(limit) = args.preview_limit {
        builder = builder.script_preview_limit(limit);
    }
    builder.build()
}

async fn load_local(args: &Args, config: &DetectorConfig) -> ProbeResult<LoadedPage> {
    let path = PathBuf::from(&args.input);
    let html = tokio::fs::read_to_string(&path).await?;
    log::info!("Loaded {} ({} bytes)", path.display(), html.len());

    let snapshot = PageSnapshot::from_html_with_config(&html, args.location.as_deref(), config)?;
    Ok(LoadedPage {
        snapshot,
        important_headers: Vec::new(),
    })
}

#[cfg(feature = "remote-fetch")]
async fn load_remote(args: &Args, config: &DetectorConfig) -> ProbeResult<LoadedPage> {
    use siteprobe::{HeaderConverter, RemoteOptions, RemotePageFetcher};

    let fetcher = RemotePageFetcher::new(RemoteOptions::default())?;
    let page = fetcher.fetch(&args.input).await?;
    log::info!("Fetched {} (status {})", page.final_url, page.status);

    let location = args.location.as_deref().unwrap_or(&page.final_url);
    let snapshot = PageSnapshot::from_html_with_config(&page.body, Some(location), config)?;
    Ok(LoadedPage {
        snapshot,
        important_headers: HeaderConverter::important_headers(&page.headers),
    })
}

#[cfg(not(feature = "remote-fetch"))]
async fn load_remote(args: &Args, _config: &DetectorConfig) -> ProbeResult<LoadedPage> {
    Err(siteprobe::SiteProbeError::FeatureDisabled(format!(
        "cannot fetch {}: rebuild with the remote-fetch feature",
        args.input
    )))
}

fn print_text(report: &CliReport) {
    let page = &report.report;

    println!("=== Page Info ===");
    println!("URL:       {}", if page.url.is_empty() { "-" } else { page.url.as_str() });
    println!("Title:     {}", page.title.as_deref().unwrap_or("-"));
    println!("Generator: {}", page.generator.as_deref().unwrap_or("-"));
    println!("Scripts:   {}", page.scripts.len());
    for src in &page.scripts {
        println!("  {}", src);
    }

    println!();
    println!("=== Detected Frameworks / Libraries ===");
    if page.results.is_empty() {
        println!("None detected");
    } else {
        for result in &page.results {
            println!("- {}", result);
        }
    }

    if !report.important_headers.is_empty() {
        println!();
        println!("=== Important Headers ===");
        for (name, value) in &report.important_headers {
            println!("{}: {}", name, value);
        }
    }
}
