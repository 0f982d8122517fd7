use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thrive_sentiment::analysis::{
    sorted_for_display, AnalysisError, AnalysisResult, ColumnRoleMap, GroupBreakdown,
    ReviewAnalyzer, ReviewTable, Sentiment,
};
use thrive_sentiment::config::{AppConfig, SummarizerConfig, SummarizerProvider};
use thrive_sentiment::error::AppError;
use thrive_sentiment::summarize::{GeminiClient, OfflineSummarizer, Summarizer};
use thrive_sentiment::telemetry;
use tracing::info;

type SharedSummarizer = Arc<dyn Summarizer + Send + Sync>;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    summarizer: SharedSummarizer,
}

#[derive(Parser, Debug)]
#[command(
    name = "Thrive Sentiment Reporter",
    about = "Analyze employee review exports and serve workplace sentiment reports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Analyze a review CSV export and print the report
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Review CSV export to analyze
    #[arg(long)]
    csv: PathBuf,
    /// Restrict the analysis to one department slice
    #[arg(long)]
    department: Option<String>,
    /// Restrict the analysis to one employment-status slice
    #[arg(long)]
    status: Option<String>,
    /// Append per-department and per-status report sections
    #[arg(long)]
    breakdown: bool,
    /// Use the deterministic offline summarizer instead of the configured one
    #[arg(long)]
    offline: bool,
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    /// Raw CSV content of the review export
    csv: String,
    #[serde(default)]
    breakdown: bool,
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    generated_at: DateTime<Local>,
    result: AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    department_slices: Option<Vec<SliceReport>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_slices: Option<Vec<SliceReport>>,
}

#[derive(Debug, Serialize)]
struct SliceReport {
    key: String,
    result: AnalysisResult,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Report(args) => run_report(args),
    }
}

fn build_summarizer(config: &SummarizerConfig) -> Result<SharedSummarizer, AppError> {
    match config.provider {
        SummarizerProvider::Gemini => {
            let client = GeminiClient::from_config(config).map_err(AppError::Summarizer)?;
            Ok(Arc::new(client))
        }
        SummarizerProvider::Offline => Ok(Arc::new(OfflineSummarizer::new())),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let summarizer = build_summarizer(&config.summarizer)?;
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        summarizer,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/reviews/analyze", post(analyze_endpoint))
        .layer(prometheus_layer)
        .with_state(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "review sentiment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn analyze_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let summarizer = state.summarizer.clone();
    // The engine and its collaborator client block; keep them off the async
    // worker threads.
    let response = tokio::task::spawn_blocking(move || build_analysis(summarizer, payload))
        .await
        .map_err(AppError::Runtime)??;

    Ok(Json(response))
}

fn build_analysis(
    summarizer: SharedSummarizer,
    request: AnalyzeRequest,
) -> Result<AnalyzeResponse, AnalysisError> {
    let table = ReviewTable::from_reader(Cursor::new(request.csv.into_bytes()))?;
    let analyzer = ReviewAnalyzer::new(summarizer);
    let result = analyzer.analyze_table(&table)?;

    let (department_slices, status_slices) = if request.breakdown {
        let roles = ColumnRoleMap::resolve(table.columns())?;
        (
            Some(slice_reports(&analyzer, &table, roles.department)?),
            Some(slice_reports(&analyzer, &table, roles.status)?),
        )
    } else {
        (None, None)
    };

    Ok(AnalyzeResponse {
        generated_at: Local::now(),
        result,
        department_slices,
        status_slices,
    })
}

/// Re-run the engine once per distinct value of `column`, lexically sorted
/// the way the original report pages listed them.
fn slice_reports<S: Summarizer>(
    analyzer: &ReviewAnalyzer<S>,
    table: &ReviewTable,
    column: Option<usize>,
) -> Result<Vec<SliceReport>, AnalysisError> {
    let Some(column) = column else {
        return Ok(Vec::new());
    };

    let mut values = table.distinct_values(column);
    values.sort();

    let mut reports = Vec::with_capacity(values.len());
    for value in values {
        let slice = table.slice_by(column, &value);
        if slice.is_empty() {
            continue;
        }
        reports.push(SliceReport {
            result: analyzer.analyze_table(&slice)?,
            key: value,
        });
    }

    Ok(reports)
}

fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        csv,
        department,
        status,
        breakdown,
        offline,
    } = args;

    let summarizer: SharedSummarizer = if offline {
        Arc::new(OfflineSummarizer::new())
    } else {
        let config = AppConfig::load()?;
        build_summarizer(&config.summarizer)?
    };

    let file = std::fs::File::open(&csv)?;
    let mut table = ReviewTable::from_reader(file).map_err(AnalysisError::Csv)?;
    let roles = ColumnRoleMap::resolve(table.columns())
        .map_err(AnalysisError::Schema)?;

    if let Some(wanted) = department {
        match roles.department {
            Some(column) => table = table.slice_by(column, &wanted),
            None => println!("note: no department column found; ignoring --department"),
        }
    }
    if let Some(wanted) = status {
        match roles.status {
            Some(column) => table = table.slice_by(column, &wanted),
            None => println!("note: no status column found; ignoring --status"),
        }
    }

    let analyzer = ReviewAnalyzer::new(summarizer);
    let result = analyzer.analyze_table(&table)?;
    render_report(&csv.display().to_string(), &result, Local::now());

    if breakdown {
        for report in slice_reports(&analyzer, &table, roles.department)? {
            render_slice("Department", &report);
        }
        for report in slice_reports(&analyzer, &table, roles.status)? {
            render_slice("Status", &report);
        }
    }

    Ok(())
}

fn render_report(source: &str, result: &AnalysisResult, generated_at: DateTime<Local>) {
    println!("Thrive sentiment report");
    println!(
        "Generated on {} at {}",
        generated_at.format("%B %d, %Y"),
        generated_at.format("%H:%M:%S")
    );
    println!("Source: {source}");

    println!(
        "\nOverall sentiment ({} review{})",
        result.overall.total,
        if result.overall.total == 1 { "" } else { "s" }
    );
    for sentiment in Sentiment::ordered() {
        println!(
            "- {}: {} ({:.1}%)",
            sentiment.label(),
            result.overall.count(sentiment),
            result.overall.percentage(sentiment)
        );
    }

    render_groups("Sentiment by department", &result.departments);
    render_groups("Sentiment by tenure", &result.statuses);

    println!("\nPros");
    println!("{}", result.pros_summary);
    if result.key_pros.is_empty() {
        println!("\nKey pros: none");
    } else {
        println!("\nKey pros");
        for theme in &result.key_pros {
            println!("- {}: {}", theme.title, theme.description);
        }
    }

    println!("\nAreas for improvement");
    println!("{}", result.cons_summary);
    if result.key_cons.is_empty() {
        println!("\nKey areas for improvement: none");
    } else {
        println!("\nKey areas for improvement");
        for theme in &result.key_cons {
            println!("- {}: {}", theme.title, theme.description);
        }
    }
}

fn render_groups(heading: &str, groups: &[GroupBreakdown]) {
    if groups.is_empty() {
        println!("\n{heading}: none");
        return;
    }

    println!("\n{heading}");
    for group in sorted_for_display(groups) {
        println!(
            "- {}: {} review{} ({} positive / {} neutral / {} negative)",
            group.key,
            group.summary.total,
            if group.summary.total == 1 { "" } else { "s" },
            group.summary.counts.positive,
            group.summary.counts.neutral,
            group.summary.counts.negative
        );
    }
}

fn render_slice(kind: &str, report: &SliceReport) {
    println!("\n{kind}: {}", report.key);
    for sentiment in Sentiment::ordered() {
        println!(
            "- {}: {} ({:.1}%)",
            sentiment.label(),
            report.result.overall.count(sentiment),
            report.result.overall.percentage(sentiment)
        );
    }
    println!("Pros: {}", report.result.pros_summary);
    println!("Areas for improvement: {}", report.result.cons_summary);
}
