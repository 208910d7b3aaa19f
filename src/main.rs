use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hrb::config::ENV_TIMEOUT_SECS;
use hrb::{ClientConfig, DebugCollector, HttpRequestBuilder, RequestContext};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// hrb - HTTP request builder
///
/// Send one HTTP request and decode the `{"success": ..., "data": ...}` envelope
/// the server answers with. Server errors (5xx) exit with a failure; client
/// errors (4xx) are printed like any other response.
///
/// Examples:
///   hrb get https://api.example.com/v1/items -q page=1
///   hrb post https://api.example.com/v1/items --json '{"name":"test"}'
#[derive(Parser, Debug)]
#[command(author, version = env!("HRB_VERSION"), about)]
struct Cli {
    /// HTTP method
    #[arg(value_enum, value_name = "METHOD")]
    method: MethodArg,

    /// Target URL
    #[arg(value_name = "URL")]
    url: String,

    /// Query parameter, may be repeated
    #[arg(short = 'q', long = "query", value_name = "KEY=VALUE", value_parser = parse_query)]
    query: Vec<(String, String)>,

    /// Request header, may be repeated
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// JSON request body
    #[arg(long = "json", value_name = "JSON")]
    json: Option<String>,

    /// Request timeout in seconds
    #[arg(short = 't', long = "timeout", env = ENV_TIMEOUT_SECS, value_name = "SECS")]
    timeout: Option<f64>,

    /// Accept bodies that do not decode into the envelope
    #[arg(long)]
    lenient: bool,

    /// Print the raw body without decoding
    #[arg(long)]
    raw: bool,

    /// Print the diagnostic report as JSON on stderr
    #[arg(long)]
    trace: bool,

    /// Log request and response lines at debug level (also via HRB_LOG_TRAFFIC)
    #[arg(long)]
    log_traffic: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum MethodArg {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<MethodArg> for Method {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Get => Method::GET,
            MethodArg::Post => Method::POST,
            MethodArg::Put => Method::PUT,
            MethodArg::Patch => Method::PATCH,
            MethodArg::Delete => Method::DELETE,
        }
    }
}

fn parse_query(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", s))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    match s.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME:VALUE, got {:?}", s)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("Failed to load configuration")?;
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("Invalid timeout: {}", secs))?;
    }
    if cli.lenient {
        config.strict_decoding = false;
    }
    config.log_traffic = config.log_traffic || cli.log_traffic;

    run(cli, config).await
}

async fn run(cli: Cli, config: ClientConfig) -> Result<()> {
    let collector = Arc::new(DebugCollector::new());

    let mut request = HttpRequestBuilder::<Value>::configured(
        cli.method.into(),
        RequestContext::background(),
        cli.url,
        &config,
    )?
    .set_headers(cli.headers)
    .set_query_params(cli.query)
    .with_diagnostics(collector.clone());

    if let Some(json) = &cli.json {
        let body: Value = serde_json::from_str(json).context("Invalid --json body")?;
        request = request.set_json_body(&body);
    }

    let outcome = if cli.raw {
        request.execute().await.map(|()| {
            if let Some(response) = request.last_response() {
                eprintln!("{}", response.status);
                println!("{}", response.text());
            }
        })
    } else {
        request.get_result().await.map(|response| {
            eprintln!("{}", response.status);
            match serde_json::to_string_pretty(&response.result) {
                Ok(text) => println!("{}", text),
                Err(e) => eprintln!("Failed to render envelope: {}", e),
            }
        })
    };

    if cli.trace {
        eprintln!("{}", serde_json::to_string_pretty(&collector.report())?);
    }

    if let Err(e) = outcome {
        if let Some(response) = request.last_response().filter(|r| !r.body.is_empty()) {
            eprintln!("{}", response.text());
        }
        return Err(e.into());
    }
    Ok(())
}
