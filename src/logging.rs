use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tasklane_config::{LogType, MainConfig};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str =
    "tasklane=info,tasklane_db=info,tasklane_cache=info,tower_http=warn,sqlx=warn";

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();

    info!(
        request_id = %request_id,
        method = %method,
        path = %matched_path,
        "Incoming request"
    );

    let response = next.run(req).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    match status {
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms,
            "Client error"
        ),
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms,
            "Server error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms,
            "Request completed"
        ),
    }

    response
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber for the configured sink.
///
/// `FILE` writes plain text to `log_file` and JSON next to it with a `.json`
/// extension. The returned guards flush those writers and must live until exit.
pub fn init_tracing(config: &MainConfig) -> anyhow::Result<Vec<WorkerGuard>> {
    match config.log_type {
        LogType::Console => {
            let console_layer = fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .compact()
                .with_filter(env_filter());

            tracing_subscriber::registry()
                .with(console_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;

            Ok(Vec::new())
        }
        LogType::File => {
            let (dir, text_name, json_name) = log_file_names(&config.log_file)?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let (text_writer, text_guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, text_name));
            let (json_writer, json_guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, json_name));

            let file_layer = fmt::layer()
                .with_writer(text_writer)
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_filter(env_filter());

            let json_layer = fmt::layer()
                .json()
                .with_writer(json_writer)
                .with_current_span(true)
                .with_span_list(true)
                .with_filter(env_filter());

            tracing_subscriber::registry()
                .with(file_layer)
                .with(json_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;

            Ok(vec![text_guard, json_guard])
        }
    }
}

/// Splits `storage/logs/app.log` into its directory, `app.log` and `app.json`.
fn log_file_names(path: &Path) -> anyhow::Result<(std::path::PathBuf, String, String)> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Log file path {} has no file name", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name);

    Ok((dir, file_name.to_string(), format!("{stem}.json")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_log_file_names_split_directory_and_json_sibling() {
        let (dir, text, json) = log_file_names(Path::new("storage/logs/tasklane.log")).unwrap();

        assert_eq!(dir, PathBuf::from("storage/logs"));
        assert_eq!(text, "tasklane.log");
        assert_eq!(json, "tasklane.json");
    }

    #[test]
    fn test_bare_file_name_logs_to_current_directory() {
        let (dir, text, _) = log_file_names(Path::new("app.log")).unwrap();

        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(text, "app.log");
    }

    #[test]
    fn test_directory_only_path_is_rejected() {
        assert!(log_file_names(Path::new("/")).is_err());
    }
}
