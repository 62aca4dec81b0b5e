//! Batch classification.
//!
//! Classifies every input given on the command line, or every line read from
//! stdin, and writes one JSON line per input. Inputs are classified
//! concurrently but results are written in input order.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::config::Config;
use crate::detector::Detector;
use crate::error_handling::PredictError;
use crate::model::ModelBundle;
use crate::request::PredictRequest;

/// Summary of a classification run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Inputs classified or rejected (blank and comment lines excluded)
    pub total: usize,
    pub phishing: usize,
    pub legitimate: usize,
    /// Inputs that produced an error line
    pub failed: usize,
    pub elapsed_seconds: f64,
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassifiedInput {
    fn failed(url: Option<String>, err: &PredictError) -> Self {
        Self {
            url,
            prediction: None,
            score: None,
            verdict: None,
            error: Some(err.public_message()),
        }
    }

    pub fn is_phishing(&self) -> bool {
        self.verdict == Some("phishing")
    }
}

/// Turns one input line into a request.
///
/// Blank lines and `#` comments yield `None`. A line starting with `{` is a
/// JSON request object; anything else is a bare URL.
pub fn parse_input_line(line: &str) -> Option<Result<PredictRequest, PredictError>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    if trimmed.starts_with('{') {
        Some(PredictRequest::from_json(trimmed))
    } else {
        Some(Ok(PredictRequest::new(trimmed)))
    }
}

/// Classifies one input line.
pub async fn classify_input(detector: &Detector, input: &str) -> Option<ClassifiedInput> {
    let request = match parse_input_line(input)? {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Skipping malformed input ({}): {}", e.kind(), e);
            return Some(ClassifiedInput::failed(None, &e));
        }
    };
    let url = match request.url() {
        Ok(url) => url.to_string(),
        Err(e) => return Some(ClassifiedInput::failed(None, &e)),
    };

    let classified = match detector.predict_url(&url).await {
        Ok(result) => ClassifiedInput {
            verdict: Some(if detector.is_phishing(&result) {
                "phishing"
            } else {
                "legitimate"
            }),
            url: Some(url),
            prediction: Some(result.label),
            score: result.score,
            error: None,
        },
        Err(e) => {
            log::error!("Failed to classify {} ({}): {}", url, e.kind(), e);
            ClassifiedInput::failed(Some(url), &e)
        }
    };
    Some(classified)
}

/// Classifies `inputs` with at most `max_concurrency` in flight and writes one
/// JSON line per classified input to `out`, in input order.
pub async fn classify_stream<S, W>(
    detector: &Detector,
    inputs: S,
    max_concurrency: usize,
    out: &mut W,
) -> Result<RunReport>
where
    S: Stream<Item = String>,
    W: AsyncWrite + Unpin,
{
    let start = Instant::now();
    let mut report = RunReport::default();
    let results = inputs
        .map(|line| async move { classify_input(detector, &line).await })
        .buffered(max_concurrency.max(1));
    futures::pin_mut!(results);

    while let Some(result) = results.next().await {
        let Some(classified) = result else {
            continue;
        };
        report.total += 1;
        if classified.error.is_some() {
            report.failed += 1;
        } else if classified.is_phishing() {
            report.phishing += 1;
        } else {
            report.legitimate += 1;
        }

        let mut line = serde_json::to_string(&classified).context("Failed to serialize result")?;
        line.push('\n');
        out.write_all(line.as_bytes())
            .await
            .context("Failed to write result")?;
    }
    out.flush().await.context("Failed to flush output")?;

    report.elapsed_seconds = start.elapsed().as_secs_f64();
    Ok(report)
}

fn reads_stdin(urls: &[String]) -> bool {
    urls.is_empty() || (urls.len() == 1 && urls[0] == "-")
}

/// Loads the bundle named by `config` and classifies the configured inputs,
/// writing results to stdout.
///
/// # Errors
///
/// Fails if the bundle cannot be loaded, the HTTP client cannot be built or
/// stdout cannot be written.
pub async fn run_classification(config: Config) -> Result<RunReport> {
    let bundle = load_bundle(&config.bundle)?;
    let detector = Detector::new(bundle, &config).context("Failed to initialize detector")?;
    let mut stdout = tokio::io::stdout();

    if reads_stdin(&config.urls) {
        log::info!("Reading URLs from stdin");
        let lines = BufReader::new(tokio::io::stdin()).lines();
        let inputs = stream::unfold(lines, |mut lines| async move {
            match lines.next_line().await {
                Ok(Some(line)) => Some((line, lines)),
                Ok(None) => None,
                Err(e) => {
                    log::warn!("Failed to read line from stdin: {e}");
                    None
                }
            }
        });
        classify_stream(&detector, inputs, config.max_concurrency, &mut stdout).await
    } else {
        let inputs = stream::iter(config.urls.clone());
        classify_stream(&detector, inputs, config.max_concurrency, &mut stdout).await
    }
}

fn load_bundle(path: &Path) -> Result<Arc<ModelBundle>> {
    let bundle = ModelBundle::load(path)
        .with_context(|| format!("Failed to load model bundle from {}", path.display()))?;
    Ok(Arc::new(bundle))
}
