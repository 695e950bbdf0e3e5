//! Default command: show the schedule.
//!
//! Builds the source, mounts a [`SchedulingView`] on today, replays the
//! `--month` and `--date` gestures, waits for every fetch and prints the
//! derived view.

use std::path::Path;
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use daybook_core::{DerivedView, ViewFormatter, YearMonth};
use daybook_dashboard::{FetchOutcome, SchedulingView};
use daybook_providers::{Fixture, MemorySource, ScheduleSource};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Provider id used with fixture files when none is configured.
pub const FIXTURE_PROVIDER_ID: &str = "fixture";

/// Gestures to replay before rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gestures {
    /// Month change, applied first.
    pub month: Option<YearMonth>,
    /// Day click, applied once the month's availability is known.
    pub date: Option<NaiveDate>,
}

/// The rendered outcome of a gesture replay.
#[derive(Debug)]
pub struct Replay {
    /// The view after every fetch settled.
    pub view: DerivedView,
    /// Messages about rejected gestures.
    pub notices: Vec<String>,
}

/// Runs the default command.
pub async fn run(cli: &Cli, config: &ClientConfig) -> ClientResult<()> {
    let (source, provider_id) = build_source(cli, config)?;
    let now = cli.now.unwrap_or_else(|| Local::now().naive_local());
    let gestures = Gestures {
        month: cli.month,
        date: cli.date,
    };

    let result = replay(source, provider_id, now, gestures).await;
    for notice in &result.notices {
        eprintln!("notice: {}", notice);
    }

    let formatter = ViewFormatter::new(config.display.clone());
    let output = formatter.render(&result.view, cli.output_format())?;
    println!("{}", output);
    Ok(())
}

/// Mounts a view for `now`'s day, replays `gestures` and derives the result.
pub async fn replay(
    source: Arc<dyn ScheduleSource>,
    provider_id: String,
    now: NaiveDateTime,
    gestures: Gestures,
) -> Replay {
    let mut view = SchedulingView::new(source, provider_id, now.date());
    let mut notices = Vec::new();
    let mut updates = Vec::new();

    // A click lands on the calendar page that shows the day, once that
    // page's availability is known.
    if let Some(date) = gestures.date {
        let page = YearMonth::of(date);
        view.change_month(page);
        updates.extend(view.settle().await);
        if !view.click_day(date) {
            if view.availability().is_loaded(view.provider_id(), page) {
                notices.push(format!("{} is not available and cannot be selected", date));
            } else {
                notices.push(format!("availability of {} is unknown; {} was not selected", page, date));
            }
        }
    }

    if let Some(month) = gestures.month {
        view.change_month(month);
    }

    updates.extend(view.settle().await);
    debug!(count = updates.len(), "fetches settled");

    for update in &updates {
        if let FetchOutcome::Failed(failure) = &update.outcome {
            if !failure.retryable {
                notices.push(format!(
                    "{} will not load until this is fixed: {}",
                    update.store.as_str(),
                    failure
                ));
            }
        }
    }

    Replay {
        view: view.derive(now),
        notices,
    }
}

/// Builds the schedule source and resolves the provider id.
pub fn build_source(
    cli: &Cli,
    config: &ClientConfig,
) -> ClientResult<(Arc<dyn ScheduleSource>, String)> {
    let provider_id = cli
        .provider_id
        .clone()
        .or_else(|| config.session.provider_id.clone());

    if let Some(ref path) = cli.fixture {
        let source: Arc<dyn ScheduleSource> = Arc::new(load_fixture(path)?);
        let provider_id = provider_id.unwrap_or_else(|| FIXTURE_PROVIDER_ID.to_string());
        return Ok((source, provider_id));
    }

    let provider_id = provider_id.ok_or_else(|| {
        ClientError::Config(format!(
            "provider id not set. Add to {}:\n  \
             [session]\n  \
             provider_id = \"YOUR_PROVIDER_ID\"\n\n  \
             Or pass --provider-id",
            ClientConfig::default_path().display()
        ))
    })?;

    Ok((http_source(cli, config)?, provider_id))
}

/// Loads a JSON fixture file into an in-memory source.
pub fn load_fixture(path: &Path) -> ClientResult<MemorySource> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ClientError::Config(format!("failed to read fixture {}: {}", path.display(), e))
    })?;
    let fixture = Fixture::from_json(&content)?;
    info!(
        path = %path.display(),
        months = fixture.availability.len(),
        days = fixture.appointments.len(),
        "loaded fixture"
    );
    Ok(MemorySource::from_fixture(fixture))
}

#[cfg(feature = "http")]
fn http_source(cli: &Cli, config: &ClientConfig) -> ClientResult<Arc<dyn ScheduleSource>> {
    use std::time::Duration;

    use daybook_providers::ErrorSource;
    use daybook_providers::http::{HttpConfig, HttpSource};
    use tracing::warn;

    let base_url = cli
        .base_url
        .as_deref()
        .or(config.api.base_url.as_deref())
        .ok_or_else(|| {
            ClientError::Config("api.base_url is not set (or pass --base-url)".to_string())
        })?;

    let token = match cli.token.as_deref() {
        Some(raw) => Some(crate::secret::resolve(raw)?),
        None => config.session.resolve_token()?,
    };

    let timeout = Duration::from_secs(cli.timeout.unwrap_or(config.api.timeout));
    let mut http_config = HttpConfig::new(base_url)
        .map_err(|e| ClientError::Argument(format!("invalid base URL `{}`: {}", base_url, e)))?
        .with_timeout(timeout);
    if let Some(token) = token {
        http_config = http_config.with_token(token);
    }

    // The view still comes up on a broken transport and reports it as stale.
    let source: Arc<dyn ScheduleSource> = match HttpSource::new(http_config) {
        Ok(source) => Arc::new(source),
        Err(err) => {
            warn!(error = %err, "falling back to an always-failing source");
            Arc::new(ErrorSource::new("http", err))
        }
    };
    Ok(source)
}

#[cfg(not(feature = "http"))]
fn http_source(_cli: &Cli, _config: &ClientConfig) -> ClientResult<Arc<dyn ScheduleSource>> {
    Err(ClientError::Config(
        "built without HTTP support; use --fixture".to_string(),
    ))
}
