//! Wait helpers for steps that poll until a condition holds.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::config::StepConfig;
use crate::error::{CoreError, Result};

/// How long to wait and how often to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSpec {
    pub timeout: Duration,
    pub polling: Duration,
}

impl WaitSpec {
    pub fn new(timeout: Duration, polling: Duration) -> Self {
        Self { timeout, polling }
    }

    pub fn from_config(config: &StepConfig) -> Self {
        Self::new(config.wait_timeout, config.wait_polling)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    Satisfied(T),
    TimedOut { attempts: u32 },
}

impl<T> WaitOutcome<T> {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied(_))
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Satisfied(value) => Some(value),
            Self::TimedOut { .. } => None,
        }
    }
}

/// Call `check` until it yields `Some`, or until the timeout elapses.
///
/// The condition is always checked at least once. Errors returned by `check`
/// stop the wait and are propagated.
pub async fn wait_until<T, E, F, Fut>(spec: WaitSpec, mut check: F) -> std::result::Result<WaitOutcome<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<Option<T>, E>>,
{
    // An unrepresentable deadline means the wait only ends on success
    let deadline = Instant::now().checked_add(spec.timeout);
    let mut attempts = 0u32;

    loop {
        attempts = attempts.saturating_add(1);
        if let Some(value) = check().await? {
            tracing::debug!(attempts, "wait condition satisfied");
            return Ok(WaitOutcome::Satisfied(value));
        }

        let now = Instant::now();
        let pause = match deadline {
            Some(deadline) if now >= deadline => {
                tracing::debug!(attempts, timeout = ?spec.timeout, "wait timed out");
                return Ok(WaitOutcome::TimedOut { attempts });
            }
            Some(deadline) => spec.polling.min(deadline - now),
            None => spec.polling,
        };
        sleep(pause).await;
    }
}

/// Parse a duration step argument.
///
/// Accepts ISO-8601 (`PT5S`, `PT1M30S`, `PT0.5S`), suffixed values
/// (`500ms`, `5s`, `2m`) and bare numbers, which are seconds.
pub fn parse_duration(text: &str) -> Result<Duration> {
    let trimmed = text.trim();
    let invalid = || CoreError::InvalidDuration(text.to_string());

    if let Some(iso) = trimmed
        .strip_prefix("PT")
        .or_else(|| trimmed.strip_prefix("pt"))
    {
        return parse_iso_time(&iso.to_uppercase()).ok_or_else(invalid);
    }

    let (number, unit) = match trimmed.find(|c: char| c.is_ascii_alphabetic()) {
        Some(pos) => trimmed.split_at(pos),
        None => (trimmed, "s"),
    };
    let value: f64 = number.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }

    let seconds = match unit.trim() {
        "ms" => value / 1000.0,
        "s" | "sec" | "secs" | "seconds" => value,
        "m" | "min" | "mins" | "minutes" => value * 60.0,
        "h" | "hours" => value * 3600.0,
        _ => return Err(invalid()),
    };
    Duration::try_from_secs_f64(seconds).map_err(|_| invalid())
}

/// Parse the time part of an ISO-8601 duration, e.g. `1H2M3.5S`.
fn parse_iso_time(text: &str) -> Option<Duration> {
    if text.is_empty() {
        return None;
    }
    let mut seconds = 0.0;
    let mut number = String::new();
    for c in text.chars() {
        match c {
            '0'..='9' | '.' => number.push(c),
            'H' | 'M' | 'S' => {
                let value: f64 = number.parse().ok()?;
                number.clear();
                seconds += match c {
                    'H' => value * 3600.0,
                    'M' => value * 60.0,
                    _ => value,
                };
            }
            _ => return None,
        }
    }
    if !number.is_empty() {
        return None;
    }
    Duration::try_from_secs_f64(seconds).ok()
}
