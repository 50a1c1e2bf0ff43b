use std::time::Duration;

use chrono::NaiveDate;

use crate::cache::{is_fresh, Reading};
use crate::database::Database;
use crate::error::{FetchError, Result};
use crate::provider::{HoroscopeSource, Provider};
use crate::render::prompt_line;
use crate::screen::Screen;
use crate::sign::Sign;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ChangeSign,
    Continue,
}

/// The user's stored sign, or a fresh pick from the list when there is none
/// or `force` is set. A pick is written back under `handle`.
pub async fn select_sign(
    db: &Database,
    screen: &mut dyn Screen,
    handle: &str,
    force: bool,
) -> Result<Option<Sign>> {
    let stored = db.user_sign(handle).await?;
    if !force {
        if let Some(sign) = stored {
            return Ok(Some(sign));
        }
    }

    let Some(sign) = screen.select_sign(&Sign::ALL, stored)? else {
        tracing::debug!("{} left the sign list without choosing", handle);
        return Ok(None);
    };

    db.set_user_sign(handle, sign).await?;
    tracing::info!("{} chose {}", handle, sign);
    Ok(Some(sign))
}

/// Today's reading for `sign`. Served from the cache when it was filled
/// today, otherwise fetched with a single request. Fetch failures are shown
/// on `screen` and yield `None` with the cache untouched.
pub async fn get_horoscope(
    db: &Database,
    source: &dyn HoroscopeSource,
    provider: &Provider,
    screen: &mut dyn Screen,
    sign: Sign,
    today: NaiveDate,
    error_timeout: Duration,
) -> Result<Option<Reading>> {
    let fresh = is_fresh(db.last_fetched().await?, today);
    if fresh {
        if let Some(reading) = db.cached_reading(sign).await? {
            tracing::debug!("cache hit for {}", sign);
            return Ok(Some(reading));
        }
    }

    let readings = match fetch(source, provider, sign).await {
        Ok(readings) => readings,
        Err(err) => {
            tracing::warn!(sign = %sign, "horoscope fetch failed: {}", err);
            screen.error(err.user_message(), error_timeout)?;
            return Ok(None);
        }
    };

    let reading = readings
        .iter()
        .find(|(s, _)| *s == sign)
        .map(|(_, reading)| reading.clone());
    tracing::info!("caching {} readings for {}", readings.len(), today);
    db.store_readings(today, readings, !fresh).await?;

    Ok(reading)
}

async fn fetch(
    source: &dyn HoroscopeSource,
    provider: &Provider,
    sign: Sign,
) -> std::result::Result<Vec<(Sign, Reading)>, FetchError> {
    let body = source.get(&provider.request_url(sign)).await?;
    provider.parse(sign, &body)
}

pub fn input_prompt(screen: &mut dyn Screen, theme: &Theme) -> Result<Action> {
    screen.write_lines(&[String::new(), prompt_line(theme)])?;
    match screen.read_key()? {
        '!' => Ok(Action::ChangeSign),
        _ => Ok(Action::Continue),
    }
}
