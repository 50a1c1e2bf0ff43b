use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use clap::Parser;

pub mod cache;
pub mod calendar;
pub mod config;
pub mod database;
pub mod error;
pub mod menu;
pub mod provider;
pub mod render;
pub mod screen;
pub mod sign;
pub mod theme;

use config::Config;
use database::Database;
use error::{Error, Result};
use menu::{get_horoscope, input_prompt, select_sign, Action};
use provider::{HoroscopeSource, HttpSource, Provider};
use render::horoscope_lines;
use screen::{ConsoleScreen, Screen};
use theme::Theme;

#[derive(Parser, Debug)]
#[clap(about, version)]
pub struct Args {
    /// Handle the chosen sign is stored under
    #[clap(short, long, env = "USER", default_value = "guest")]
    pub user: String,

    /// TOML settings file
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    #[clap(short, long, default_value = "horoscope.sqlite")]
    pub db_path: String,

    /// Pick a new sign before showing anything
    #[clap(long)]
    pub change: bool,

    #[clap(long)]
    pub no_pager: bool,

    #[clap(long)]
    pub no_color: bool,
}

impl Args {
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path),
            None => Ok(Config::default()),
        }
    }
}

pub struct Menu<S: Screen> {
    pub db: Database,
    pub source: Box<dyn HoroscopeSource>,
    pub provider: Provider,
    pub screen: S,
    pub theme: Theme,
    pub handle: String,
    pub timezone: Tz,
    pub pager: bool,
    pub error_timeout: Duration,
    pub force_select: bool,
}

impl<S: Screen> Menu<S> {
    /// Select, fetch, show, prompt. `!` at the prompt goes round again with
    /// a forced selection; anything else ends the run.
    pub async fn run(&mut self) -> Result<()> {
        let mut force = self.force_select;

        loop {
            let sign = match select_sign(&self.db, &mut self.screen, &self.handle, force).await? {
                Some(sign) => sign,
                None if force => match self.db.user_sign(&self.handle).await? {
                    Some(sign) => sign,
                    None => return Ok(()),
                },
                None => return Ok(()),
            };

            let today = calendar::today(self.timezone);
            let reading = get_horoscope(
                &self.db,
                self.source.as_ref(),
                &self.provider,
                &mut self.screen,
                sign,
                today,
                self.error_timeout,
            )
            .await?;
            let Some(reading) = reading else {
                return Ok(());
            };

            let lines = horoscope_lines(sign, &reading, &self.theme, self.screen.width());
            self.screen.clear()?;
            if self.pager {
                self.screen.page(&lines)?;
            } else {
                self.screen.write_lines(&lines)?;
            }

            match input_prompt(&mut self.screen, &self.theme)? {
                Action::ChangeSign => force = true,
                Action::Continue => return Ok(()),
            }
        }
    }
}

/// Builds the terminal menu from `args` and `config` and runs it once.
pub async fn start(args: Args, config: Config) -> Result<()> {
    let provider = config.provider()?;
    let timezone = config.timezone()?;
    let theme = Theme::from_config(&config.theme, !args.no_color)?;
    let source = HttpSource::new(config.request_timeout()).map_err(Error::Fetch)?;

    let db = Database::open(&args.db_path).await?;
    tracing::debug!("opened {}", args.db_path);

    let mut menu = Menu {
        db: db.clone(),
        source: Box::new(source),
        provider,
        screen: ConsoleScreen::new(theme.clone()),
        theme,
        handle: args.user,
        timezone,
        pager: config.display.pager && !args.no_pager,
        error_timeout: config.error_timeout(),
        force_select: args.change,
    };

    let res = menu.run().await;
    drop(menu);

    if let Err(e) = db.close().await {
        tracing::warn!("failed to close database: {}", e);
    }
    res
}
