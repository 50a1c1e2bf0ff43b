use std::io::Write;
use std::time::Duration;

use chrono_tz::Tz;
use clap::Parser;

use horoscope_menu::config::Config;
use horoscope_menu::error::{ConfigError, Error};
use horoscope_menu::provider::Provider;
use horoscope_menu::Args;

fn write_temp_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn loads_full_config_file() {
    let file = write_temp_config(
        r#"
[provider]
kind = "all_signs"
url = "https://stars.example/today.json"
timeout_secs = 4

[cache]
timezone = "America/Chicago"

[display]
pager = true
error_timeout_secs = 1

[theme]
border = "magenta"
highlight = "black_on_bright_yellow"
text = "white"

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = Config::load(file.path()).unwrap();

    assert_eq!(
        config.provider().unwrap(),
        Provider::AllSigns {
            url: "https://stars.example/today.json".into()
        }
    );
    assert_eq!(config.timezone().unwrap(), Tz::America__Chicago);
    assert_eq!(config.request_timeout(), Duration::from_secs(4));
    assert_eq!(config.error_timeout(), Duration::from_secs(1));
    assert!(config.display.pager);
    assert_eq!(config.theme.border, "magenta");
    assert_eq!(config.theme.heading, "bright_blue");
    assert_eq!(config.logging.format, "json");
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(&dir.path().join("nope.toml"));
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn zero_timeout_is_rejected() {
    let file = write_temp_config("[provider]\ntimeout_secs = 0\n");
    match Config::load(file.path()) {
        Err(Error::Config(ConfigError::InvalidValue { field, .. })) => {
            assert_eq!(field, "provider.timeout_secs")
        }
        other => panic!("expected invalid timeout, got {other:?}"),
    }
}

#[test]
fn args_without_config_use_defaults() {
    let args = Args::parse_from(["horoscope-menu", "--user", "erin", "--no-pager"]);
    assert_eq!(args.user, "erin");
    assert_eq!(args.db_path, "horoscope.sqlite");
    assert!(args.no_pager);
    assert!(!args.change);

    let config = args.load_config().unwrap();
    assert!(matches!(
        config.provider().unwrap(),
        Provider::SingleSign { .. }
    ));
}
