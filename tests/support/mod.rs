#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use horoscope_menu::error::{FetchError, Result};
use horoscope_menu::provider::{HoroscopeSource, Provider};
use horoscope_menu::screen::Screen;
use horoscope_menu::sign::Sign;

pub fn single_sign() -> Provider {
    Provider::SingleSign {
        url_template: "http://horoscope.test/h.json?sign={sign}".into(),
    }
}

pub fn all_signs() -> Provider {
    Provider::AllSigns {
        url: "http://horoscope.test/all.json".into(),
    }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
}

pub fn single_body(text: &str) -> String {
    serde_json::json!({ "horoscope": { "horoscope": text, "sign": "whatever" } }).to_string()
}

pub fn zodiac_body() -> String {
    let mut table = serde_json::Map::new();
    for sign in Sign::ALL {
        table.insert(
            sign.title(),
            serde_json::json!({
                "daily": format!("{sign} today"),
                "weekly": format!("{sign} this week"),
                "monthly": format!("{sign} this month"),
            }),
        );
    }
    serde_json::Value::Object(table).to_string()
}

pub enum Reply {
    Body(String),
    Refused,
}

/// Replays canned replies in order and records every requested URL.
pub struct StubSource {
    replies: Mutex<VecDeque<Reply>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubSource {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HoroscopeSource for StubSource {
    async fn get(&self, url: &str) -> std::result::Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Refused) => Err(FetchError::Transport(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))),
            None => panic!("unexpected request to {url}"),
        }
    }
}

/// Terminal stand-in: scripted picks and keys, everything written is kept.
#[derive(Default)]
pub struct FakeScreen {
    pub picks: VecDeque<Option<Sign>>,
    pub keys: VecDeque<char>,
    pub select_calls: usize,
    pub last_current: Option<Sign>,
    pub lines: Vec<String>,
    pub errors: Vec<String>,
    pub pages: usize,
    pub clears: usize,
}

impl FakeScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn picking(mut self, pick: Option<Sign>) -> Self {
        self.picks.push_back(pick);
        self
    }

    pub fn pressing(mut self, key: char) -> Self {
        self.keys.push_back(key);
        self
    }

    pub fn output(&self) -> String {
        self.lines.join("\n")
    }
}

impl Screen for FakeScreen {
    fn width(&self) -> usize {
        80
    }

    fn height(&self) -> usize {
        24
    }

    fn select_sign(&mut self, signs: &[Sign], current: Option<Sign>) -> Result<Option<Sign>> {
        assert_eq!(signs.len(), 12);
        self.select_calls += 1;
        self.last_current = current;
        Ok(self
            .picks
            .pop_front()
            .unwrap_or_else(|| panic!("sign list shown without a scripted pick")))
    }

    fn clear(&mut self) -> Result<()> {
        self.clears += 1;
        Ok(())
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        self.lines.extend(lines.iter().cloned());
        Ok(())
    }

    fn page(&mut self, lines: &[String]) -> Result<()> {
        self.pages += 1;
        self.write_lines(lines)
    }

    fn error(&mut self, message: &str, _timeout: Duration) -> Result<()> {
        self.errors.push(message.to_string());
        Ok(())
    }

    fn read_key(&mut self) -> Result<char> {
        Ok(self
            .keys
            .pop_front()
            .unwrap_or_else(|| panic!("key read without a scripted key")))
    }
}
