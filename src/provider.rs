use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::cache::Reading;
use crate::error::FetchError;
use crate::sign::Sign;

/// Where a horoscope comes from and how its JSON is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    /// One request per sign, `{"horoscope": {"horoscope": "..."}}`.
    SingleSign { url_template: String },
    /// One request for the whole zodiac, an object keyed by sign with
    /// `daily`, `weekly` and `monthly` strings.
    AllSigns { url: String },
}

impl Provider {
    pub fn request_url(&self, sign: Sign) -> String {
        match self {
            Provider::SingleSign { url_template } => url_template.replace("{sign}", sign.as_str()),
            Provider::AllSigns { url } => url.clone(),
        }
    }

    /// Extracts every reading the response carries. The requested sign is
    /// always among them.
    pub fn parse(&self, sign: Sign, body: &str) -> Result<Vec<(Sign, Reading)>, FetchError> {
        let json: Value = serde_json::from_str(body).map_err(FetchError::Malformed)?;
        match self {
            Provider::SingleSign { .. } => {
                let text = json["horoscope"]["horoscope"]
                    .as_str()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .ok_or_else(|| FetchError::InvalidResponse("horoscope.horoscope".into()))?;
                Ok(vec![(sign, Reading::daily_only(text))])
            }
            Provider::AllSigns { .. } => parse_all_signs(sign, &json),
        }
    }
}

fn parse_all_signs(wanted: Sign, json: &Value) -> Result<Vec<(Sign, Reading)>, FetchError> {
    let entries = json
        .as_object()
        .ok_or_else(|| FetchError::InvalidResponse("sign table".into()))?;

    let mut readings = Vec::new();
    for (key, entry) in entries {
        let Ok(sign) = key.parse::<Sign>() else {
            tracing::debug!("skipping unknown key {} in response", key);
            continue;
        };
        let Some(daily) = entry["daily"].as_str().filter(|d| !d.trim().is_empty()) else {
            tracing::debug!("skipping {} without daily text", sign);
            continue;
        };
        readings.push((
            sign,
            Reading {
                daily: daily.trim().to_string(),
                weekly: entry["weekly"].as_str().map(|s| s.trim().to_string()),
                monthly: entry["monthly"].as_str().map(|s| s.trim().to_string()),
            },
        ));
    }

    if !readings.iter().any(|(sign, _)| *sign == wanted) {
        return Err(FetchError::InvalidResponse(format!("{wanted}.daily")));
    }
    Ok(readings)
}

/// Raw body fetch, separated so the menu can run against a stub.
#[async_trait]
pub trait HoroscopeSource: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, FetchError>;
}

fn build_user_agent() -> HeaderMap {
    let agent = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(agent));
    headers
}

pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .default_headers(build_user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HoroscopeSource for HttpSource {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("GET {}", url);
        let response_text = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(response_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single() -> Provider {
        Provider::SingleSign {
            url_template: "http://h.example/horoscope.json?sign={sign}".into(),
        }
    }

    fn all() -> Provider {
        Provider::AllSigns {
            url: "http://h.example/all.json".into(),
        }
    }

    #[test]
    fn single_sign_url_substitutes_sign() {
        assert_eq!(
            single().request_url(Sign::Scorpio),
            "http://h.example/horoscope.json?sign=scorpio"
        );
        assert_eq!(all().request_url(Sign::Scorpio), "http://h.example/all.json");
    }

    #[test]
    fn single_sign_extracts_nested_field() {
        let body = r#"{"horoscope": {"horoscope": " Stars align. ", "sign": "leo"}}"#;
        let readings = single().parse(Sign::Leo, body).unwrap();
        assert_eq!(readings, vec![(Sign::Leo, Reading::daily_only("Stars align."))]);
    }

    #[test]
    fn single_sign_missing_field_is_invalid() {
        let err = single().parse(Sign::Leo, r#"{"horoscope": {}}"#).unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(_)));

        let err = single().parse(Sign::Leo, r#"[1, 2]"#).unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(_)));
    }

    #[test]
    fn unparseable_body_is_malformed() {
        let err = single().parse(Sign::Leo, "<html>busy</html>").unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
        assert!(matches!(
            all().parse(Sign::Leo, "").unwrap_err(),
            FetchError::Malformed(_)
        ));
    }

    #[test]
    fn all_signs_reads_every_known_sign() {
        let body = r#"{
            "Aries": {"daily": "a-d", "weekly": "a-w", "monthly": "a-m"},
            "leo": {"daily": "l-d"},
            "ophiuchus": {"daily": "?"},
            "pisces": {"weekly": "no daily"}
        }"#;
        let mut readings = all().parse(Sign::Leo, body).unwrap();
        readings.sort_by_key(|(sign, _)| sign.as_str());
        assert_eq!(
            readings,
            vec![
                (
                    Sign::Aries,
                    Reading {
                        daily: "a-d".into(),
                        weekly: Some("a-w".into()),
                        monthly: Some("a-m".into()),
                    }
                ),
                (Sign::Leo, Reading::daily_only("l-d")),
            ]
        );
    }

    #[test]
    fn blank_text_is_invalid() {
        let body = r#"{"horoscope": {"horoscope": "  \n "}}"#;
        assert!(matches!(
            single().parse(Sign::Leo, body).unwrap_err(),
            FetchError::InvalidResponse(_)
        ));

        let body = r#"{"leo": {"daily": " "}, "aries": {"daily": "a"}}"#;
        match all().parse(Sign::Leo, body) {
            Err(FetchError::InvalidResponse(what)) => assert_eq!(what, "leo.daily"),
            other => panic!("expected invalid response, got {other:?}"),
        }
    }

    #[test]
    fn all_signs_without_requested_sign_is_invalid() {
        let body = r#"{"aries": {"daily": "a"}}"#;
        match all().parse(Sign::Virgo, body) {
            Err(FetchError::InvalidResponse(what)) => assert_eq!(what, "virgo.daily"),
            other => panic!("expected invalid response, got {other:?}"),
        }
    }
}
