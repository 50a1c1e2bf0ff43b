use chrono::NaiveDate;
use tokio_rusqlite::{params, Connection, OptionalExtension};

use crate::cache::Reading;
use crate::calendar::{format_marker, parse_marker};
use crate::sign::Sign;

const LAST_FETCHED: &str = "last_fetched";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        handle TEXT PRIMARY KEY,
        sign TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS horoscope (
        sign TEXT PRIMARY KEY,
        daily TEXT NOT NULL,
        weekly TEXT,
        monthly TEXT
    );
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );";

/// Handle on the `users` and `horoscope` tables plus the shared fetch marker.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    pub async fn open(db_path: &str) -> tokio_rusqlite::Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::init(conn).await
    }

    pub async fn open_in_memory() -> tokio_rusqlite::Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> tokio_rusqlite::Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    pub async fn close(self) -> tokio_rusqlite::Result<()> {
        self.conn.close().await
    }

    pub async fn user_sign(&self, handle: &str) -> tokio_rusqlite::Result<Option<Sign>> {
        let handle = handle.to_string();
        let stored: Option<String> = self
            .conn
            .call(move |conn| {
                let sign = conn
                    .query_row(
                        "SELECT sign FROM users WHERE handle = ?",
                        params![handle],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(sign)
            })
            .await?;

        Ok(stored.and_then(|s| match s.parse() {
            Ok(sign) => Some(sign),
            Err(err) => {
                tracing::warn!("ignoring stored sign: {}", err);
                None
            }
        }))
    }

    pub async fn set_user_sign(&self, handle: &str, sign: Sign) -> tokio_rusqlite::Result<()> {
        let handle = handle.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO users (handle, sign) VALUES (?, ?)
                     ON CONFLICT(handle) DO UPDATE SET sign = excluded.sign",
                    params![handle, sign.as_str()],
                )?;
                Ok(())
            })
            .await
    }

    pub async fn last_fetched(&self) -> tokio_rusqlite::Result<Option<NaiveDate>> {
        let marker: Option<String> = self
            .conn
            .call(|conn| {
                let value = conn
                    .query_row(
                        "SELECT value FROM meta WHERE key = ?",
                        params![LAST_FETCHED],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(value)
            })
            .await?;

        Ok(marker.as_deref().and_then(parse_marker))
    }

    pub async fn cached_reading(&self, sign: Sign) -> tokio_rusqlite::Result<Option<Reading>> {
        self.conn
            .call(move |conn| {
                let reading = conn
                    .query_row(
                        "SELECT daily, weekly, monthly FROM horoscope WHERE sign = ?",
                        params![sign.as_str()],
                        |row| {
                            Ok(Reading {
                                daily: row.get(0)?,
                                weekly: row.get(1)?,
                                monthly: row.get(2)?,
                            })
                        },
                    )
                    .optional()?;
                Ok(reading)
            })
            .await
    }

    /// Writes `readings` and moves the marker to `date` in one transaction.
    /// With `replace_all`, readings from earlier days are dropped first.
    pub async fn store_readings(
        &self,
        date: NaiveDate,
        readings: Vec<(Sign, Reading)>,
        replace_all: bool,
    ) -> tokio_rusqlite::Result<()> {
        let marker = format_marker(date);
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                if replace_all {
                    tx.execute("DELETE FROM horoscope", [])?;
                }
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO horoscope (sign, daily, weekly, monthly) VALUES (?, ?, ?, ?)
                         ON CONFLICT(sign) DO UPDATE SET
                            daily = excluded.daily,
                            weekly = excluded.weekly,
                            monthly = excluded.monthly",
                    )?;
                    for (sign, reading) in &readings {
                        stmt.execute(params![
                            sign.as_str(),
                            reading.daily,
                            reading.weekly,
                            reading.monthly
                        ])?;
                    }
                }
                tx.execute(
                    "INSERT INTO meta (key, value) VALUES (?, ?)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![LAST_FETCHED, marker],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await
    }

    #[cfg(test)]
    pub(crate) async fn cached_signs(&self) -> tokio_rusqlite::Result<Vec<String>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT sign FROM horoscope ORDER BY sign")?;
                let rows = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(rows)
            })
            .await
    }

    #[cfg(test)]
    pub(crate) async fn put_raw_user_sign(
        &self,
        handle: &str,
        sign: &str,
    ) -> tokio_rusqlite::Result<()> {
        let (handle, sign) = (handle.to_string(), sign.to_string());
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO users (handle, sign) VALUES (?, ?)",
                    params![handle, sign],
                )?;
                Ok(())
            })
            .await
    }
}
