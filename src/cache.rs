use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::channel::Channel;

pub const CACHE_KEY: &str = "subscriptionsCache";
pub const DEFAULT_TTL_MS: i64 = 30 * 60 * 1000;

/// Single-slot store for the last successful extraction.
pub struct ResultCache {
    conn: Connection,
    ttl_ms: i64,
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub timestamp: i64,
    pub data: Vec<Channel>,
}

impl CacheEntry {
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.timestamp
    }
}

impl ResultCache {
    pub fn open(path: &Path, ttl_ms: i64) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
        }
        let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        Self::with_connection(conn, ttl_ms)
    }

    pub fn in_memory(ttl_ms: i64) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, ttl_ms)
    }

    fn with_connection(conn: Connection, ttl_ms: i64) -> Result<Self> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS cache (
                key       TEXT PRIMARY KEY,
                timestamp INTEGER NOT NULL,
                data      TEXT NOT NULL
            );
            ",
        )?;
        Ok(Self { conn, ttl_ms })
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Cached list, if written no longer than the TTL ago.
    pub fn read(&self) -> Result<Option<Vec<Channel>>> {
        self.read_at(now_ms())
    }

    pub fn read_at(&self, now_ms: i64) -> Result<Option<Vec<Channel>>> {
        let Some(entry) = self.entry()? else {
            return Ok(None);
        };
        if entry.age_ms(now_ms) > self.ttl_ms {
            return Ok(None);
        }
        Ok(Some(entry.data))
    }

    /// Overwrite the slot. Expired entries are only ever replaced here.
    pub fn write(&self, channels: &[Channel]) -> Result<()> {
        self.write_at(channels, now_ms())
    }

    pub fn write_at(&self, channels: &[Channel], now_ms: i64) -> Result<()> {
        let data = serde_json::to_string(channels)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO cache (key, timestamp, data) VALUES (?1, ?2, ?3)",
            rusqlite::params![CACHE_KEY, now_ms, data],
        )?;
        Ok(())
    }

    /// Raw slot contents regardless of age.
    pub fn entry(&self) -> Result<Option<CacheEntry>> {
        let row: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT timestamp, data FROM cache WHERE key = ?1",
                rusqlite::params![CACHE_KEY],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((timestamp, data)) = row else {
            return Ok(None);
        };
        let data: Vec<Channel> =
            serde_json::from_str(&data).context("Cached subscription list is not valid JSON")?;
        Ok(Some(CacheEntry { timestamp, data }))
    }
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
