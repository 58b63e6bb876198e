use crate::event::DetectionEvent;
use rusqlite::{params, Connection, Result};
use std::path::Path;

/// History of confirmed detections.
pub struct DetectionStore {
    conn: Connection,
}

impl DetectionStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS detections (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp INTEGER NOT NULL,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                energy REAL NOT NULL,
                variance REAL NOT NULL,
                peak_count INTEGER NOT NULL,
                device_id TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn insert(&self, event: &DetectionEvent) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO detections (timestamp, latitude, longitude, energy, variance, peak_count, device_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                event.timestamp as i64,
                event.latitude,
                event.longitude,
                event.energy as f64,
                event.variance as f64,
                event.peak_count,
                event.device_id
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<DetectionEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, latitude, longitude, energy, variance, peak_count, device_id
             FROM detections ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(DetectionEvent {
                timestamp: row.get::<_, i64>(0)? as u64,
                latitude: row.get(1)?,
                longitude: row.get(2)?,
                energy: row.get::<_, f64>(3)? as f32,
                variance: row.get::<_, f64>(4)? as f32,
                peak_count: row.get(5)?,
                device_id: row.get(6)?,
            })
        })?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }

    pub fn count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM detections", [], |row| row.get::<_, i64>(0))
            .map(|n| n as u64)
    }
}
