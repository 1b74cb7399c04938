use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use fk_core::{CollaboratorError, Persistence, Target, TargetFlags};

use crate::error::{Result, StoreError};
use crate::schema;

/// One SQLite database holding both the persisted key-value metadata
/// (including the managed token list) and every target's flag string.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // --- Metadata ---

    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM metadata WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // --- Target flags ---

    /// A target's raw flag string; `""` when it was never written.
    pub fn get_target_flags(&self, target: Target) -> Result<String> {
        let flags = self
            .conn
            .query_row(
                "SELECT flags FROM target_flags WHERE target = ?1",
                [target.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(flags.unwrap_or_default())
    }

    pub fn set_target_flags(&self, target: Target, flags: &str) -> Result<()> {
        if target.is_unknown() {
            return Err(StoreError::InvalidData(
                "refusing to store flags for the unknown target".into(),
            ));
        }
        self.conn.execute(
            "INSERT OR REPLACE INTO target_flags (target, flags) VALUES (?1, ?2)",
            params![target.as_str(), flags],
        )?;
        Ok(())
    }

    /// Every stored target with its flag string, in target order.
    pub fn list_target_flags(&self) -> Result<Vec<(Target, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT target, flags FROM target_flags")?;
        let rows: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<_, _>>()?;

        let mut out = Vec::with_capacity(rows.len());
        for (name, flags) in rows {
            let target = name
                .parse::<Target>()
                .map_err(|e| StoreError::InvalidData(e.to_string()))?;
            out.push((target, flags));
        }
        out.sort_by_key(|(target, _)| *target);
        Ok(out)
    }
}

impl Persistence for Store {
    fn get_string(&self, key: &str) -> std::result::Result<Option<String>, CollaboratorError> {
        Ok(self.get_metadata(key)?)
    }

    fn set_string(&self, key: &str, value: &str) -> std::result::Result<(), CollaboratorError> {
        Ok(self.set_metadata(key, value)?)
    }
}

impl TargetFlags for Store {
    fn get_flags(&self, target: Target) -> std::result::Result<String, CollaboratorError> {
        Ok(self.get_target_flags(target)?)
    }

    fn set_flags(&self, target: Target, flags: &str) -> std::result::Result<(), CollaboratorError> {
        Ok(self.set_target_flags(target, flags)?)
    }
}
