//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Engine components call store methods — they never execute SQL directly.

use crate::{client::ClientRecord, error::EngineResult};
use rusqlite::{params, Connection, OptionalExtension};

mod bureau;
mod product;
mod recommendation;

pub struct EngineStore {
    conn: Connection,
}

impl EngineStore {
    /// Open (or create) the engine database at `path`.
    pub fn open(path: &str) -> EngineResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EngineResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> EngineResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    // ── Clients ────────────────────────────────────────────────

    pub fn insert_client(&self, c: &ClientRecord) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO clients (
                id, first_name, surname, id_number, date_of_birth,
                phone, email, primary_interest, owns_car, owns_home
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                &c.id,
                &c.first_name,
                &c.surname,
                &c.id_number,
                &c.date_of_birth,
                &c.phone,
                &c.email,
                &c.primary_interest,
                c.owns_car,
                c.owns_home,
            ],
        )?;
        Ok(())
    }

    pub fn get_client(&self, id: &str) -> EngineResult<Option<ClientRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, surname, id_number, date_of_birth,
                    phone, email, primary_interest, owns_car, owns_home
             FROM clients WHERE id = ?1",
        )?;
        let row = stmt
            .query_row(params![id], map_client_row)
            .optional()?;
        Ok(row)
    }

    /// Every client with a non-empty declared interest, in insertion order.
    /// The background processor's work list.
    pub fn clients_with_interest(&self) -> EngineResult<Vec<ClientRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, surname, id_number, date_of_birth,
                    phone, email, primary_interest, owns_car, owns_home
             FROM clients
             WHERE primary_interest IS NOT NULL AND primary_interest != ''
             ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map([], map_client_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn client_count(&self) -> EngineResult<i64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM clients", [], |r| r.get(0))?;
        Ok(n)
    }
}

fn map_client_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClientRecord> {
    Ok(ClientRecord {
        id: row.get(0)?,
        first_name: row.get(1)?,
        surname: row.get(2)?,
        id_number: row.get(3)?,
        date_of_birth: row.get(4)?,
        phone: row.get(5)?,
        email: row.get(6)?,
        primary_interest: row.get(7)?,
        owns_car: row.get(8)?,
        owns_home: row.get(9)?,
    })
}
