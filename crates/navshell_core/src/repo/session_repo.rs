//! Versioned navigation-state record and its SQLite store.

use crate::db::DbError;
use crate::model::nav::{ModeId, NavigationState};
use crate::model::unit::{GroupDimension, GroupId, UnitId};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Schema version of the persisted record. Bumping it deliberately resets
/// every stored session to the default initial state.
pub const NAV_STATE_SCHEMA_VERSION: u32 = 1;

/// Session slot written by the shell. One client keeps one live session;
/// the slot key is storage-lifetime, so state survives process restarts.
pub const SESSION_SLOT: &str = "console";

pub type RepoResult<T> = Result<T, RepoError>;

/// Session store errors. These cover transport only; content problems
/// (version mismatch, undecodable payload) resolve to a discarded record.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode session payload: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// The durable navigation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedNavState {
    pub schema_version: u32,
    pub mode: ModeId,
    pub selected_group: BTreeMap<GroupDimension, Option<GroupId>>,
    pub selected_unit: Option<UnitId>,
}

impl PersistedNavState {
    /// Captures the current in-memory state at the running schema version.
    pub fn capture(state: &NavigationState) -> Self {
        Self {
            schema_version: NAV_STATE_SCHEMA_VERSION,
            mode: state.mode.clone(),
            selected_group: state.selected_group.clone(),
            selected_unit: state.selected_unit.clone(),
        }
    }

    /// Rebuilds an in-memory state candidate. Missing dimension slots are
    /// normalized to empty selections so axis additions stay restorable.
    pub fn into_state(self) -> NavigationState {
        let mut state = NavigationState::initial(self.mode);
        for (dimension, selection) in self.selected_group {
            state.selected_group.insert(dimension, selection);
        }
        state.selected_unit = self.selected_unit;
        state
    }
}

/// Store contract for the session record.
pub trait SessionRepository {
    fn save(&self, record: &PersistedNavState) -> RepoResult<()>;
    fn load(&self) -> RepoResult<Option<PersistedNavState>>;
    fn clear(&self) -> RepoResult<()>;
}

/// SQLite-backed session store.
pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
    slot: String,
}

impl<'conn> SqliteSessionRepository<'conn> {
    /// Creates a store bound to the default console slot.
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_slot(conn, SESSION_SLOT)
    }

    /// Creates a store bound to a caller-chosen slot.
    pub fn with_slot(conn: &'conn Connection, slot: &str) -> Self {
        Self {
            conn,
            slot: slot.to_string(),
        }
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn save(&self, record: &PersistedNavState) -> RepoResult<()> {
        let payload = serde_json::to_string(record).map_err(RepoError::Encode)?;
        self.conn.execute(
            "INSERT INTO nav_session (slot, schema_version, payload, updated_at)
             VALUES (?1, ?2, ?3, (strftime('%s', 'now') * 1000))
             ON CONFLICT(slot) DO UPDATE SET
                schema_version = excluded.schema_version,
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![self.slot.as_str(), record.schema_version, payload],
        )?;
        Ok(())
    }

    fn load(&self) -> RepoResult<Option<PersistedNavState>> {
        let row: Option<(u32, String)> = self
            .conn
            .query_row(
                "SELECT schema_version, payload FROM nav_session WHERE slot = ?1;",
                [self.slot.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((schema_version, payload)) = row else {
            return Ok(None);
        };

        if schema_version != NAV_STATE_SCHEMA_VERSION {
            // Known-safe default beats partial migration.
            warn!(
                "event=session_load module=repo status=discarded reason=schema_mismatch stored={} running={}",
                schema_version, NAV_STATE_SCHEMA_VERSION
            );
            return Ok(None);
        }

        match serde_json::from_str::<PersistedNavState>(&payload) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                warn!(
                    "event=session_load module=repo status=discarded reason=undecodable error={}",
                    err
                );
                Ok(None)
            }
        }
    }

    fn clear(&self) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM nav_session WHERE slot = ?1;",
            [self.slot.as_str()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        PersistedNavState, SessionRepository, SqliteSessionRepository, NAV_STATE_SCHEMA_VERSION,
    };
    use crate::db::open_db_in_memory;
    use crate::model::nav::NavigationState;
    use crate::model::unit::GroupDimension;

    fn record() -> PersistedNavState {
        let mut state = NavigationState::initial("by_work_package".to_string());
        state
            .selected_group
            .insert(GroupDimension::WorkPackage, Some("wp4".to_string()));
        state.selected_unit = Some("svc-a".to_string());
        PersistedNavState::capture(&state)
    }

    #[test]
    fn save_then_load_roundtrips_record() {
        let conn = open_db_in_memory().expect("in-memory store");
        let repo = SqliteSessionRepository::new(&conn);

        repo.save(&record()).expect("save should succeed");
        let loaded = repo.load().expect("load should succeed");
        assert_eq!(loaded, Some(record()));
    }

    #[test]
    fn load_without_record_returns_none() {
        let conn = open_db_in_memory().expect("in-memory store");
        let repo = SqliteSessionRepository::new(&conn);
        assert_eq!(repo.load().expect("load should succeed"), None);
    }

    #[test]
    fn schema_mismatch_discards_record() {
        let conn = open_db_in_memory().expect("in-memory store");
        let repo = SqliteSessionRepository::new(&conn);

        let mut stale = record();
        stale.schema_version = NAV_STATE_SCHEMA_VERSION + 1;
        // Write the stale version through the raw table to simulate an old
        // binary's record.
        let payload = serde_json::to_string(&stale).expect("encode stale record");
        conn.execute(
            "INSERT INTO nav_session (slot, schema_version, payload) VALUES ('console', ?1, ?2);",
            rusqlite::params![stale.schema_version, payload],
        )
        .expect("raw insert");

        assert_eq!(repo.load().expect("load should succeed"), None);
    }

    #[test]
    fn undecodable_payload_discards_record() {
        let conn = open_db_in_memory().expect("in-memory store");
        let repo = SqliteSessionRepository::new(&conn);
        conn.execute(
            "INSERT INTO nav_session (slot, schema_version, payload) VALUES ('console', ?1, 'not json');",
            [NAV_STATE_SCHEMA_VERSION],
        )
        .expect("raw insert");

        assert_eq!(repo.load().expect("load should succeed"), None);
    }

    #[test]
    fn save_replaces_previous_record() {
        let conn = open_db_in_memory().expect("in-memory store");
        let repo = SqliteSessionRepository::new(&conn);

        repo.save(&record()).expect("first save");
        let mut updated = record();
        updated.selected_unit = Some("svc-b".to_string());
        repo.save(&updated).expect("second save");

        assert_eq!(repo.load().expect("load"), Some(updated));
    }

    #[test]
    fn clear_removes_record() {
        let conn = open_db_in_memory().expect("in-memory store");
        let repo = SqliteSessionRepository::new(&conn);
        repo.save(&record()).expect("save");
        repo.clear().expect("clear");
        assert_eq!(repo.load().expect("load"), None);
    }

    #[test]
    fn into_state_normalizes_missing_dimension_slots() {
        let record = PersistedNavState {
            schema_version: NAV_STATE_SCHEMA_VERSION,
            mode: "by_work_package".to_string(),
            selected_group: std::collections::BTreeMap::new(),
            selected_unit: None,
        };
        let state = record.into_state();
        assert_eq!(state.selected_group.len(), GroupDimension::ALL.len());
    }
}
