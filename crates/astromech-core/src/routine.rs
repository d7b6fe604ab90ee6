use crate::error::{AstromechError, Result};
use crate::paths::ROUTINES_KEY;
use crate::script;
use crate::storage::Storage;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

pub const DEFAULT_ROUTINE_ID: &str = "1";
pub const DEFAULT_ROUTINE_NAME: &str = "Dome Panel Wave";

// ---------------------------------------------------------------------------
// Routine
// ---------------------------------------------------------------------------

/// A named, persisted script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    /// Older clients wrote numeric ids; those are read back as strings.
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub script: String,
    /// ISO-8601, kept as written so rewrites never reformat older entries.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    /// Fields written by other clients; carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Routine {
    pub fn new(id: impl Into<String>, name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            script: script.into(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            extra: Map::new(),
        }
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "routine id must be a string or a number, got {other}"
        ))),
    }
}

/// The routine written to an empty store: a five-step pie panel wave.
pub fn default_routine() -> Result<Routine> {
    let doc = json!({
        "commands": [
            { "servo": "Pie Panel 1", "angle": 0 },
            { "delay": 500 },
            { "servo": "Pie Panel 1", "angle": 90 },
            { "delay": 500 },
            { "servo": "Pie Panel 1", "angle": 0 }
        ]
    });
    Ok(Routine::new(
        DEFAULT_ROUTINE_ID,
        DEFAULT_ROUTINE_NAME,
        script::to_canonical(&doc)?,
    ))
}

// ---------------------------------------------------------------------------
// RoutineStore
// ---------------------------------------------------------------------------

/// In-memory mirror of the persisted routine collection.
///
/// Every mutation rewrites the whole collection; the mirror only changes once
/// the write has succeeded.
#[derive(Debug)]
pub struct RoutineStore {
    storage: Storage,
    routines: Vec<Routine>,
}

impl RoutineStore {
    /// Read the persisted collection, seeding it on first use.
    ///
    /// Never fails: an unreadable or corrupt store yields an empty collection
    /// together with a `PersistenceRead` error for the caller to report.
    pub fn load(storage: Storage) -> (Self, Option<AstromechError>) {
        match read_collection(&storage) {
            Ok(Some(routines)) => (Self { storage, routines }, None),
            Ok(None) => {
                let mut store = Self {
                    storage,
                    routines: Vec::new(),
                };
                match store.seed() {
                    Ok(()) => (store, None),
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to seed routine store");
                        (store, Some(AstromechError::PersistenceRead(Box::new(e))))
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load saved routines");
                let store = Self {
                    storage,
                    routines: Vec::new(),
                };
                (store, Some(AstromechError::PersistenceRead(Box::new(e))))
            }
        }
    }

    pub fn routines(&self) -> &[Routine] {
        &self.routines
    }

    pub fn get(&self, id: &str) -> Option<&Routine> {
        self.routines.iter().find(|r| r.id == id)
    }

    /// A fresh id: the current time in Unix milliseconds, bumped past any
    /// existing entry.
    pub fn next_id(&self) -> String {
        let mut candidate = Utc::now().timestamp_millis();
        while self.get(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }

    /// Append `routine` and persist the collection.
    pub fn save(&mut self, routine: Routine) -> Result<()> {
        let mut next = self.routines.clone();
        next.push(routine);
        self.persist(&next)?;
        self.routines = next;
        Ok(())
    }

    /// Remove the routine with `id`. Returns `false` (and writes nothing) if
    /// no such routine exists.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let next: Vec<Routine> = self
            .routines
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();
        if next.len() == self.routines.len() {
            return Ok(false);
        }
        self.persist(&next)?;
        self.routines = next;
        Ok(true)
    }

    fn seed(&mut self) -> Result<()> {
        let seed = vec![default_routine()?];
        // The seed is visible even if the write fails.
        self.routines = seed.clone();
        self.persist(&seed)
    }

    fn persist(&self, routines: &[Routine]) -> Result<()> {
        let data = serde_json::to_string(routines)?;
        self.storage.set(ROUTINES_KEY, &data)?;
        tracing::debug!(count = routines.len(), "routines persisted");
        Ok(())
    }
}

fn read_collection(storage: &Storage) -> Result<Option<Vec<Routine>>> {
    match storage.get(ROUTINES_KEY)? {
        Some(data) if !data.is_empty() => Ok(Some(serde_json::from_str(&data)?)),
        _ => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
