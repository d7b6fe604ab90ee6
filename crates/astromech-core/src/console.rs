//! Scripting console: the operator's draft buffer plus the routine store.
//!
//! Every action settles its own outcome into a single notice slot. The most
//! recent failure replaces whatever was there; nothing propagates past the
//! action except the returned `Result`.

use crate::client::BackendClient;
use crate::error::{AstromechError, Result};
use crate::routine::{Routine, RoutineStore};
use crate::runner;
use crate::script::{self, Script};
use crate::storage::Storage;

#[derive(Debug)]
pub struct Console {
    store: RoutineStore,
    /// Draft script text.
    pub script_input: String,
    /// Draft routine name.
    pub routine_name: String,
    error: Option<String>,
}

impl Console {
    /// Load the routine store. A load failure becomes the initial notice.
    pub fn open(storage: Storage) -> Self {
        let (store, load_error) = RoutineStore::load(storage);
        Self {
            store,
            script_input: String::new(),
            routine_name: String::new(),
            error: load_error.map(|e| e.to_string()),
        }
    }

    pub fn routines(&self) -> &[Routine] {
        self.store.routines()
    }

    pub fn routine(&self, id: &str) -> Option<&Routine> {
        self.store.get(id)
    }

    /// Current notice, if the last failing action has not been superseded.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Pretty-print the draft. The draft is untouched on failure.
    pub fn format(&mut self) -> Result<()> {
        let result = script::format(&self.script_input);
        let formatted = self.settle(result)?;
        self.script_input = formatted;
        Ok(())
    }

    /// Validate the draft and store it as a new routine.
    ///
    /// The name is checked before the script. On success both drafts are
    /// cleared and the stored routine is returned.
    pub fn save(&mut self) -> Result<Routine> {
        let result = self.build_routine().and_then(|routine| {
            self.store.save(routine.clone())?;
            Ok(routine)
        });
        let routine = self.settle(result)?;
        tracing::debug!(id = %routine.id, name = %routine.name, "routine saved");
        self.routine_name.clear();
        self.script_input.clear();
        Ok(routine)
    }

    fn build_routine(&self) -> Result<Routine> {
        let name = self.routine_name.trim();
        if name.is_empty() {
            return Err(AstromechError::MissingName);
        }
        let parsed = script::parse_and_validate(&self.script_input)?;
        let text = script::to_canonical(parsed.document())?;
        Ok(Routine::new(self.store.next_id(), name, text))
    }

    /// Remove a routine. Unknown ids are not an error.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let result = self.store.delete(id);
        match result {
            Ok(removed) => Ok(removed),
            Err(e) => Err(self.record(e)),
        }
    }

    /// Load a routine into the drafts as a copy: same script, name suffixed
    /// with `(Copy)`.
    pub fn edit(&mut self, id: &str) -> Result<()> {
        let Some(routine) = self.store.get(id) else {
            return Err(self.record(AstromechError::RoutineNotFound(id.to_string())));
        };
        self.script_input = routine.script.clone();
        self.routine_name = format!("{} (Copy)", routine.name);
        Ok(())
    }

    /// Validate and submit arbitrary script text.
    pub fn run(&mut self, client: &BackendClient, script_text: &str) -> Result<Script> {
        let result = runner::run(client, script_text);
        self.settle(result)
    }

    /// Submit a stored routine's script.
    pub fn run_routine(&mut self, client: &BackendClient, id: &str) -> Result<Script> {
        let Some(routine) = self.store.get(id) else {
            return Err(self.record(AstromechError::RoutineNotFound(id.to_string())));
        };
        let text = routine.script.clone();
        self.run(client, &text)
    }

    // -----------------------------------------------------------------------
    // Notice slot
    // -----------------------------------------------------------------------

    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        match result {
            Ok(v) => {
                self.error = None;
                Ok(v)
            }
            Err(e) => Err(self.record(e)),
        }
    }

    fn record(&mut self, e: AstromechError) -> AstromechError {
        tracing::warn!(error = %e, "console action failed");
        self.error = Some(e.to_string());
        e
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
