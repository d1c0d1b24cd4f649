use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::{
    foundation::error::{MenuGraphError, MenuGraphResult},
    graph::model::{ParamHandle, ParamKind, ParamValue, ParameterDecl},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One named, typed parameter of the shared table.
pub struct ParameterEntry {
    pub name: String,
    pub kind: ParamKind,
    /// Persist the value across sessions.
    pub saved: bool,
    pub default: f32,
}

impl ParameterEntry {
    pub fn new(name: impl Into<String>, kind: ParamKind, saved: bool, default: f32) -> Self {
        Self {
            name: name.into(),
            kind,
            saved,
            default,
        }
    }

    pub fn handle(&self) -> ParamHandle {
        ParamHandle::new(self.name.clone(), self.kind)
    }

    /// Default as a typed graph value.
    pub fn default_value(&self) -> ParamValue {
        match self.kind {
            ParamKind::Bool => ParamValue::Bool(self.default > 0.5),
            ParamKind::Int => ParamValue::Int(self.default.round() as i32),
            ParamKind::Float => ParamValue::Float(self.default),
        }
    }

    pub fn declaration(&self) -> ParameterDecl {
        ParameterDecl {
            name: self.name.clone(),
            kind: self.kind,
            default: self.default_value(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What [`ParameterTable::define`] did.
pub enum DefineOutcome {
    Created,
    /// The old entry was deleted and a new one appended.
    Redefined,
    Reused,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Canonical registry of named parameters consumed by the compiled graph.
///
/// Holds at most one entry per name. Entries are kept in definition order.
pub struct ParameterTable {
    #[serde(default)]
    pub entries: Vec<ParameterEntry>,
}

impl ParameterTable {
    pub fn from_reader<R: std::io::Read>(r: R) -> MenuGraphResult<Self> {
        let table: Self = serde_json::from_reader(r)
            .map_err(|e| MenuGraphError::serde(format!("parse parameter table JSON: {e}")))?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> MenuGraphResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MenuGraphError::validation(format!(
                "open parameter table JSON '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_writer<W: std::io::Write>(&self, w: W) -> MenuGraphResult<()> {
        serde_json::to_writer_pretty(w, self)
            .map_err(|e| MenuGraphError::serde(format!("serialize parameter table: {e}")))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> MenuGraphResult<()> {
        let path = path.as_ref();
        let f = File::create(path).map_err(|e| {
            MenuGraphError::validation(format!(
                "create parameter table JSON '{}': {e}",
                path.display()
            ))
        })?;
        self.to_writer(BufWriter::new(f))
    }

    /// Reject tables holding two entries with the same name.
    pub fn validate(&self) -> MenuGraphResult<()> {
        let mut seen = std::collections::HashSet::new();
        for e in &self.entries {
            if !seen.insert(e.name.as_str()) {
                return Err(MenuGraphError::validation(format!(
                    "parameter '{}' is defined more than once",
                    e.name
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ParameterEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `entry`, replacing a differing definition by delete + append.
    pub fn define(&mut self, entry: ParameterEntry) -> DefineOutcome {
        match self.entries.iter().position(|e| e.name == entry.name) {
            Some(i) if self.entries[i] == entry => DefineOutcome::Reused,
            Some(i) => {
                self.entries.remove(i);
                self.entries.push(entry);
                DefineOutcome::Redefined
            }
            None => {
                self.entries.push(entry);
                DefineOutcome::Created
            }
        }
    }

    /// Delete every entry under `prefix` whose name `keep` rejects. Returns the removed names.
    pub fn prune(&mut self, prefix: &str, keep: impl Fn(&str) -> bool) -> Vec<String> {
        let mut removed = Vec::new();
        self.entries.retain(|e| {
            if e.name.starts_with(prefix) && !keep(&e.name) {
                removed.push(e.name.clone());
                return false;
            }
            true
        });
        removed
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Parameters requested during the run.
    pub used: usize,
    pub created: usize,
    pub redefined: usize,
    pub pruned: Vec<String>,
}

/// Run-scoped view of a [`ParameterTable`]: tracks which names the run touched.
///
/// Acquisition mutates the table immediately.
pub struct ParameterSession<'t> {
    table: &'t mut ParameterTable,
    prefix: String,
    used: BTreeMap<String, ParameterEntry>,
    created: usize,
    redefined: usize,
}

impl<'t> ParameterSession<'t> {
    /// Open a session. Only entries under `prefix` are ever pruned.
    pub fn new(table: &'t mut ParameterTable, prefix: impl Into<String>) -> Self {
        Self {
            table,
            prefix: prefix.into(),
            used: BTreeMap::new(),
            created: 0,
            redefined: 0,
        }
    }

    /// Look up, create or redefine `entry` and mark it used.
    ///
    /// A second request for the same name in one run never touches the table again; asking for a
    /// different definition of an already requested name is an identity error.
    pub fn acquire(&mut self, entry: ParameterEntry) -> MenuGraphResult<ParamHandle> {
        if let Some(prev) = self.used.get(&entry.name) {
            if *prev != entry {
                return Err(MenuGraphError::identity(format!(
                    "parameter '{}' requested twice with different definitions",
                    entry.name
                )));
            }
            return Ok(prev.handle());
        }
        match self.table.define(entry.clone()) {
            DefineOutcome::Created => {
                tracing::info!(param = %entry.name, kind = ?entry.kind, "parameter created");
                self.created += 1;
            }
            DefineOutcome::Redefined => {
                tracing::info!(
                    param = %entry.name,
                    kind = ?entry.kind,
                    "parameter definition changed"
                );
                self.redefined += 1;
            }
            DefineOutcome::Reused => {}
        }
        let handle = entry.handle();
        self.used.insert(entry.name.clone(), entry);
        Ok(handle)
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains_key(name)
    }

    /// Entries requested so far, ordered by name.
    pub fn used(&self) -> impl Iterator<Item = &ParameterEntry> {
        self.used.values()
    }

    /// Prune unused namespaced entries and close the session.
    pub fn finish(self) -> SessionSummary {
        let used = &self.used;
        let pruned = self.table.prune(&self.prefix, |name| used.contains_key(name));
        for name in &pruned {
            tracing::debug!(param = %name, "parameter pruned");
        }
        SessionSummary {
            used: self.used.len(),
            created: self.created,
            redefined: self.redefined,
            pruned,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/params.rs"]
mod tests;
