//! File-backed constraint journal.
//!
//! Keeps a TOML record of constraint definitions in sync with the store.
//! Only definitions are persisted; solutions never are.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pantry_core::{
    Constraint, ConstraintId, ConstraintJournal, DomainModel, JournalError,
};

use crate::record::ConstraintRecord;
use crate::Result;

#[derive(Debug, Default, Serialize, Deserialize)]
struct JournalFile {
    #[serde(default)]
    constraints: Vec<ConstraintRecord>,
}

/// TOML file journal implementing the engine's persistence interface.
///
/// The full record is rewritten on every mutation; the files are small (a
/// handful of constraint definitions), so simplicity wins over deltas.
///
/// # Example
///
/// ```no_run
/// use pantry_config::{DomainConfig, FileJournal};
///
/// let domain = DomainConfig::default().to_domain_model().unwrap();
/// let journal = FileJournal::open("constraints.toml", domain).unwrap();
/// let initial = journal.load_constraints().unwrap();
/// ```
#[derive(Debug)]
pub struct FileJournal {
    path: PathBuf,
    domain: DomainModel,
    entries: Vec<(ConstraintId, ConstraintRecord)>,
}

impl FileJournal {
    /// Opens a journal at `path`, reading the existing record if present.
    pub fn open(path: impl AsRef<Path>, domain: DomainModel) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut journal = Self {
            path,
            domain,
            entries: Vec::new(),
        };
        if journal.path.exists() {
            let contents = std::fs::read_to_string(&journal.path)?;
            let file: JournalFile = toml::from_str(&contents)?;
            for record in file.constraints {
                let id = record.resolve(&journal.domain)?.id();
                journal.entries.push((id, record));
            }
        }
        Ok(journal)
    }

    /// Resolves the recorded constraints for engine startup.
    pub fn load_constraints(&self) -> Result<Vec<Constraint>> {
        self.entries
            .iter()
            .map(|(_, record)| record.resolve(&self.domain))
            .collect()
    }

    /// Returns the journal path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let file = JournalFile {
            constraints: self.entries.iter().map(|(_, r)| r.clone()).collect(),
        };
        let rendered = toml::to_string_pretty(&file)?;
        std::fs::write(&self.path, rendered)?;
        Ok(())
    }

    fn surface(result: Result<()>) -> std::result::Result<(), JournalError> {
        result.map_err(|e| JournalError::new(e.to_string()))
    }
}

impl ConstraintJournal for FileJournal {
    fn append(&mut self, constraint: &Constraint) -> std::result::Result<(), JournalError> {
        let record = ConstraintRecord::from_constraint(constraint, &self.domain);
        self.entries.push((constraint.id(), record));
        Self::surface(self.flush())
    }

    fn remove(&mut self, id: &ConstraintId) -> std::result::Result<(), JournalError> {
        self.entries.retain(|(entry_id, _)| entry_id != id);
        Self::surface(self.flush())
    }

    fn replace_all(
        &mut self,
        constraints: &[Constraint],
    ) -> std::result::Result<(), JournalError> {
        self.entries = constraints
            .iter()
            .map(|c| (c.id(), ConstraintRecord::from_constraint(c, &self.domain)))
            .collect();
        Self::surface(self.flush())
    }
}
