//! In-process collaborators for hosts that keep everything in memory.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::collaborator::{CollaboratorError, Persistence, TargetFlags};
use crate::target::Target;

#[derive(Debug, Default)]
pub struct MemoryPersistence {
    values: RefCell<HashMap<String, String>>,
    unavailable: Cell<bool>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read and write fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    fn check(&self) -> Result<(), CollaboratorError> {
        if self.unavailable.get() {
            Err("persistence backend offline".into())
        } else {
            Ok(())
        }
    }
}

impl Persistence for MemoryPersistence {
    fn get_string(&self, key: &str) -> Result<Option<String>, CollaboratorError> {
        self.check()?;
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), CollaboratorError> {
        self.check()?;
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryTargetFlags {
    flags: RefCell<BTreeMap<Target, String>>,
    failing_writes: RefCell<BTreeSet<Target>>,
    failing_reads: RefCell<BTreeSet<Target>>,
    writes: Cell<usize>,
}

impl MemoryTargetFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags<'a>(entries: impl IntoIterator<Item = (Target, &'a str)>) -> Self {
        let store = Self::new();
        store.flags.borrow_mut().extend(
            entries
                .into_iter()
                .map(|(target, flags)| (target, flags.to_string())),
        );
        store
    }

    /// Current raw flag string, `""` when never set.
    pub fn flags(&self, target: Target) -> String {
        self.flags.borrow().get(&target).cloned().unwrap_or_default()
    }

    pub fn fail_writes_for(&self, target: Target) {
        self.failing_writes.borrow_mut().insert(target);
    }

    pub fn fail_reads_for(&self, target: Target) {
        self.failing_reads.borrow_mut().insert(target);
    }

    /// Number of successful `set_flags` calls.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl TargetFlags for MemoryTargetFlags {
    fn get_flags(&self, target: Target) -> Result<String, CollaboratorError> {
        if self.failing_reads.borrow().contains(&target) {
            return Err(format!("flags for {target} are unreadable").into());
        }
        Ok(self.flags(target))
    }

    fn set_flags(&self, target: Target, flags: &str) -> Result<(), CollaboratorError> {
        if self.failing_writes.borrow().contains(&target) {
            return Err(format!("flags for {target} are read-only").into());
        }
        self.flags.borrow_mut().insert(target, flags.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
