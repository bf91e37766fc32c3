//! Settings file load and save.

use std::fs;
use std::path::Path;

use super::{RoboCupField, collection};
use crate::error::FieldError;
use crate::snapshot::VarSnapshot;

impl RoboCupField {
    /// Snapshot of the whole settings tree.
    pub fn settings_snapshot(&self) -> VarSnapshot {
        let _markings = self.markings.read();
        VarSnapshot::capture(&self.settings)
    }

    pub fn to_settings_json(&self) -> Result<String, FieldError> {
        Ok(serde_json::to_string_pretty(&self.settings_snapshot())?)
    }

    /// Writes `snapshot` into the settings tree.
    ///
    /// Leaf values are set silently and collections are replaced wholesale.
    /// The record collections are reconciled before the lock is released;
    /// `loaded` is then raised on every written list, children first.
    pub fn load_snapshot(&self, snapshot: &VarSnapshot) -> Result<(), FieldError> {
        let root = self.settings.name();
        if snapshot.name != root {
            return Err(FieldError::RootMismatch {
                expected: root,
                found: snapshot.name.clone(),
            });
        }

        let mut loaded = Vec::new();
        {
            let mut markings = self.markings.write();
            snapshot.apply(self.settings.var(), &mut loaded);
            collection::reconcile(&mut markings.lines, &self.field_lines_list, &self.num_lines);
            collection::reconcile(&mut markings.arcs, &self.field_arcs_list, &self.num_arcs);
            tracing::info!(
                "[field] Loaded settings: {} lines, {} arcs",
                markings.lines.len(),
                markings.arcs.len()
            );
            self.verify(&markings);
        }

        for list in &loaded {
            list.emit_loaded();
        }
        self.changed.emit(self);
        Ok(())
    }

    pub fn load_settings_json(&self, json: &str) -> Result<(), FieldError> {
        let snapshot: VarSnapshot = serde_json::from_str(json)?;
        self.load_snapshot(&snapshot)
    }

    pub fn save_settings(&self, path: impl AsRef<Path>) -> Result<(), FieldError> {
        let path = path.as_ref();
        fs::write(path, self.to_settings_json()?)?;
        tracing::info!("[field] Saved settings to {}", path.display());
        Ok(())
    }

    pub fn load_settings(&self, path: impl AsRef<Path>) -> Result<(), FieldError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        self.load_settings_json(&json)?;
        tracing::info!("[field] Loaded settings from {}", path.display());
        Ok(())
    }
}
