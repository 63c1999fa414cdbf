//! Settings entries: current value plus last-synced baseline

use crate::value::{SettingKind, SettingValue};

/// One configuration key's current and baseline state
///
/// `initial_value` / `initial_overlayed` snapshot the entry as of the last
/// bulk load or successful save; dirtiness is computed against them. They
/// are reassigned only by [`commit_baseline`](Self::commit_baseline) and the
/// store's bulk load, never elsewhere.
///
/// `overlayed` is tri-state: `None` means the entry has no overlay concept
/// (global-only setting), `Some(true)` means the value is an override for
/// the current overlay scope, `Some(false)` means the entry inherits the
/// global value.
#[derive(Debug, Clone)]
pub struct SettingEntry {
    /// Stable dot-segmented key, e.g. `"cloud.enabled"`
    pub id: String,
    pub kind: SettingKind,
    /// Display label, opaque to the engine
    pub label: String,
    /// Display description, opaque to the engine
    pub description: String,
    pub value: SettingValue,
    pub initial_value: SettingValue,
    pub overlayed: Option<bool>,
    pub initial_overlayed: Option<bool>,
    /// Overlay scope this entry instance was loaded for; `None` = global
    pub overlay_id: Option<String>,
}

impl SettingEntry {
    pub fn new(
        id: impl Into<String>,
        kind: SettingKind,
        label: impl Into<String>,
        description: impl Into<String>,
        value: impl Into<SettingValue>,
    ) -> Self {
        let value = value.into();
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            description: description.into(),
            initial_value: value.clone(),
            value,
            overlayed: None,
            initial_overlayed: None,
            overlay_id: None,
        }
    }

    /// Builder: mark the entry as overlay-capable with the given override
    /// state.
    pub fn with_override(mut self, overlayed: bool) -> Self {
        self.overlayed = Some(overlayed);
        self
    }

    /// True when the entry's `(value, overlayed)` pair differs from its
    /// baseline.
    pub fn is_dirty(&self) -> bool {
        self.value != self.initial_value || self.overlayed != self.initial_overlayed
    }

    /// Advance the baseline to the current state.
    pub(crate) fn commit_baseline(&mut self) {
        self.initial_value = self.value.clone();
        self.initial_overlayed = self.overlayed;
    }

    /// Discard local edits, restoring the baseline state.
    pub(crate) fn revert_to_baseline(&mut self) {
        self.value = self.initial_value.clone();
        self.overlayed = self.initial_overlayed;
    }
}
