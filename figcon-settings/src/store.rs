//! The settings store: local edit state reconciled against the server
//!
//! [`SettingsStore`] owns the in-memory working set of settings entries for
//! one overlay scope at a time. Field adapters subscribe per entry, a save
//! panel subscribes globally, and all mutation flows through the store so
//! the dirty flag and subscribers stay consistent.
//!
//! # Reconciliation model
//!
//! Each entry carries its last-synced baseline. Local edits mutate `value` /
//! `overlayed` only; [`save_all`](SettingsStore::save_all) diffs every entry
//! against its baseline and persists just the changed ones, one detached
//! task per entry. The baseline advances immediately when the saves are
//! issued, before any server response — save feels instant, and a rejected
//! write is reported through the notifier rather than by re-dirtying the
//! panel.
//!
//! # Concurrency
//!
//! All synchronous operations take the state lock briefly and never hold it
//! across an await or a subscriber callback, so callbacks may re-enter the
//! store. Racing detach fetches resolve last-write-wins; the store enforces
//! no timeout on remote calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, warn};

use figcon_common::i18n::Translate;
use figcon_common::notify::{NotificationKind, Notifier};

use crate::entry::SettingEntry;
use crate::remote::{ConfigApi, RemoteError};
use crate::value::SettingValue;

/// Category tag attached to every notification raised by the engine
const NOTIFY_CATEGORY: &str = "settings";

/// Handle returned by listener registration; pass it back to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct ListenerRegistry {
    next: u64,
    global: Vec<(ListenerId, Callback)>,
    per_id: HashMap<String, Vec<(ListenerId, Callback)>>,
}

impl ListenerRegistry {
    fn alloc(&mut self) -> ListenerId {
        self.next += 1;
        ListenerId(self.next)
    }
}

struct WorkingSet {
    entries: Vec<SettingEntry>,
    overlay_id: Option<String>,
    dirty: bool,
}

/// Settings synchronization engine
///
/// Constructed with its collaborators injected; freely re-creatable (tests
/// build one store per case). Share it as `Arc<SettingsStore>`.
pub struct SettingsStore {
    api: Arc<dyn ConfigApi>,
    notifier: Arc<dyn Notifier>,
    translator: Arc<dyn Translate>,
    state: RwLock<WorkingSet>,
    listeners: Mutex<ListenerRegistry>,
}

impl SettingsStore {
    pub fn new(
        api: Arc<dyn ConfigApi>,
        notifier: Arc<dyn Notifier>,
        translator: Arc<dyn Translate>,
    ) -> Self {
        Self {
            api,
            notifier,
            translator,
            state: RwLock::new(WorkingSet {
                entries: Vec::new(),
                overlay_id: None,
                dirty: false,
            }),
            listeners: Mutex::new(ListenerRegistry::default()),
        }
    }

    /// Replace the whole working set.
    ///
    /// Captures each entry's baseline from its current state, stamps the
    /// overlay scope, and clears the dirty flag. Entries not in the new
    /// list are dropped; there is no merge. Listeners are not notified —
    /// bulk load precedes field adapter mount.
    pub fn initialize_settings(&self, entries: Vec<SettingEntry>, overlay_id: Option<&str>) {
        let mut state = self.state.write().unwrap();
        let scope = overlay_id.map(str::to_string);

        state.entries = entries;
        for entry in &mut state.entries {
            entry.overlay_id = scope.clone();
            entry.initial_value = entry.value.clone();
            entry.initial_overlayed = entry.overlayed;
        }
        state.overlay_id = scope;
        state.dirty = false;
    }

    /// Bulk-fetch the given overlay scope's settings and load them.
    ///
    /// A listing failure is a page-level problem, so it is returned to the
    /// caller instead of going through the notifier.
    pub async fn refresh(&self, overlay_id: Option<&str>) -> Result<(), RemoteError> {
        let entries = self.api.list_settings(overlay_id).await?;
        debug!(overlay = ?overlay_id, count = entries.len(), "loaded settings from server");
        self.initialize_settings(entries, overlay_id);
        Ok(())
    }

    /// Look up an entry by id within the current working set.
    ///
    /// `None` means "not loaded", not an error.
    pub fn get_setting(&self, id: &str) -> Option<SettingEntry> {
        self.state
            .read()
            .unwrap()
            .entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    /// The overlay scope of the current working set.
    pub fn overlay_id(&self) -> Option<String> {
        self.state.read().unwrap().overlay_id.clone()
    }

    /// Cached store-wide dirty flag, maintained by every mutating
    /// operation.
    pub fn has_unsaved_changes(&self) -> bool {
        self.state.read().unwrap().dirty
    }

    /// Apply a local edit to one entry.
    ///
    /// The write is type-guarded: a value whose kind differs from the
    /// entry's established kind is dropped with a warning (a programming
    /// error in the calling field adapter, not a user-actionable event).
    /// Unknown ids are likewise a logged no-op. On success the dirty flag
    /// is recomputed over the full working set and per-id then global
    /// subscribers are notified synchronously.
    pub fn change_setting(&self, id: &str, value: impl Into<SettingValue>, overlayed: Option<bool>) {
        let value = value.into();
        {
            let mut state = self.state.write().unwrap();
            let Some(entry) = state.entries.iter_mut().find(|e| e.id == id) else {
                warn!(setting = %id, "change for unknown setting dropped");
                return;
            };

            if value.kind() != entry.initial_value.kind() {
                warn!(
                    setting = %id,
                    expected = ?entry.initial_value.kind(),
                    got = ?value.kind(),
                    "type mismatch, write dropped"
                );
                return;
            }

            entry.value = value;
            if let Some(overlayed) = overlayed {
                entry.overlayed = Some(overlayed);
            }

            state.dirty = state.entries.iter().any(SettingEntry::is_dirty);
        }

        self.notify_id(id);
        self.notify_global();
    }

    /// Toggle an entry's overlay override state.
    ///
    /// `true` attaches an override: the flag is set locally and the current
    /// value becomes the override seed, with no remote call.
    ///
    /// `false` detaches ("reset to inherited"): the global value is fetched
    /// from the server, coerced per the entry's kind, and adopted as the
    /// working value. If the fetch fails, an error notification is raised
    /// and the flag is left unchanged.
    pub async fn change_overlayed(&self, id: &str, overlayed: bool) {
        if overlayed {
            {
                let mut state = self.state.write().unwrap();
                let Some(entry) = state.entries.iter_mut().find(|e| e.id == id) else {
                    warn!(setting = %id, "overlay toggle for unknown setting dropped");
                    return;
                };
                entry.overlayed = Some(true);
                state.dirty = state.entries.iter().any(SettingEntry::is_dirty);
            }
            self.notify_id(id);
            self.notify_global();
            return;
        }

        // Detach: adopt the inherited global value. The lock is released
        // before the fetch; a concurrent edit resolves last-write-wins.
        let Some((kind, label)) = self
            .state
            .read()
            .unwrap()
            .entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| (e.kind, e.label.clone()))
        else {
            warn!(setting = %id, "overlay toggle for unknown setting dropped");
            return;
        };

        match self.api.get_setting(id).await {
            Ok(raw) => {
                let value = kind.coerce_raw(id, &raw);
                self.change_setting(id, value, Some(false));
            }
            Err(err) => {
                warn!(setting = %id, error = %err, "failed to fetch inherited value, keeping override");
                let title = self.translator.translate("settings.inherit.error.title", &[]);
                let detail = self.translator.translate(
                    "settings.inherit.error.detail",
                    &[("label", &label), ("error", &err.to_string())],
                );
                self.notifier
                    .notify(NotificationKind::Error, &title, &detail, NOTIFY_CATEGORY);
            }
        }
    }

    /// Persist every dirty entry, fire-and-forget.
    ///
    /// One detached save task is spawned per dirty entry — no ordering, no
    /// atomicity across entries; a partial failure leaves some entries
    /// saved and others not, each reported individually. Baselines advance
    /// and the dirty flag clears immediately, before any server response
    /// (optimistic commit). Global subscribers are notified; values did not
    /// change, so per-id subscribers are not.
    pub fn save_all(&self) {
        let (to_save, overlay_id) = {
            let mut state = self.state.write().unwrap();
            let to_save: Vec<SettingEntry> =
                state.entries.iter().filter(|e| e.is_dirty()).cloned().collect();
            let overlay_id = state.overlay_id.clone();

            for entry in &mut state.entries {
                entry.commit_baseline();
            }
            state.dirty = false;

            (to_save, overlay_id)
        };

        debug!(count = to_save.len(), overlay = ?overlay_id, "saving changed settings");

        for entry in to_save {
            let api = Arc::clone(&self.api);
            let notifier = Arc::clone(&self.notifier);
            let translator = Arc::clone(&self.translator);
            let overlay_id = overlay_id.clone();
            tokio::spawn(async move {
                save_entry(api, notifier, translator, entry, overlay_id).await;
            });
        }

        self.notify_global();
    }

    /// Discard all local edits, restoring every entry to its baseline.
    ///
    /// Pure and synchronous; no remote calls. Both global and per-id
    /// subscribers are notified.
    pub fn reset_all(&self) {
        let ids: Vec<String> = {
            let mut state = self.state.write().unwrap();
            for entry in &mut state.entries {
                entry.revert_to_baseline();
            }
            state.dirty = false;
            state.entries.iter().map(|e| e.id.clone()).collect()
        };

        for id in &ids {
            self.notify_id(id);
        }
        self.notify_global();
    }

    // ------------------------------------------------------------------
    // Listener registration
    //
    // Two genuinely distinct registries: a global list fired on any change,
    // and a per-id map fired only for the matching entry. Registration
    // returns a ListenerId handle in place of de-dup by function identity.
    // ------------------------------------------------------------------

    /// Register a global "something changed" listener.
    pub fn add_listener(&self, listener: impl Fn() + Send + Sync + 'static) -> ListenerId {
        let mut registry = self.listeners.lock().unwrap();
        let token = registry.alloc();
        registry.global.push((token, Arc::new(listener)));
        token
    }

    /// Unregister a global listener. Unknown tokens are a no-op.
    pub fn remove_listener(&self, token: ListenerId) {
        self.listeners
            .lock()
            .unwrap()
            .global
            .retain(|(t, _)| *t != token);
    }

    /// Register a listener fired only when the given entry changes.
    pub fn add_id_listener(
        &self,
        id: &str,
        listener: impl Fn() + Send + Sync + 'static,
    ) -> ListenerId {
        let mut registry = self.listeners.lock().unwrap();
        let token = registry.alloc();
        registry
            .per_id
            .entry(id.to_string())
            .or_default()
            .push((token, Arc::new(listener)));
        token
    }

    /// Unregister a per-entry listener. Unknown tokens are a no-op.
    pub fn remove_id_listener(&self, id: &str, token: ListenerId) {
        let mut registry = self.listeners.lock().unwrap();
        if let Some(list) = registry.per_id.get_mut(id) {
            list.retain(|(t, _)| *t != token);
            if list.is_empty() {
                registry.per_id.remove(id);
            }
        }
    }

    /// Invoke global listeners outside the registry lock.
    fn notify_global(&self) {
        let callbacks: Vec<Callback> = self
            .listeners
            .lock()
            .unwrap()
            .global
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    /// Invoke the given entry's listeners outside the registry lock.
    fn notify_id(&self, id: &str) {
        let callbacks: Vec<Callback> = self
            .listeners
            .lock()
            .unwrap()
            .per_id
            .get(id)
            .map(|list| list.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default();
        for callback in callbacks {
            callback();
        }
    }
}

/// Persist one entry: write it, trigger the server's persist-to-disk, and
/// report the outcome through the notifier.
///
/// Failures are isolated per entry and never touch the (already advanced)
/// baseline.
async fn save_entry(
    api: Arc<dyn ConfigApi>,
    notifier: Arc<dyn Notifier>,
    translator: Arc<dyn Translate>,
    entry: SettingEntry,
    overlay_id: Option<String>,
) {
    let scope = match overlay_id.as_deref() {
        Some(overlay) => translator.translate("settings.scope.overlay", &[("overlay", overlay)]),
        None => translator.translate("settings.scope.global", &[]),
    };

    // An entry explicitly detached from its override asks the server to
    // drop the overlay value and inherit again.
    let reset = entry.overlayed == Some(false);

    let result: Result<(), RemoteError> = async {
        api.post_setting(&entry.id, &entry.value, overlay_id.as_deref(), reset)
            .await?;
        api.trigger_persist().await
    }
    .await;

    match result {
        Ok(()) => {
            debug!(setting = %entry.id, "setting saved");
            let title = translator.translate("settings.save.success.title", &[]);
            let detail = translator.translate(
                "settings.save.success.detail",
                &[("label", &entry.label), ("scope", &scope)],
            );
            notifier.notify(NotificationKind::Success, &title, &detail, NOTIFY_CATEGORY);
        }
        Err(err) => {
            warn!(setting = %entry.id, error = %err, "failed to save setting");
            let title = translator.translate("settings.save.error.title", &[]);
            let detail = translator.translate(
                "settings.save.error.detail",
                &[
                    ("label", &entry.label),
                    ("scope", &scope),
                    ("error", &err.to_string()),
                ],
            );
            notifier.notify(NotificationKind::Error, &title, &detail, NOTIFY_CATEGORY);
        }
    }
}
