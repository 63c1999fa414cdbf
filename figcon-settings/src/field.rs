//! Typed per-field handles for UI field adapters

use std::marker::PhantomData;
use std::sync::Arc;

use crate::store::{ListenerId, SettingsStore};
use crate::value::{SettingKind, SettingValue};

/// Maps a Rust value type onto the setting kind it binds to
pub trait FieldValue: Sized {
    const KIND: SettingKind;

    fn into_value(self) -> SettingValue;
    fn from_value(value: &SettingValue) -> Option<Self>;
}

impl FieldValue for bool {
    const KIND: SettingKind = SettingKind::Bool;

    fn into_value(self) -> SettingValue {
        SettingValue::Bool(self)
    }

    fn from_value(value: &SettingValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FieldValue for i64 {
    const KIND: SettingKind = SettingKind::Int;

    fn into_value(self) -> SettingValue {
        SettingValue::Int(self)
    }

    fn from_value(value: &SettingValue) -> Option<Self> {
        value.as_i64()
    }
}

impl FieldValue for u64 {
    const KIND: SettingKind = SettingKind::Uint;

    fn into_value(self) -> SettingValue {
        SettingValue::Uint(self)
    }

    fn from_value(value: &SettingValue) -> Option<Self> {
        value.as_u64()
    }
}

impl FieldValue for String {
    const KIND: SettingKind = SettingKind::Text;

    fn into_value(self) -> SettingValue {
        SettingValue::Text(self)
    }

    fn from_value(value: &SettingValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

/// Typed handle onto a single settings entry
///
/// This is the contract a field adapter consumes: typed read/write, the
/// overlay toggle, and a per-field subscription. A binding whose entry
/// carries a different kind reads as `None`, and its writes are dropped by
/// the store's type guard.
pub struct FieldBinding<T: FieldValue> {
    store: Arc<SettingsStore>,
    id: String,
    _marker: PhantomData<T>,
}

pub type BoolField = FieldBinding<bool>;
pub type IntField = FieldBinding<i64>;
pub type UintField = FieldBinding<u64>;
pub type TextField = FieldBinding<String>;

impl<T: FieldValue> FieldBinding<T> {
    pub fn new(store: Arc<SettingsStore>, id: impl Into<String>) -> Self {
        Self {
            store,
            id: id.into(),
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The setting kind this binding expects.
    pub fn kind(&self) -> SettingKind {
        T::KIND
    }

    /// Current typed value; `None` when the entry is missing or of another
    /// kind.
    pub fn get(&self) -> Option<T> {
        self.store
            .get_setting(&self.id)
            .and_then(|entry| T::from_value(&entry.value))
    }

    /// Write a new value through the store (type-guarded there).
    pub fn set(&self, value: T) {
        self.store.change_setting(&self.id, value.into_value(), None);
    }

    /// The entry's overlay override state.
    pub fn overlayed(&self) -> Option<bool> {
        self.store.get_setting(&self.id).and_then(|entry| entry.overlayed)
    }

    /// Toggle the overlay override (detaching fetches the inherited value).
    pub async fn set_overlayed(&self, overlayed: bool) {
        self.store.change_overlayed(&self.id, overlayed).await;
    }

    /// Re-render hook: fired whenever this entry changes.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> ListenerId {
        self.store.add_id_listener(&self.id, listener)
    }

    pub fn unsubscribe(&self, token: ListenerId) {
        self.store.remove_id_listener(&self.id, token);
    }
}
