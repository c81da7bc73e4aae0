//! Shared UI state for one widget instance.
//!
//! A [`WidgetState`] is created per widget and passed down to every sub-component that needs
//! it. Each piece of state lives in a [`Channel`] that notifies subscribers on change;
//! components subscribe when mounted and unsubscribe when unmounted.

use crate::config::{DagConfig, LayoutOptions, Theme};
use crate::error::Result;
use crate::model::GraphSpec;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

/// A value plus the listeners interested in it.
pub struct Channel<T> {
    value: T,
    next_id: u64,
    listeners: IndexMap<SubscriptionId, Listener<T>, FxBuildHasher>,
}

impl<T: fmt::Debug> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T: PartialEq> Channel<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            next_id: 0,
            listeners: IndexMap::default(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Stores `value` and notifies listeners, in subscription order, if it changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        for listener in self.listeners.values_mut() {
            listener(&self.value);
        }
        true
    }

    pub fn update(&mut self, f: impl FnOnce(&mut T)) -> bool
    where
        T: Clone,
    {
        let mut next = self.value.clone();
        f(&mut next);
        self.set(next)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, Box::new(listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.shift_remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Currently selected entity: its id and the ancestor group ids leading to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub path: Vec<String>,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollapseState {
    pub collapse_artifacts: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureFlags {
    pub optimize_for_orm: bool,
    pub show_minimap: bool,
}

#[derive(Debug)]
pub struct WidgetState {
    pub theme: Channel<Theme>,
    pub layout_options: Channel<LayoutOptions>,
    pub selection: Channel<Option<Selection>>,
    pub collapse: Channel<CollapseState>,
    pub features: Channel<FeatureFlags>,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::new(Theme::default(), LayoutOptions::default())
    }
}

impl WidgetState {
    pub fn new(theme: Theme, layout_options: LayoutOptions) -> Self {
        Self {
            theme: Channel::new(theme),
            layout_options: Channel::new(layout_options),
            selection: Channel::new(None),
            collapse: Channel::new(CollapseState::default()),
            features: Channel::new(FeatureFlags {
                optimize_for_orm: false,
                show_minimap: true,
            }),
        }
    }

    pub fn from_config(config: &DagConfig) -> Result<Self> {
        let mut state = Self::new(config.theme()?, config.layout_options()?);
        state.features.update(|f| f.optimize_for_orm = config.optimize_for_orm());
        Ok(state)
    }

    pub fn select(&mut self, path: Vec<String>, id: impl Into<String>) -> bool {
        self.selection.set(Some(Selection {
            path,
            id: id.into(),
        }))
    }

    /// Drops the selection if it no longer resolves in `spec`. Returns `true` if it did.
    pub fn reconcile_selection(&mut self, spec: &GraphSpec) -> bool {
        let Some(selection) = self.selection.get() else {
            return false;
        };
        if spec.resolve_path(&selection.path, &selection.id).is_some() {
            return false;
        }
        tracing::warn!(id = %selection.id, path = ?selection.path, "selection no longer resolves; deselecting");
        self.selection.set(None)
    }
}
