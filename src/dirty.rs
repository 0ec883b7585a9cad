//! Aggregated "unsaved changes" state across every open editor.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Tracks a dirty flag per editor and reports the OR of all of them.
///
/// The reporter is called whenever a flag is added, changed or removed, and
/// once more with `false` when the tracker is dropped.
pub struct DirtyTracker<K> {
    flags: HashMap<K, bool>,
    reporter: Box<dyn FnMut(bool)>,
}

impl<K: Eq + Hash> DirtyTracker<K> {
    pub fn new(reporter: impl FnMut(bool) + 'static) -> Self {
        Self {
            flags: HashMap::new(),
            reporter: Box::new(reporter),
        }
    }

    /// Set one editor's flag without touching the others.
    pub fn set_dirty(&mut self, key: K, dirty: bool) {
        let previous = self.flags.insert(key, dirty);
        if previous != Some(dirty) {
            self.report();
        }
    }

    /// Forget an editor (it unmounted or reset).
    pub fn remove(&mut self, key: &K) {
        if self.flags.remove(key).is_some() {
            self.report();
        }
    }

    #[must_use]
    pub fn is_dirty(&self, key: &K) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn is_tracked(&self, key: &K) -> bool {
        self.flags.contains_key(key)
    }

    #[must_use]
    pub fn any_dirty(&self) -> bool {
        self.flags.values().any(|dirty| *dirty)
    }

    fn report(&mut self) {
        let any = self.any_dirty();
        (self.reporter)(any);
    }
}

impl<K> Drop for DirtyTracker<K> {
    fn drop(&mut self) {
        (self.reporter)(false);
    }
}

impl<K: fmt::Debug> fmt::Debug for DirtyTracker<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirtyTracker")
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
