use std::collections::HashMap;

/// Level-authored signal identifier. Raster levels pack a pixel colour into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(pub i32);

impl SignalId {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(i32::from(r) + 256 * i32::from(g) + 65_536 * i32::from(b))
    }
}

/// Index of a signal cell inside a [`SignalRegistry`].
///
/// Every entity bound to the same [`SignalId`] holds the same handle, so a
/// write through one binding is observed by all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalHandle(usize);

#[derive(Debug, Default, Clone)]
pub struct SignalRegistry {
    values: Vec<bool>,
    handles_by_id: HashMap<SignalId, SignalHandle>,
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell for `id`, creating it with `false` on first use.
    pub fn sign(&mut self, id: SignalId) -> SignalHandle {
        if let Some(handle) = self.handles_by_id.get(&id) {
            return *handle;
        }
        let handle = SignalHandle(self.values.len());
        self.values.push(false);
        self.handles_by_id.insert(id, handle);
        handle
    }

    pub fn handle_of(&self, id: SignalId) -> Option<SignalHandle> {
        self.handles_by_id.get(&id).copied()
    }

    pub fn value(&self, handle: SignalHandle) -> bool {
        self.values.get(handle.0).copied().unwrap_or(false)
    }

    pub fn set(&mut self, handle: SignalHandle, value: bool) {
        if let Some(slot) = self.values.get_mut(handle.0) {
            *slot = value;
        }
    }

    pub fn value_by_id(&self, id: SignalId) -> Option<bool> {
        self.handle_of(id).map(|handle| self.value(handle))
    }

    pub fn set_by_id(&mut self, id: SignalId, value: bool) {
        let handle = self.sign(id);
        self.set(handle, value);
    }

    /// Clears every signal. The simulation never calls this; drivers that want
    /// "pressed this frame" semantics call it between ticks.
    pub fn reset_all(&mut self) {
        self.values.fill(false);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_sign_returns_same_cell() {
        let mut registry = SignalRegistry::new();
        let first = registry.sign(SignalId(7));
        let second = registry.sign(SignalId(7));
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);

        registry.set(first, true);
        assert!(registry.value(second));
    }

    #[test]
    fn unseen_id_starts_false() {
        let mut registry = SignalRegistry::new();
        let handle = registry.sign(SignalId(42));
        assert!(!registry.value(handle));
        assert_eq!(registry.value_by_id(SignalId(42)), Some(false));
        assert_eq!(registry.value_by_id(SignalId(43)), None);
    }

    #[test]
    fn distinct_ids_get_distinct_cells() {
        let mut registry = SignalRegistry::new();
        let a = registry.sign(SignalId(1));
        let b = registry.sign(SignalId(2));
        assert_ne!(a, b);

        registry.set(a, true);
        assert!(!registry.value(b));
    }

    #[test]
    fn rgb_packing_matches_channel_layout() {
        assert_eq!(SignalId::from_rgb(0, 0, 0), SignalId(0));
        assert_eq!(SignalId::from_rgb(255, 0, 0), SignalId(255));
        assert_eq!(SignalId::from_rgb(0, 1, 0), SignalId(256));
        assert_eq!(SignalId::from_rgb(0, 0, 1), SignalId(65_536));
        assert_eq!(SignalId::from_rgb(255, 255, 255), SignalId(16_777_215));
    }

    #[test]
    fn reset_all_clears_values_but_keeps_cells() {
        let mut registry = SignalRegistry::new();
        registry.set_by_id(SignalId(3), true);
        registry.set_by_id(SignalId(4), true);
        registry.reset_all();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.value_by_id(SignalId(3)), Some(false));
        assert_eq!(registry.value_by_id(SignalId(4)), Some(false));
    }
}
