//! Type-erased property values shared between a view model and its commands

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Type-erased per-instance property values
///
/// Cloning yields another handle onto the same storage, so command
/// closures can read properties without borrowing the view model.
#[derive(Clone, Default)]
pub struct PropertyStore {
    values: Rc<RefCell<HashMap<String, Box<dyn Any>>>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value, or `default` if absent or stored under another type
    pub fn get<T: Any + Clone>(&self, name: &str, default: T) -> T {
        self.values
            .borrow()
            .get(name)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
            .unwrap_or(default)
    }

    /// Stored value if present under type `T`
    pub fn try_get<T: Any + Clone>(&self, name: &str) -> Option<T> {
        self.values
            .borrow()
            .get(name)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Whether `value` differs from what is stored under `name`
    ///
    /// An absent entry or one stored under a different type always differs.
    pub fn differs<T: Any + PartialEq>(&self, name: &str, value: &T) -> bool {
        match self.values.borrow().get(name) {
            None => true,
            Some(stored) => stored
                .downcast_ref::<T>()
                .map_or(true, |stored| stored != value),
        }
    }

    pub fn insert<T: Any>(&self, name: &str, value: T) {
        self.values
            .borrow_mut()
            .insert(name.to_string(), Box::new(value));
    }

    /// Drop the entry for `name`; returns whether one existed
    pub fn remove(&self, name: &str) -> bool {
        self.values.borrow_mut().remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.values.borrow_mut().clear();
    }
}

impl std::fmt::Debug for PropertyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.values.borrow().keys().cloned().collect();
        names.sort();
        f.debug_struct("PropertyStore").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_reads_default() {
        let store = PropertyStore::new();
        assert_eq!(store.get("Missing", 7_i32), 7);
        assert_eq!(store.try_get::<i32>("Missing"), None);
    }

    #[test]
    fn test_type_mismatch_reads_default() {
        let store = PropertyStore::new();
        store.insert("Name", String::from("x"));
        assert_eq!(store.get("Name", 3_u8), 3);
        assert!(store.differs("Name", &0_u8));
    }

    #[test]
    fn test_absent_always_differs() {
        let store = PropertyStore::new();
        assert!(store.differs("Flag", &false));
        store.insert("Flag", false);
        assert!(!store.differs("Flag", &false));
        assert!(store.differs("Flag", &true));
    }

    #[test]
    fn test_handles_share_storage() {
        let store = PropertyStore::new();
        let other = store.clone();
        other.insert("Count", 2_usize);
        assert_eq!(store.get("Count", 0_usize), 2);
        store.clear();
        assert!(other.is_empty());
    }
}
