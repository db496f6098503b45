//! Per-type table of derived properties
//!
//! A view model type declares which of its properties are computed from
//! which others. The declarations are inverted once per type into a
//! `source -> {dependents}` table and shared process-wide afterwards.

use std::any::TypeId;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use super::ViewModel;

/// "`property` depends on `source`"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependsOn {
    pub property: &'static str,
    pub source: &'static str,
}

impl DependsOn {
    pub const fn new(property: &'static str, source: &'static str) -> Self {
        Self { property, source }
    }
}

/// Inverted dependency table: source property to dependent properties
///
/// Only direct dependents are recorded. A dependent of a dependent is not
/// re-announced when the source changes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DependencyMap {
    dependents: HashMap<String, BTreeSet<String>>,
}

static EMPTY: BTreeSet<String> = BTreeSet::new();

type Cache = RwLock<HashMap<TypeId, Arc<DependencyMap>>>;

fn cache() -> &'static Cache {
    static CACHE: OnceLock<Cache> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

impl DependencyMap {
    /// Build a table from raw declarations
    ///
    /// A property declared as depending on itself is ignored.
    pub fn from_declarations(declarations: &[DependsOn]) -> Self {
        let mut dependents: HashMap<String, BTreeSet<String>> = HashMap::new();
        for decl in declarations {
            if decl.property == decl.source {
                tracing::debug!(property = decl.property, "ignoring self-dependency");
                continue;
            }
            dependents
                .entry(decl.source.to_string())
                .or_default()
                .insert(decl.property.to_string());
        }
        Self { dependents }
    }

    /// Shared table for `T`, built on first request
    pub fn for_type<T: ViewModel>() -> Arc<Self> {
        let key = TypeId::of::<T>();

        if let Some(map) = cache()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(map);
        }

        let mut guard = cache().write().unwrap_or_else(PoisonError::into_inner);
        let map = guard.entry(key).or_insert_with(|| {
            tracing::debug!(
                view_model = std::any::type_name::<T>(),
                declarations = T::DEPENDS_ON.len(),
                "building dependency map"
            );
            Arc::new(Self::from_declarations(T::DEPENDS_ON))
        });
        Arc::clone(map)
    }

    /// Direct dependents of `source`, alphabetically ordered
    pub fn dependents_of(&self, source: &str) -> &BTreeSet<String> {
        self.dependents.get(source).unwrap_or(&EMPTY)
    }

    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }

    /// Source properties with at least one dependent
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.dependents.keys().map(String::as_str)
    }
}
