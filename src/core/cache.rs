use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{
        Arc, LazyLock, PoisonError, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use log::{debug, warn};

use crate::{
    core::{
        binding::{Bindable, Binding, TypeBinder, TypeDescription},
        column::ColumnIndex,
    },
    error::RowError,
};

type Entry = Arc<dyn Any + Send + Sync>;

/// One cache slot. Hits only take its read lock; a miss holds the write lock
/// while the binding is compiled, so that concurrent misses on the same key
/// compile once.
type Slot = Arc<RwLock<Option<Entry>>>;

static GLOBAL: LazyLock<BindingCache> = LazyLock::new(BindingCache::new);

/// Memoizes compiled bindings by target type and column names.
///
/// Column names are compared by content and order: two distinct
/// [`ColumnIndex`] values holding the same names share one binding. Entries
/// are never evicted.
#[derive(Default)]
pub struct BindingCache {
    slots: RwLock<HashMap<TypeId, HashMap<Vec<String>, Slot>>>,
    compilations: AtomicUsize,
    hits: AtomicUsize,
}

impl BindingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by [`Row::bind`](crate::core::row::Row::bind)
    /// and [`TypeBinder::build_accessor`].
    pub fn global() -> &'static BindingCache {
        &GLOBAL
    }

    /// Returns the binding of `T` for `columns`, compiling it on first use.
    ///
    /// A failed compilation is returned to the caller and not cached.
    pub fn get_or_compile<T: Bindable>(
        &self,
        columns: &ColumnIndex,
    ) -> Result<Arc<Binding<T>>, RowError> {
        let slot = self.slot(TypeId::of::<T>(), columns);

        {
            let entry = slot.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(binding) = self.hit::<T>(entry.as_ref()) {
                return Ok(binding);
            }
        }

        let mut entry = slot.write().unwrap_or_else(PoisonError::into_inner);

        // Another thread may have compiled while we waited for the write lock.
        if let Some(binding) = self.hit::<T>(entry.as_ref()) {
            return Ok(binding);
        }

        debug!(
            "Binding cache miss for {} over {:?}",
            std::any::type_name::<T>(),
            columns.names()
        );

        let binding = Arc::new(TypeBinder::compile(&TypeDescription::<T>::of(), columns)?);
        self.compilations.fetch_add(1, Ordering::Relaxed);

        let stored: Entry = Arc::clone(&binding) as Entry;
        *entry = Some(stored);

        Ok(binding)
    }

    fn hit<T: Bindable>(&self, entry: Option<&Entry>) -> Option<Arc<Binding<T>>> {
        match Arc::clone(entry?).downcast::<Binding<T>>() {
            Ok(binding) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(binding)
            }
            Err(_) => {
                warn!(
                    "Cached binding for {} has an unexpected type, recompiling",
                    std::any::type_name::<T>()
                );
                None
            }
        }
    }

    /// Number of compilations performed so far.
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of compiled bindings held.
    pub fn len(&self) -> usize {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .values()
            .flat_map(HashMap::values)
            .filter(|slot| {
                slot.read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .is_some()
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, type_id: TypeId, columns: &ColumnIndex) -> Slot {
        {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = slots
                .get(&type_id)
                .and_then(|by_columns| by_columns.get(columns.names()))
            {
                return Arc::clone(slot);
            }
        }

        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            slots
                .entry(type_id)
                .or_default()
                .entry(columns.names().to_vec())
                .or_default(),
        )
    }
}
