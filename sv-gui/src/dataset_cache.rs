use std::{num::NonZeroUsize, sync::Arc};

use derivative::Derivative;
use lru::LruCache;
use sv_core::dataset::{Catalog, Dataset, DatasetError};
use tracing::{debug, trace};

/// Anything that can produce a dataset from its name.
pub trait Loader {
    /// # Errors
    ///
    /// Implementation specific, see [`DatasetError`].
    fn load(&self, name: &str) -> Result<Dataset, DatasetError>;
}

impl Loader for Catalog {
    fn load(&self, name: &str) -> Result<Dataset, DatasetError> {
        Catalog::load(self, name)
    }
}

/// Loaded datasets keyed by name. A name is only loaded again once it has
/// been evicted or invalidated.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct DatasetCache<L> {
    #[derivative(Debug = "ignore")]
    loader: L,
    cache: LruCache<String, Arc<Dataset>>,
}

impl<L: Loader> DatasetCache<L> {
    pub fn new(loader: L, capacity: NonZeroUsize) -> Self {
        Self {
            loader,
            cache: LruCache::new(capacity),
        }
    }

    pub const fn loader(&self) -> &L {
        &self.loader
    }

    /// # Errors
    ///
    /// Load errors are returned as is and nothing is cached.
    pub fn get(&mut self, name: &str) -> Result<Arc<Dataset>, DatasetError> {
        if let Some(dataset) = self.cache.get(name) {
            trace!("Dataset `{name}` cached");
            return Ok(Arc::clone(dataset));
        }
        debug!("Loading dataset `{name}`");
        let dataset = Arc::new(self.loader.load(name)?);
        self.cache.put(name.to_owned(), Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn invalidate(&mut self, name: &str) {
        if self.cache.pop(name).is_some() {
            debug!("Invalidated dataset `{name}`");
        }
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.cache.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, fs};

    use rstest::rstest;
    use sv_core::{dataset::GraphKind, graph::Graph, table::Table};

    use super::*;

    #[derive(Default)]
    struct CountingLoader {
        loads: RefCell<Vec<String>>,
    }

    impl Loader for CountingLoader {
        fn load(&self, name: &str) -> Result<Dataset, DatasetError> {
            if name == "missing" {
                return Err(DatasetError::Unknown(name.to_owned()));
            }
            self.loads.borrow_mut().push(name.to_owned());
            Ok(Dataset {
                name: name.to_owned(),
                table: Arc::new(Table::default()),
                graphs: vec![(GraphKind::Full, Graph::new())],
            })
        }
    }

    fn cache(capacity: usize) -> DatasetCache<CountingLoader> {
        DatasetCache::new(
            CountingLoader::default(),
            NonZeroUsize::new(capacity).unwrap(),
        )
    }

    #[test]
    fn reloads_only_on_key_change() {
        let mut cache = cache(1);
        let first = cache.get("a").unwrap();
        let again = cache.get("a").unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        cache.get("b").unwrap();
        cache.get("a").unwrap();
        assert_eq!(*cache.loader().loads.borrow(), vec!["a", "b", "a"]);
    }

    #[rstest]
    #[case(1, 3)]
    #[case(2, 2)]
    fn capacity(#[case] cap: usize, #[case] loads: usize) {
        let mut cache = cache(cap);
        for name in ["a", "b", "a"] {
            cache.get(name).unwrap();
        }
        assert_eq!(cache.loader().loads.borrow().len(), loads);
    }

    #[test]
    fn invalidate() {
        let mut cache = cache(2);
        cache.get("a").unwrap();
        cache.invalidate("a");
        assert!(!cache.contains("a"));
        cache.get("a").unwrap();
        cache.clear();
        assert!(!cache.contains("a"));
        assert_eq!(cache.loader().loads.borrow().len(), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let mut cache = cache(1);
        assert!(matches!(
            cache.get("missing"),
            Err(DatasetError::Unknown(name)) if name == "missing"
        ));
        assert!(!cache.contains("missing"));
    }

    #[test]
    fn catalog_loader() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("sample");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("table.csv"), "Source,Sink,Chromosome\nA,B,1\nB,loose,2\n").unwrap();
        fs::write(
            data.join("graph.dot"),
            r#"digraph { A [pos="0,1"]; B [pos="1,2"]; A -> B; }"#,
        )
        .unwrap();

        let catalog = Catalog::scan(dir.path()).unwrap();
        let mut cache = DatasetCache::new(catalog, NonZeroUsize::MIN);
        let dataset = cache.get("sample").unwrap();
        assert_eq!(dataset.table.len(), 2);
        assert!(cache.get("other").is_err());
    }
}
