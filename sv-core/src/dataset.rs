use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    dot::{DotError, parse_dot},
    graph::Graph,
    table::{Table, TableError},
};

pub const TABLE_FILE: &str = "table.csv";

/// The precomputed graphs rendered from one table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum GraphKind {
    Full,
    LongestChain,
    Cycles,
}

impl GraphKind {
    pub const ALL: [Self; 3] = [Self::Full, Self::LongestChain, Self::Cycles];

    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Full => "graph.dot",
            Self::LongestChain => "chain.dot",
            Self::Cycles => "cycles.dot",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Full => "Network graph of structural variants",
            Self::LongestChain => "Network graph of the longest chain",
            Self::Cycles => "Network graph of simple cycles",
        }
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Unknown dataset `{0}`")]
    Unknown(String),

    #[error("Could not read `{}`: {}", path.display(), error)]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("Invalid table `{}`: {}", path.display(), error)]
    Table {
        path: PathBuf,
        #[source]
        error: TableError,
    },

    #[error("Invalid graph `{}`: {}", path.display(), error)]
    Dot {
        path: PathBuf,
        #[source]
        error: DotError,
    },
}

/// A table together with the graphs built over it.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub name: String,
    pub table: Arc<Table>,
    /// Always contains [`GraphKind::Full`], in [`GraphKind::ALL`] order.
    pub graphs: Vec<(GraphKind, Graph)>,
}

impl Dataset {
    /// Load `table.csv` and `graph.dot` from `dir`, plus `chain.dot` and
    /// `cycles.dot` when present.
    ///
    /// # Errors
    ///
    /// Fails if a required file is missing or any file is malformed.
    pub fn load(dir: &Path) -> Result<Self, DatasetError> {
        let name = dir
            .file_name()
            .map_or_else(|| dir.display().to_string(), |n| n.to_string_lossy().into_owned());

        let table_path = dir.join(TABLE_FILE);
        let table = Table::from_path(&table_path).map_err(|error| DatasetError::Table {
            path: table_path,
            error,
        })?;

        let mut graphs = Vec::new();
        for kind in GraphKind::ALL {
            let path = dir.join(kind.file_name());
            if kind != GraphKind::Full && !path.exists() {
                debug!("Dataset `{name}` has no {}", kind.file_name());
                continue;
            }
            let source = fs::read_to_string(&path).map_err(|error| DatasetError::Io {
                path: path.clone(),
                error,
            })?;
            let graph = parse_dot(&source).map_err(|error| DatasetError::Dot { path, error })?;
            graphs.push((kind, graph));
        }

        debug!(
            "Loaded dataset `{name}`: {} records, {} graphs",
            table.len(),
            graphs.len()
        );
        Ok(Self {
            name,
            table: Arc::new(table),
            graphs,
        })
    }

    #[must_use]
    pub fn graph(&self, kind: GraphKind) -> Option<&Graph> {
        self.graphs
            .iter()
            .find_map(|(k, graph)| (*k == kind).then_some(graph))
    }
}

/// The datasets found under a root directory, keyed by directory name.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    root: PathBuf,
    names: Vec<String>,
}

impl Catalog {
    /// List the subdirectories of `root` that contain a table.
    ///
    /// # Errors
    ///
    /// Fails if `root` cannot be read.
    pub fn scan(root: &Path) -> Result<Self, DatasetError> {
        let io_error = |error| DatasetError::Io {
            path: root.to_owned(),
            error,
        };
        let mut names = Vec::new();
        for entry in fs::read_dir(root).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if !path.is_dir() {
                continue;
            }
            if !path.join(TABLE_FILE).is_file() {
                warn!("Skipping `{}`: no {TABLE_FILE}", path.display());
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_owned());
            }
        }
        names.sort();
        Ok(Self {
            root: root.to_owned(),
            names,
        })
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// # Errors
    ///
    /// Fails on unknown names and on anything [`Dataset::load`] rejects.
    pub fn load(&self, name: &str) -> Result<Dataset, DatasetError> {
        if !self.names.iter().any(|n| n == name) {
            return Err(DatasetError::Unknown(name.to_owned()));
        }
        Dataset::load(&self.root.join(name))
    }
}
