use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use egui::{Vec2, vec2};
use sv_core::{
    dataset::{Dataset, GraphKind},
    table::{Table, TableError},
};
use sv_graphics::{
    colorscale::Palette,
    figure::{Figure, encode_dataset},
    shape::Shapes,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Canvas size of exported figures.
pub const EXPORT_SIZE: Vec2 = vec2(1000.0, 700.0);

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not write `{}`: {}", path.display(), error)]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error(transparent)]
    Table(#[from] TableError),
}

fn file_stem(kind: GraphKind) -> &'static str {
    match kind {
        GraphKind::Full => "graph",
        GraphKind::LongestChain => "chain",
        GraphKind::Cycles => "cycles",
    }
}

/// Write `figure` as an SVG document.
///
/// # Errors
///
/// Fails if `path` cannot be written.
pub fn write_svg(figure: &Figure, path: &Path) -> Result<(), ExportError> {
    let document = Shapes::from_figure(figure, EXPORT_SIZE).to_svg();
    fs::write(path, document.to_string()).map_err(|error| ExportError::Io {
        path: path.to_owned(),
        error,
    })
}

/// Write one `<dataset>-<graph>.svg` per renderable graph of `dataset` into
/// `dir`. Graphs that fail to encode are skipped.
///
/// # Errors
///
/// Fails if `dir` or one of the files cannot be written.
pub fn export_dataset(
    dataset: &Dataset,
    palette: &Palette,
    dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir).map_err(|error| ExportError::Io {
        path: dir.to_owned(),
        error,
    })?;

    let mut written = Vec::new();
    for (kind, figure) in encode_dataset(dataset, palette) {
        let Ok(figure) = figure else {
            warn!("Skipping {kind:?} of `{}`", dataset.name);
            continue;
        };
        let path = dir.join(format!("{}-{}.svg", dataset.name, file_stem(kind)));
        write_svg(&figure, &path)?;
        debug!("Wrote `{}`", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Write `table` as CSV to `path`.
///
/// # Errors
///
/// Fails if `path` cannot be created or written.
pub fn write_table(table: &Table, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|error| ExportError::Io {
        path: path.to_owned(),
        error,
    })?;
    table.write_csv(file)?;
    Ok(())
}
