#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::anyhow;
use clap::Parser;
use sv_core::dataset::Catalog;
use sv_graphics::colorscale::Palette;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Directory with one subdirectory per dataset
    #[arg(long, value_name = "DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Dataset to show on start
    #[arg(long)]
    dataset: Option<String>,

    /// Write the graphs as SVG into DIR and exit; only `--dataset` if given
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// Number of datasets kept in memory
    #[arg(long, default_value = "1")]
    cache_size: NonZeroUsize,
}

fn export(catalog: &Catalog, dataset: Option<&str>, dir: &std::path::Path) -> anyhow::Result<()> {
    let names = match dataset {
        Some(name) => vec![name.to_owned()],
        None => catalog.names().to_vec(),
    };
    let palette = Palette::default();
    for name in names {
        let dataset = catalog.load(&name)?;
        for path in sv_gui::export::export_dataset(&dataset, &palette, dir)? {
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Log to stdout (if you run with `RUST_LOG=debug`).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let catalog = Catalog::scan(&args.data_dir)?;

    if let Some(dir) = &args.export {
        return export(&catalog, args.dataset.as_deref(), dir);
    }

    let initial = args
        .dataset
        .or_else(|| catalog.names().first().cloned());
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1400.0, 900.0]),
        ..Default::default()
    };
    eframe::run_native(
        "SV Viewer",
        native_options,
        Box::new(move |_cc| {
            let mut app = sv_gui::App::new(catalog, args.cache_size);
            if let Some(name) = initial {
                app.select_or_notify(&name);
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow!("{}", err))?;

    Ok(())
}
