//! Command-line inspector for level files

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use std::fmt::Write as _;
use std::path::PathBuf;

use level_engine::foundation::logging;
use level_engine::prelude::*;

fn main() -> Result<()> {
    let matches = Command::new("level_inspect")
        .about("Loads a level file and prints its camera, objects and controllers")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("Level file to load")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Loader configuration (.toml or .ron)"),
        )
        .arg(
            Arg::new("assets")
                .short('a')
                .long("assets")
                .value_name("DIR")
                .help("Asset directory to scan; may be repeated (overrides the configured search paths)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("controllers")
                .long("controllers")
                .help("List the registered controller types and their attributes, then exit")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => LoaderConfig::load_from_file(path).with_context(|| format!("Failed to load config {path}"))?,
        None => LoaderConfig::default(),
    };
    logging::init_with_filter(&config.log_filter);

    let registry = ControllerRegistry::with_builtins().context("Failed to register built-in controllers")?;
    if matches.get_flag("controllers") {
        print!("{}", describe_registry(&registry));
        return Ok(());
    }

    let asset_dirs: Vec<PathBuf> = match matches.get_many::<String>("assets") {
        Some(dirs) => dirs.map(PathBuf::from).collect(),
        None => config
            .asset_search_paths
            .iter()
            .map(PathBuf::from)
            .filter(|dir| dir.is_dir())
            .collect(),
    };
    let assets = scan_assets(&asset_dirs)?;

    let file = matches
        .get_one::<String>("file")
        .map(PathBuf::from)
        .context("No level file given")?;
    let loader = LevelLoader::new(&registry, &assets).with_config(config);
    if !loader.can_load(&file) {
        log::warn!(
            "{} does not have a level extension ({})",
            file.display(),
            loader.config().file_extensions.join(", ")
        );
    }

    let level = loader
        .load_file(&file)
        .with_context(|| format!("Failed to load level {}", file.display()))?;
    print!("{}", summarize(&level));
    Ok(())
}

fn scan_assets(dirs: &[PathBuf]) -> Result<AssetCatalog> {
    let mut catalog = AssetCatalog::new();
    for dir in dirs {
        let added = catalog
            .scan_dir(dir)
            .with_context(|| format!("Failed to scan asset directory {}", dir.display()))?;
        log::info!("{} asset(s) from {}", added, dir.display());
    }
    Ok(catalog)
}

fn summarize(level: &Level) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Initial camera: {}", level.initial_camera);
    let _ = writeln!(out, "Objects: {}", level.len());

    for (reference, object) in level.objects() {
        let t = &object.transform;
        let _ = writeln!(
            out,
            "{reference} {}\n  position ({}, {}, {})\n  rotation ({}, {}, {})\n  scale    ({}, {}, {})",
            object.name.as_deref().unwrap_or("<unnamed>"),
            t.position.x,
            t.position.y,
            t.position.z,
            t.rotation.x,
            t.rotation.y,
            t.rotation.z,
            t.scale.x,
            t.scale.y,
            t.scale.z,
        );
        for name in object.controller_names() {
            let _ = writeln!(out, "  - {name}");
        }
    }
    out
}

fn describe_registry(registry: &ControllerRegistry) -> String {
    let mut out = String::new();
    for entry in registry.iter() {
        let _ = writeln!(
            out,
            "{} ({})",
            entry.short_name().unwrap_or("-"),
            entry.type_name()
        );
        for attribute in entry.attributes().iter() {
            let _ = writeln!(out, "  {} {:?}", attribute.name(), attribute.slot());
        }
    }
    out
}
