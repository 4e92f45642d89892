//! Top-level directive dispatcher

use std::path::Path;

use super::coerce::coerce_as;
use super::cursor::{LineCursor, SourceLine};
use super::error::LevelError;
use super::model::Level;
use super::object::{read_object, ObjectContext};
use super::variables::VariableTable;
use crate::assets::AssetLookup;
use crate::config::LoaderConfig;
use crate::controllers::ControllerRegistry;

/// Reads level files into [`Level`]s
///
/// A loader borrows its collaborators and can be reused; every load starts
/// with an empty variable table.
pub struct LevelLoader<'a> {
    registry: &'a ControllerRegistry,
    assets: &'a dyn AssetLookup,
    config: LoaderConfig,
}

impl<'a> LevelLoader<'a> {
    /// Create a loader with the default configuration
    pub fn new(registry: &'a ControllerRegistry, assets: &'a dyn AssetLookup) -> Self {
        Self {
            registry,
            assets,
            config: LoaderConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Whether `path` has an extension this loader accepts
    pub fn can_load(&self, path: impl AsRef<Path>) -> bool {
        self.config.accepts(path)
    }

    /// Read and load a level file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Level, LevelError> {
        let path = path.as_ref();
        log::info!("Loading level {}", path.display());
        let source = std::fs::read_to_string(path).map_err(|e| {
            log::error!("Failed to read level {}: {}", path.display(), e);
            LevelError::Io(e)
        })?;
        self.load_str(&source)
    }

    /// Load a level from source text
    pub fn load_str(&self, source: &str) -> Result<Level, LevelError> {
        let mut cursor = LineCursor::new(source);
        let mut variables = VariableTable::new();
        let mut level = Level::new();

        match self.read_directives(&mut cursor, &mut variables, &mut level) {
            Ok(()) => {
                log::info!(
                    "Loaded level with {} object(s), initial camera {}",
                    level.len(),
                    level.initial_camera
                );
                Ok(level)
            }
            Err(err) => {
                log::error!("Level load failed at line {}: {}", cursor.line_number(), err);
                Err(err)
            }
        }
    }

    fn read_directives(
        &self,
        cursor: &mut LineCursor<'_>,
        variables: &mut VariableTable,
        level: &mut Level,
    ) -> Result<(), LevelError> {
        while let Some(line) = cursor.next_line(variables) {
            let tokens = line.tokens();
            log::trace!("line {}: {}", line.number, line.text);

            match tokens.as_slice() {
                ["Set", key, _, ..] => {
                    let value = remainder_after(&line.text, 2);
                    log::debug!("Set {key} = {value}");
                    variables.set(*key, value);
                }
                ["InitialCamera", _] => {
                    level.initial_camera = coerce_as(&tokens, 1, true)?;
                }
                ["Object"] | ["Object", _] => {
                    let name: Option<String> = match tokens.len() {
                        2 => Some(coerce_as(&tokens, 1, true)?),
                        _ => None,
                    };
                    if let Some(name) = &name {
                        if level.has_name(name) {
                            return Err(LevelError::DuplicateObjectName(name.clone()));
                        }
                    }

                    let reference = level.next_ref();
                    let context = ObjectContext {
                        registry: self.registry,
                        assets: self.assets,
                        variables: &*variables,
                    };
                    let mut object = read_object(cursor, context, reference)?;
                    log::debug!(
                        "Object {reference} ({}) with {} controller(s)",
                        name.as_deref().unwrap_or("unnamed"),
                        object.controllers.len()
                    );
                    object.name = name;
                    level.insert(object)?;
                }
                _ => return Err(syntax(&line)),
            }
        }
        Ok(())
    }
}

fn syntax(line: &SourceLine) -> LevelError {
    LevelError::Syntax {
        line: line.text.clone(),
        line_number: line.number,
        object: None,
    }
}

/// Text after the first `skip` whitespace-separated tokens, trimmed
fn remainder_after(text: &str, skip: usize) -> &str {
    let mut rest = text.trim_start();
    for _ in 0..skip {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest[end..].trim_start();
    }
    rest.trim_end()
}
