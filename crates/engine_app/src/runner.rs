//! Load → update → inspect → save pipeline.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use engine_component::system::run_fixed;
use engine_component::{
    ComponentRegistry, DocumentFormat, Entity, EntityAllocator, LoadReport, TextInspector,
};
use engine_math::Movement;

use crate::config::AppConfig;

/// What a run did.
#[derive(Debug)]
pub struct RunSummary {
    /// The loaded and updated entity.
    pub entity: Entity,
    /// Load outcome, including skipped component documents.
    pub report: LoadReport,
    /// Inspector text, if requested.
    pub inspector: Option<String>,
}

/// Owns the registry and id allocator for a run.
#[derive(Debug)]
pub struct Runner {
    config: AppConfig,
    registry: ComponentRegistry,
    allocator: EntityAllocator,
}

impl Runner {
    /// Build a runner with every known component variant registered.
    ///
    /// # Errors
    ///
    /// Fails if two variants claim the same type identifier.
    pub fn new(config: AppConfig) -> Result<Self> {
        let mut registry = ComponentRegistry::new();
        engine_math::register_defaults(&mut registry).context("registering engine_math variants")?;
        components::register_all(&mut registry).context("registering demo variants")?;
        info!(types = registry.len(), "component registry ready");

        Ok(Self {
            config,
            registry,
            allocator: EntityAllocator::new(),
        })
    }

    /// The component registry.
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Read and reconstruct the entity stored at `path`.
    ///
    /// # Errors
    ///
    /// Fails on I/O, decoding, or component load errors.
    pub fn load(&mut self, path: &Path) -> Result<(Entity, LoadReport)> {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let doc = DocumentFormat::from_path(path)
            .decode(&bytes)
            .with_context(|| format!("decoding {}", path.display()))?;
        let id = self.allocator.allocate();
        let loaded = Entity::load(id, &doc, &self.registry)
            .with_context(|| format!("loading entity from {}", path.display()))?;
        Ok(loaded)
    }

    /// Serialise `entity` and write it to `path`.
    ///
    /// # Errors
    ///
    /// Fails on serialisation, encoding, or I/O errors.
    pub fn save(&self, entity: &Entity, path: &Path) -> Result<()> {
        let doc = entity
            .serialize()
            .with_context(|| format!("serialising {}", entity.id()))?;
        let bytes = DocumentFormat::from_path(path).encode(&doc)?;
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), components = doc.len(), "entity saved");
        Ok(())
    }

    /// Execute the configured pipeline.
    ///
    /// # Errors
    ///
    /// Fails on any load/save error, or in strict mode when components were
    /// skipped.
    pub fn run(&mut self) -> Result<RunSummary> {
        let input = self.config.input.clone();
        let (entity, report) = self.load(&input)?;

        if !report.is_complete() {
            for skipped in &report.skipped {
                warn!(index = skipped.index, component = %skipped.type_name, "unknown component type");
            }
            if self.config.strict {
                bail!(
                    "{} component(s) in {} have unknown types",
                    report.skipped_count(),
                    input.display()
                );
            }
        }

        let mut entities = vec![entity];
        if self.config.ticks > 0 {
            let mut movement = Movement::new();
            run_fixed(&mut movement, &mut entities, self.config.ticks, self.config.dt);
            info!(ticks = self.config.ticks, moved = movement.moved(), "updates applied");
        }
        let Some(mut entity) = entities.pop() else {
            bail!("entity vanished during update");
        };

        let inspector = self.config.inspect.then(|| {
            let mut ui = TextInspector::new();
            entity.render_editor(&mut ui);
            ui.into_string()
        });

        if let Some(output) = self.config.output.clone() {
            self.save(&entity, &output)?;
        }

        Ok(RunSummary {
            entity,
            report,
            inspector,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use engine_math::{Position, Velocity};
    use serde_json::json;

    use super::*;

    /// Per-test directory under the system temp dir, removed on drop.
    struct Scratch {
        dir: PathBuf,
    }

    impl Scratch {
        fn new(test: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("engine_app-{}-{test}", std::process::id()));
            std::fs::create_dir_all(&dir).unwrap();
            Self { dir }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.join(name)
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    fn write_json(path: &Path, value: serde_json::Value) {
        std::fs::write(path, serde_json::to_vec(&value).unwrap()).unwrap();
    }

    #[test]
    fn test_registry_has_all_variants() {
        let runner = Runner::new(AppConfig::new("unused.json")).unwrap();
        assert!(runner.registry().contains("Position"));
        assert!(runner.registry().contains("Velocity"));
        assert!(runner.registry().contains("Health"));
    }

    #[test]
    fn test_run_moves_and_saves() {
        let scratch = Scratch::new("moves");
        let input = scratch.path("moves.json");
        let output = scratch.path("moves-out.msgpack");
        write_json(
            &input,
            json!({ "components": [
                { "type": "Position", "x": 0.0, "y": 0.0 },
                { "type": "Velocity", "linear": [1.0, 2.0] }
            ]}),
        );

        let config = AppConfig::new(&input)
            .with_ticks(2, 0.5)
            .with_output(&output)
            .inspect(true);
        let summary = Runner::new(config).unwrap().run().unwrap();
        assert_eq!(summary.entity.get::<Position>(), Some(&Position::new(1.0, 2.0)));
        assert!(summary.inspector.unwrap().contains("[Velocity]"));

        let mut reader = Runner::new(AppConfig::new(&output)).unwrap();
        let (saved, report) = reader.load(&output).unwrap();
        assert!(report.is_complete());
        assert_eq!(saved.get::<Position>(), Some(&Position::new(1.0, 2.0)));
        assert_eq!(saved.get::<Velocity>(), Some(&Velocity::new(1.0, 2.0)));
    }

    #[test]
    fn test_strict_mode_rejects_unknown_types() {
        let scratch = Scratch::new("strict");
        let input = scratch.path("strict.json");
        write_json(
            &input,
            json!({ "components": [
                { "type": "Position", "x": 0.0, "y": 0.0 },
                { "type": "Nonexistent" }
            ]}),
        );

        let lenient = Runner::new(AppConfig::new(&input)).unwrap().run().unwrap();
        assert_eq!(lenient.report.skipped_count(), 1);
        assert_eq!(lenient.entity.len(), 1);

        let strict = Runner::new(AppConfig::new(&input).strict(true)).unwrap().run();
        assert!(strict.is_err());
    }

    #[test]
    fn test_missing_field_fails_run() {
        let scratch = Scratch::new("missing");
        let input = scratch.path("missing.json");
        write_json(
            &input,
            json!({ "components": [{ "type": "Position", "x": 1.0 }] }),
        );
        let err = Runner::new(AppConfig::new(&input)).unwrap().run().unwrap_err();
        assert!(format!("{err:#}").contains("missing field 'y'"));
    }

    #[test]
    fn test_loaded_entities_get_distinct_ids() {
        let scratch = Scratch::new("ids");
        let input = scratch.path("ids.json");
        write_json(&input, json!({ "components": [] }));
        let mut runner = Runner::new(AppConfig::new(&input)).unwrap();
        let (first, _) = runner.load(&input).unwrap();
        let (second, _) = runner.load(&input).unwrap();
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let scratch = Scratch::new("cleanup");
        let input = scratch.path("cleanup.json");
        write_json(&input, json!({ "components": [] }));
        let dir = scratch.dir.clone();
        assert!(dir.is_dir());
        drop(scratch);
        assert!(!dir.exists());
    }

    #[test]
    fn test_save_rejects_non_finite_state() {
        let scratch = Scratch::new("non-finite");
        let input = scratch.path("far.json");
        let output = scratch.path("far-out.json");
        write_json(
            &input,
            json!({ "components": [
                { "type": "Position", "x": 3.0e38, "y": 0.0 },
                { "type": "Velocity", "linear": [3.0e38, 0.0] }
            ]}),
        );

        let config = AppConfig::new(&input).with_ticks(2, 1.0).with_output(&output);
        let err = Runner::new(config).unwrap().run().unwrap_err();
        assert!(format!("{err:#}").contains("Position"));
        assert!(!output.exists());
    }
}
