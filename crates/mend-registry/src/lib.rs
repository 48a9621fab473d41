//! Mend Registry - the persisted source of truth for asset metadata
//!
//! Maps asset ids to entries (path, spec, validation state, generation
//! provenance, reverse references) backed by a single JSON document in the
//! project root. Mutations persist synchronously; entries are only removed
//! by explicit unregistration, never because a file went missing.

mod document;
mod persist;

pub use document::{AssetEntry, RegistryDocument, REGISTRY_FILENAME, REGISTRY_VERSION};

use mend_core::{now_iso8601, MendError, Result};
use mend_spec::{AssetSpec, AssetType};
use persist::{write_json_atomic, FileLock};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Outcome of a full verification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyOutcome {
    pub valid: Vec<String>,
    pub missing: Vec<String>,
}

/// Aggregated registry statistics.
#[derive(Debug, Clone, Default)]
pub struct RegistryStats {
    pub total_assets: usize,
    pub validated_assets: usize,
    pub generated_assets: usize,
    pub assets_by_type: BTreeMap<String, usize>,
    pub total_references: usize,
}

/// The persisted asset registry for one project.
pub struct Registry {
    project_path: PathBuf,
    registry_path: PathBuf,
    document: RegistryDocument,
}

impl Registry {
    /// Open the registry for a project, creating and persisting an empty
    /// document on first access. Read failures other than "file absent"
    /// propagate.
    pub fn open<P: AsRef<Path>>(project_path: P) -> Result<Self> {
        let project_path = project_path.as_ref().to_path_buf();
        let registry_path = project_path.join(REGISTRY_FILENAME);

        let document = match std::fs::read_to_string(&registry_path) {
            Ok(content) => {
                let doc: RegistryDocument = serde_json::from_str(&content)?;
                if doc.version != REGISTRY_VERSION {
                    return Err(MendError::RegistryVersionMismatch {
                        expected: REGISTRY_VERSION,
                        found: doc.version,
                    });
                }
                doc
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let doc = RegistryDocument::empty(project_path.to_string_lossy());
                let mut registry = Self {
                    project_path,
                    registry_path,
                    document: doc,
                };
                registry.save()?;
                return Ok(registry);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            project_path,
            registry_path,
            document,
        })
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn registry_path(&self) -> &Path {
        &self.registry_path
    }

    /// Upsert an entry by id and persist.
    pub fn register(&mut self, entry: AssetEntry) -> Result<()> {
        self.document.assets.insert(entry.id.clone(), entry);
        self.save()
    }

    pub fn get(&self, id: &str) -> Option<&AssetEntry> {
        self.document.assets.get(id)
    }

    pub fn has(&self, id: &str) -> bool {
        self.document.assets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.document.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.assets.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &AssetEntry> {
        self.document.assets.values()
    }

    /// Check whether the registered file for `id` exists on disk.
    /// Does not mutate validation state; unknown ids report false.
    pub fn verify_exists(&self, id: &str) -> bool {
        self.get(id)
            .map(|entry| self.project_path.join(&entry.path).exists())
            .unwrap_or(false)
    }

    /// Check every entry's file, update `validated`/`lastValidated`, and
    /// persist once at the end.
    pub fn verify_all(&mut self) -> Result<VerifyOutcome> {
        let mut outcome = VerifyOutcome::default();
        let stamp = now_iso8601();

        for entry in self.document.assets.values_mut() {
            let exists = self.project_path.join(&entry.path).exists();
            entry.validated = exists;
            entry.last_validated = Some(stamp.clone());
            if exists {
                outcome.valid.push(entry.id.clone());
            } else {
                outcome.missing.push(entry.id.clone());
            }
        }

        self.save()?;
        Ok(outcome)
    }

    /// Record that `file_path` references `id`. Unknown ids are a hard
    /// error; duplicate references are ignored.
    pub fn add_reference(&mut self, id: &str, file_path: &str) -> Result<()> {
        let relative = self.relative_to_project(file_path);
        let entry = self
            .document
            .assets
            .get_mut(id)
            .ok_or_else(|| MendError::AssetNotFound(id.to_string()))?;

        if !entry.references.contains(&relative) {
            entry.references.push(relative);
            self.save()?;
        }
        Ok(())
    }

    /// Drop a reference record. Unknown ids and absent references are
    /// no-ops.
    pub fn remove_reference(&mut self, id: &str, file_path: &str) -> Result<()> {
        let relative = self.relative_to_project(file_path);
        let Some(entry) = self.document.assets.get_mut(id) else {
            return Ok(());
        };

        let before = entry.references.len();
        entry.references.retain(|r| r != &relative);
        if entry.references.len() != before {
            self.save()?;
        }
        Ok(())
    }

    pub fn find_by_reference(&self, file_path: &str) -> Vec<&AssetEntry> {
        let relative = self.relative_to_project(file_path);
        self.entries()
            .filter(|e| e.references.contains(&relative))
            .collect()
    }

    pub fn find_by_type(&self, kind: AssetType) -> Vec<&AssetEntry> {
        self.entries().filter(|e| e.kind == kind).collect()
    }

    pub fn find_by_spec<F>(&self, predicate: F) -> Vec<&AssetEntry>
    where
        F: Fn(&AssetSpec) -> bool,
    {
        self.entries().filter(|e| predicate(&e.spec)).collect()
    }

    /// Remove an entry entirely and persist. Unknown ids are a hard error.
    pub fn unregister(&mut self, id: &str) -> Result<()> {
        if self.document.assets.remove(id).is_none() {
            return Err(MendError::AssetNotFound(id.to_string()));
        }
        self.save()
    }

    /// Aggregate over current in-memory state; no I/O.
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            total_assets: self.len(),
            ..Default::default()
        };

        for entry in self.entries() {
            if entry.validated {
                stats.validated_assets += 1;
            }
            if entry.generated {
                stats.generated_assets += 1;
            }
            *stats.assets_by_type.entry(entry.kind.to_string()).or_insert(0) += 1;
            stats.total_references += entry.references.len();
        }

        stats
    }

    /// Persist the full document: lock, write to a temp file, rename.
    pub fn save(&mut self) -> Result<()> {
        let _lock = FileLock::acquire(&self.registry_path)?;
        write_json_atomic(&self.registry_path, &self.document)
    }

    /// Normalize a path to project-relative form with forward slashes.
    fn relative_to_project(&self, path: &str) -> String {
        let p = Path::new(path);
        let stripped = p.strip_prefix(&self.project_path).unwrap_or(p);
        stripped.to_string_lossy().replace('\\', "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_project() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mend_registry_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sprite_entry(project: &Path, id: &str, create_file: bool) -> AssetEntry {
        let rel = format!("assets/sprites/{}.png", id);
        if create_file {
            let path = project.join(&rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"png").unwrap();
        }
        AssetEntry::new(rel, AssetSpec::new(id, AssetType::Sprite))
    }

    #[test]
    fn test_open_creates_empty_registry() {
        let project = temp_project();
        let registry = Registry::open(&project).unwrap();

        assert!(registry.is_empty());
        assert!(project.join(REGISTRY_FILENAME).exists());

        fs::remove_dir_all(&project).ok();
    }

    #[test]
    fn test_register_and_reopen() {
        let project = temp_project();
        {
            let mut registry = Registry::open(&project).unwrap();
            registry
                .register(sprite_entry(&project, "hero_idle", false))
                .unwrap();
        }

        let registry = Registry::open(&project).unwrap();
        assert!(registry.has("hero_idle"));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("hero_idle").unwrap().path,
            "assets/sprites/hero_idle.png"
        );

        fs::remove_dir_all(&project).ok();
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let project = temp_project();
        Registry::open(&project).unwrap();

        let path = project.join(REGISTRY_FILENAME);
        let content = fs::read_to_string(&path).unwrap();
        fs::write(&path, content.replace("\"version\": 1", "\"version\": 99")).unwrap();

        let result = Registry::open(&project);
        assert!(matches!(
            result,
            Err(MendError::RegistryVersionMismatch { found: 99, .. })
        ));

        fs::remove_dir_all(&project).ok();
    }

    #[test]
    fn test_corrupt_registry_is_fatal() {
        let project = temp_project();
        fs::write(project.join(REGISTRY_FILENAME), b"{ not json").unwrap();

        assert!(matches!(
            Registry::open(&project),
            Err(MendError::JsonError(_))
        ));

        fs::remove_dir_all(&project).ok();
    }

    #[test]
    fn test_verify_exists_no_mutation() {
        let project = temp_project();
        let mut registry = Registry::open(&project).unwrap();
        registry
            .register(sprite_entry(&project, "hero_idle", true))
            .unwrap();

        assert!(registry.verify_exists("hero_idle"));
        assert!(!registry.verify_exists("missing_one"));
        // verify_exists never touches validation state
        assert!(!registry.get("hero_idle").unwrap().validated);

        fs::remove_dir_all(&project).ok();
    }

    #[test]
    fn test_verify_all_flags_missing_without_deleting() {
        let project = temp_project();
        let mut registry = Registry::open(&project).unwrap();
        registry
            .register(sprite_entry(&project, "hero_idle", true))
            .unwrap();

        let first = registry.verify_all().unwrap();
        assert_eq!(first.valid, vec!["hero_idle".to_string()]);
        assert!(registry.get("hero_idle").unwrap().validated);

        // Delete the file from disk; the entry must survive with validated=false
        fs::remove_file(project.join("assets/sprites/hero_idle.png")).unwrap();
        let second = registry.verify_all().unwrap();
        assert_eq!(second.missing, vec!["hero_idle".to_string()]);

        let entry = registry.get("hero_idle").unwrap();
        assert!(!entry.validated);
        assert!(entry.last_validated.is_some());
        assert!(registry.has("hero_idle"));

        fs::remove_dir_all(&project).ok();
    }

    #[test]
    fn test_verify_all_is_idempotent() {
        let project = temp_project();
        let mut registry = Registry::open(&project).unwrap();
        registry
            .register(sprite_entry(&project, "hero_idle", true))
            .unwrap();
        registry
            .register(sprite_entry(&project, "hero_walk", false))
            .unwrap();

        let first = registry.verify_all().unwrap();
        let second = registry.verify_all().unwrap();
        assert_eq!(first, second);

        fs::remove_dir_all(&project).ok();
    }

    #[test]
    fn test_add_reference_unknown_id_fails() {
        let project = temp_project();
        let mut registry = Registry::open(&project).unwrap();

        let result = registry.add_reference("ghost", "src/Game.ts");
        assert!(matches!(result, Err(MendError::AssetNotFound(_))));

        fs::remove_dir_all(&project).ok();
    }

    #[test]
    fn test_references_dedup_and_normalize() {
        let project = temp_project();
        let mut registry = Registry::open(&project).unwrap();
        registry
            .register(sprite_entry(&project, "hero_idle", false))
            .unwrap();

        registry.add_reference("hero_idle", "src/Game.ts").unwrap();
        registry.add_reference("hero_idle", "src/Game.ts").unwrap();
        let absolute = project.join("src/Game.ts");
        registry
            .add_reference("hero_idle", &absolute.to_string_lossy())
            .unwrap();

        let entry = registry.get("hero_idle").unwrap();
        assert_eq!(entry.references, vec!["src/Game.ts".to_string()]);

        registry
            .remove_reference("hero_idle", "src/Game.ts")
            .unwrap();
        assert!(registry.get("hero_idle").unwrap().references.is_empty());

        fs::remove_dir_all(&project).ok();
    }

    #[test]
    fn test_queries() {
        let project = temp_project();
        let mut registry = Registry::open(&project).unwrap();
        registry
            .register(sprite_entry(&project, "hero_idle", false))
            .unwrap();

        let mut bg_spec = AssetSpec::new("cave", AssetType::Background);
        bg_spec.resolution = Some("320x180".to_string());
        registry
            .register(AssetEntry::new("assets/backgrounds/cave.png", bg_spec))
            .unwrap();
        registry.add_reference("cave", "src/Level.ts").unwrap();

        assert_eq!(registry.find_by_type(AssetType::Background).len(), 1);
        assert_eq!(registry.find_by_reference("src/Level.ts")[0].id, "cave");
        let with_res = registry.find_by_spec(|s| s.resolution.is_some());
        assert_eq!(with_res.len(), 1);
        assert_eq!(with_res[0].id, "cave");

        fs::remove_dir_all(&project).ok();
    }

    #[test]
    fn test_unregister() {
        let project = temp_project();
        let mut registry = Registry::open(&project).unwrap();
        registry
            .register(sprite_entry(&project, "hero_idle", false))
            .unwrap();

        registry.unregister("hero_idle").unwrap();
        assert!(!registry.has("hero_idle"));
        assert!(matches!(
            registry.unregister("hero_idle"),
            Err(MendError::AssetNotFound(_))
        ));

        fs::remove_dir_all(&project).ok();
    }

    #[test]
    fn test_stats() {
        let project = temp_project();
        let mut registry = Registry::open(&project).unwrap();
        registry
            .register(sprite_entry(&project, "hero_idle", true))
            .unwrap();
        registry
            .register(sprite_entry(&project, "hero_walk", false))
            .unwrap();
        registry
            .register(AssetEntry::generated(
                "assets/ui/coin.png",
                AssetSpec::new("coin", AssetType::Icon),
                None,
                vec!["src/Hud.ts".to_string()],
            ))
            .unwrap();
        registry.verify_all().unwrap();

        let stats = registry.stats();
        assert_eq!(stats.total_assets, 3);
        assert_eq!(stats.generated_assets, 1);
        assert_eq!(stats.validated_assets, 1); // only hero_idle's file exists
        assert_eq!(stats.assets_by_type.get("sprite"), Some(&2));
        assert_eq!(stats.assets_by_type.get("icon"), Some(&1));
        assert_eq!(stats.total_references, 1);

        fs::remove_dir_all(&project).ok();
    }

    #[test]
    fn test_save_roundtrip_stable() {
        let project = temp_project();
        let mut registry = Registry::open(&project).unwrap();
        registry
            .register(sprite_entry(&project, "b_sprite", false))
            .unwrap();
        registry
            .register(sprite_entry(&project, "a_sprite", false))
            .unwrap();

        let first = fs::read_to_string(registry.registry_path()).unwrap();
        let mut reopened = Registry::open(&project).unwrap();
        reopened.save().unwrap();
        let second = fs::read_to_string(registry.registry_path()).unwrap();
        assert_eq!(first, second);

        fs::remove_dir_all(&project).ok();
    }
}
