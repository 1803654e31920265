use std::fs;
use std::path::Path;

/// Ordered list of class labels, index-aligned with the model output.
///
/// The order MUST match what the training pipeline assigned when it built
/// the output layer. The documented convention is a lexicographic sort of
/// the dataset class directories, which is exactly what the directory
/// fallback reproduces.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    labels: Vec<String>,
}

impl ClassRegistry {
    pub fn from_labels(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Resolution order: side-car JSON file, then dataset directory
    /// listing (sorted), then empty. An empty registry decodes every
    /// prediction to "Unknown" but never blocks startup.
    pub fn load(class_file: &Path, dataset_dir: &Path) -> Self {
        if class_file.exists() {
            match Self::from_json_file(class_file) {
                Ok(registry) => {
                    log::info!(
                        "✅ Loaded {} class names from {}",
                        registry.len(),
                        class_file.display()
                    );
                    return registry;
                }
                Err(e) => {
                    log::error!(
                        "❌ Failed to parse class names file {}: {}",
                        class_file.display(),
                        e
                    );
                }
            }
        }

        if dataset_dir.is_dir() {
            let registry = Self::from_dataset_dir(dataset_dir);
            log::info!(
                "✅ Derived {} class names from dataset directory {}",
                registry.len(),
                dataset_dir.display()
            );
            return registry;
        }

        log::warn!("⚠️  No class name source found - all predictions will decode to Unknown");
        Self::default()
    }

    fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let labels: Vec<String> = serde_json::from_str(&contents)?;
        Ok(Self { labels })
    }

    /// Lexicographically sorted subdirectory names, mirroring how the
    /// training generator assigned class indices.
    fn from_dataset_dir(dir: &Path) -> Self {
        let mut labels: Vec<String> = fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().is_dir())
                    .filter_map(|e| e.file_name().into_string().ok())
                    .collect()
            })
            .unwrap_or_default();

        labels.sort();
        Self { labels }
    }

    pub fn label_for(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|s| s.as_str())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "soyleaf_registry_{}_{}",
            name,
            uuid::Uuid::new_v4().simple()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn json_file_order_is_preserved() {
        let dir = scratch_dir("json");
        let file = dir.join("class_names.json");
        fs::write(&file, r#"["rust", "bacterial_blight", "healthy"]"#).unwrap();

        let registry = ClassRegistry::load(&file, &dir.join("missing_dataset"));

        // Not sorted: the file's order is the model's order
        assert_eq!(registry.labels(), &["rust", "bacterial_blight", "healthy"]);
        assert_eq!(registry.label_for(0), Some("rust"));
        assert_eq!(registry.label_for(3), None);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn dataset_fallback_sorts_lexicographically() {
        let dir = scratch_dir("dataset");
        for class in ["rust", "healthy", "bacterial_blight"] {
            fs::create_dir_all(dir.join(class)).unwrap();
        }
        // Plain files in the dataset root are not classes
        fs::write(dir.join("notes.txt"), "ignore me").unwrap();

        let registry = ClassRegistry::load(&dir.join("missing.json"), &dir);

        assert_eq!(registry.labels(), &["bacterial_blight", "healthy", "rust"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_both_sources_yields_empty_registry() {
        let dir = scratch_dir("empty");

        let registry = ClassRegistry::load(&dir.join("missing.json"), &dir.join("missing_dataset"));

        assert!(registry.is_empty());
        assert_eq!(registry.label_for(0), None);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn corrupt_json_falls_back_to_dataset_listing() {
        let dir = scratch_dir("corrupt");
        let file = dir.join("class_names.json");
        fs::write(&file, "not json at all").unwrap();
        fs::create_dir_all(dir.join("healthy")).unwrap();

        let registry = ClassRegistry::load(&file, &dir);

        assert_eq!(registry.labels(), &["healthy"]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
