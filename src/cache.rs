use parking_lot::RwLock;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::descriptor::{SfcDescriptor, SfcParser};
use crate::error::{Result, TransformError};
use crate::filter::Filter;
use crate::request::normalize_path;

/// Length of a scope id in hex characters.
const SCOPE_ID_LEN: usize = 8;

/// Parsed descriptors keyed by filename.
///
/// An entry is returned as-is until it is invalidated; the cache never checks
/// whether the file changed on disk.
pub struct DescriptorCache {
    root: PathBuf,
    parser: Arc<dyn SfcParser>,
    entries: RwLock<HashMap<String, Arc<SfcDescriptor>>>,
}

impl DescriptorCache {
    pub fn new(root: impl Into<PathBuf>, parser: Arc<dyn SfcParser>) -> Self {
        Self {
            root: root.into(),
            parser,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn compute_hash(source: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Scope id of `filename`: a short hash of its path relative to the root.
    pub fn scope_id(&self, filename: &str) -> String {
        let path = Path::new(filename);
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let mut hash = Self::compute_hash(&normalize_path(&relative.to_string_lossy()));
        hash.truncate(SCOPE_ID_LEN);
        hash
    }

    pub fn get(&self, filename: &str) -> Option<Arc<SfcDescriptor>> {
        self.entries.read().get(filename).cloned()
    }

    /// Cached descriptor for `filename`, parsing it on a miss.
    ///
    /// On a miss the source is `source` when given, else the file is read from
    /// disk. On a hit `source` is ignored.
    pub fn get_or_parse(&self, filename: &str, source: Option<&str>) -> Result<Arc<SfcDescriptor>> {
        if let Some(descriptor) = self.get(filename) {
            tracing::debug!(filename, "descriptor cache hit");
            return Ok(descriptor);
        }

        tracing::debug!(filename, from_disk = source.is_none(), "descriptor cache miss");
        let descriptor = match source {
            Some(source) => self.build(filename, source)?,
            None => {
                let source = read_source(Path::new(filename))?;
                self.build(filename, &source)?
            }
        };

        let descriptor = Arc::new(descriptor);
        // Two racing misses both parse; the later insert wins.
        self.entries
            .write()
            .insert(filename.to_string(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    fn build(&self, filename: &str, source: &str) -> Result<SfcDescriptor> {
        let mut descriptor = self.parser.parse(source, filename)?;
        descriptor.id = self.scope_id(filename);
        Ok(descriptor)
    }

    /// Drop the entry for `filename`. Returns whether one was cached.
    pub fn invalidate(&self, filename: &str) -> bool {
        let removed = self.entries.write().remove(filename).is_some();
        if removed {
            tracing::debug!(filename, "descriptor invalidated");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Parse every file under `dir` accepted by `filter` and cache it.
    /// Files that fail to read or parse are skipped. Returns the number cached.
    pub fn warm(&self, dir: &Path, filter: &Filter) -> usize {
        let files: Vec<PathBuf> = WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| filter.matches(&path.to_string_lossy()))
            .collect();

        let parsed: Vec<(String, SfcDescriptor)> = files
            .par_iter()
            .filter_map(|path| {
                let filename = path.to_string_lossy().to_string();
                if self.get(&filename).is_some() {
                    return None;
                }
                let result =
                    read_source(path).and_then(|source| self.build(&filename, &source));
                match result {
                    Ok(descriptor) => Some((filename, descriptor)),
                    Err(e) => {
                        tracing::warn!(file = %filename, error = %e, "skipping component during warm-up");
                        None
                    }
                }
            })
            .collect();

        let count = parsed.len();
        let mut entries = self.entries.write();
        for (filename, descriptor) in parsed {
            entries.insert(filename, Arc::new(descriptor));
        }
        tracing::debug!(dir = %dir.display(), count, "descriptor cache warmed");
        count
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::BlockParser;
    use crate::filter::FilterPattern;

    fn cache(root: &Path) -> DescriptorCache {
        DescriptorCache::new(root, Arc::new(BlockParser))
    }

    #[test]
    fn test_repeated_lookups_return_same_descriptor() {
        let cache = cache(Path::new("/project"));
        let first = cache
            .get_or_parse("/project/src/A.vue", Some("<template><p/></template>"))
            .unwrap();
        let second = cache.get_or_parse("/project/src/A.vue", None).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.id, second.id);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_hit_ignores_new_source() {
        let cache = cache(Path::new("/project"));
        cache
            .get_or_parse("/project/A.vue", Some("<style>.a{}</style>"))
            .unwrap();
        let again = cache
            .get_or_parse("/project/A.vue", Some("<style>.a{}</style><style>.b{}</style>"))
            .unwrap();
        assert_eq!(again.styles.len(), 1);
    }

    #[test]
    fn test_scope_id_is_relative_path_hash() {
        let a = cache(Path::new("/one"));
        let b = cache(Path::new("/two"));
        let id_a = a.scope_id("/one/src/App.vue");
        let id_b = b.scope_id("/two/src/App.vue");
        assert_eq!(id_a, id_b);
        assert_eq!(id_a.len(), SCOPE_ID_LEN);
        assert_eq!(id_a, DescriptorCache::compute_hash("src/App.vue")[..SCOPE_ID_LEN]);
        assert_ne!(id_a, a.scope_id("/one/src/Other.vue"));
    }

    #[test]
    fn test_invalidate_forces_reparse() {
        let cache = cache(Path::new("/p"));
        let first = cache.get_or_parse("/p/A.vue", Some("")).unwrap();
        assert!(cache.invalidate("/p/A.vue"));
        assert!(!cache.invalidate("/p/A.vue"));
        let second = cache
            .get_or_parse("/p/A.vue", Some("<template></template>"))
            .unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(second.template.is_some());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let cache = cache(Path::new("/p"));
        let err = cache
            .get_or_parse("/p/definitely/not/here.vue", None)
            .unwrap_err();
        assert!(matches!(err, TransformError::Io { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_parse_failure_caches_nothing() {
        let cache = cache(Path::new("/p"));
        assert!(cache.get_or_parse("/p/A.vue", Some("<style>")).is_err());
        assert!(cache.get("/p/A.vue").is_none());
    }

    #[test]
    fn test_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Disk.vue");
        fs::write(&file, "<style scoped>.x{}</style>").unwrap();
        let cache = cache(dir.path());
        let d = cache.get_or_parse(&file.to_string_lossy(), None).unwrap();
        assert!(d.styles[0].scoped);
        assert_eq!(d.id, cache.scope_id(&file.to_string_lossy()));
    }

    #[test]
    fn test_warm_populates_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("A.vue"), "<template><a/></template>").unwrap();
        fs::write(dir.path().join("nested/B.vue"), "<script>export default {}</script>").unwrap();
        fs::write(dir.path().join("Broken.vue"), "<style>").unwrap();
        fs::write(dir.path().join("readme.md"), "# hi").unwrap();

        let filter = Filter::new(&[FilterPattern::regex(r"\.vue$")], &[], dir.path()).unwrap();
        let cache = cache(dir.path());
        assert_eq!(cache.warm(dir.path(), &filter), 2);
        assert_eq!(cache.len(), 2);
        assert!(cache
            .get(&dir.path().join("nested/B.vue").to_string_lossy())
            .is_some());
    }
}
