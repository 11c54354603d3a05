//! Namespace loaders
//!
//! A [`NamespaceLoader`] maps a namespace to the directories holding its
//! artifacts and turns artifact names into type descriptors. Scans use either
//! an explicitly supplied loader or the calling thread's context loader.

use beancheck_reflect::{TypeCatalog, TypeDescriptor, NAMESPACE_SEPARATOR};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ProbeError, Result};

/// File suffix of a compiled type artifact
pub const ARTIFACT_SUFFIX: &str = ".type";

/// Maps namespaces to locations and artifacts to types
pub trait NamespaceLoader: Send + Sync {
    /// Candidate directories for `namespace`; they need not exist
    fn locations(&self, namespace: &str) -> Vec<PathBuf>;

    /// Materialize the type named by an artifact
    fn load(&self, qualified_name: &str) -> Result<TypeDescriptor>;
}

/// Loader over a list of root directories, resolving types from a catalog
///
/// Namespace `a.b` maps to `<root>/a/b` for every root.
pub struct DirectoryLoader {
    roots: Vec<PathBuf>,
    catalog: Arc<TypeCatalog>,
}

impl DirectoryLoader {
    /// Create a loader over `roots`
    pub fn new<I, P>(roots: I, catalog: Arc<TypeCatalog>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            catalog,
        }
    }

    /// Root directories
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

/// Relative directory of a namespace
pub fn namespace_path(namespace: &str) -> PathBuf {
    namespace.split(NAMESPACE_SEPARATOR).collect()
}

/// Path of the artifact for `qualified_name` under `root`
pub fn artifact_path(root: &Path, qualified_name: &str) -> PathBuf {
    let mut path = root.join(namespace_path(qualified_name));
    let stem = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.set_file_name(format!("{}{}", stem, ARTIFACT_SUFFIX));
    path
}

impl NamespaceLoader for DirectoryLoader {
    fn locations(&self, namespace: &str) -> Vec<PathBuf> {
        let relative = namespace_path(namespace);
        self.roots.iter().map(|root| root.join(&relative)).collect()
    }

    fn load(&self, qualified_name: &str) -> Result<TypeDescriptor> {
        self.catalog
            .get(qualified_name)
            .ok_or_else(|| ProbeError::ArtifactLoad {
                name: qualified_name.to_string(),
                reason: "type is not registered in the catalog".to_string(),
            })
    }
}

thread_local! {
    static CONTEXT_LOADER: RefCell<Option<Arc<dyn NamespaceLoader>>> = RefCell::new(None);
}

/// Install the calling thread's context loader, returning the previous one
pub fn set_context_loader(
    loader: Option<Arc<dyn NamespaceLoader>>,
) -> Option<Arc<dyn NamespaceLoader>> {
    CONTEXT_LOADER.with(|slot| slot.replace(loader))
}

/// The calling thread's context loader
pub fn context_loader() -> Option<Arc<dyn NamespaceLoader>> {
    CONTEXT_LOADER.with(|slot| slot.borrow().clone())
}
