//! Class-space scanning
//!
//! [`ClassSpaceScanner`] enumerates the types of a namespace by walking the
//! directories its loader maps the namespace to. Every `.type` file is an
//! artifact naming one type: the namespace, the relative directory segments
//! and the file stem. Directories whose name contains a `.` are never entered.

mod criteria;
mod loader;

pub use criteria::{ClassCriteria, ClassCriteriaBuilder, DEFAULT_MAX_RESULTS};
pub use loader::{
    artifact_path, context_loader, namespace_path, set_context_loader, DirectoryLoader,
    NamespaceLoader, ARTIFACT_SUFFIX,
};

use beancheck_reflect::{TypeDescriptor, NAMESPACE_SEPARATOR};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::error::{ProbeError, Result};

/// Check that a namespace name is non-empty and made of non-empty segments
fn validate_namespace(namespace: &str) -> Result<()> {
    let valid = !namespace.is_empty()
        && namespace.split(NAMESPACE_SEPARATOR).all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '$')
        });
    if valid {
        Ok(())
    } else {
        Err(ProbeError::precondition(format!(
            "invalid namespace name '{}'",
            namespace
        )))
    }
}

/// Directories with a `.` in their name are not namespaces
fn is_traversable(entry: &DirEntry) -> bool {
    !entry.file_type().is_dir() || !entry.file_name().to_string_lossy().contains('.')
}

/// Qualified name of the artifact at `relative` inside `namespace`
fn qualified_name(namespace: &str, relative: &Path) -> Option<String> {
    let file_name = relative.file_name()?.to_str()?;
    let stem = file_name.strip_suffix(ARTIFACT_SUFFIX)?;
    let mut name = namespace.to_string();
    if let Some(parent) = relative.parent() {
        for segment in parent.iter() {
            name.push(NAMESPACE_SEPARATOR);
            name.push_str(&segment.to_string_lossy());
        }
    }
    name.push(NAMESPACE_SEPARATOR);
    name.push_str(stem);
    Some(name)
}

/// Finds the types of a namespace
#[derive(Default)]
pub struct ClassSpaceScanner {
    loader: Option<Arc<dyn NamespaceLoader>>,
}

impl ClassSpaceScanner {
    /// Scanner using the calling thread's context loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Scanner using an explicit loader
    pub fn with_loader(loader: Arc<dyn NamespaceLoader>) -> Self {
        Self {
            loader: Some(loader),
        }
    }

    fn loader(&self) -> Result<Arc<dyn NamespaceLoader>> {
        self.loader
            .clone()
            .or_else(context_loader)
            .ok_or(ProbeError::LoaderUnavailable)
    }

    /// Types of `namespace` accepted by `criteria`, in file-name order
    ///
    /// Locations that do not exist contribute nothing. The scan stops as soon
    /// as `criteria.max_results()` types are found.
    pub fn find_classes(
        &self,
        namespace: &str,
        criteria: &ClassCriteria,
    ) -> Result<Vec<TypeDescriptor>> {
        validate_namespace(namespace)?;
        let loader = self.loader()?;

        let mut found = Vec::new();
        for location in loader.locations(namespace) {
            if found.len() >= criteria.max_results() {
                break;
            }
            if !location.is_dir() {
                debug!(namespace, location = %location.display(), "location does not exist");
                continue;
            }
            scan_location(loader.as_ref(), namespace, &location, criteria, &mut found)?;
        }

        debug!(namespace, count = found.len(), "scan complete");
        Ok(found)
    }

    /// Types sharing the namespace of `ty`
    pub fn find_classes_in_package_of(
        &self,
        ty: &TypeDescriptor,
        criteria: &ClassCriteria,
    ) -> Result<Vec<TypeDescriptor>> {
        self.find_classes(ty.namespace(), criteria)
    }
}

fn scan_location(
    loader: &dyn NamespaceLoader,
    namespace: &str,
    location: &Path,
    criteria: &ClassCriteria,
    found: &mut Vec<TypeDescriptor>,
) -> Result<()> {
    let max_depth = if criteria.is_recursive() { usize::MAX } else { 1 };
    let walker = WalkDir::new(location)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(is_traversable);

    for entry in walker {
        let entry = entry.map_err(|source| ProbeError::Scan {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| location.to_path_buf()),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(location).unwrap_or(entry.path());
        let Some(name) = qualified_name(namespace, relative) else {
            continue;
        };
        let ty = loader.load(&name)?;

        let path = entry.path().to_string_lossy();
        if !criteria.accepts(&ty, &path) {
            trace!(ty = %ty, path = %path, "filtered out");
            continue;
        }

        found.push(ty);
        if found.len() >= criteria.max_results() {
            debug!(namespace, max = criteria.max_results(), "result cap reached");
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_namespace() {
        assert!(validate_namespace("acme.model").is_ok());
        assert!(validate_namespace("acme").is_ok());
        assert!(validate_namespace("").unwrap_err().is_precondition());
        assert!(validate_namespace("acme..model").is_err());
        assert!(validate_namespace(".acme").is_err());
        assert!(validate_namespace("acme/model").is_err());
        assert!(validate_namespace("acme model").is_err());
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(
            qualified_name("acme", Path::new("Dummy.type")),
            Some("acme.Dummy".to_string())
        );
        assert_eq!(
            qualified_name("acme", &PathBuf::from("sub").join("Outer$Inner.type")),
            Some("acme.sub.Outer$Inner".to_string())
        );
        assert_eq!(qualified_name("acme", Path::new("notes.txt")), None);
    }

    #[test]
    fn test_no_loader() {
        set_context_loader(None);
        let err = ClassSpaceScanner::new()
            .find_classes("acme", &ClassCriteria::default())
            .unwrap_err();
        assert!(matches!(err, ProbeError::LoaderUnavailable));
    }
}
