//! Scan criteria

use beancheck_reflect::TypeDescriptor;
use regex::RegexSet;

use crate::error::{ProbeError, Result};

/// Default cap on the number of types a scan returns
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Frozen filter applied while scanning a namespace
#[derive(Debug, Clone)]
pub struct ClassCriteria {
    recursive: bool,
    exclude_interfaces: bool,
    exclude_enums: bool,
    exclude_annotations: bool,
    exclude_member_types: bool,
    exclude_paths: RegexSet,
    max_results: usize,
}

impl Default for ClassCriteria {
    /// Non-recursive, every kind included, at most 100 results
    fn default() -> Self {
        Self {
            recursive: false,
            exclude_interfaces: false,
            exclude_enums: false,
            exclude_annotations: false,
            exclude_member_types: false,
            exclude_paths: RegexSet::empty(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl ClassCriteria {
    /// Recursive, every kind included, at most 100 results
    pub fn recursive() -> Self {
        Self {
            recursive: true,
            ..Self::default()
        }
    }

    /// Start from the default criteria
    pub fn builder() -> ClassCriteriaBuilder {
        ClassCriteriaBuilder::default()
    }

    /// Whether sub-namespaces are scanned
    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Result cap
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Path exclusion patterns as given
    pub fn exclude_patterns(&self) -> &[String] {
        self.exclude_paths.patterns()
    }

    /// Check whether a type found at `path` passes every filter
    pub fn accepts(&self, ty: &TypeDescriptor, path: &str) -> bool {
        if self.exclude_interfaces && ty.is_interface() {
            return false;
        }
        if self.exclude_enums && ty.is_enum() {
            return false;
        }
        if self.exclude_annotations && ty.is_annotation() {
            return false;
        }
        if self.exclude_member_types && ty.is_member() {
            return false;
        }
        !self.exclude_paths.is_match(path)
    }
}

/// Builder for [`ClassCriteria`]
#[derive(Debug, Clone)]
pub struct ClassCriteriaBuilder {
    recursive: bool,
    exclude_interfaces: bool,
    exclude_enums: bool,
    exclude_annotations: bool,
    exclude_member_types: bool,
    exclude_paths: Vec<String>,
    max_results: usize,
}

impl Default for ClassCriteriaBuilder {
    fn default() -> Self {
        Self {
            recursive: false,
            exclude_interfaces: false,
            exclude_enums: false,
            exclude_annotations: false,
            exclude_member_types: false,
            exclude_paths: Vec::new(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl ClassCriteriaBuilder {
    /// Cap the number of results
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Scan sub-namespaces
    pub fn recursive_search(mut self) -> Self {
        self.recursive = true;
        self
    }

    /// Scan only the namespace itself
    pub fn non_recursive_search(mut self) -> Self {
        self.recursive = false;
        self
    }

    /// Leave out interfaces, annotations included
    pub fn exclude_interfaces(mut self) -> Self {
        self.exclude_interfaces = true;
        self
    }

    /// Keep interfaces
    pub fn include_interfaces(mut self) -> Self {
        self.exclude_interfaces = false;
        self
    }

    /// Leave out enums
    pub fn exclude_enums(mut self) -> Self {
        self.exclude_enums = true;
        self
    }

    /// Keep enums
    pub fn include_enums(mut self) -> Self {
        self.exclude_enums = false;
        self
    }

    /// Leave out annotation types
    pub fn exclude_annotations(mut self) -> Self {
        self.exclude_annotations = true;
        self
    }

    /// Keep annotation types
    pub fn include_annotations(mut self) -> Self {
        self.exclude_annotations = false;
        self
    }

    /// Leave out member types
    pub fn exclude_member_types(mut self) -> Self {
        self.exclude_member_types = true;
        self
    }

    /// Keep member types
    pub fn include_member_types(mut self) -> Self {
        self.exclude_member_types = false;
        self
    }

    /// Leave out interfaces, enums, annotations and member types
    pub fn exclude_all(self) -> Self {
        self.exclude_interfaces()
            .exclude_enums()
            .exclude_annotations()
            .exclude_member_types()
    }

    /// Keep every kind of type
    pub fn include_all(self) -> Self {
        self.include_interfaces()
            .include_enums()
            .include_annotations()
            .include_member_types()
    }

    /// Leave out artifacts whose full path matches any of `patterns`
    pub fn exclude_paths<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_paths
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Compile the patterns and freeze the criteria
    pub fn build(self) -> Result<ClassCriteria> {
        if self.max_results == 0 {
            return Err(ProbeError::precondition("max results must be positive"));
        }
        let exclude_paths = RegexSet::new(&self.exclude_paths).map_err(|err| {
            ProbeError::precondition(format!("invalid path exclusion pattern: {}", err))
        })?;
        Ok(ClassCriteria {
            recursive: self.recursive,
            exclude_interfaces: self.exclude_interfaces,
            exclude_enums: self.exclude_enums,
            exclude_annotations: self.exclude_annotations,
            exclude_member_types: self.exclude_member_types,
            exclude_paths,
            max_results: self.max_results,
        })
    }
}
