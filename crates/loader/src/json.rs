//! Loaders reading declarations from JSON.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, trace};
use vigil_validator::{ClassBuilder, GroupRegistry, MetadataLoader, Result, Specification};

use crate::convert::ClassDeclarations;
use crate::document::{ClassDocument, Document};
use crate::error::{LoaderError, LoaderResult};

// ============================================================================
// JSON LOADER
// ============================================================================

/// A whole declaration document parsed up front.
///
/// # Examples
///
/// ```rust,ignore
/// let loader = JsonLoader::from_path("constraints.json")?;
/// let validator = Validator::builder().types(types).loader(loader).build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonLoader {
    specification: Specification,
}

impl JsonLoader {
    /// Parses a declaration document.
    pub fn parse(json: &str) -> LoaderResult<Self> {
        let document: Document = serde_json::from_str(json)?;
        let specification = document.into_specification()?;
        debug!(
            classes = specification.classes().len(),
            groups = specification.groups().len(),
            "parsed declaration document"
        );
        Ok(Self { specification })
    }

    /// Reads and parses a declaration file.
    pub fn from_path(path: impl AsRef<Path>) -> LoaderResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LoaderError::io(path, e))?;
        debug!(path = %path.display(), "loading declarations");
        Self::parse(&content)
    }

    /// Parsed declarations.
    #[must_use]
    pub fn specification(&self) -> &Specification {
        &self.specification
    }

    /// Consumes the loader, returning its declarations.
    #[must_use]
    pub fn into_specification(self) -> Specification {
        self.specification
    }
}

impl FromStr for JsonLoader {
    type Err = LoaderError;

    fn from_str(s: &str) -> LoaderResult<Self> {
        Self::parse(s)
    }
}

impl MetadataLoader for JsonLoader {
    fn load_class_metadata(&self, class: &mut ClassBuilder) -> Result<bool> {
        self.specification.load_class_metadata(class)
    }

    fn load_group_metadata(&self, groups: &mut GroupRegistry) {
        self.specification.load_group_metadata(groups);
    }
}

// ============================================================================
// DIRECTORY LOADER
// ============================================================================

/// Reads one file per class on demand.
///
/// Declarations for `App\Entity\Author` live in `<dir>/App.Entity.Author.json`
/// and hold a single class document (`constraints`, `properties`, `getters`,
/// `group_sequence`). A missing file means the class declares nothing.
/// Group compositions are not read from the directory.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    /// Loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the class files are read from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the declarations for `class`.
    #[must_use]
    pub fn path_for(&self, class: &str) -> PathBuf {
        let stem = class.replace("::", ".").replace(['\\', '/'], ".");
        self.root.join(format!("{stem}.json"))
    }

    fn read(&self, class: &str) -> LoaderResult<Option<ClassDeclarations>> {
        let path = self.path_for(class);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!(class, path = %path.display(), "no declaration file");
                return Ok(None);
            }
            Err(e) => return Err(LoaderError::io(path, e)),
        };
        let document: ClassDocument = serde_json::from_str(&content)?;
        debug!(class, path = %path.display(), "loaded class declarations");
        ClassDeclarations::try_from(document).map(Some)
    }
}

impl MetadataLoader for DirectoryLoader {
    fn load_class_metadata(&self, class: &mut ClassBuilder) -> Result<bool> {
        let name = class.class().to_owned();
        match self.read(&name).map_err(|e| e.into_validator_error(name))? {
            Some(declarations) if !declarations.is_empty() => {
                declarations.apply(class);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
