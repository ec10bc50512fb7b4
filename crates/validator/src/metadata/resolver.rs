//! Hierarchy merging and the per-class metadata cache.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexMap;
use tracing::{debug, trace};

use super::class::{ClassMetadata, PropertyMetadata};
use super::loader::MetadataLoader;
use crate::config::ValidatorConfig;
use crate::error::{Result, ValidatorError};
use crate::group::{DEFAULT_GROUP, GroupRegistry};
use crate::plugin::ConstraintRegistry;
use crate::spec::{ClassBuilder, ClassSpecification, ConstraintSpecification};
use crate::types::{PropertyKind, TypeRegistry, simple_name};

type Layer = IndexMap<String, Arc<ConstraintSpecification>>;

#[derive(Default)]
struct PropertyDraft {
    kind: PropertyKind,
    merged: Layer,
    local: Layer,
}

/// Resolves and caches [`ClassMetadata`].
///
/// Declarations are gathered from every loader, then merged in this order:
/// superclasses (root-most first), the full interface set, and finally the
/// class itself. Within the merge, constraints are keyed by name, so a later
/// layer redeclaring a name replaces the earlier constraint in place.
///
/// Both caches are concurrent maps; resolving the same class from several
/// threads yields the same `Arc`.
pub struct MetadataResolver {
    types: Arc<TypeRegistry>,
    loaders: Vec<Arc<dyn MetadataLoader>>,
    plugins: Arc<ConstraintRegistry>,
    config: ValidatorConfig,
    groups: GroupRegistry,
    declared: DashMap<String, Arc<ClassSpecification>>,
    resolved: DashMap<String, Arc<ClassMetadata>>,
}

impl MetadataResolver {
    /// Creates a resolver. Group compositions are collected immediately.
    pub fn new(
        types: Arc<TypeRegistry>,
        loaders: Vec<Arc<dyn MetadataLoader>>,
        plugins: Arc<ConstraintRegistry>,
        config: ValidatorConfig,
    ) -> Self {
        let mut groups = GroupRegistry::new();
        for loader in &loaders {
            loader.load_group_metadata(&mut groups);
        }
        debug!(
            loaders = loaders.len(),
            groups = groups.len(),
            "metadata resolver initialized"
        );
        Self {
            types,
            loaders,
            plugins,
            config,
            groups,
            declared: DashMap::new(),
            resolved: DashMap::new(),
        }
    }

    /// Type registry used for hierarchy walks and property access.
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Registered validator plugins.
    #[must_use]
    pub fn plugins(&self) -> &ConstraintRegistry {
        &self.plugins
    }

    /// Group compositions collected from the loaders.
    #[must_use]
    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Number of classes resolved so far.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.resolved.len()
    }

    /// Resolves `class`, computing and caching its metadata on first use.
    pub fn resolve(&self, class: &str) -> Result<Arc<ClassMetadata>> {
        if let Some(cached) = self.resolved.get(class) {
            return Ok(Arc::clone(cached.value()));
        }

        let metadata = Arc::new(self.merge(class)?);
        debug!(
            class,
            constraints = metadata.constraints.len(),
            properties = metadata.properties.len(),
            sequence = metadata.group_sequence.is_some(),
            "resolved class metadata"
        );

        let entry = self.resolved.entry(class.to_owned()).or_insert(metadata);
        Ok(Arc::clone(entry.value()))
    }

    /// Declarations contributed by the loaders for `class` alone.
    pub fn declared(&self, class: &str) -> Result<Arc<ClassSpecification>> {
        if let Some(cached) = self.declared.get(class) {
            return Ok(Arc::clone(cached.value()));
        }

        let mut builder = ClassBuilder::new(class);
        let mut found = false;
        for loader in &self.loaders {
            found |= loader.load_class_metadata(&mut builder)?;
        }
        let spec = Arc::new(builder.build()?);
        trace!(class, found, "loaded class declarations");

        let entry = self.declared.entry(class.to_owned()).or_insert(spec);
        Ok(Arc::clone(entry.value()))
    }

    fn merge(&self, class: &str) -> Result<ClassMetadata> {
        let class = self.types.get(class)?.name();
        let implicit_group = self
            .config
            .implicit_class_groups
            .then(|| simple_name(class));
        let tag = |constraint: &Arc<ConstraintSpecification>| match implicit_group {
            Some(group) if constraint.has_group(DEFAULT_GROUP) && !constraint.has_group(group) => {
                Arc::new(constraint.with_group(group))
            }
            _ => Arc::clone(constraint),
        };

        let mut inherited = self.types.ancestors(class)?;
        inherited.extend(self.types.interfaces(class)?);

        let mut constraints = Layer::new();
        let mut local = Layer::new();
        let mut properties: IndexMap<String, PropertyDraft> = IndexMap::new();

        for layer in inherited {
            let spec = self.declared(layer)?;
            for constraint in spec.constraints() {
                constraints.insert(constraint.name().to_owned(), tag(constraint));
            }
            for (name, property) in spec.properties() {
                let draft = properties.entry(name.clone()).or_default();
                if property.kind() == PropertyKind::Getter {
                    draft.kind = PropertyKind::Getter;
                }
                for constraint in property.constraints() {
                    draft
                        .merged
                        .insert(constraint.name().to_owned(), tag(constraint));
                }
            }
        }

        let own = self.declared(class)?;
        for constraint in own.constraints() {
            let tagged = tag(constraint);
            constraints.insert(constraint.name().to_owned(), Arc::clone(&tagged));
            local.insert(constraint.name().to_owned(), tagged);
        }
        for (name, property) in own.properties() {
            let draft = properties.entry(name.clone()).or_default();
            if property.kind() == PropertyKind::Getter {
                draft.kind = PropertyKind::Getter;
            }
            for constraint in property.constraints() {
                let tagged = tag(constraint);
                draft
                    .merged
                    .insert(constraint.name().to_owned(), Arc::clone(&tagged));
                draft.local.insert(constraint.name().to_owned(), tagged);
            }
        }

        for constraint in constraints.values() {
            self.check_options(class, constraint)?;
        }
        let properties = properties
            .into_iter()
            .map(|(name, draft)| -> Result<(String, PropertyMetadata)> {
                for constraint in draft.merged.values() {
                    self.check_options(class, constraint)?;
                }
                let access = self.types.resolve_access(class, &name, draft.kind)?;
                let metadata = PropertyMetadata {
                    class: class.to_owned(),
                    name: name.clone(),
                    kind: draft.kind,
                    access,
                    constraints: draft.merged.into_values().collect(),
                    local: draft.local.into_values().collect(),
                };
                Ok((name, metadata))
            })
            .collect::<Result<IndexMap<_, _>>>()?;

        Ok(ClassMetadata {
            class: class.to_owned(),
            constraints: constraints.into_values().collect(),
            local: local.into_values().collect(),
            properties,
            group_sequence: own.group_sequence().map(<[String]>::to_vec),
        })
    }

    fn check_options(&self, class: &str, constraint: &ConstraintSpecification) -> Result<()> {
        if let Some(plugin) = self.plugins.get(constraint.name()) {
            let schema = plugin.options();
            let missing = schema.missing(constraint);
            if !missing.is_empty() {
                return Err(ValidatorError::MissingOptions {
                    constraint: constraint.name().to_owned(),
                    class: class.to_owned(),
                    options: missing,
                });
            }
            let unknown = schema.unknown(constraint);
            if !unknown.is_empty() {
                return Err(ValidatorError::InvalidOptions {
                    constraint: constraint.name().to_owned(),
                    class: class.to_owned(),
                    options: unknown,
                });
            }
        }
        for value in constraint.options().values() {
            for nested in value.as_constraints().unwrap_or_default() {
                self.check_options(class, nested)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for MetadataResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataResolver")
            .field("loaders", &self.loaders.len())
            .field("plugins", &self.plugins)
            .field("config", &self.config)
            .field("groups", &self.groups)
            .field("resolved", &self.resolved.len())
            .finish()
    }
}
