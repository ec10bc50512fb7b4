//! Runtime type descriptions: classes, interfaces, fields, and accessors.
//!
//! The engine never guesses at structure. Every class or interface an object
//! graph can contain is described up front by a [`TypeDescriptor`], and the
//! resulting [`TypeRegistry`] answers the questions the resolver and the
//! walker ask: the ancestor chain, the full interface set, subtype tests, and
//! how a property is read.

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::error::{Result, ValidatorError};
use crate::value::{ObjectRef, Value};

/// Computes a property value from an object.
pub type Accessor = Arc<dyn Fn(&ObjectRef) -> Value + Send + Sync>;

/// Whether a descriptor describes a class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Concrete (or abstract) class with at most one parent.
    Class,
    /// Interface; may extend any number of other interfaces.
    Interface,
}

/// How a property is declared, which restricts how it may be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum PropertyKind {
    /// Read from the field if declared, otherwise through an accessor.
    #[default]
    Member,
    /// Getter-style virtual property: only accessors are considered.
    Getter,
}

/// Strategy for reading a property, resolved once per property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyAccess {
    /// Read the named field directly.
    DirectField(String),
    /// Call a `getX`-style accessor.
    Getter(String),
    /// Call an `isX`-style accessor.
    BooleanAccessor(String),
}

impl PropertyAccess {
    /// Name of the field or accessor method this strategy reads.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::DirectField(name) | Self::Getter(name) | Self::BooleanAccessor(name) => name,
        }
    }
}

/// Description of one class or interface.
///
/// # Examples
///
/// ```rust,ignore
/// let author = TypeDescriptor::class("Author")
///     .extends("Person")
///     .implements("Named")
///     .field("firstName")
///     .method("isActive", |o| o.get("active").unwrap_or_default());
/// ```
#[derive(Clone)]
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
    parent: Option<String>,
    interfaces: Vec<String>,
    fields: IndexSet<String>,
    methods: IndexMap<String, Accessor>,
}

impl TypeDescriptor {
    /// Starts describing a class.
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    /// Starts describing an interface.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            interfaces: Vec::new(),
            fields: IndexSet::new(),
            methods: IndexMap::new(),
        }
    }

    /// Sets the parent class (classes) or adds an extended interface
    /// (interfaces).
    #[must_use = "builder methods must be chained or built"]
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        match self.kind {
            TypeKind::Class => self.parent = Some(parent.into()),
            TypeKind::Interface => self.interfaces.push(parent.into()),
        }
        self
    }

    /// Adds an implemented interface, in declaration order.
    #[must_use = "builder methods must be chained or built"]
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Declares a field readable by direct access.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into());
        self
    }

    /// Declares an accessor method such as `getFullName` or `isActive`.
    #[must_use = "builder methods must be chained or built"]
    pub fn method<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&ObjectRef) -> Value + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(accessor));
        self
    }

    /// Fully qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class or interface.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Parent class, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Directly implemented (or extended) interfaces in declaration order.
    #[must_use]
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("interfaces", &self.interfaces)
            .field("fields", &self.fields)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Returns the unqualified part of a type name (`App\Entity\Author` → `Author`).
#[must_use]
pub fn simple_name(name: &str) -> &str {
    name.rsplit(['\\', ':', '.']).next().unwrap_or(name)
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Immutable set of type descriptors, checked for consistency on build.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    /// Starts building a registry.
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    /// Looks up a descriptor.
    pub fn get(&self, name: &str) -> Result<&TypeDescriptor> {
        self.types
            .get(name)
            .ok_or_else(|| ValidatorError::unknown_class(name))
    }

    /// Returns `true` if the type is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Superclasses of `name`, root-most first, excluding `name` itself.
    pub fn ancestors(&self, name: &str) -> Result<Vec<&str>> {
        let mut chain = Vec::new();
        let mut current = self.get(name)?;
        while let Some(parent) = current.parent() {
            current = self.get(parent)?;
            chain.push(current.name());
        }
        chain.reverse();
        Ok(chain)
    }

    /// Every interface `name` implements, directly or through its ancestors
    /// and extended interfaces.
    ///
    /// Order is deterministic: classes are visited root-most first, each
    /// class's interfaces in declaration order, and an interface is listed
    /// after the interfaces it extends. Duplicates keep their first position.
    pub fn interfaces(&self, name: &str) -> Result<Vec<&str>> {
        let mut seen = IndexSet::new();
        let mut owners = self.ancestors(name)?;
        owners.push(self.get(name)?.name());
        for owner in owners {
            for interface in self.get(owner)?.interfaces() {
                self.collect_interface(interface, &mut seen)?;
            }
        }
        Ok(seen.into_iter().collect())
    }

    fn collect_interface<'r>(&'r self, name: &str, seen: &mut IndexSet<&'r str>) -> Result<()> {
        let descriptor = self.get(name)?;
        if seen.contains(descriptor.name()) {
            return Ok(());
        }
        for parent in descriptor.interfaces() {
            self.collect_interface(parent, seen)?;
        }
        seen.insert(descriptor.name());
        Ok(())
    }

    /// Returns `true` if `name` is `expected`, extends it, or implements it.
    #[must_use]
    pub fn is_subtype(&self, name: &str, expected: &str) -> bool {
        if name == expected {
            return true;
        }
        let in_chain = self
            .ancestors(name)
            .is_ok_and(|chain| chain.contains(&expected));
        in_chain
            || self
                .interfaces(name)
                .is_ok_and(|interfaces| interfaces.contains(&expected))
    }

    /// Decides how `property` of `class` is read.
    ///
    /// Preference order is the field, then `get<Property>`, then
    /// `is<Property>`; fields are skipped for getter-style properties.
    /// Fields and methods are looked up on the class and its ancestors.
    pub fn resolve_access(
        &self,
        class: &str,
        property: &str,
        kind: PropertyKind,
    ) -> Result<Option<PropertyAccess>> {
        let mut owners = self.ancestors(class)?;
        owners.push(self.get(class)?.name());

        if kind == PropertyKind::Member
            && owners
                .iter()
                .any(|owner| self.types[*owner].fields.contains(property))
        {
            return Ok(Some(PropertyAccess::DirectField(property.to_owned())));
        }

        let suffix = upper_first(property);
        let has_method = |method: &str| {
            owners
                .iter()
                .any(|owner| self.types[*owner].methods.contains_key(method))
        };

        let getter = format!("get{suffix}");
        if has_method(&getter) {
            return Ok(Some(PropertyAccess::Getter(getter)));
        }
        let boolean = format!("is{suffix}");
        if has_method(&boolean) {
            return Ok(Some(PropertyAccess::BooleanAccessor(boolean)));
        }
        Ok(None)
    }

    /// Reads a property through a previously resolved strategy.
    ///
    /// A declared field that was never set reads as [`Value::Null`].
    pub fn read(&self, object: &ObjectRef, access: &PropertyAccess) -> Result<Value> {
        match access {
            PropertyAccess::DirectField(field) => Ok(object.get(field).unwrap_or_default()),
            PropertyAccess::Getter(method) | PropertyAccess::BooleanAccessor(method) => {
                let accessor = self.find_method(object.class(), method)?.ok_or_else(|| {
                    ValidatorError::access(object.class(), access.target().to_owned())
                })?;
                Ok(accessor(object))
            }
        }
    }

    fn find_method(&self, class: &str, method: &str) -> Result<Option<&Accessor>> {
        let mut current = Some(self.get(class)?);
        while let Some(descriptor) = current {
            if let Some(accessor) = descriptor.methods.get(method) {
                return Ok(Some(accessor));
            }
            current = descriptor.parent().map(|p| self.get(p)).transpose()?;
        }
        Ok(None)
    }
}

/// Builder for [`TypeRegistry`].
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    types: IndexMap<String, TypeDescriptor>,
}

impl TypeRegistryBuilder {
    /// Adds (or replaces) a descriptor.
    #[must_use = "builder methods must be chained or built"]
    pub fn register(mut self, descriptor: TypeDescriptor) -> Self {
        self.types.insert(descriptor.name.clone(), descriptor);
        self
    }

    /// Checks every reference and cycle, then freezes the registry.
    ///
    /// Fails with [`ValidatorError::UnknownClass`] when a parent or
    /// interface is not registered and with
    /// [`ValidatorError::InheritanceCycle`] when a type reaches itself.
    pub fn build(self) -> Result<TypeRegistry> {
        let registry = TypeRegistry { types: self.types };

        for descriptor in registry.types.values() {
            if let Some(parent) = descriptor.parent() {
                registry.get(parent)?;
            }
            for interface in descriptor.interfaces() {
                registry.get(interface)?;
            }
        }

        for name in registry.types.keys() {
            registry.check_acyclic(name, &mut IndexSet::new())?;
        }

        Ok(registry)
    }
}

impl TypeRegistry {
    fn check_acyclic<'r>(&'r self, name: &'r str, path: &mut IndexSet<&'r str>) -> Result<()> {
        if !path.insert(name) {
            return Err(ValidatorError::InheritanceCycle {
                class: name.to_owned(),
            });
        }
        let descriptor = &self.types[name];
        for next in descriptor.parent.iter().chain(descriptor.interfaces.iter()) {
            self.check_acyclic(next, path)?;
        }
        path.pop();
        Ok(())
    }
}
