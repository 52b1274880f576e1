use crate::error::PhysicsError;
use crate::links::{Link, LinkType};
use crate::Result;
use std::collections::HashMap;

/// Identifies a solver backend in the link registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendId(&'static str);

impl BackendId {
    /// The built-in reference backend
    pub const REFERENCE: BackendId = BackendId("reference");

    /// Creates a backend identifier from a static name
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the backend name
    pub fn name(&self) -> &'static str {
        self.0
    }
}

/// Constructs an unbound link shell for a given backend.
///
/// The constructor decides which capabilities the backend supports for the
/// type, notably whether a feedback sensor is present.
pub type LinkConstructor = fn() -> Link;

/// Maps `(backend, link type)` pairs to constructor functions.
///
/// Populated explicitly at startup; a missing pair is a checked lookup
/// failure rather than a silent fallback.
pub struct LinkRegistry {
    constructors: HashMap<(BackendId, LinkType), LinkConstructor>,
}

impl LinkRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Creates a registry with the reference backend registered for all link types
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for ty in LinkType::ALL {
            registry.register(BackendId::REFERENCE, ty, reference_constructor(ty));
        }
        registry
    }

    /// Registers a constructor for a backend and link type, replacing any previous entry
    pub fn register(&mut self, backend: BackendId, link_type: LinkType, ctor: LinkConstructor) {
        self.constructors.insert((backend, link_type), ctor);
    }

    /// Looks up a constructor and builds an unbound link
    pub fn create(&self, backend: BackendId, link_type: LinkType) -> Result<Link> {
        let ctor = self.constructors.get(&(backend, link_type)).ok_or_else(|| {
            PhysicsError::ResourceNotFound(format!(
                "No {} link constructor registered for backend '{}'",
                link_type,
                backend.name()
            ))
        })?;
        Ok(ctor())
    }

    /// Returns whether a constructor is registered for the pair
    pub fn contains(&self, backend: BackendId, link_type: LinkType) -> bool {
        self.constructors.contains_key(&(backend, link_type))
    }

    /// Returns the number of registered constructors
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Returns whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl Default for LinkRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Selects the reference backend constructor for a link type.
///
/// The reference backend computes reaction feedback for hinge-class and welded
/// links; spherical and prismatic links carry no sensor, so `get_feedback`
/// fails on them.
fn reference_constructor(link_type: LinkType) -> LinkConstructor {
    match link_type {
        LinkType::Spherical => || Link::new(LinkType::Spherical),
        LinkType::Revolute => || Link::new(LinkType::Revolute).with_feedback(),
        LinkType::RevoluteSpring => || Link::new(LinkType::RevoluteSpring).with_feedback(),
        LinkType::Prismatic => || Link::new(LinkType::Prismatic),
        LinkType::Generic => || Link::new(LinkType::Generic).with_feedback(),
        LinkType::Rigid => || Link::new(LinkType::Rigid).with_feedback(),
    }
}
