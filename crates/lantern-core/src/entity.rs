//! Entity types for attributing network traffic to organizations.
//!
//! An [`Entity`] is the organization behind one or more domains (a CDN, an
//! analytics vendor, a browser extension). Classification hands entities out
//! as [`EntityRef`]s, which compare by value *instance* so that every URL
//! attributed to the same organization maps to the exact same entity.

use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Category assigned to entities synthesized from browser-extension origins.
pub const CHROME_EXTENSION_CATEGORY: &str = "Chrome Extension";

/// An organization associated with one or more domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Display name (equals `company` for synthesized entities).
    pub name: String,

    /// Owning company.
    pub company: String,

    /// Free-text classification (e.g., "Chrome Extension"); empty if unknown.
    pub category: String,

    /// Ordered classification tags from the reference dataset; empty for
    /// synthesized entities.
    pub categories: Vec<String>,

    /// Known domains owned by this entity. Empty for extension-origin
    /// entities, a single root domain for synthesized web entities.
    pub domains: Vec<String>,

    /// Optional homepage; present for synthesized extension entities.
    pub homepage: Option<String>,

    /// True only for entities synthesized from an unmatched root domain.
    #[serde(default)]
    pub is_unrecognized: bool,

    /// Aggregate counter owned by downstream consumers; always zero here.
    pub average_execution_time: f64,

    /// Aggregate counter owned by downstream consumers; always zero here.
    pub total_execution_time: f64,

    /// Aggregate counter owned by downstream consumers; always zero here.
    pub total_occurrences: u64,
}

impl Entity {
    /// Create a placeholder entity for a root domain the reference dataset
    /// does not recognize.
    pub fn unrecognized(root_domain: &str) -> Self {
        Self {
            name: root_domain.to_string(),
            company: root_domain.to_string(),
            category: String::new(),
            categories: Vec::new(),
            domains: vec![root_domain.to_string()],
            homepage: None,
            is_unrecognized: true,
            average_execution_time: 0.0,
            total_execution_time: 0.0,
            total_occurrences: 0,
        }
    }

    /// Create an entity for a browser extension.
    ///
    /// `name` is the extension's display name when known (from an execution
    /// context creation event); `host` is the extension's host identifier,
    /// which doubles as the name fallback and locates the extension in the
    /// extension store.
    pub fn chrome_extension(name: Option<&str>, host: &str) -> Self {
        let name = match name {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => host.to_string(),
        };
        Self {
            company: name.clone(),
            name,
            category: CHROME_EXTENSION_CATEGORY.to_string(),
            categories: Vec::new(),
            domains: Vec::new(),
            homepage: Some(format!(
                "https://chromewebstore.google.com/detail/{host}"
            )),
            is_unrecognized: false,
            average_execution_time: 0.0,
            total_execution_time: 0.0,
            total_occurrences: 0,
        }
    }
}

/// Shared handle to a canonical [`Entity`] instance.
///
/// Equality and hashing are by pointer identity, not by field values: two
/// `EntityRef`s are equal iff they point at the same entity instance. The
/// classification result relies on this to group URLs per organization, so
/// entities must always be resolved through a canonical registry (the
/// reference dataset or the synthesized-entity cache) and never rebuilt
/// per lookup.
#[derive(Debug, Clone)]
pub struct EntityRef(Arc<Entity>);

impl EntityRef {
    /// Register a freshly constructed entity and return its canonical handle.
    pub fn new(entity: Entity) -> Self {
        Self(Arc::new(entity))
    }

    /// Whether two handles refer to the same entity instance.
    pub fn same(a: &EntityRef, b: &EntityRef) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl Deref for EntityRef {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.0
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for EntityRef {}

impl Hash for EntityRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_unrecognized_entity_shape() {
        let entity = Entity::unrecognized("example.com");

        assert_eq!(entity.name, "example.com");
        assert_eq!(entity.company, "example.com");
        assert_eq!(entity.domains, vec!["example.com"]);
        assert!(entity.category.is_empty());
        assert!(entity.is_unrecognized);
        assert_eq!(entity.total_occurrences, 0);
    }

    #[test]
    fn test_chrome_extension_entity_shape() {
        let entity = Entity::chrome_extension(Some("My Ext"), "abc123");

        assert_eq!(entity.name, "My Ext");
        assert_eq!(entity.company, "My Ext");
        assert_eq!(entity.category, CHROME_EXTENSION_CATEGORY);
        assert!(entity.domains.is_empty());
        assert!(!entity.is_unrecognized);
        assert_eq!(
            entity.homepage.as_deref(),
            Some("https://chromewebstore.google.com/detail/abc123")
        );
    }

    #[test]
    fn test_chrome_extension_name_falls_back_to_host() {
        let entity = Entity::chrome_extension(None, "abc123");
        assert_eq!(entity.name, "abc123");

        let entity = Entity::chrome_extension(Some(""), "abc123");
        assert_eq!(entity.name, "abc123");
    }

    #[test]
    fn test_entity_ref_identity() {
        let a = EntityRef::new(Entity::unrecognized("example.com"));
        let b = EntityRef::new(Entity::unrecognized("example.com"));

        // Structurally equal entities, distinct instances.
        assert_eq!(*a, *b);
        assert_ne!(a, b);
        assert!(EntityRef::same(&a, &a.clone()));
        assert!(!EntityRef::same(&a, &b));
    }

    #[test]
    fn test_entity_ref_as_map_key() {
        let a = EntityRef::new(Entity::unrecognized("example.com"));
        let b = EntityRef::new(Entity::unrecognized("example.com"));

        let mut urls_by_entity: HashMap<EntityRef, Vec<&str>> = HashMap::new();
        urls_by_entity.entry(a.clone()).or_default().push("https://a.example.com/");
        urls_by_entity.entry(a.clone()).or_default().push("https://b.example.com/");
        urls_by_entity.entry(b).or_default().push("https://c.example.com/");

        assert_eq!(urls_by_entity.len(), 2);
        assert_eq!(urls_by_entity[&a].len(), 2);
    }
}
