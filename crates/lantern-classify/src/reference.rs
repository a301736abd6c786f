//! Known-entity reference dataset boundary.
//!
//! The reference dataset maps URLs to the organizations known to operate
//! them. It is an external collaborator to classification: the algorithm
//! only sees the [`EntityReference`] trait. [`StaticEntityDataset`] is the
//! bundled in-memory implementation, carrying a small set of well-known
//! vendors as a stand-in for a full third-party dataset.

use std::collections::HashMap;

use lantern_core::{Entity, EntityRef};
use url::Url;

use crate::urls;

/// Lookup into the known-entity reference dataset.
///
/// Implementations must hand out *canonical* entity handles: every URL
/// attributed to one organization must resolve to the same [`EntityRef`]
/// instance for the dataset's lifetime, because classification groups URLs
/// by entity identity.
pub trait EntityReference: Send + Sync {
    /// Resolve a URL to its known entity, or `None` if the dataset does not
    /// recognize the URL's domain.
    fn entity_for_url(&self, url: &Url) -> Option<EntityRef>;
}

/// Descriptor for one entity in a [`StaticEntityDataset`].
#[derive(Debug, Clone)]
pub struct EntityRecord {
    /// Display name of the entity.
    pub name: String,

    /// Owning company.
    pub company: String,

    /// Primary classification tag.
    pub category: String,

    /// Ordered classification tags.
    pub categories: Vec<String>,

    /// Domains owned by this entity. Subdomains of a listed domain match.
    pub domains: Vec<String>,

    /// Entity homepage.
    pub homepage: Option<String>,
}

/// In-memory reference dataset with a domain index.
///
/// Entities are materialized once at construction; lookups return clones of
/// those canonical handles, never fresh values.
pub struct StaticEntityDataset {
    entities: Vec<EntityRef>,
    by_domain: HashMap<String, usize>,
}

impl StaticEntityDataset {
    /// Build a dataset from entity descriptors.
    pub fn new(records: Vec<EntityRecord>) -> Self {
        let mut entities = Vec::with_capacity(records.len());
        let mut by_domain = HashMap::new();

        for record in records {
            let index = entities.len();
            for domain in &record.domains {
                by_domain.insert(domain.clone(), index);
            }
            entities.push(EntityRef::new(Entity {
                name: record.name,
                company: record.company,
                category: record.category,
                categories: record.categories,
                domains: record.domains,
                homepage: record.homepage,
                is_unrecognized: false,
                average_execution_time: 0.0,
                total_execution_time: 0.0,
                total_occurrences: 0,
            }));
        }

        Self { entities, by_domain }
    }

    /// Match a host against the domain index, walking from the full host up
    /// to its registrable suffix so `metrics.vendor.com` matches a dataset
    /// entry for `vendor.com`.
    fn entity_for_host(&self, host: &str) -> Option<EntityRef> {
        let mut candidate = host;
        loop {
            if let Some(&index) = self.by_domain.get(candidate) {
                return Some(self.entities[index].clone());
            }
            match candidate.split_once('.') {
                // Never walk down to a bare top-level label.
                Some((_, rest)) if rest.contains('.') => candidate = rest,
                _ => return None,
            }
        }
    }
}

impl EntityReference for StaticEntityDataset {
    fn entity_for_url(&self, url: &Url) -> Option<EntityRef> {
        if !urls::is_protocol_allowed(url) {
            return None;
        }
        self.entity_for_host(url.host_str()?)
    }
}

impl Default for StaticEntityDataset {
    /// A minimal bundled dataset of well-known vendors.
    fn default() -> Self {
        let record = |name: &str, category: &str, domains: &[&str], homepage: &str| EntityRecord {
            name: name.to_string(),
            company: name.to_string(),
            category: category.to_string(),
            categories: vec![category.to_string()],
            domains: domains.iter().map(|d| d.to_string()).collect(),
            homepage: Some(homepage.to_string()),
        };

        Self::new(vec![
            record(
                "Google Fonts",
                "cdn",
                &["fonts.googleapis.com", "fonts.gstatic.com"],
                "https://fonts.google.com/",
            ),
            record(
                "Google Analytics",
                "analytics",
                &["google-analytics.com", "analytics.google.com", "googletagmanager.com"],
                "https://marketingplatform.google.com/about/analytics/",
            ),
            record(
                "Cloudflare CDN",
                "cdn",
                &["cloudflare.com", "cdnjs.cloudflare.com"],
                "https://www.cloudflare.com/",
            ),
            record(
                "Facebook",
                "social",
                &["facebook.com", "connect.facebook.net", "fbcdn.net"],
                "https://www.facebook.com/",
            ),
            record(
                "jsDelivr CDN",
                "cdn",
                &["jsdelivr.net"],
                "https://www.jsdelivr.com/",
            ),
        ])
    }
}
