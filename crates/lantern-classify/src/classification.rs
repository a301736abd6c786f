//! Entity classification of observed network traffic.
//!
//! Partitions every request URL of a run into organizational entities:
//! known vendors come from the reference dataset, unrecognized domains get a
//! synthesized placeholder entity keyed by root domain, and browser-extension
//! origins get a dedicated extension entity. The result also resolves which
//! entity is the page's own ("first party").

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use lantern_core::{DevtoolsLog, Entity, EntityRef, PageUrls, Result};
use lantern_compute::{ComputedArtifact, DependencyScope};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::network_records::NetworkRecords;
use crate::reference::{EntityReference, StaticEntityDataset};
use crate::urls;

/// Dependency inputs of the classification artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationInputs {
    /// Resolved URLs of the page under analysis.
    pub page: PageUrls,

    /// Raw protocol event log of the run.
    pub log: DevtoolsLog,
}

/// Computed artifact classifying request URLs into entities.
pub struct EntityClassifier {
    reference: Arc<dyn EntityReference>,
}

impl EntityClassifier {
    /// Create a classifier backed by the given reference dataset.
    pub fn new(reference: Arc<dyn EntityReference>) -> Self {
        Self { reference }
    }

    /// Create a classifier backed by the bundled dataset.
    pub fn with_default_dataset() -> Self {
        Self::new(Arc::new(StaticEntityDataset::default()))
    }

    /// Reference lookup first, synthesis fallback second.
    fn classify(&self, url: &Url, synthesized: &mut SynthesizedEntities) -> Option<EntityRef> {
        self.reference
            .entity_for_url(url)
            .or_else(|| synthesized.entity_for(url))
    }
}

/// Call-local registry of synthesized placeholder entities.
///
/// Keyed by canonical key: root domain for web URLs, full origin for
/// extension URLs. Repeat lookups of one key return the cached handle, which
/// is what makes two URLs of one domain classify to an identical entity.
struct SynthesizedEntities {
    by_key: HashMap<String, EntityRef>,
}

impl SynthesizedEntities {
    fn new() -> Self {
        Self {
            by_key: HashMap::new(),
        }
    }

    /// Register-or-return the extension entity for an origin.
    ///
    /// The first registration of an origin wins; later calls (a network
    /// record after the preload pass) return the existing entity unchanged.
    fn chrome_extension(&mut self, origin: &str, host: &str, name: Option<&str>) -> EntityRef {
        if let Some(existing) = self.by_key.get(origin) {
            return existing.clone();
        }
        let entity = EntityRef::new(Entity::chrome_extension(name, host));
        self.by_key.insert(origin.to_string(), entity.clone());
        entity
    }

    /// Synthesize (or return the cached) placeholder entity for a URL.
    ///
    /// Only http/https and extension URLs are eligible; anything else, and
    /// any host without a derivable root domain, yields no entity.
    fn entity_for(&mut self, url: &Url) -> Option<EntityRef> {
        if urls::is_chrome_extension(url) {
            let origin = urls::chrome_extension_origin(url)?;
            let host = urls::chrome_extension_host(url)?;
            return Some(self.chrome_extension(&origin, host, None));
        }

        if !urls::is_protocol_allowed(url) {
            return None;
        }
        let root_domain = urls::root_domain(url)?;
        if let Some(existing) = self.by_key.get(&root_domain) {
            return Some(existing.clone());
        }
        let entity = EntityRef::new(Entity::unrecognized(&root_domain));
        self.by_key.insert(root_domain, entity.clone());
        Some(entity)
    }
}

/// The classification result: who served what, and which entity is the page
/// itself. Immutable once returned; handed to consumers as a shared value by
/// the run's cache.
#[derive(Debug, Clone)]
pub struct EntityClassification {
    entity_by_url: HashMap<String, EntityRef>,
    urls_by_entity: HashMap<EntityRef, BTreeSet<String>>,
    first_party: Option<EntityRef>,
}

impl EntityClassification {
    /// The entity a request URL was attributed to, if it was classified.
    pub fn entity_for_url(&self, url: &str) -> Option<&EntityRef> {
        self.entity_by_url.get(url)
    }

    /// The set of request URLs attributed to an entity.
    pub fn urls_for_entity(&self, entity: &EntityRef) -> Option<&BTreeSet<String>> {
        self.urls_by_entity.get(entity)
    }

    /// All classified request URLs with their entities.
    pub fn entity_by_url(&self) -> &HashMap<String, EntityRef> {
        &self.entity_by_url
    }

    /// The inverse index: every observed entity with its URLs.
    pub fn urls_by_entity(&self) -> &HashMap<EntityRef, BTreeSet<String>> {
        &self.urls_by_entity
    }

    /// The entity representing the page itself, when its URL was
    /// classifiable.
    pub fn first_party(&self) -> Option<&EntityRef> {
        self.first_party.as_ref()
    }

    /// Whether a request URL was served by the page's own entity.
    ///
    /// True iff the URL's entity is the *same instance* as the first-party
    /// entity; unclassified URLs are never first party.
    pub fn is_first_party(&self, url: &str) -> bool {
        match (self.entity_by_url.get(url), &self.first_party) {
            (Some(entity), Some(first_party)) => entity == first_party,
            _ => false,
        }
    }
}

#[async_trait]
impl ComputedArtifact for EntityClassifier {
    const NAME: &'static str = "EntityClassification";
    const DEPENDENCIES: &'static [&'static str] = &[NetworkRecords::NAME];
    type Input = ClassificationInputs;
    type Output = EntityClassification;

    async fn compute(
        self,
        inputs: ClassificationInputs,
        deps: DependencyScope<'_>,
    ) -> Result<Self::Output> {
        let ClassificationInputs { page, log } = inputs;
        let mut synthesized = SynthesizedEntities::new();

        // Extension origins are registered before any record is classified,
        // so extension-origin requests resolve to the richer entity carrying
        // the extension's display name.
        for event in &log {
            let Some(context) = event.execution_context_created() else {
                continue;
            };
            if !context.origin.starts_with("chrome-extension://") {
                continue;
            }
            let Some(parsed) = urls::parse(&context.origin) else {
                continue;
            };
            let (Some(origin), Some(host)) = (
                urls::chrome_extension_origin(&parsed),
                urls::chrome_extension_host(&parsed),
            ) else {
                continue;
            };
            let name = (!context.name.is_empty()).then_some(context.name.as_str());
            synthesized.chrome_extension(&origin, host, name);
        }

        let records = deps.request(NetworkRecords, log).await?;

        let mut entity_by_url: HashMap<String, EntityRef> = HashMap::new();
        let mut urls_by_entity: HashMap<EntityRef, BTreeSet<String>> = HashMap::new();

        for record in records.iter() {
            // First classification of a URL wins; records arrive in log order.
            if entity_by_url.contains_key(&record.url) {
                continue;
            }
            let Some(parsed) = urls::parse(&record.url) else {
                continue;
            };
            let Some(entity) = self.classify(&parsed, &mut synthesized) else {
                continue;
            };
            urls_by_entity
                .entry(entity.clone())
                .or_default()
                .insert(record.url.clone());
            entity_by_url.insert(record.url.clone(), entity);
        }

        // The page's own entity. This may register a synthesized entity even
        // if no network record shared its domain; the page URL itself is not
        // added to the result maps.
        let first_party = urls::parse(page.canonical())
            .and_then(|parsed| self.classify(&parsed, &mut synthesized));

        debug!(
            urls = entity_by_url.len(),
            entities = urls_by_entity.len(),
            first_party = first_party.is_some(),
            "classified network entities"
        );

        Ok(EntityClassification {
            entity_by_url,
            urls_by_entity,
            first_party,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_compute::ComputeContext;
    use lantern_core::{ProtocolEvent, CHROME_EXTENSION_CATEGORY};

    fn page(main_document_url: Option<&str>, final_displayed_url: &str) -> PageUrls {
        PageUrls {
            main_document_url: main_document_url.map(str::to_string),
            final_displayed_url: final_displayed_url.to_string(),
        }
    }

    fn request_log(urls: &[&str]) -> DevtoolsLog {
        urls.iter()
            .enumerate()
            .map(|(i, url)| ProtocolEvent::request_will_be_sent(&format!("1000.{i}"), url))
            .collect()
    }

    async fn classify(page: PageUrls, log: DevtoolsLog) -> Arc<EntityClassification> {
        ComputeContext::new()
            .request(EntityClassifier::with_default_dataset(), ClassificationInputs { page, log })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_urls_sharing_a_root_domain_resolve_to_one_instance() {
        let result = classify(
            page(Some("https://example.com/"), "https://example.com/"),
            request_log(&[
                "https://sub.example.com/a",
                "https://other.example.com/b",
            ]),
        )
        .await;

        let a = result.entity_for_url("https://sub.example.com/a").unwrap();
        let b = result.entity_for_url("https://other.example.com/b").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.name, "example.com");
        assert!(a.is_unrecognized);
        assert_eq!(result.urls_for_entity(a).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_multi_label_public_suffix_roll_up() {
        let result = classify(
            page(Some("https://example.co.uk/"), "https://example.co.uk/"),
            request_log(&["https://www.example.co.uk/x"]),
        )
        .await;

        let entity = result.entity_for_url("https://www.example.co.uk/x").unwrap();
        assert_eq!(entity.name, "example.co.uk");
        assert_eq!(entity.domains, vec!["example.co.uk"]);
    }

    #[tokio::test]
    async fn test_known_vendor_resolves_through_reference_dataset() {
        let result = classify(
            page(Some("https://example.com/"), "https://example.com/"),
            request_log(&[
                "https://fonts.googleapis.com/css?family=Roboto",
                "https://fonts.gstatic.com/s/roboto.woff2",
            ]),
        )
        .await;

        let css = result
            .entity_for_url("https://fonts.googleapis.com/css?family=Roboto")
            .unwrap();
        assert_eq!(css.name, "Google Fonts");
        assert!(!css.is_unrecognized);

        // Both dataset domains of the vendor share one canonical instance.
        let woff = result
            .entity_for_url("https://fonts.gstatic.com/s/roboto.woff2")
            .unwrap();
        assert_eq!(css, woff);
        assert_eq!(result.urls_for_entity(css).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_extension_context_event_takes_precedence() {
        let mut log = vec![ProtocolEvent::context_created("chrome-extension://abc123", "My Ext")];
        log.extend(request_log(&["chrome-extension://abc123/script.js"]));

        let result = classify(page(Some("https://example.com/"), "https://example.com/"), log).await;

        let entity = result
            .entity_for_url("chrome-extension://abc123/script.js")
            .unwrap();
        assert_eq!(entity.name, "My Ext");
        assert_eq!(entity.category, CHROME_EXTENSION_CATEGORY);
        assert_eq!(
            entity.homepage.as_deref(),
            Some("https://chromewebstore.google.com/detail/abc123")
        );
        assert!(!entity.is_unrecognized);
    }

    #[tokio::test]
    async fn test_extension_request_without_context_event_still_classifies() {
        let result = classify(
            page(Some("https://example.com/"), "https://example.com/"),
            request_log(&[
                "chrome-extension://abc123/script.js",
                "chrome-extension://abc123/panel.html",
            ]),
        )
        .await;

        let entity = result
            .entity_for_url("chrome-extension://abc123/script.js")
            .unwrap();
        // Falls through to generic synthesis: keyed by origin, named by host.
        assert_eq!(entity.name, "abc123");
        assert_eq!(entity.category, CHROME_EXTENSION_CATEGORY);

        let other = result
            .entity_for_url("chrome-extension://abc123/panel.html")
            .unwrap();
        assert_eq!(entity, other);
    }

    #[tokio::test]
    async fn test_disallowed_schemes_are_absent_from_results() {
        let result = classify(
            page(Some("https://example.com/"), "https://example.com/"),
            request_log(&["data:text/plain,hi", "about:blank", "https://example.com/a"]),
        )
        .await;

        assert!(result.entity_for_url("data:text/plain,hi").is_none());
        assert!(result.entity_for_url("about:blank").is_none());
        assert!(result.entity_for_url("https://example.com/a").is_some());
    }

    #[tokio::test]
    async fn test_unparseable_and_underivable_urls_are_skipped() {
        let result = classify(
            page(Some("https://example.com/"), "https://example.com/"),
            request_log(&["not a url", "https://192.168.0.1/admin", "https://localhost/dev"]),
        )
        .await;

        assert!(result.entity_by_url().is_empty());
    }

    #[tokio::test]
    async fn test_first_party_resolution() {
        let result = classify(
            page(Some("https://example.com/"), "https://example.com/#loaded"),
            request_log(&["https://example.com/app.js", "https://cdn.other.com/lib.js"]),
        )
        .await;

        let first_party = result.first_party().unwrap();
        assert_eq!(first_party.name, "example.com");

        assert!(result.is_first_party("https://example.com/app.js"));
        assert!(!result.is_first_party("https://cdn.other.com/lib.js"));
        // URLs absent from the result are never first party.
        assert!(!result.is_first_party("https://example.com/never-requested.js"));
    }

    #[tokio::test]
    async fn test_first_party_falls_back_to_final_displayed_url() {
        let result = classify(
            page(None, "https://example.com/app"),
            request_log(&["https://example.com/api/data"]),
        )
        .await;

        assert_eq!(result.first_party().unwrap().name, "example.com");
        assert!(result.is_first_party("https://example.com/api/data"));
    }

    #[tokio::test]
    async fn test_first_party_may_be_a_fresh_entity() {
        // No record shares the page's domain; first party is synthesized on
        // its own and the page URL stays out of the result maps.
        let result = classify(
            page(Some("https://example.com/"), "https://example.com/"),
            request_log(&["https://cdn.other.com/lib.js"]),
        )
        .await;

        assert_eq!(result.first_party().unwrap().name, "example.com");
        assert!(result.entity_for_url("https://example.com/").is_none());
        assert_eq!(result.entity_by_url().len(), 1);
    }

    #[tokio::test]
    async fn test_first_party_absent_when_page_url_is_unclassifiable() {
        let result = classify(
            page(None, "about:blank"),
            request_log(&["https://example.com/a"]),
        )
        .await;

        assert!(result.first_party().is_none());
        assert!(!result.is_first_party("https://example.com/a"));
    }

    #[tokio::test]
    async fn test_repeated_urls_keep_their_first_classification() {
        let result = classify(
            page(Some("https://example.com/"), "https://example.com/"),
            request_log(&[
                "https://example.com/app.js",
                "https://example.com/app.js",
            ]),
        )
        .await;

        assert_eq!(result.entity_by_url().len(), 1);
        assert_eq!(
            result
                .urls_for_entity(result.entity_for_url("https://example.com/app.js").unwrap())
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_independent_runs_produce_structurally_equal_results() {
        let page_urls = page(Some("https://example.com/"), "https://example.com/");
        let log = request_log(&[
            "https://sub.example.com/a",
            "https://fonts.googleapis.com/css",
            "https://cdn.other.com/lib.js",
        ]);

        let first = classify(page_urls.clone(), log.clone()).await;
        let second = classify(page_urls, log).await;

        assert_eq!(first.entity_by_url().len(), second.entity_by_url().len());
        for (url, entity) in first.entity_by_url() {
            let other = second.entity_for_url(url).unwrap();
            // Structurally equal, but never the same instance across runs.
            assert_eq!(**entity, **other);
            assert!(!EntityRef::same(entity, other));
        }
        assert_eq!(
            **first.first_party().unwrap(),
            **second.first_party().unwrap()
        );
    }

    #[tokio::test]
    async fn test_classification_is_cached_per_context() {
        let page_urls = page(Some("https://example.com/"), "https://example.com/");
        let log = request_log(&["https://example.com/app.js"]);
        let context = ComputeContext::new();

        let first = context
            .request(
                EntityClassifier::with_default_dataset(),
                ClassificationInputs { page: page_urls.clone(), log: log.clone() },
            )
            .await
            .unwrap();
        let second = context
            .request(
                EntityClassifier::with_default_dataset(),
                ClassificationInputs { page: page_urls, log },
            )
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        // EntityClassification plus its NetworkRecords dependency.
        assert_eq!(context.computed_count().await, 2);
    }
}
