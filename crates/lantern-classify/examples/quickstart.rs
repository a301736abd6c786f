//! Quick Start Example
//!
//! Classifies a small synthetic telemetry log and prints which organization
//! served each request.

use lantern_classify::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // A run's raw telemetry: the protocol event log plus the resolved page URLs.
    let log: DevtoolsLog = vec![
        ProtocolEvent::context_created("chrome-extension://abc123", "Helpful Extension"),
        ProtocolEvent::request_will_be_sent("1000.1", "https://shop.example.com/"),
        ProtocolEvent::request_will_be_sent("1000.2", "https://shop.example.com/app.js"),
        ProtocolEvent::request_will_be_sent("1000.3", "https://fonts.googleapis.com/css?family=Roboto"),
        ProtocolEvent::request_will_be_sent("1000.4", "https://cdn.partner.co.uk/widget.js"),
        ProtocolEvent::request_will_be_sent("1000.5", "chrome-extension://abc123/content.js"),
    ];
    let page = PageUrls {
        main_document_url: Some("https://shop.example.com/".to_string()),
        final_displayed_url: "https://shop.example.com/".to_string(),
    };

    // One context per analysis run; every artifact request goes through it.
    let context = ComputeContext::new();
    let classification = context
        .request(
            EntityClassifier::with_default_dataset(),
            ClassificationInputs { page, log },
        )
        .await?;

    if let Some(first_party) = classification.first_party() {
        println!("First party: {}", first_party.name);
    }

    for (entity, urls) in classification.urls_by_entity() {
        let origin = if entity.is_unrecognized { "synthesized" } else { "known" };
        println!("\n{} ({}, {origin})", entity.name, urls.len());
        for url in urls {
            let marker = if classification.is_first_party(url) { "1p" } else { "3p" };
            println!("  [{marker}] {url}");
        }
    }

    Ok(())
}
