// src/pipeline/cycle.rs

//! One crawl → summarize → publish cycle.

use crate::models::DiplomaReference;
use crate::services::{PortalCrawler, Publisher, Summarizer};

/// How a cycle ended.
///
/// Every variant is a normal return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No new diploma, or the crawl failed and will be retried.
    NothingNew,
    /// The post was handed to the feed; `accepted` is false when the feed failed it.
    Published {
        diploma: DiplomaReference,
        accepted: bool,
    },
    /// Summarization failed under the abort policy; nothing was posted.
    Aborted { diploma: DiplomaReference },
}

/// Run one cycle over already-built components and log how it ended.
pub fn run_cycle(
    crawler: &PortalCrawler<'_>,
    summarizer: &Summarizer<'_>,
    publisher: &Publisher<'_>,
) -> CycleOutcome {
    let outcome = cycle(crawler, summarizer, publisher);
    match &outcome {
        CycleOutcome::NothingNew => log::info!("Cycle finished: nothing new"),
        CycleOutcome::Published {
            diploma,
            accepted: true,
        } => log::info!("Cycle finished: published summary of {}", diploma),
        CycleOutcome::Published {
            diploma,
            accepted: false,
        } => log::warn!("Cycle finished: feed rejected summary of {}", diploma),
        CycleOutcome::Aborted { diploma } => {
            log::error!("Cycle finished: aborted {}; nothing published", diploma)
        }
    }
    outcome
}

fn cycle(
    crawler: &PortalCrawler<'_>,
    summarizer: &Summarizer<'_>,
    publisher: &Publisher<'_>,
) -> CycleOutcome {
    let Some(documents) = crawler.run() else {
        log::warn!("No new diploma document found");
        return CycleOutcome::NothingNew;
    };

    let Some(post) =
        summarizer.get_post_content(&documents.diploma_text, &documents.context_text)
    else {
        return CycleOutcome::Aborted {
            diploma: documents.diploma_ref,
        };
    };

    let accepted = publisher.publish(post.as_str());
    CycleOutcome::Published {
        diploma: documents.diploma_ref,
        accepted,
    }
}
