//! Per-worker crawl loop

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::{Frontier, Offer};
use crate::crawler::parser::extract_links;
use crate::extract::Extractor;
use crate::output::{save_page, CrawlStats, LogSender, ResultAggregator};
use crate::robots::RobotsPolicy;
use crate::url::DomainScope;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Everything a worker needs, shared read-only between all workers
pub(crate) struct CrawlContext {
    pub frontier: Arc<Frontier>,
    pub fetcher: PageFetcher,
    pub extractor: Arc<dyn Extractor>,
    pub robots: RobotsPolicy,
    pub scope: DomainScope,
    pub results: ResultAggregator,
    pub stats: Arc<CrawlStats>,
    /// Directory for raw page bodies, when HTML persistence is enabled
    pub html_dir: Option<PathBuf>,
}

/// Runs one worker until the frontier is closed
///
/// Nothing that happens to a single page stops the loop; failures are logged
/// and counted. A panic while handling a page is caught and counted as a
/// failure of that page.
pub(crate) async fn run_worker(ctx: Arc<CrawlContext>, log: LogSender) {
    log.info("Start worker");

    while let Some(url) = ctx.frontier.take().await {
        let _task = TaskGuard(&ctx.frontier);
        let page = url.to_string();

        if let Err(payload) = AssertUnwindSafe(process_page(&ctx, &log, url))
            .catch_unwind()
            .await
        {
            ctx.stats.record_page_panic();
            log.warn(format!(
                "PANIC {}: {}",
                page,
                panic_message(payload.as_ref())
            ));
        }
    }

    log.info("stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Marks the current task done when dropped, after link discovery or on unwind
struct TaskGuard<'a>(&'a Frontier);

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.0.task_done();
    }
}

async fn process_page(ctx: &CrawlContext, log: &LogSender, url: Url) {
    // Once the cap is hit the remaining queue is discarded without waiting
    if ctx.frontier.page_count() >= ctx.frontier.page_cap() {
        return;
    }

    if let Some(delay) = ctx.robots.crawl_delay() {
        tokio::time::sleep(delay).await;
    }

    let Some(index) = ctx.frontier.try_claim_page_slot() else {
        log.debug(format!("Page cap reached, discarding {}", url));
        return;
    };

    log.info(format!(
        "Fetching [{}/{}] {}",
        index,
        ctx.frontier.page_cap(),
        url
    ));

    let body = match ctx.fetcher.fetch(&url).await {
        Ok(body) => body,
        Err(e) => {
            ctx.stats.record_fetch_failure();
            log.warn(format!("ERROR {}: {}", url, e));
            return;
        }
    };

    match ctx.extractor.extract(url.as_str(), &body) {
        Ok(Some(record)) if record.should_keep() => {
            ctx.results.append(record);
            ctx.stats.record_kept();
        }
        Ok(_) => {}
        Err(e) => {
            ctx.stats.record_extract_failure();
            log.warn(format!("EXTRACT ERROR {}: {}", url, e));
        }
    }

    if let Some(dir) = &ctx.html_dir {
        if let Err(e) = save_page(dir, index, &url, &body).await {
            ctx.stats.record_persist_failure();
            log.warn(format!("Failed to save page {}: {}", url, e));
        }
    }

    discover_links(ctx, log, &url, &body);
}

/// Offers every in-scope, robots-allowed link on the page to the frontier
fn discover_links(ctx: &CrawlContext, log: &LogSender, url: &Url, body: &str) {
    for link in extract_links(body, url) {
        if !ctx.scope.contains(&link) {
            continue;
        }

        if !ctx.robots.is_url_allowed(&link) {
            log.debug(format!("Disallowed by robots.txt: {}", link));
            continue;
        }

        if ctx.frontier.offer(link.clone()) == Offer::RejectedFull {
            ctx.stats.record_dropped_link();
            log.warn(format!("Queue full, dropping {}", link));
        }
    }
}
