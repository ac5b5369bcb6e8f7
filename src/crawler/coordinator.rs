//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns one crawl from start to finish:
//! - Loading robots.txt before any worker starts
//! - Seeding the frontier and spawning the worker pool
//! - Detecting the drain condition (empty queue, no task in flight)
//! - Stopping the workers and flushing the log sink, in that order

use crate::config::{validate, CrawlConfig};
use crate::crawler::fetcher::{build_http_client, PageFetcher};
use crate::crawler::frontier::{Frontier, Offer};
use crate::crawler::worker::{run_worker, CrawlContext};
use crate::extract::Extractor;
use crate::output::{CrawlStats, CrawlSummary, LogSink, OutputError, ResultAggregator};
use crate::robots::{fetch_robots, fetch_robots_from, RobotsPolicy, ROBOTS_TIMEOUT};
use crate::url::DomainScope;
use crate::{ConfigError, CrawlError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Read-only view of a crawl's progress, usable while it runs
#[derive(Debug, Clone)]
pub struct CrawlProgress {
    frontier: Arc<Frontier>,
}

impl CrawlProgress {
    /// Pages fetched (or attempted) so far
    pub fn page_count(&self) -> usize {
        self.frontier.page_count()
    }

    pub fn page_cap(&self) -> usize {
        self.frontier.page_cap()
    }

    /// URLs waiting in the frontier
    pub fn queued(&self) -> usize {
        self.frontier.len()
    }

    /// Share of the page cap used, between 0.0 and 1.0
    pub fn fraction(&self) -> f64 {
        if self.page_cap() == 0 {
            return 1.0;
        }
        self.page_count() as f64 / self.page_cap() as f64
    }
}

/// A single-domain crawl
///
/// A `Crawler` runs exactly once; results stay available after `run`
/// returns.
pub struct Crawler {
    config: CrawlConfig,
    scope: DomainScope,
    fetcher: PageFetcher,
    extractor: Arc<dyn Extractor>,
    frontier: Arc<Frontier>,
    results: ResultAggregator,
    stats: Arc<CrawlStats>,
    started: AtomicBool,
}

impl Crawler {
    /// Creates a crawler for the given configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run; the output directory exists
    /// * `Err(CrawlError)` - Invalid configuration, HTTP client or output
    ///   directory failure
    pub fn new(config: CrawlConfig) -> crate::Result<Self> {
        let extractor = config.profile.extractor();
        Self::with_extractor(config, extractor)
    }

    /// Creates a crawler that uses the given extractor instead of the one
    /// selected by `config.profile`
    ///
    /// The configured profile is replaced by the extractor's profile, so the
    /// results file is named after what was actually extracted.
    pub fn with_extractor(
        mut config: CrawlConfig,
        extractor: Arc<dyn Extractor>,
    ) -> crate::Result<Self> {
        config.profile = extractor.profile();
        validate(&config)?;

        let client = build_http_client(&config)?;
        std::fs::create_dir_all(&config.output_dir)?;

        Ok(Self {
            scope: DomainScope::new(&config.allowed_domain),
            fetcher: PageFetcher::new(client),
            extractor,
            frontier: Arc::new(Frontier::new(config.queue_capacity, config.max_pages)),
            results: ResultAggregator::new(),
            stats: Arc::new(CrawlStats::new()),
            started: AtomicBool::new(false),
            config,
        })
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Runs the crawl to completion
    ///
    /// Returns once the frontier has drained (or the page cap was reached
    /// and the remaining queue discarded), every worker has stopped and the
    /// log file has been flushed.
    pub async fn run(&self) -> crate::Result<CrawlSummary> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(CrawlError::AlreadyStarted);
        }

        let started_at = Instant::now();
        let start_url = Url::parse(&self.config.start_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.config.start_url, e)))?;

        let sink = LogSink::open(&self.config.log_file).await?;
        let log = sink.sender("CRAWLER");

        log.info(format!(
            "Starting crawl of {} (domain: {}, profile: {}, workers: {}, max pages: {})",
            start_url,
            self.scope.domain(),
            self.config.profile,
            self.config.max_workers,
            self.config.max_pages
        ));

        let robots = self.load_robots().await;
        log.info(format!(
            "robots.txt: {} disallow rule(s), crawl-delay {}s",
            robots.disallowed().len(),
            robots.delay_seconds()
        ));

        let ctx = Arc::new(CrawlContext {
            frontier: self.frontier.clone(),
            fetcher: self.fetcher.clone(),
            extractor: self.extractor.clone(),
            robots,
            scope: self.scope.clone(),
            results: self.results.clone(),
            stats: self.stats.clone(),
            html_dir: self
                .config
                .save_html
                .then(|| self.config.output_dir.clone()),
        });

        if self.frontier.offer(start_url) != Offer::Accepted {
            log.warn("Start URL was not accepted by the frontier");
        }

        let workers: Vec<_> = (1..=self.config.max_workers)
            .map(|id| {
                let worker_log = sink.sender(format!("WORKER-{}", id));
                tokio::spawn(run_worker(ctx.clone(), worker_log))
            })
            .collect();

        self.frontier.wait_drained().await;
        self.frontier.close();

        for (id, worker) in workers.into_iter().enumerate() {
            if let Err(e) = worker.await {
                log.warn(format!("WORKER-{} ended abnormally: {}", id + 1, e));
            }
        }
        drop(ctx);

        let summary = self.stats.summarize(
            self.frontier.page_count(),
            self.config.max_pages,
            started_at.elapsed(),
        );

        log.info(format!(
            "Crawl finished: {} page(s) fetched, {} record(s) kept, {} fetch failure(s)",
            summary.pages_fetched, summary.records_kept, summary.fetch_failures
        ));
        if summary.finished_early {
            log.info("Frontier drained before the page cap was reached");
        }

        drop(log);
        let lines = sink.close().await?;
        tracing::debug!("Log sink closed after {} line(s)", lines);

        Ok(summary)
    }

    async fn load_robots(&self) -> RobotsPolicy {
        let client = self.fetcher.client();
        match &self.config.robots_url {
            Some(url) => fetch_robots_from(client, url, ROBOTS_TIMEOUT).await,
            None => fetch_robots(client, self.scope.domain()).await,
        }
    }

    /// Number of page slots claimed so far
    pub fn page_count(&self) -> usize {
        self.frontier.page_count()
    }

    /// A progress handle that can be polled from another task
    pub fn progress(&self) -> CrawlProgress {
        CrawlProgress {
            frontier: self.frontier.clone(),
        }
    }

    /// Records kept so far
    pub fn results(&self) -> &ResultAggregator {
        &self.results
    }

    /// Writes the kept records to `{output_dir}/{profile}_data.json`
    pub fn save_results(&self) -> Result<PathBuf, OutputError> {
        self.results.save(&self.config.results_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer, dir: &TempDir) -> CrawlConfig {
        let mut config = CrawlConfig::new(format!("{}/", server.uri()), "127.0.0.1");
        config.output_dir = dir.path().join("data");
        config.log_file = dir.path().join("logs").join("crawler.log");
        config.robots_url = Some(format!("{}/robots.txt", server.uri()));
        config.max_workers = 2;
        config
    }

    #[tokio::test]
    async fn test_new_creates_output_dir() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let config = test_config(&server, &dir);

        let crawler = Crawler::new(config).unwrap();

        assert!(dir.path().join("data").is_dir());
        assert_eq!(crawler.page_count(), 0);
        assert_eq!(crawler.progress().fraction(), 0.0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = CrawlConfig::new("https://example.com/", "example.com");
        config.max_pages = 0;

        assert!(matches!(
            Crawler::new(config),
            Err(CrawlError::Config(ConfigError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_run_only_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let crawler = Crawler::new(test_config(&server, &dir)).unwrap();

        let summary = crawler.run().await.unwrap();
        assert_eq!(summary.pages_fetched, 1);
        assert!(summary.finished_early);

        assert!(matches!(
            crawler.run().await,
            Err(CrawlError::AlreadyStarted)
        ));
    }
}
