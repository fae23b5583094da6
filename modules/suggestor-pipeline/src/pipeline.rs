//! Stage orchestration: scrape → retrieve (route + extract) → select.
//!
//! Each stage reads and writes its boundary files under the data directory,
//! so stages can also be run one at a time.

use serde_json::Value;
use suggestor_common::{new_task_id, Config, Result, SuggestorError, TaskRecord};
use tracing::{error, info};

use crate::report;
use crate::router::{route_records, RouteOptions, RouteOutcome};
use crate::scrape::{analyze_urls, scrape_all, validate_urls, ScrapeOutcome, SocialScraper};
use crate::select::{select_top_content, Selection};
use crate::storage::{read_items, write_items, RawBuffer};
use crate::task_store::TaskStore;

pub struct Pipeline {
    config: Config,
    buffer: RawBuffer,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let buffer = RawBuffer::new(config.buffer_path());
        Self { config, buffer }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn buffer(&self) -> &RawBuffer {
        &self.buffer
    }

    /// Scrape every URL into a fresh raw buffer. Fails with
    /// [`SuggestorError::NoData`] when no URL produced any records.
    pub async fn scrape(
        &self,
        scraper: &dyn SocialScraper,
        record: &mut TaskRecord,
    ) -> Result<ScrapeOutcome> {
        let outcome =
            scrape_all(scraper, &mut record.urls_processed, &self.config, &self.buffer).await?;
        record.successful_scrapers = outcome.successful.clone();
        record.failed_scrapers = outcome.failed.clone();
        if outcome.records == 0 {
            return Err(SuggestorError::NoData(
                "No data was scraped from any URLs".to_string(),
            ));
        }
        Ok(outcome)
    }

    /// Normalize the raw buffer into canonical items, write them, then clear
    /// the buffer.
    pub fn retrieve(&self) -> Result<RouteOutcome> {
        let records = self.buffer.load()?;
        info!(records = records.len(), "Loaded raw records");

        let outcome = route_records(
            &records,
            RouteOptions {
                instagram_videos_only: self.config.instagram_videos_only,
            },
        );
        let path = self.config.canonical_path();
        write_items(&path, &outcome.items)?;
        info!(items = outcome.items.len(), path = %path.display(), "Wrote canonical items");

        self.buffer.clear()?;
        report::log_extraction_summary(&outcome);
        Ok(outcome)
    }

    /// Score and select from the canonical items, writing the numbered
    /// selection. Returns the selection and the values as written.
    pub fn select(&self, target: usize) -> Result<(Selection, Vec<Value>)> {
        let items = read_items(&self.config.canonical_path())?;
        info!(items = items.len(), target, "Selecting top content");

        let selection = select_top_content(items, target);
        let path = self.config.result_path();
        let written = write_items(&path, &selection.items)?;
        info!(selected = written.len(), path = %path.display(), "Wrote selection");

        report::log_selection_summary(&selection);
        Ok((selection, written))
    }

    /// Validate URLs and create the task record for a new run.
    pub fn start_task(&self, urls: &[String], store: &dyn TaskStore) -> Result<TaskRecord> {
        validate_urls(urls)?;
        let record = TaskRecord::new(new_task_id(), analyze_urls(urls));
        store.put(&record)?;
        info!(
            task_id = %record.task_id,
            urls = record.total_urls,
            platforms = ?record.platforms_needed,
            "Started content processing task"
        );
        Ok(record)
    }

    /// Run all stages for a started task. The record is updated and stored on
    /// success and on failure.
    pub async fn process_task(
        &self,
        mut record: TaskRecord,
        scraper: &dyn SocialScraper,
        store: &dyn TaskStore,
    ) -> TaskRecord {
        match self.run_stages(&mut record, scraper).await {
            Ok(result) => {
                info!(task_id = %record.task_id, selected = result.len(), "Pipeline completed");
                record.complete(result);
            }
            Err(e) => {
                error!(task_id = %record.task_id, error = %e, "Pipeline failed");
                record.fail(e.to_string());
            }
        }
        if let Err(e) = store.put(&record) {
            error!(task_id = %record.task_id, error = %e, "Failed to persist task");
        }
        record
    }

    /// Start and process a task in one call.
    pub async fn run(
        &self,
        urls: &[String],
        scraper: &dyn SocialScraper,
        store: &dyn TaskStore,
    ) -> Result<TaskRecord> {
        let record = self.start_task(urls, store)?;
        Ok(self.process_task(record, scraper, store).await)
    }

    async fn run_stages(
        &self,
        record: &mut TaskRecord,
        scraper: &dyn SocialScraper,
    ) -> Result<Vec<Value>> {
        self.scrape(scraper, record).await?;
        self.retrieve()?;
        let (_, written) = self.select(self.config.target_total)?;
        Ok(written)
    }
}
