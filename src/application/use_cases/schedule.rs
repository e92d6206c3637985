use std::sync::Arc;

use tracing::{debug, info};

use super::schedule_cache::ScheduleCache;
use crate::domain::error::Result;
use crate::domain::schedule::{schedule_from_rows, ScheduleItem};
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::upstream::SheetSource;

/// Result of one schedule lookup
#[derive(Debug, Clone)]
pub struct ScheduleFeed {
    pub items: Arc<Vec<ScheduleItem>>,
    /// Served from the in-memory cache without contacting upstream
    pub from_cache: bool,
}

/// Fetch the sheet, parse it and project the schedule columns.
pub struct ScheduleUseCase {
    source: Arc<dyn SheetSource>,
    parser: CsvParser,
    cache: Option<ScheduleCache>,
}

impl ScheduleUseCase {
    pub fn new(source: Arc<dyn SheetSource>) -> Self {
        Self {
            source,
            parser: CsvParser::new(),
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: ScheduleCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub async fn execute(&self) -> Result<ScheduleFeed> {
        if let Some(items) = self.cache.as_ref().and_then(ScheduleCache::get) {
            debug!(items = items.len(), "Schedule served from memory cache");
            return Ok(ScheduleFeed {
                items,
                from_cache: true,
            });
        }

        let text = self.source.fetch_csv().await?;
        let items = Arc::new(self.csv_to_items(&text));
        info!(bytes = text.len(), items = items.len(), "Schedule parsed");

        if let Some(cache) = &self.cache {
            cache.put(Arc::clone(&items));
        }

        Ok(ScheduleFeed {
            items,
            from_cache: false,
        })
    }

    /// Parse CSV text and project it into schedule items.
    pub fn csv_to_items(&self, text: &str) -> Vec<ScheduleItem> {
        let rows = self.parser.parse_content(text);
        schedule_from_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    const SAMPLE: &str = "Day,Time,Location\nMonday,9am-5pm,Main St\n,,\nTuesday,\"10am, 6pm\",Side St\n";

    /// Replays queued responses and counts fetches.
    struct ScriptedSource {
        responses: Mutex<Vec<Result<String>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SheetSource for ScriptedSource {
        async fn fetch_csv(&self) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses.lock().unwrap().remove(0)
        }
    }

    #[test]
    fn test_csv_to_items_example() {
        let use_case = ScheduleUseCase::new(ScriptedSource::new(vec![]));
        let items = use_case.csv_to_items(SAMPLE);
        assert_eq!(
            items,
            vec![
                ScheduleItem::new("Monday", "9am-5pm", "Main St"),
                ScheduleItem::new("Tuesday", "10am, 6pm", "Side St"),
            ]
        );
    }

    #[test]
    fn test_csv_to_items_crlf_and_messy_headers() {
        let use_case = ScheduleUseCase::new(ScriptedSource::new(vec![]));
        let text = " LOCATION ,Day, t i m e\r\nDock 4,Wed,noon\r\n\r\n";
        assert_eq!(
            use_case.csv_to_items(text),
            vec![ScheduleItem::new("Wed", "noon", "Dock 4")]
        );
    }

    #[test]
    fn test_csv_to_items_empty() {
        let use_case = ScheduleUseCase::new(ScriptedSource::new(vec![]));
        assert!(use_case.csv_to_items("").is_empty());
        assert!(use_case.csv_to_items("Day,Time,Location\n").is_empty());
    }

    #[actix_web::test]
    async fn test_execute_fetches_every_time_without_cache() {
        let source = ScriptedSource::new(vec![Ok(SAMPLE.to_string()), Ok(SAMPLE.to_string())]);
        let use_case = ScheduleUseCase::new(source.clone());

        let first = use_case.execute().await.unwrap();
        let second = use_case.execute().await.unwrap();
        assert_eq!(first.items, second.items);
        assert!(!second.from_cache);
        assert_eq!(source.calls(), 2);
    }

    #[actix_web::test]
    async fn test_execute_propagates_upstream_error() {
        let source = ScriptedSource::new(vec![Err(AppError::Upstream { status: 500 })]);
        let use_case = ScheduleUseCase::new(source);

        let err = use_case.execute().await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(500));
    }

    #[actix_web::test]
    async fn test_cache_hit_skips_upstream() {
        let source = ScriptedSource::new(vec![Ok(SAMPLE.to_string())]);
        let use_case = ScheduleUseCase::new(source.clone())
            .with_cache(ScheduleCache::new(Duration::from_secs(60)));

        let first = use_case.execute().await.unwrap();
        let second = use_case.execute().await.unwrap();
        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.items, second.items);
        assert_eq!(source.calls(), 1);
    }

    #[actix_web::test]
    async fn test_failures_are_not_cached() {
        let source = ScriptedSource::new(vec![
            Err(AppError::Transport("connection reset".to_string())),
            Ok(SAMPLE.to_string()),
        ]);
        let use_case = ScheduleUseCase::new(source.clone())
            .with_cache(ScheduleCache::new(Duration::from_secs(60)));

        assert!(use_case.execute().await.is_err());
        let feed = use_case.execute().await.unwrap();
        assert!(!feed.from_cache);
        assert_eq!(feed.items.len(), 2);
        assert_eq!(source.calls(), 2);
    }
}
