use super::report::ScanReport;
use super::{default_scanners, ScanOutcome, Scanner, ScannerError};
use crate::config::ScanConfig;
use crate::filter::{Filter, StaticFilter};
use crate::number::Number;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

/// Registry of scanners plus the fan-out/join that runs them.
///
/// Each call to [`ScannerManager::scan`] returns its own [`ScanReport`];
/// nothing is kept between calls.
pub struct ScannerManager<S = Number>
where
    S: Send + Sync + 'static,
{
    scanners: Vec<Arc<dyn Scanner<S>>>,
    filter: Arc<dyn Filter>,
    max_concurrency: Option<usize>,
}

impl<S> Clone for ScannerManager<S>
where
    S: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            scanners: self.scanners.clone(),
            filter: Arc::clone(&self.filter),
            max_concurrency: self.max_concurrency,
        }
    }
}

impl<S> std::fmt::Debug for ScannerManager<S>
where
    S: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScannerManager")
            .field("scanners", &self.identifiers())
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}

impl ScannerManager<Number> {
    /// Default scanners, filtered and capped as configured.
    pub fn from_config(config: &ScanConfig) -> Self {
        let filter = StaticFilter::new().with_rule(config.disabled_scanners.iter().cloned());
        let mut manager = Self::new(Arc::new(filter));
        if let Some(limit) = config.max_concurrency {
            manager = manager.with_max_concurrency(limit);
        }
        for scanner in default_scanners(config) {
            manager.add_scanner(scanner);
        }
        manager
    }
}

impl<S> ScannerManager<S>
where
    S: Send + Sync + 'static,
{
    pub fn new(filter: Arc<dyn Filter>) -> Self {
        Self {
            scanners: Vec::new(),
            filter,
            max_concurrency: None,
        }
    }

    /// Cap the number of scans in flight at once. Unbounded by default.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.max(1));
        self
    }

    pub fn register_scanner<T: Scanner<S> + 'static>(&mut self, scanner: T) {
        self.add_scanner(Arc::new(scanner));
    }

    /// Registers the scanner only if `should_run` reports true right now.
    /// Rejected scanners are dropped without error.
    pub fn add_scanner(&mut self, scanner: Arc<dyn Scanner<S>>) {
        if !scanner.should_run() {
            tracing::debug!(scanner = %scanner.identifier(), "Scanner is not able to run, skipping registration");
            return;
        }
        self.scanners.push(scanner);
    }

    pub fn filter(&self) -> &Arc<dyn Filter> {
        &self.filter
    }

    /// Registered identifiers in registration order
    pub fn identifiers(&self) -> Vec<String> {
        self.scanners.iter().map(|s| s.identifier()).collect()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.scanners.iter().any(|s| s.identifier() == identifier)
    }

    pub fn len(&self) -> usize {
        self.scanners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scanners.is_empty()
    }

    pub async fn scan(&self, subject: Arc<S>) -> ScanReport {
        self.scan_with_filter(subject, self.filter.as_ref()).await
    }

    /// Same as [`ScannerManager::scan`] but with `filter` in place of the
    /// manager's own filter.
    pub async fn scan_with_filter(&self, subject: Arc<S>, filter: &dyn Filter) -> ScanReport {
        let mut report = ScanReport::new();
        let (tx, mut rx) = mpsc::unbounded_channel::<(String, ScanOutcome)>();
        let limiter = self.max_concurrency.map(|limit| Arc::new(Semaphore::new(limit)));

        let mut set = JoinSet::new();
        let mut in_flight = HashMap::new();

        for scanner in &self.scanners {
            let identifier = scanner.identifier();
            if filter.is_scanner_ignored(&identifier) {
                tracing::debug!(scanner = %identifier, "Scanner was ignored by filter");
                report.skipped.push(identifier);
                continue;
            }

            let scanner = Arc::clone(scanner);
            let subject = Arc::clone(&subject);
            let limiter = limiter.clone();
            let tx = tx.clone();
            let key = identifier.clone();

            let handle = set.spawn(async move {
                // permit is held until the scan completes
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let outcome = scanner.scan(&subject).await;
                // receiver lives until every sender is gone
                let _ = tx.send((key, outcome));
            });
            in_flight.insert(handle.id(), identifier);
        }
        drop(tx);

        tracing::debug!(count = in_flight.len(), "Dispatched scanners");

        while let Some((identifier, outcome)) = rx.recv().await {
            if let Err(err) = &outcome {
                tracing::debug!(scanner = %identifier, error = %err, "Scanner failed");
            }
            report.record(identifier, outcome);
        }

        while let Some(joined) = set.join_next().await {
            let Err(err) = joined else { continue };
            if let Some(identifier) = in_flight.remove(&err.id()) {
                tracing::warn!(scanner = %identifier, "Scanner task did not complete: {}", err);
                report.record(identifier, Err(ScannerError::Panicked(err.to_string())));
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{AllowListFilter, NoFilter};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StubScanner {
        id: &'static str,
        runnable: bool,
        outcome: ScanOutcome,
        calls: Arc<AtomicUsize>,
    }

    impl StubScanner {
        fn new(id: &'static str, outcome: ScanOutcome) -> Self {
            Self {
                id,
                runnable: true,
                outcome,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn disabled(mut self) -> Self {
            self.runnable = false;
            self
        }
    }

    #[async_trait]
    impl Scanner<String> for StubScanner {
        fn identifier(&self) -> String {
            self.id.to_string()
        }

        fn should_run(&self) -> bool {
            self.runnable
        }

        async fn scan(&self, _subject: &String) -> ScanOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.outcome.clone()
        }
    }

    struct PanickingScanner;

    #[async_trait]
    impl Scanner<String> for PanickingScanner {
        fn identifier(&self) -> String {
            "panics".to_string()
        }

        fn should_run(&self) -> bool {
            true
        }

        async fn scan(&self, _subject: &String) -> ScanOutcome {
            panic!("scanner exploded");
        }
    }

    /// Tracks the peak number of concurrent scans.
    struct GaugeScanner {
        id: String,
        current: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Scanner<String> for GaugeScanner {
        fn identifier(&self) -> String {
            self.id.clone()
        }

        fn should_run(&self) -> bool {
            true
        }

        async fn scan(&self, subject: &String) -> ScanOutcome {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(Some(json!({ "subject": subject })))
        }
    }

    fn subject() -> Arc<String> {
        Arc::new("+33679368229".to_string())
    }

    fn manager() -> ScannerManager<String> {
        ScannerManager::new(Arc::new(NoFilter))
    }

    #[tokio::test]
    async fn test_value_failure_and_empty_outcomes() {
        let mut manager = manager();
        manager.register_scanner(StubScanner::new("a", Ok(Some(json!("x")))));
        manager.register_scanner(StubScanner::new(
            "b",
            Err(ScannerError::Failed("timeout".into())),
        ));
        manager.register_scanner(StubScanner::new("c", Ok(None)));

        let report = manager.scan(subject()).await;

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.result("a"), Some(&json!("x")));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.error("b"),
            Some(&ScannerError::Failed("timeout".into()))
        );
        assert!(report.result("c").is_none());
        assert!(report.error("c").is_none());
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_null_value_is_omitted() {
        let mut manager = manager();
        manager.register_scanner(StubScanner::new("null", Ok(Some(Value::Null))));

        let report = manager.scan(subject()).await;

        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_scanner_that_cannot_run_is_never_registered() {
        let scanner = StubScanner::new("offline", Ok(Some(json!("data")))).disabled();
        let calls = Arc::clone(&scanner.calls);

        let mut manager = manager();
        manager.register_scanner(scanner);
        manager.register_scanner(StubScanner::new("online", Ok(Some(json!(1)))));

        assert_eq!(manager.identifiers(), vec!["online".to_string()]);
        assert!(!manager.contains("offline"));

        let report = manager.scan(subject()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(report.result("offline").is_none());
        assert!(report.error("offline").is_none());
        assert!(!report.skipped.contains(&"offline".to_string()));
    }

    #[tokio::test]
    async fn test_filtered_scanner_is_skipped_for_that_call() {
        let ignored = StubScanner::new("ignored", Ok(Some(json!("would succeed"))));
        let calls = Arc::clone(&ignored.calls);

        let mut manager = ScannerManager::new(Arc::new(
            StaticFilter::new().with_rule(["ignored"]),
        ));
        manager.register_scanner(ignored);
        manager.register_scanner(StubScanner::new("kept", Ok(Some(json!(true)))));

        let report = manager.scan(subject()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(report.result("ignored").is_none());
        assert!(report.error("ignored").is_none());
        assert_eq!(report.skipped, vec!["ignored".to_string()]);
        assert_eq!(report.result("kept"), Some(&json!(true)));

        // the filter only applies to the call it is given to
        let report = manager.scan_with_filter(subject(), &NoFilter).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.result("ignored"), Some(&json!("would succeed")));
    }

    #[tokio::test]
    async fn test_skipped_keeps_registration_order() {
        let mut manager = ScannerManager::new(Arc::new(AllowListFilter::new(["b"])));
        for id in ["a", "b", "c", "d"] {
            manager.register_scanner(StubScanner::new(id, Ok(Some(json!(id)))));
        }

        let report = manager.scan(subject()).await;

        assert_eq!(report.skipped, vec!["a", "c", "d"]);
        assert_eq!(report.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_no_writes_lost_under_concurrency() {
        let mut manager = manager();
        let mut expected = 0;
        for i in 0..200usize {
            let id: &'static str = Box::leak(format!("scanner-{}", i).into_boxed_str());
            let outcome = match i % 3 {
                0 => Ok(Some(json!(i))),
                1 => Err(ScannerError::Failed(format!("failure {}", i))),
                _ => Ok(None),
            };
            if i % 3 != 2 {
                expected += 1;
            }
            manager.register_scanner(StubScanner::new(id, outcome));
        }

        let report = manager.scan(subject()).await;

        assert_eq!(report.len(), expected);
        for id in report.results.keys() {
            assert!(!report.errors.contains_key(id));
        }
        assert_eq!(report.result("scanner-3"), Some(&json!(3)));
        assert_eq!(
            report.error("scanner-4"),
            Some(&ScannerError::Failed("failure 4".into()))
        );
    }

    #[tokio::test]
    async fn test_each_scan_returns_a_fresh_report() {
        let mut manager = ScannerManager::new(Arc::new(NoFilter));
        manager.register_scanner(StubScanner::new("a", Ok(Some(json!("x")))));

        let first = manager.scan(subject()).await;
        let second = manager
            .scan_with_filter(subject(), &StaticFilter::new().with_rule(["a"]))
            .await;

        assert_eq!(first.result("a"), Some(&json!("x")));
        assert!(second.is_empty());
        assert_eq!(second.skipped, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_panicking_scanner_does_not_affect_siblings() {
        let mut manager = manager();
        manager.register_scanner(PanickingScanner);
        manager.register_scanner(StubScanner::new("fine", Ok(Some(json!("ok")))));

        let report = manager.scan(subject()).await;

        assert_eq!(report.result("fine"), Some(&json!("ok")));
        assert!(matches!(
            report.error("panics"),
            Some(ScannerError::Panicked(_))
        ));
        assert!(report.result("panics").is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_max_concurrency_is_respected() {
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut manager = manager().with_max_concurrency(2);
        for i in 0..10 {
            manager.register_scanner(GaugeScanner {
                id: format!("gauge-{}", i),
                current: Arc::clone(&current),
                peak: Arc::clone(&peak),
            });
        }

        let report = manager.scan(subject()).await;

        assert_eq!(report.results.len(), 10);
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(current.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped() {
        let mut manager = manager().with_max_concurrency(0);
        manager.register_scanner(StubScanner::new("a", Ok(Some(json!(1)))));

        let report = manager.scan(subject()).await;

        assert_eq!(report.result("a"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_empty_manager_returns_empty_report() {
        let manager = manager();

        assert!(manager.is_empty());
        assert_eq!(manager.scan(subject()).await, ScanReport::default());
    }
}
