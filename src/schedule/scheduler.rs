//! Recurring update checks
//!
//! [`Updater`] wires a [`Resolver`], a [`DownloadManager`] and a
//! [`Notifier`] into a pass that can run once or on an interval. The
//! resolver sits behind an async mutex held for the whole pass, so two
//! passes never interleave writes to the resolved state.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::UpdaterConfig;
use crate::error::ConfigurationError;
use crate::notify::{
    Audience, MessageCatalog, NotificationSink, Notifier, Subscriber, TracingConsole,
};
use crate::provider::Provider;
use crate::schedule::event::{CompletionObserver, UpdateCompleteEvent};
use crate::schedule::interval::Interval;
use crate::update::download::destination_for;
use crate::update::{DownloadManager, ResolvedUpdate, Resolver, UpdateResult};
use crate::version::Version;

/// Where a pass runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// On the caller's task
    Sync,
    /// On a spawned worker task
    Async,
}

/// Handle to a background schedule started by [`Updater::run_periodic`]
pub struct ScheduleHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl ScheduleHandle {
    /// Stop scheduling new passes. A pass already running completes.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel and wait for the schedule loop to exit
    pub async fn stop(self) {
        self.token.cancel();
        if let Err(e) = self.task.await {
            error!("Update scheduler task failed: {}", e);
        }
    }
}

/// Builder for [`Updater`]. Validation happens in [`UpdaterBuilder::build`].
pub struct UpdaterBuilder {
    app_name: String,
    current: Version,
    providers: Vec<Arc<dyn Provider>>,
    config: UpdaterConfig,
    enabled: bool,
    console: Arc<dyn NotificationSink>,
    audience: Option<Arc<dyn Audience>>,
    catalog: MessageCatalog,
    observers: Vec<Arc<dyn CompletionObserver>>,
}

impl UpdaterBuilder {
    pub fn provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn providers(mut self, providers: impl IntoIterator<Item = Arc<dyn Provider>>) -> Self {
        self.providers.extend(providers);
        self
    }

    /// Apply host configuration (global toggle, downloads, interval, unstable, permission)
    pub fn config(mut self, config: UpdaterConfig) -> Self {
        self.config = config;
        self
    }

    /// Check interval in the `<number><unit>` grammar
    pub fn interval(mut self, interval: impl Into<String>) -> Self {
        self.config.interval = interval.into();
        self
    }

    /// Local toggle for this updater, independent of the global one
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn unstable(mut self, unstable: bool) -> Self {
        self.config.unstable = unstable;
        self
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.config.permission = Some(permission.into());
        self
    }

    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.download_dir = Some(dir.into());
        self
    }

    pub fn console(mut self, console: Arc<dyn NotificationSink>) -> Self {
        self.console = console;
        self
    }

    pub fn audience(mut self, audience: Arc<dyn Audience>) -> Self {
        self.audience = Some(audience);
        self
    }

    pub fn catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn CompletionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> Result<Updater, ConfigurationError> {
        if self.providers.is_empty() {
            return Err(ConfigurationError::NoProviders);
        }
        if self.providers.iter().any(|p| p.name().trim().is_empty()) {
            return Err(ConfigurationError::EmptyProviderName);
        }

        let interval: Interval = self.config.interval.parse()?;
        let download_dir = self.config.resolved_download_dir();

        let mut resolver = Resolver::new(self.current, self.providers)
            .with_unstable(self.config.unstable)
            .with_global_enabled(self.config.enabled);
        resolver.set_enabled(self.enabled);

        let mut notifier = Notifier::new(self.app_name, self.console)
            .with_permission(self.config.permission)
            .with_catalog(self.catalog);
        if let Some(audience) = self.audience {
            notifier = notifier.with_audience(audience);
        }

        Ok(Updater {
            resolver: Arc::new(Mutex::new(resolver)),
            downloads: Arc::new(DownloadManager::new(self.config.attempt_downloads)),
            notifier: Arc::new(notifier),
            observers: self.observers.into(),
            interval,
            download_dir,
        })
    }
}

/// Drives resolution passes and their side effects
#[derive(Clone)]
pub struct Updater {
    resolver: Arc<Mutex<Resolver>>,
    downloads: Arc<DownloadManager>,
    notifier: Arc<Notifier>,
    observers: Arc<[Arc<dyn CompletionObserver>]>,
    interval: Interval,
    download_dir: PathBuf,
}

impl Updater {
    pub fn builder(app_name: impl Into<String>, current: Version) -> UpdaterBuilder {
        UpdaterBuilder {
            app_name: app_name.into(),
            current,
            providers: Vec::new(),
            config: UpdaterConfig::default(),
            enabled: true,
            console: Arc::new(TracingConsole),
            audience: None,
            catalog: MessageCatalog::default(),
            observers: Vec::new(),
        }
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub async fn result(&self) -> UpdateResult {
        self.resolver.lock().await.result()
    }

    /// Copy of the state left by the last pass
    pub async fn state(&self) -> ResolvedUpdate {
        self.resolver.lock().await.state().clone()
    }

    pub async fn providers(&self) -> Vec<Arc<dyn Provider>> {
        self.resolver.lock().await.providers().to_vec()
    }

    /// Winning provider of the last pass, `None` before any pass selected one
    pub async fn active_provider(&self) -> Option<Arc<dyn Provider>> {
        self.resolver.lock().await.active_provider().cloned()
    }

    pub async fn set_enabled(&self, enabled: bool) {
        self.resolver.lock().await.set_enabled(enabled);
    }

    /// Run a single pass and return its result.
    ///
    /// In [`ExecutionMode::Async`] the pass runs on a spawned task and this
    /// call only waits for it to finish.
    pub async fn run_once(&self, mode: ExecutionMode) -> UpdateResult {
        match mode {
            ExecutionMode::Sync => self.pass(false).await,
            ExecutionMode::Async => {
                let updater = self.clone();
                match tokio::spawn(async move { updater.pass(true).await }).await {
                    Ok(result) => result,
                    Err(e) => {
                        error!("Update check task failed: {}", e);
                        self.result().await
                    }
                }
            }
        }
    }

    /// Run passes on the configured interval until `token` is cancelled.
    ///
    /// The first pass starts immediately. Ticks missed while a pass is
    /// running are skipped rather than queued.
    pub async fn run(&self, mode: ExecutionMode, token: CancellationToken) {
        let mut ticker = interval(self.interval.as_duration());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        debug!("Checking for updates every {:?}", self.interval.as_duration());

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Update scheduler cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_once(mode).await;
                }
            }
        }
    }

    /// Check on the configured interval until `token` is cancelled.
    ///
    /// With [`ExecutionMode::Async`] the schedule runs on a background task
    /// and the returned handle controls it. With [`ExecutionMode::Sync`] the
    /// schedule runs on the calling task: this call returns `None` once
    /// `token` is cancelled.
    ///
    /// A disabled updater schedules nothing, records
    /// [`UpdateResult::Disabled`] and returns `None` at once.
    pub async fn run_periodic(
        &self,
        mode: ExecutionMode,
        token: CancellationToken,
    ) -> Option<ScheduleHandle> {
        {
            let mut resolver = self.resolver.lock().await;
            if !resolver.is_enabled() {
                info!("Updater disabled, not checking for updates");
                if let Err(e) = resolver.resolve().await {
                    warn!("Failed to record disabled state: {}", e);
                }
                return None;
            }
        }

        match mode {
            ExecutionMode::Sync => {
                self.run(mode, token).await;
                None
            }
            ExecutionMode::Async => {
                let updater = self.clone();
                let loop_token = token.clone();
                let task = tokio::spawn(async move { updater.run(mode, loop_token).await });

                Some(ScheduleHandle { token, task })
            }
        }
    }

    /// Send the pending-update message to a subscriber that just joined
    pub async fn notify_subscriber(&self, subscriber: &dyn Subscriber) -> bool {
        let state = self.state().await;
        self.notifier.notify_subscriber(subscriber, &state)
    }

    async fn pass(&self, is_async: bool) -> UpdateResult {
        let mut resolver = self.resolver.lock().await;

        if resolver.is_enabled() {
            self.notifier.announce_check();
        }

        if let Err(e) = resolver.resolve().await {
            warn!("Update check failed: {}", e);
        }

        if resolver.result() == UpdateResult::UpdateAvailable {
            self.download(&mut resolver).await;
        }

        let result = resolver.result();
        let mut event = UpdateCompleteEvent::new(resolver.state(), is_async);
        drop(resolver);

        for observer in self.observers.iter() {
            observer.on_complete(&mut event);
        }

        if event.is_cancelled() {
            debug!("Update notifications cancelled by an observer");
        } else {
            self.notifier.dispatch(&event);
        }

        result
    }

    async fn download(&self, resolver: &mut Resolver) {
        let Some(link) = resolver
            .active_release()
            .and_then(|release| release.download_link().value().cloned())
        else {
            return;
        };

        let Some(destination) = destination_for(&link, &self.download_dir) else {
            warn!("Cannot derive a file name from {}", link);
            return;
        };

        match self.downloads.ensure(Some(&link), &destination).await {
            Ok(outcome) => resolver.apply_download(outcome),
            Err(e) => error!("Failed to download {}: {}", link, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::provider::Release;
    use crate::provider::traits::MockProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn provider(name: &'static str, version: &'static str) -> Arc<dyn Provider> {
        let mut mock = MockProvider::new();
        mock.expect_name().return_const(name);
        mock.expect_fetch()
            .returning(move || Ok(Release::new(Version::parse(version))));
        Arc::new(mock)
    }

    #[test]
    fn build_rejects_missing_providers() {
        let result = Updater::builder("App", Version::parse("1.0.0")).build();

        assert!(matches!(result, Err(ConfigurationError::NoProviders)));
    }

    #[test]
    fn build_rejects_blank_provider_name() {
        let result = Updater::builder("App", Version::parse("1.0.0"))
            .provider(provider(" ", "1.0.0"))
            .build();

        assert!(matches!(result, Err(ConfigurationError::EmptyProviderName)));
    }

    #[test]
    fn build_rejects_invalid_interval() {
        let result = Updater::builder("App", Version::parse("1.0.0"))
            .provider(provider("A", "1.0.0"))
            .interval("soon")
            .build();

        assert!(matches!(result, Err(ConfigurationError::InvalidInterval(_))));

        let result = Updater::builder("App", Version::parse("1.0.0"))
            .provider(provider("A", "1.0.0"))
            .interval("0s")
            .build();

        assert!(matches!(result, Err(ConfigurationError::NonPositiveInterval)));
    }

    #[tokio::test]
    async fn run_once_reports_result_in_both_modes() {
        let updater = Updater::builder("App", Version::parse("1.0.0"))
            .provider(provider("A", "1.0.0"))
            .build()
            .unwrap();

        assert_eq!(updater.run_once(ExecutionMode::Sync).await, UpdateResult::Latest);
        assert_eq!(updater.run_once(ExecutionMode::Async).await, UpdateResult::Latest);
    }

    #[tokio::test]
    async fn observer_sees_mode_and_result() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);

        let updater = Updater::builder("App", Version::parse("1.0.0"))
            .provider(provider("A", "1.5.0"))
            .config(UpdaterConfig {
                attempt_downloads: false,
                ..UpdaterConfig::default()
            })
            .observer(Arc::new(move |event: &mut UpdateCompleteEvent| {
                recorder
                    .lock()
                    .unwrap()
                    .push((event.result(), event.is_async()));
            }))
            .build()
            .unwrap();

        updater.run_once(ExecutionMode::Async).await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(UpdateResult::UpdateAvailable, true)]
        );
    }

    #[tokio::test]
    async fn run_periodic_returns_none_when_disabled() {
        let updater = Updater::builder("App", Version::parse("1.0.0"))
            .provider(provider("A", "2.0.0"))
            .enabled(false)
            .build()
            .unwrap();

        assert!(
            updater
                .run_periodic(ExecutionMode::Async, CancellationToken::new())
                .await
                .is_none()
        );
        assert_eq!(updater.result().await, UpdateResult::Disabled);
    }

    #[tokio::test(start_paused = true)]
    async fn run_periodic_checks_on_every_tick_until_stopped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut mock = MockProvider::new();
        mock.expect_name().return_const("A");
        mock.expect_fetch().returning(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::Parse("offline".to_string()))
        });

        let updater = Updater::builder("App", Version::parse("1.0.0"))
            .provider(Arc::new(mock))
            .interval("1m")
            .build()
            .unwrap();

        let handle = updater
            .run_periodic(ExecutionMode::Async, CancellationToken::new())
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_secs(150)).await;
        handle.stop().await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(updater.result().await, UpdateResult::Unknown);
    }

    #[tokio::test]
    async fn run_once_sync_runs_pass_on_calling_task() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);

        let updater = Updater::builder("App", Version::parse("1.0.0"))
            .provider(provider("A", "1.0.0"))
            .observer(Arc::new(move |_: &mut UpdateCompleteEvent| {
                recorder.lock().unwrap().push(tokio::task::try_id());
            }))
            .build()
            .unwrap();

        let caller = tokio::spawn(async move {
            updater.run_once(ExecutionMode::Sync).await;
            updater.run_once(ExecutionMode::Async).await;
            tokio::task::try_id()
        })
        .await
        .unwrap();

        let seen = seen.lock().unwrap();
        assert!(caller.is_some());
        assert_eq!(seen[0], caller);
        assert_ne!(seen[1], caller);
    }

    #[tokio::test]
    async fn run_periodic_sync_drives_schedule_on_calling_task() {
        let token = CancellationToken::new();
        let stopper = token.clone();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);

        let updater = Updater::builder("App", Version::parse("1.0.0"))
            .provider(provider("A", "1.0.0"))
            .observer(Arc::new(move |event: &mut UpdateCompleteEvent| {
                recorder
                    .lock()
                    .unwrap()
                    .push((tokio::task::try_id(), event.is_async()));
                stopper.cancel();
            }))
            .build()
            .unwrap();

        let runner = updater.clone();
        let (caller, handle_missing) = tokio::spawn(async move {
            let handle = runner.run_periodic(ExecutionMode::Sync, token).await;
            (tokio::task::try_id(), handle.is_none())
        })
        .await
        .unwrap();

        assert!(handle_missing);
        assert!(caller.is_some());
        assert_eq!(*seen.lock().unwrap(), vec![(caller, false)]);
        assert_eq!(updater.result().await, UpdateResult::Latest);
    }
}
