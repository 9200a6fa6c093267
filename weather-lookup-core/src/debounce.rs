use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{config::SuggestConfig, provider::Geocoder, view::SharedView};

/// The single scheduled lookup, if any.
#[derive(Debug)]
struct PendingLookup {
    /// Cancelled when the lookup is superseded or torn down.
    token: CancellationToken,
    /// Cancelled by the lookup task on exit, whatever the reason.
    done: CancellationToken,
}

type PendingSlot = Arc<Mutex<Option<PendingLookup>>>;

/// Delays geocoding lookups until typing pauses.
///
/// Every input change cancels the previously scheduled lookup. A cancelled
/// lookup never writes to the view, even if its response already arrived.
/// Dropping the debouncer cancels whatever is pending.
#[derive(Debug)]
pub struct SuggestionDebouncer {
    geocoder: Arc<dyn Geocoder>,
    view: SharedView,
    settings: SuggestConfig,
    pending: PendingSlot,
}

impl SuggestionDebouncer {
    pub fn new(geocoder: Arc<dyn Geocoder>, view: SharedView, settings: SuggestConfig) -> Self {
        Self {
            geocoder,
            view,
            settings,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Handle a change of the search text. Must be called inside a Tokio runtime.
    pub fn on_input(&self, text: &str) {
        // Held until the new lookup is registered, so a superseded task can't commit in between.
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.token.cancel();
        }

        {
            let mut view = self.view.lock();
            view.set_query(text);
            view.set_show_suggestions(true);

            let len = text.chars().count();
            if len < self.settings.min_chars {
                view.clear_suggestions();
                debug!(len, "Input too short, suggestions cleared");
                return;
            }
        }

        let token = CancellationToken::new();
        let done = CancellationToken::new();
        let lookup = Lookup {
            geocoder: Arc::clone(&self.geocoder),
            view: Arc::clone(&self.view),
            pending: Arc::clone(&self.pending),
            token: token.clone(),
            query: text.to_owned(),
            quiet_period: self.settings.quiet_period(),
            limit: self.settings.limit,
        };

        let finished = done.clone().drop_guard();
        tokio::spawn(async move {
            let _finished = finished;
            lookup.run().await;
        });

        *pending = Some(PendingLookup { token, done });
    }

    /// Cancel the scheduled lookup. Safe to call any number of times.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.token.cancel();
        }
    }

    /// Whether a lookup is scheduled or in flight.
    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|p| !p.token.is_cancelled() && !p.done.is_cancelled())
    }

    /// Wait for the currently scheduled lookup to finish or be cancelled.
    pub async fn settle(&self) {
        let done = self.pending.lock().as_ref().map(|p| p.done.clone());

        if let Some(done) = done {
            done.cancelled().await;
        }
    }
}

impl Drop for SuggestionDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct Lookup {
    geocoder: Arc<dyn Geocoder>,
    view: SharedView,
    pending: PendingSlot,
    token: CancellationToken,
    query: String,
    quiet_period: Duration,
    limit: u8,
}

impl Lookup {
    async fn run(self) {
        tokio::select! {
            () = self.token.cancelled() => return,
            () = tokio::time::sleep(self.quiet_period) => {}
        }

        let result = tokio::select! {
            () = self.token.cancelled() => return,
            result = self.geocoder.suggest(&self.query, self.limit) => result,
        };

        let suggestions = match result {
            Ok(suggestions) => {
                debug!(query = %self.query, count = suggestions.len(), "Suggestions fetched");
                suggestions
            }
            Err(err) => {
                warn!(query = %self.query, error = %err, "Error fetching suggestions");
                Vec::new()
            }
        };

        let _slot = self.pending.lock();
        if self.token.is_cancelled() {
            debug!(query = %self.query, "Discarding superseded suggestions");
            return;
        }
        self.view.lock().set_suggestions(suggestions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        testing::{StubProvider, suggestion},
        view::ViewState,
    };

    fn debouncer(stub: &Arc<StubProvider>) -> (SuggestionDebouncer, SharedView) {
        let view = ViewState::shared();
        let geocoder: Arc<dyn Geocoder> = stub.clone();
        let debouncer = SuggestionDebouncer::new(
            geocoder,
            Arc::clone(&view),
            SuggestConfig::default(),
        );
        (debouncer, view)
    }

    fn suggestion_names(view: &SharedView) -> Vec<String> {
        view.lock()
            .suggestions()
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn short_input_clears_suggestions_without_lookup() {
        let stub = Arc::new(StubProvider::default());
        let (debouncer, view) = debouncer(&stub);
        view.lock().set_suggestions(vec![suggestion("London")]);

        debouncer.on_input("L");
        assert!(view.lock().suggestions().is_empty());
        assert!(!debouncer.has_pending());

        sleep_ms(1_000).await;
        assert!(stub.suggest_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn short_input_cancels_pending_lookup() {
        let stub = Arc::new(StubProvider::default());
        let (debouncer, view) = debouncer(&stub);

        debouncer.on_input("Lo");
        sleep_ms(100).await;
        debouncer.on_input("L");

        sleep_ms(1_000).await;
        assert!(stub.suggest_calls().is_empty());
        assert!(view.lock().suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_fires_only_after_quiet_period() {
        let stub = Arc::new(StubProvider::default());
        let (debouncer, view) = debouncer(&stub);

        debouncer.on_input("Paris");
        assert_eq!(view.lock().query(), "Paris");

        sleep_ms(250).await;
        assert!(stub.suggest_calls().is_empty());
        assert!(debouncer.has_pending());

        debouncer.settle().await;
        assert!(!debouncer.has_pending());
        assert_eq!(stub.suggest_calls(), vec!["Paris"]);
        assert_eq!(suggestion_names(&view), vec!["Paris"]);
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_stays_pending_while_concurrent_settles_wait() {
        let stub = Arc::new(StubProvider::default());
        let (debouncer, view) = debouncer(&stub);
        let debouncer = Arc::new(debouncer);

        debouncer.on_input("Paris");
        let waiters: Vec<_> = (0..2)
            .map(|_| {
                let debouncer = Arc::clone(&debouncer);
                tokio::spawn(async move { debouncer.settle().await })
            })
            .collect();

        sleep_ms(100).await;
        assert!(debouncer.has_pending());
        assert!(stub.suggest_calls().is_empty());
        assert!(waiters.iter().all(|w| !w.is_finished()));

        for waiter in waiters {
            waiter.await.expect("settle task completes");
        }
        assert!(!debouncer.has_pending());
        assert_eq!(stub.suggest_calls(), vec!["Paris"]);
        assert_eq!(suggestion_names(&view), vec!["Paris"]);
    }

    #[tokio::test(start_paused = true)]
    async fn settle_returns_when_lookup_is_superseded() {
        let stub = Arc::new(StubProvider::default());
        let (debouncer, _view) = debouncer(&stub);
        let debouncer = Arc::new(debouncer);

        debouncer.on_input("Par");
        let waiter = {
            let debouncer = Arc::clone(&debouncer);
            tokio::spawn(async move { debouncer.settle().await })
        };

        sleep_ms(100).await;
        debouncer.on_input("Pari");
        sleep_ms(10).await;

        assert!(waiter.is_finished());
        assert!(debouncer.has_pending());
        assert!(stub.suggest_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_input_results_in_single_lookup_for_last_text() {
        let stub = Arc::new(StubProvider::default());
        let (debouncer, view) = debouncer(&stub);

        debouncer.on_input("Lo");
        sleep_ms(100).await;
        debouncer.on_input("Lon");
        sleep_ms(100).await;
        debouncer.on_input("Lond");

        sleep_ms(1_000).await;
        assert_eq!(stub.suggest_calls(), vec!["Lond"]);
        assert_eq!(suggestion_names(&view), vec!["Lond"]);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_in_flight_lookup_does_not_overwrite_newer_results() {
        let stub = Arc::new(StubProvider {
            suggest_delays: [("Lon".to_string(), Duration::from_secs(2))].into(),
            ..StubProvider::default()
        });
        let (debouncer, view) = debouncer(&stub);

        debouncer.on_input("Lon");
        // Past the quiet period: the slow lookup is in flight.
        sleep_ms(400).await;
        assert_eq!(stub.suggest_calls(), vec!["Lon"]);

        debouncer.on_input("Lond");
        sleep_ms(5_000).await;

        assert_eq!(stub.suggest_calls(), vec!["Lon", "Lond"]);
        assert_eq!(suggestion_names(&view), vec!["Lond"]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_lookup_degrades_to_empty_list() {
        let stub = Arc::new(StubProvider {
            failing_suggestions: vec!["Xy".to_string()],
            ..StubProvider::default()
        });
        let (debouncer, view) = debouncer(&stub);
        view.lock().set_suggestions(vec![suggestion("London")]);

        debouncer.on_input("Xy");
        debouncer.settle().await;

        assert_eq!(stub.suggest_calls(), vec!["Xy"]);
        assert!(view.lock().suggestions().is_empty());
        assert!(view.lock().error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_debouncer_cancels_pending_lookup() {
        let stub = Arc::new(StubProvider::default());
        let (debouncer, view) = debouncer(&stub);

        debouncer.on_input("Berlin");
        drop(debouncer);

        sleep_ms(1_000).await;
        assert!(stub.suggest_calls().is_empty());
        assert!(view.lock().suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent() {
        let stub = Arc::new(StubProvider::default());
        let (debouncer, view) = debouncer(&stub);

        debouncer.cancel();
        debouncer.on_input("Rome");
        debouncer.cancel();
        debouncer.cancel();
        assert!(!debouncer.has_pending());

        sleep_ms(1_000).await;
        assert!(stub.suggest_calls().is_empty());

        debouncer.on_input("Roma");
        debouncer.settle().await;
        assert_eq!(suggestion_names(&view), vec!["Roma"]);
    }
}
