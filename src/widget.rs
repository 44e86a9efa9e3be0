use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;

use super::fetcher::{CountFetcher, VisitCount};
use super::render;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Pending,
    Success(VisitCount),
    Failure(String),
}

impl FetchOutcome {
    pub fn is_settled(&self) -> bool {
        !matches!(self, FetchOutcome::Pending)
    }
}

/// Visit counter widget.
///
/// Starts out pending and fetches the count exactly once, when mounted.
/// Dropping the widget unmounts it; a fetch still in flight runs to
/// completion and its result is discarded.
pub struct VisitCounter<F> {
    fetcher: Arc<F>,
    outcome: watch::Receiver<FetchOutcome>,
    // taken by the fetch task on mount
    publisher: Option<watch::Sender<FetchOutcome>>,
    // set when the fetch task vanished without publishing
    lost: bool,
}

const LOST_FETCH: &str = "visit count fetch ended without a result";

impl<F> VisitCounter<F>
where
    F: CountFetcher + Send + Sync + 'static,
{
    pub fn new(fetcher: Arc<F>) -> Self {
        let (publisher, outcome) = watch::channel(FetchOutcome::Pending);

        VisitCounter {
            fetcher,
            outcome,
            publisher: Some(publisher),
            lost: false,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.publisher.is_none()
    }

    /// Starts the fetch. Mounting an already mounted widget does nothing and
    /// returns `None`.
    ///
    /// The returned task resolves to whether its outcome was published; it is
    /// not published once the widget is gone.
    pub fn mount(&mut self) -> Option<JoinHandle<bool>> {
        let publisher = self.publisher.take()?;
        let fetcher = self.fetcher.clone();

        let task = tokio::spawn(async move {
            // a panicking fetcher still settles the widget
            let fetch = tokio::spawn(async move { fetcher.fetch_visits().await });

            let outcome = match fetch.await {
                Ok(Ok(count)) => {
                    tracing::info!("visit count fetched: {}", count);
                    FetchOutcome::Success(count)
                }
                Ok(Err(e)) => {
                    tracing::error!("failed to fetch visit count, reason: {}", e);
                    FetchOutcome::Failure(e.to_string())
                }
                Err(e) => {
                    tracing::error!("visit count fetch task failed, reason: {}", e);
                    FetchOutcome::Failure(e.to_string())
                }
            };

            if publisher.is_closed() {
                tracing::debug!("visit counter unmounted before the fetch completed");
                return false;
            }

            publish(&publisher, outcome)
        });

        Some(task)
    }

    pub fn outcome(&self) -> FetchOutcome {
        if self.lost {
            return FetchOutcome::Failure(LOST_FETCH.to_string());
        }
        self.outcome.borrow().clone()
    }

    pub fn render(&self) -> Result<String, askama::Error> {
        render::visit_counter(&self.outcome())
    }

    /// Observed outcomes, starting with the current one. The stream ends once
    /// the fetch task is done.
    pub fn changes(&self) -> WatchStream<FetchOutcome> {
        WatchStream::new(self.outcome.clone())
    }

    /// Mounts the widget if needed and waits for the fetch to settle.
    pub async fn settled(&mut self) -> FetchOutcome {
        self.mount();

        let settled = self
            .outcome
            .wait_for(FetchOutcome::is_settled)
            .await
            .map(|outcome| outcome.clone());

        match settled {
            Ok(outcome) => outcome,
            // the fetch task was dropped, e.g. by a runtime shutdown
            Err(_) => {
                tracing::error!("{}", LOST_FETCH);
                self.lost = true;
                self.outcome()
            }
        }
    }
}

/// Replaces a pending outcome. A settled outcome is never overwritten.
fn publish(publisher: &watch::Sender<FetchOutcome>, outcome: FetchOutcome) -> bool {
    publisher.send_if_modified(|current| {
        if current.is_settled() {
            return false;
        }
        *current = outcome;
        true
    })
}
