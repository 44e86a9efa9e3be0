use std::sync::Arc;

use super::fetcher::CountFetcher;
use super::widget::VisitCounter;

pub struct State<T: CountFetcher> {
    pub fetcher: Arc<T>,
    pub site_title: String,
}

impl<T> State<T>
where
    T: CountFetcher + Send + Sync + 'static,
{
    pub fn new(fetcher: T, site_title: String) -> State<T> {
        State {
            fetcher: Arc::new(fetcher),
            site_title,
        }
    }

    /// A fresh, unmounted widget. Widgets never share outcomes.
    pub fn visit_counter(&self) -> VisitCounter<T> {
        VisitCounter::new(self.fetcher.clone())
    }
}
