use askama::Template;

use super::widget::FetchOutcome;

pub const PLACEHOLDER: &str = "...";
pub const FAILURE_MESSAGE: &str = "Failed to fetch visit count";

/// Widget markup.
///
/// The sentence always carries `id="visit-count"` and the value span always
/// carries `data-visit-count`, whatever state the widget is in.
#[derive(Template)]
#[template(path = "visit_counter.html")]
pub struct VisitCounterTemplate {
    value: String,
    failure: Option<&'static str>,
}

impl VisitCounterTemplate {
    pub fn new(outcome: &FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Pending => VisitCounterTemplate {
                value: PLACEHOLDER.to_string(),
                failure: None,
            },
            FetchOutcome::Success(count) => VisitCounterTemplate {
                value: count.to_string(),
                failure: None,
            },
            // internal failure details are logged, never rendered
            FetchOutcome::Failure(_) => VisitCounterTemplate {
                value: PLACEHOLDER.to_string(),
                failure: Some(FAILURE_MESSAGE),
            },
        }
    }
}

#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate<'a> {
    title: &'a str,
    widget: &'a str,
}

pub fn visit_counter(outcome: &FetchOutcome) -> Result<String, askama::Error> {
    VisitCounterTemplate::new(outcome).render()
}

pub fn page(title: &str, widget: &str) -> Result<String, askama::Error> {
    PageTemplate { title, widget }.render()
}
