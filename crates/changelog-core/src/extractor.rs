//! The detail extractor: classified event → ordered details payload.

use std::sync::Arc;

use changelog_contracts::{
    config::{CallerLogging, ChangelogConfig},
    context::RequestContext,
    details::{labels, Details},
    event::LifecycleEvent,
    operation::Operation,
};

use crate::traits::Sanitizer;

/// Builds the details payload for one recorded operation.
///
/// Labels are added in a fixed order: title, name, template, URLs, changed
/// fields, caller. Every value is sanitized; values that sanitize to an
/// empty string are left out.
pub struct DetailExtractor {
    sanitizer: Arc<dyn Sanitizer>,
    log_callers: CallerLogging,
    front_controller: String,
}

impl DetailExtractor {
    pub fn new(
        sanitizer: Arc<dyn Sanitizer>,
        log_callers: CallerLogging,
        front_controller: impl Into<String>,
    ) -> Self {
        Self {
            sanitizer,
            log_callers,
            front_controller: front_controller.into(),
        }
    }

    pub fn from_config(sanitizer: Arc<dyn Sanitizer>, config: &ChangelogConfig) -> Self {
        Self::new(sanitizer, config.log_callers, config.front_controller.clone())
    }

    pub fn extract(
        &self,
        operation: Operation,
        event: &LifecycleEvent,
        ctx: &RequestContext,
    ) -> Details {
        let page = &event.page;
        let mut details = Details::new();

        self.put(&mut details, labels::PAGE_TITLE, &page.title);

        // A move keeps the name; whatever name the page had is "the" name.
        match (operation, page.renamed_from()) {
            (Operation::Moved, _) => {
                let name = page.previous_name.as_deref().unwrap_or(page.name.as_str());
                self.put(&mut details, labels::PAGE_NAME, name);
            }
            (_, Some(previous)) => {
                self.put(&mut details, labels::PREVIOUS_PAGE_NAME, previous);
                self.put(&mut details, labels::PAGE_NAME, &page.name);
            }
            (_, None) => self.put(&mut details, labels::PAGE_NAME, &page.name),
        }

        self.put(&mut details, labels::TEMPLATE_NAME, &page.template.name);
        if let Some(previous) = page.template_changed_from() {
            self.put(&mut details, labels::PREVIOUS_TEMPLATE_NAME, &previous.name);
        }

        if operation == Operation::Edited {
            self.put(&mut details, labels::PAGE_URL, &page.url);
            self.put(
                &mut details,
                labels::FIELDS_EDITED,
                &page.changed_fields().join(", "),
            );
        } else {
            self.put(&mut details, labels::PREVIOUS_PAGE_URL, &page.previous_url());
            self.put(&mut details, labels::PAGE_URL, &page.url);
        }

        if let Some(caller) = self.caller(ctx) {
            self.put(&mut details, labels::CALLER, caller);
        }

        details
    }

    fn caller<'a>(&self, ctx: &'a RequestContext) -> Option<&'a str> {
        let caller = ctx.caller.as_ref()?;
        let via_front_controller = caller.script == self.front_controller;
        match self.log_callers {
            CallerLogging::Disabled => None,
            CallerLogging::Enabled if via_front_controller => None,
            CallerLogging::Enabled => Some(caller.script.as_str()),
            CallerLogging::All if via_front_controller => {
                Some(caller.request_url.as_deref().unwrap_or(caller.script.as_str()))
            }
            CallerLogging::All => Some(caller.script.as_str()),
        }
    }

    fn put(&self, details: &mut Details, label: &str, value: &str) {
        let value = self.sanitizer.sanitize(value);
        if !value.is_empty() {
            details.insert(label, value);
        }
    }
}
