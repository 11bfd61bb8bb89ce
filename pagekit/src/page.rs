//! A page with its behaviours attached
//!
//! [`Page`] owns the document and routes user events to the controller
//! whose marker the event target (or one of its ancestors) carries. It also
//! owns the notification deadlines: [`Page::run`] waits on the event channel
//! and the earliest deadline at the same time.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use pagedom::{Document, Event, EventOutcome, NodeId, Selector};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

use crate::behaviors::{
    AlwaysConfirm, Confirm, confirm_delete, fill_date_defaults, format_number_input,
    guard_modal_submit, hide_loading, preview_target, show_loading, show_preview, validate_form,
};
use crate::clipboard::{ClipboardProvider, SystemClipboard};
use crate::config::{KitConfig, marker_selector};
use crate::error::KitError;
use crate::files::{FileSource, FsSource, data_url};
use crate::notify::{NotificationId, NotificationManager, Severity};
use crate::table::{FilterController, SortController};

/// Marker selectors compiled once per page.
#[derive(Debug)]
struct MarkerSelectors {
    search_input: Selector,
    copy_button: Selector,
    delete_button: Selector,
    validated_form: Selector,
    modal_form: Selector,
    number_input: Selector,
    date_input: Selector,
    image_input: Selector,
}

impl MarkerSelectors {
    fn compile(config: &KitConfig) -> Result<Self, KitError> {
        let markers = &config.markers;
        Ok(Self {
            search_input: marker_selector(&markers.search_input)?,
            copy_button: marker_selector(&markers.copy_button)?,
            delete_button: marker_selector(&markers.delete_button)?,
            validated_form: marker_selector(&markers.validated_form)?,
            modal_form: marker_selector(&markers.modal_form)?,
            number_input: marker_selector(&markers.number_input)?,
            date_input: marker_selector(&markers.date_input)?,
            image_input: marker_selector(&markers.image_input)?,
        })
    }
}

/// Builder for [`Page`].
///
/// Defaults: [`KitConfig::default`], the system clipboard, the local
/// filesystem and a confirmation that always accepts.
pub struct PageBuilder {
    doc: Document,
    config: KitConfig,
    clipboard: Arc<dyn ClipboardProvider>,
    files: Arc<dyn FileSource>,
    confirm: Box<dyn Confirm>,
}

impl PageBuilder {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            config: KitConfig::default(),
            clipboard: Arc::new(SystemClipboard::new()),
            files: Arc::new(FsSource::new()),
            confirm: Box::new(AlwaysConfirm),
        }
    }

    pub fn config(mut self, config: KitConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clipboard(mut self, clipboard: Arc<dyn ClipboardProvider>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn files(mut self, files: Arc<dyn FileSource>) -> Self {
        self.files = files;
        self
    }

    pub fn confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Box::new(confirm);
        self
    }

    /// Compile the markers and attach the controllers.
    pub fn build(self) -> Result<Page, KitError> {
        Ok(Page {
            selectors: MarkerSelectors::compile(&self.config)?,
            sort: SortController::new(&self.config.markers)?,
            filter: FilterController::new(&self.config.markers),
            notifications: NotificationManager::new(&self.config)?,
            doc: self.doc,
            config: self.config,
            clipboard: self.clipboard,
            files: self.files,
            confirm: self.confirm,
        })
    }
}

pub struct Page {
    doc: Document,
    config: KitConfig,
    selectors: MarkerSelectors,
    sort: SortController,
    filter: FilterController,
    notifications: NotificationManager,
    clipboard: Arc<dyn ClipboardProvider>,
    files: Arc<dyn FileSource>,
    confirm: Box<dyn Confirm>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("nodes", &self.doc.len())
            .field("notifications", &self.notifications.live().len())
            .finish_non_exhaustive()
    }
}

impl Page {
    /// A page with default configuration and providers.
    pub fn new(doc: Document) -> Result<Self, KitError> {
        PageBuilder::new(doc).build()
    }

    pub fn builder(doc: Document) -> PageBuilder {
        PageBuilder::new(doc)
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn config(&self) -> &KitConfig {
        &self.config
    }

    pub fn sort(&self) -> &SortController {
        &self.sort
    }

    pub fn sort_mut(&mut self) -> &mut SortController {
        &mut self.sort
    }

    pub fn filter(&self) -> &FilterController {
        &self.filter
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    /// Page-load setup: adopt server-rendered alerts and default empty date
    /// inputs to today (UTC).
    pub fn init(&mut self, now: Instant) -> usize {
        self.init_with_date(now, Utc::now().date_naive())
    }

    /// [`Page::init`] with an explicit date for the date inputs.
    ///
    /// Returns the number of alerts adopted.
    pub fn init_with_date(&mut self, now: Instant, today: NaiveDate) -> usize {
        let adopted = self.notifications.adopt_existing(&self.doc, now);
        let dated = fill_date_defaults(&mut self.doc, &self.selectors.date_input, today);
        info!(
            "Page initialised: {} alerts adopted, {} date inputs defaulted",
            adopted, dated
        );
        adopted
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Run every behaviour that applies to `event`.
    pub async fn dispatch(&mut self, event: Event) -> EventOutcome {
        let target = event.target();
        if !self.doc.contains(target) {
            debug!("Ignoring {} on removed node {}", event.name(), target);
            return EventOutcome::ignored();
        }
        debug!("Dispatching {} on {}", event.name(), target);

        let outcome = match event {
            Event::Click { target } => self.on_click(target).await,
            Event::Input { target, value } => self.on_input(target, value),
            Event::Change { target, value } => self.on_change(target, value).await,
            Event::Blur { target } => self.on_blur(target),
            Event::Submit { target } => self.on_submit(target),
        };
        if !outcome.handled {
            debug!("No behaviour for event on {}", target);
        }
        outcome
    }

    async fn on_click(&mut self, target: NodeId) -> EventOutcome {
        if let Some(id) = self.notifications.dismiss_from(&mut self.doc, target) {
            debug!("Dismissed {} by close button", id);
            return EventOutcome::handled();
        }

        let mut outcome = EventOutcome::ignored();
        if let Some(header) = self.sort.header_for(&self.doc, target) {
            self.sort.on_header_click(&mut self.doc, header);
            outcome.merge(EventOutcome::handled());
        }
        if let Some(button) = self.doc.closest(target, &self.selectors.copy_button) {
            self.copy(button).await;
            outcome.merge(EventOutcome::handled());
        }
        if self.doc.closest(target, &self.selectors.delete_button).is_some() {
            outcome.merge(confirm_delete(
                self.confirm.as_ref(),
                &self.config.messages.delete_confirm,
            ));
        }
        outcome
    }

    async fn copy(&mut self, button: NodeId) {
        let key = &self.config.markers.copy_text_key;
        let text = match self.doc.node(button).and_then(|n| n.data(key)) {
            Some(text) => text.to_string(),
            None => self.doc.text_content(button).trim().to_string(),
        };

        let (message, severity) = match self.clipboard.write_text(&text).await {
            Ok(()) => {
                debug!("Copied {} bytes to clipboard", text.len());
                (self.config.messages.copy_success.clone(), Severity::Success)
            }
            Err(e) => {
                warn!("Clipboard write failed: {}", e);
                (self.config.messages.copy_failure.clone(), Severity::Error)
            }
        };
        self.show_toast(&message, severity);
    }

    fn on_input(&mut self, target: NodeId, value: String) -> EventOutcome {
        if let Ok(node) = self.doc.node_mut(target) {
            node.set_value(value.clone());
        }
        if !self.doc.matches(target, &self.selectors.search_input) {
            return EventOutcome::ignored();
        }
        match self.filter.on_input(&mut self.doc, target, &value) {
            Some(_) => EventOutcome::handled(),
            None => EventOutcome::ignored(),
        }
    }

    async fn on_change(&mut self, target: NodeId, value: String) -> EventOutcome {
        if let Ok(node) = self.doc.node_mut(target) {
            node.set_value(value.clone());
        }
        if value.is_empty() || !self.doc.matches(target, &self.selectors.image_input) {
            return EventOutcome::ignored();
        }
        let Some(preview) = preview_target(&self.doc, target) else {
            debug!("Image input {} has no preview element", target);
            return EventOutcome::ignored();
        };

        match self.files.read(&value).await {
            Ok(bytes) => {
                let src = data_url(&value, &bytes);
                if let Err(e) = show_preview(&mut self.doc, preview, src) {
                    warn!("Failed to show preview for {}: {}", value, e);
                }
            }
            Err(e) => warn!("Failed to read {} for preview: {}", value, e),
        }
        EventOutcome::handled()
    }

    fn on_blur(&mut self, target: NodeId) -> EventOutcome {
        if !self.doc.matches(target, &self.selectors.number_input) {
            return EventOutcome::ignored();
        }
        match format_number_input(&mut self.doc, target) {
            Ok(true) => EventOutcome::handled(),
            Ok(false) => EventOutcome::ignored(),
            Err(e) => {
                warn!("Failed to format number input {}: {}", target, e);
                EventOutcome::ignored()
            }
        }
    }

    fn on_submit(&mut self, form: NodeId) -> EventOutcome {
        let mut outcome = EventOutcome::ignored();
        if self.doc.matches(form, &self.selectors.validated_form) {
            let class = &self.config.markers.validated_class;
            match validate_form(&mut self.doc, form, class) {
                Ok(validated) => outcome.merge(validated),
                Err(e) => warn!("Failed to validate form {}: {}", form, e),
            }
        }
        if !outcome.default_prevented && self.doc.matches(form, &self.selectors.modal_form) {
            match guard_modal_submit(&mut self.doc, form, &self.config.messages.processing) {
                Ok(Some(_)) => outcome.merge(EventOutcome::handled()),
                Ok(None) => debug!("Modal form {} has no submit button", form),
                Err(e) => warn!("Failed to guard modal form {}: {}", form, e),
            }
        }
        outcome
    }

    /// Put `button` in its loading state. Returns the label to restore.
    pub fn show_loading(&mut self, button: NodeId) -> Result<String, KitError> {
        Ok(show_loading(&mut self.doc, button, &self.config.messages.loading)?)
    }

    /// Restore `button`, falling back to the default submit label.
    pub fn hide_loading(&mut self, button: NodeId, original: Option<&str>) -> Result<(), KitError> {
        Ok(hide_loading(
            &mut self.doc,
            button,
            original,
            &self.config.messages.submit,
        )?)
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    /// Show an alert. A page without an alert container logs and shows nothing.
    pub fn show_alert(&mut self, message: &str, severity: Severity) -> Option<NotificationId> {
        let shown = self
            .notifications
            .show_alert(&mut self.doc, message, severity, Instant::now());
        report(shown)
    }

    pub fn show_success(&mut self, message: &str) -> Option<NotificationId> {
        self.show_alert(message, Severity::Success)
    }

    pub fn show_error(&mut self, message: &str) -> Option<NotificationId> {
        self.show_alert(message, Severity::Error)
    }

    pub fn show_warning(&mut self, message: &str) -> Option<NotificationId> {
        self.show_alert(message, Severity::Warning)
    }

    pub fn show_info(&mut self, message: &str) -> Option<NotificationId> {
        self.show_alert(message, Severity::Info)
    }

    pub fn show_toast(&mut self, message: &str, severity: Severity) -> Option<NotificationId> {
        let shown = self
            .notifications
            .show_toast(&mut self.doc, message, severity, Instant::now());
        report(shown)
    }

    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        self.notifications.dismiss(&mut self.doc, id)
    }

    /// Expire notifications due at `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<NotificationId> {
        self.notifications.expire_due(&mut self.doc, now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.notifications.next_deadline()
    }

    // -------------------------------------------------------------------------
    // Event loop
    // -------------------------------------------------------------------------

    /// Process events until the channel closes, expiring notifications as
    /// their deadlines pass.
    pub async fn run(&mut self, mut events: mpsc::Receiver<Event>) {
        info!("Page event loop started");
        loop {
            let deadline = self.notifications.next_deadline();
            tokio::select! {
                received = events.recv() => match received {
                    Some(event) => {
                        self.dispatch(event).await;
                    }
                    None => break,
                },
                _ = sleep_until_optional(deadline) => {
                    let expired = self.tick(Instant::now());
                    debug!("Expired {} notifications", expired.len());
                }
            }
        }
        info!("Event channel closed, page event loop stopped");
    }

    /// Wait until every live notification has expired.
    pub async fn settle(&mut self) {
        while let Some(deadline) = self.notifications.next_deadline() {
            sleep_until(deadline).await;
            self.tick(Instant::now());
        }
    }
}

fn report(shown: Result<NotificationId, KitError>) -> Option<NotificationId> {
    match shown {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Notification not shown: {}", e);
            None
        }
    }
}

/// Sleep until a deadline, or forever if there is none.
async fn sleep_until_optional(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
