//! Page behaviour configuration
//!
//! The markup markers are the contract between the server templates and
//! this crate: which classes and `data-*` keys switch a behaviour on. The
//! defaults match the admin templates; every field can be overridden.

use std::path::Path;
use std::time::Duration;

use pagedom::Selector;
use serde::{Deserialize, Deserializer};

use crate::error::KitError;

/// How long alerts and toasts stay up unless dismissed first.
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(5000);

/// Selectors, class names and `data-*` keys that wire markup to behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Headers that sort their table when clicked.
    pub sortable: String,
    /// Class set on the header sorted ascending.
    pub sort_asc_class: String,
    /// Class set on the header sorted descending.
    pub sort_desc_class: String,
    /// Inputs that filter a table as the user types.
    pub search_input: String,
    /// `data-*` key holding a search input's target table selector.
    pub search_target_key: String,
    pub copy_button: String,
    /// `data-*` key holding the copy payload (falls back to the button text).
    pub copy_text_key: String,
    pub delete_button: String,
    pub validated_form: String,
    /// Class added to a validated form after its first submit.
    pub validated_class: String,
    pub modal_form: String,
    pub number_input: String,
    pub date_input: String,
    pub image_input: String,
    /// Server-rendered alerts adopted at page load.
    pub alert: String,
    pub alert_container: String,
    /// Used when no `alert_container` exists on the page.
    pub alert_container_fallback: String,
    pub toast_container: String,
    /// `data-*` key marking a notification's close button.
    pub dismiss_key: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            sortable: ".sortable".into(),
            sort_asc_class: "sort-asc".into(),
            sort_desc_class: "sort-desc".into(),
            search_input: ".search-input".into(),
            search_target_key: "target".into(),
            copy_button: ".btn-copy".into(),
            copy_text_key: "copy-text".into(),
            delete_button: ".btn-delete".into(),
            validated_form: ".needs-validation".into(),
            validated_class: "was-validated".into(),
            modal_form: ".modal form".into(),
            number_input: "input[type=number]".into(),
            date_input: "input[type=date]".into(),
            image_input: "input[type=file][accept*=image]".into(),
            alert: ".alert".into(),
            alert_container: ".alert-container".into(),
            alert_container_fallback: "main .container".into(),
            toast_container: ".toast-container".into(),
            dismiss_key: "bs-dismiss".into(),
        }
    }
}

/// User-facing texts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub delete_confirm: String,
    pub copy_success: String,
    pub copy_failure: String,
    /// Submit button label while a modal form is being sent.
    pub processing: String,
    pub loading: String,
    /// Button label restored by `hide_loading` when none was saved.
    pub submit: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            delete_confirm: "Are you sure you want to delete this? This cannot be undone.".into(),
            copy_success: "Copied to clipboard".into(),
            copy_failure: "Could not copy to clipboard".into(),
            processing: "Processing...".into(),
            loading: "Loading...".into(),
            submit: "Submit".into(),
        }
    }
}

/// Configuration for a [`Page`](crate::Page).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use pagekit::config::KitConfig;
///
/// let config = KitConfig::default()
///     .with_alert_timeout(Duration::from_secs(8))
///     .with_toast_timeout(Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KitConfig {
    /// Lifetime of alert banners.
    ///
    /// Default: 5 seconds
    #[serde(rename = "alert_timeout_ms", deserialize_with = "millis")]
    pub alert_timeout: Duration,

    /// Lifetime of toasts.
    ///
    /// Default: 5 seconds
    #[serde(rename = "toast_timeout_ms", deserialize_with = "millis")]
    pub toast_timeout: Duration,

    pub markers: Markers,
    pub messages: Messages,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            alert_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
            toast_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
            markers: Markers::default(),
            messages: Messages::default(),
        }
    }
}

impl KitConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, KitError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KitError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Sets the alert lifetime.
    pub fn with_alert_timeout(mut self, timeout: Duration) -> Self {
        self.alert_timeout = timeout;
        self
    }

    /// Sets the toast lifetime.
    pub fn with_toast_timeout(mut self, timeout: Duration) -> Self {
        self.toast_timeout = timeout;
        self
    }

    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }
}

fn millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

/// Parse a marker selector, naming the offending marker on failure.
pub(crate) fn marker_selector(selector: &str) -> Result<Selector, KitError> {
    Selector::parse(selector).map_err(|source| KitError::InvalidMarker {
        selector: selector.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = KitConfig::from_json(
            r#"{ "alert_timeout_ms": 2500, "markers": { "sortable": "th.sort" } }"#,
        )
        .unwrap();
        assert_eq!(config.alert_timeout, Duration::from_millis(2500));
        assert_eq!(config.toast_timeout, DEFAULT_NOTIFICATION_TIMEOUT);
        assert_eq!(config.markers.sortable, "th.sort");
        assert_eq!(config.markers.search_input, ".search-input");
        assert_eq!(config.messages, Messages::default());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            KitConfig::from_json("{ not json"),
            Err(KitError::Config(_))
        ));
    }

    #[test]
    fn test_marker_selector_error_names_marker() {
        let err = marker_selector("th[").unwrap_err();
        assert!(err.to_string().contains("th["));
    }
}
