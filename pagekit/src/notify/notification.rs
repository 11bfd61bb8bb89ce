use std::sync::atomic::{AtomicU64, Ordering};

use pagedom::{Element, NodeId};
use tokio::time::Instant;

static NOTIFICATION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Visual severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Contextual style suffix: `alert-<style>`, `bg-<style>`.
    pub fn style(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "fa-check-circle",
            Self::Error => "fa-exclamation-circle",
            Self::Warning => "fa-exclamation-triangle",
            Self::Info => "fa-info-circle",
        }
    }

    fn toast_icon(self) -> &'static str {
        match self {
            Self::Success => "fa-check",
            other => other.icon(),
        }
    }

    pub fn from_style(style: &str) -> Option<Self> {
        match style {
            "success" => Some(Self::Success),
            "danger" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Banner in the alert container.
    Alert,
    /// Small popup in the toast container.
    Toast,
}

impl NotificationKind {
    /// Value of the close button's dismiss key.
    pub fn dismiss_target(self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Toast => "toast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    pub(crate) fn next() -> Self {
        Self(NOTIFICATION_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "notification-{}", self.0)
    }
}

/// Why a notification left the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Dismissed,
    Expired,
}

/// A live notification owned by the [`NotificationManager`](super::NotificationManager).
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub severity: Severity,
    pub created_at: Instant,
    pub expires_at: Instant,
    /// Root node of the notification in the document.
    pub node: NodeId,
}

impl Notification {
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

fn close_button(extra_classes: &str, dismiss_key: &str, kind: NotificationKind) -> Element {
    Element::button("")
        .class(extra_classes)
        .attr("type", "button")
        .attr("aria-label", "Close")
        .data(dismiss_key, kind.dismiss_target())
}

/// `div.alert.alert-<style>` with icon, message and close button.
pub(crate) fn alert_element(message: &str, severity: Severity, dismiss_key: &str) -> Element {
    Element::div()
        .class("alert alert-dismissible fade show")
        .class(&format!("alert-{}", severity.style()))
        .attr("role", "alert")
        .child(Element::new("i").class(&format!("fas {} me-2", severity.icon())))
        .child(Element::text(message))
        .child(close_button("btn-close", dismiss_key, NotificationKind::Alert))
}

/// `div.toast` with a body and a white close button.
pub(crate) fn toast_element(message: &str, severity: Severity, dismiss_key: &str) -> Element {
    let body = Element::div()
        .class("toast-body")
        .child(Element::new("i").class(&format!("fas {} me-2", severity.toast_icon())))
        .child(Element::text(message));

    Element::div()
        .class("toast align-items-center text-white border-0")
        .class(&format!("bg-{}", severity.style()))
        .attr("role", "alert")
        .child(
            Element::div().class("d-flex").child(body).child(close_button(
                "btn-close btn-close-white me-2 m-auto",
                dismiss_key,
                NotificationKind::Toast,
            )),
        )
}
