use std::time::Duration;

use log::{debug, info};
use pagedom::{Document, NodeId, Selector};
use tokio::time::Instant;

use super::notification::{alert_element, toast_element};
use super::{Notification, NotificationId, NotificationKind, Removal, Severity};
use crate::config::{KitConfig, marker_selector};
use crate::error::KitError;

/// Owns every live alert and toast on the page.
///
/// A notification is live from the moment it is shown until it is removed,
/// either by the user or because its deadline passed. Removal consumes the
/// live record, so whichever path runs second finds nothing to remove.
#[derive(Debug)]
pub struct NotificationManager {
    alert_timeout: Duration,
    toast_timeout: Duration,
    alert: Selector,
    alert_container: Selector,
    alert_fallback: Selector,
    alert_container_markers: String,
    toast_container: Selector,
    dismiss: Selector,
    dismiss_key: String,
    live: Vec<Notification>,
}

impl NotificationManager {
    pub fn new(config: &KitConfig) -> Result<Self, KitError> {
        let markers = &config.markers;
        Ok(Self {
            alert_timeout: config.alert_timeout,
            toast_timeout: config.toast_timeout,
            alert: marker_selector(&markers.alert)?,
            alert_container: marker_selector(&markers.alert_container)?,
            alert_fallback: marker_selector(&markers.alert_container_fallback)?,
            alert_container_markers: format!(
                "{}, {}",
                markers.alert_container, markers.alert_container_fallback
            ),
            toast_container: marker_selector(&markers.toast_container)?,
            dismiss: marker_selector(&format!("[data-{}]", markers.dismiss_key))?,
            dismiss_key: markers.dismiss_key.clone(),
            live: Vec::new(),
        })
    }

    /// Show a dismissible alert at the top of the alert container.
    pub fn show_alert(
        &mut self,
        doc: &mut Document,
        message: &str,
        severity: Severity,
        now: Instant,
    ) -> Result<NotificationId, KitError> {
        let container = doc
            .select(doc.root(), &self.alert_container)
            .or_else(|| doc.select(doc.root(), &self.alert_fallback))
            .ok_or_else(|| KitError::MissingContainer {
                selector: self.alert_container_markers.clone(),
            })?;

        let node = doc.create(alert_element(message, severity, &self.dismiss_key));
        doc.insert_first(container, node)?;
        Ok(self.register(
            NotificationKind::Alert,
            message,
            severity,
            node,
            now,
            self.alert_timeout,
        ))
    }

    /// Show a toast at the top of the toast container, or the page root.
    pub fn show_toast(
        &mut self,
        doc: &mut Document,
        message: &str,
        severity: Severity,
        now: Instant,
    ) -> Result<NotificationId, KitError> {
        let container = doc
            .select(doc.root(), &self.toast_container)
            .unwrap_or_else(|| doc.root());

        let node = doc.create(toast_element(message, severity, &self.dismiss_key));
        doc.insert_first(container, node)?;
        Ok(self.register(
            NotificationKind::Toast,
            message,
            severity,
            node,
            now,
            self.toast_timeout,
        ))
    }

    /// Take ownership of alerts rendered by the server.
    ///
    /// Returns how many were adopted. Alerts already owned are skipped.
    pub fn adopt_existing(&mut self, doc: &Document, now: Instant) -> usize {
        let found: Vec<NodeId> = doc
            .select_all(doc.root(), &self.alert)
            .into_iter()
            .filter(|node| !self.live.iter().any(|n| n.node == *node))
            .collect();

        for node in &found {
            let severity = doc
                .node(*node)
                .and_then(|n| {
                    n.classes()
                        .iter()
                        .filter_map(|class| class.strip_prefix("alert-"))
                        .find_map(Severity::from_style)
                })
                .unwrap_or(Severity::Info);
            let message = doc.text_content(*node).trim().to_string();
            self.register(
                NotificationKind::Alert,
                &message,
                severity,
                *node,
                now,
                self.alert_timeout,
            );
        }
        if !found.is_empty() {
            debug!("Adopted {} server-rendered alerts", found.len());
        }
        found.len()
    }

    fn register(
        &mut self,
        kind: NotificationKind,
        message: &str,
        severity: Severity,
        node: NodeId,
        now: Instant,
        timeout: Duration,
    ) -> NotificationId {
        let id = NotificationId::next();
        info!("Showing {:?} {} ({:?}): {}", kind, id, severity, message);
        self.live.push(Notification {
            id,
            kind,
            message: message.to_string(),
            severity,
            created_at: now,
            expires_at: now + timeout,
            node,
        });
        id
    }

    /// Remove a notification at the user's request.
    ///
    /// Returns `false` if it was already gone.
    pub fn dismiss(&mut self, doc: &mut Document, id: NotificationId) -> bool {
        match self.live.iter().position(|n| n.id == id) {
            Some(index) => {
                self.remove_at(doc, index, Removal::Dismissed);
                true
            }
            None => {
                debug!("{} already removed", id);
                false
            }
        }
    }

    /// Handle a click on `node`: if it is a close button inside a live
    /// notification, dismiss that notification.
    pub fn dismiss_from(&mut self, doc: &mut Document, node: NodeId) -> Option<NotificationId> {
        doc.closest(node, &self.dismiss)?;
        let index = self.live.iter().position(|n| {
            let mut current = Some(node);
            while let Some(ancestor) = current {
                if ancestor == n.node {
                    return true;
                }
                current = doc.parent(ancestor);
            }
            false
        })?;
        Some(self.remove_at(doc, index, Removal::Dismissed).id)
    }

    /// Remove every notification whose deadline is at or before `now`.
    pub fn expire_due(&mut self, doc: &mut Document, now: Instant) -> Vec<NotificationId> {
        let mut expired = Vec::new();
        while let Some(index) = self.live.iter().position(|n| n.is_due(now)) {
            expired.push(self.remove_at(doc, index, Removal::Expired).id);
        }
        expired
    }

    fn remove_at(&mut self, doc: &mut Document, index: usize, reason: Removal) -> Notification {
        let notification = self.live.remove(index);
        if let Err(e) = doc.remove(notification.node) {
            debug!("{} node was already gone: {}", notification.id, e);
        }
        info!("Removed {} ({:?})", notification.id, reason);
        notification
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.live.iter().map(|n| n.expires_at).min()
    }

    pub fn is_live(&self, id: NotificationId) -> bool {
        self.live.iter().any(|n| n.id == id)
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.live.iter().find(|n| n.id == id)
    }

    /// Live notifications, oldest first.
    pub fn live(&self) -> &[Notification] {
        &self.live
    }
}
