//! Behaviour for server-rendered admin pages.
//!
//! Sortable and searchable tables, auto-expiring alerts and toasts, and the
//! small form helpers an admin page needs, driven by user events over a
//! [`pagedom::Document`].

pub mod behaviors;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod files;
pub mod notify;
pub mod page;
pub mod table;
pub mod util;

pub use config::KitConfig;
pub use error::KitError;
pub use page::{Page, PageBuilder};

pub mod prelude {
    pub use crate::behaviors::{AlwaysConfirm, Confirm, NeverConfirm};
    pub use crate::clipboard::{ClipboardProvider, MemoryClipboard, SystemClipboard};
    pub use crate::config::{KitConfig, Markers, Messages};
    pub use crate::error::{ClipboardError, FileError, KitError};
    pub use crate::files::{FileSource, FsSource, MemorySource};
    pub use crate::notify::{
        Notification, NotificationId, NotificationKind, NotificationManager, Severity,
    };
    pub use crate::page::{Page, PageBuilder};
    pub use crate::table::{
        CellValue, FilterController, FilterSummary, RowModel, SortController, SortDirection,
        SortState,
    };
    pub use pagedom::{Document, Element, Event, EventOutcome, NodeId};
}
