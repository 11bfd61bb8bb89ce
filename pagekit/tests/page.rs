use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use pagedom::{Document, Element, Event, NodeId};
use pagekit::behaviors::NeverConfirm;
use pagekit::clipboard::MemoryClipboard;
use pagekit::files::MemorySource;
use pagekit::notify::Severity;
use pagekit::table::RowModel;
use pagekit::{KitConfig, Page};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Student list page as the admin templates render it.
fn students_page() -> Document {
    let header = Element::tr()
        .child(Element::th("Name").id("h-name").class("sortable"))
        .child(Element::th("Room").id("h-room").class("sortable"))
        .child(Element::th("Actions"));
    let row = |id: &str, name: &str, room: &str| {
        Element::tr()
            .id(id)
            .child(Element::td(name))
            .child(Element::td(room))
            .child(
                Element::td("").child(
                    Element::button("Delete")
                        .id(format!("{id}-delete"))
                        .class("btn btn-sm btn-delete"),
                ),
            )
    };

    Document::new(
        Element::new("body")
            .child(
                Element::new("main").child(
                    Element::div()
                        .class("container")
                        .child(Element::div().id("alerts").class("alert-container"))
                        .child(
                            Element::input("text")
                                .id("search")
                                .class("form-control search-input")
                                .data("target", "#students"),
                        )
                        .child(
                            Element::button("S-1001")
                                .id("copy")
                                .class("btn btn-copy")
                                .data("copy-text", "student:S-1001"),
                        )
                        .child(
                            Element::table()
                                .id("students")
                                .child(Element::thead().child(header))
                                .child(
                                    Element::tbody()
                                        .child(row("r0", "Banana Li", "12"))
                                        .child(row("r1", "apple Wu", "3"))
                                        .child(row("r2", "Cherry Zhao", "101")),
                                ),
                        ),
                ),
            )
            .child(
                Element::div().class("modal").child(
                    Element::form()
                        .id("checkin")
                        .class("needs-validation")
                        .child(Element::input("text").id("student").attr("required", ""))
                        .child(Element::input("number").id("fee"))
                        .child(Element::input("date").id("date"))
                        .child(
                            Element::input("file")
                                .id("photo")
                                .attr("accept", "image/*"),
                        )
                        .child(Element::img().id("photo-preview").hidden(true))
                        .child(Element::button("Save").id("save").attr("type", "submit")),
                ),
            )
            .child(Element::div().id("toasts").class("toast-container")),
    )
}

fn by_id(page: &Page, id: &str) -> NodeId {
    page.document().get_element_by_id(id).unwrap()
}

fn names(page: &Page) -> Vec<String> {
    let doc = page.document();
    let model = RowModel::new(doc, by_id(page, "students"));
    model
        .rows()
        .into_iter()
        .map(|row| model.cell_text(row, 0))
        .collect()
}

fn visible_rows(page: &Page) -> Vec<String> {
    let doc = page.document();
    RowModel::new(doc, by_id(page, "students"))
        .rows()
        .into_iter()
        .filter(|row| !doc.node(*row).unwrap().is_hidden())
        .map(|row| doc.node(row).unwrap().id().to_string())
        .collect()
}

fn test_page(clipboard: Arc<MemoryClipboard>) -> Page {
    Page::builder(students_page())
        .clipboard(clipboard)
        .files(Arc::new(MemorySource::new()))
        .build()
        .unwrap()
}

fn click(page: &Page, id: &str) -> Event {
    Event::Click {
        target: by_id(page, id),
    }
}

// ============================================================================
// Tables
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_header_clicks_sort_strings() {
    let mut page = test_page(Arc::new(MemoryClipboard::new()));

    let outcome = page.dispatch(click(&page, "h-name")).await;
    assert!(outcome.handled);
    assert_eq!(names(&page), vec!["apple Wu", "Banana Li", "Cherry Zhao"]);

    page.dispatch(click(&page, "h-name")).await;
    assert_eq!(names(&page), vec!["Cherry Zhao", "Banana Li", "apple Wu"]);
}

#[tokio::test(start_paused = true)]
async fn test_click_inside_header_sorts_numbers() {
    let mut page = test_page(Arc::new(MemoryClipboard::new()));
    let header = by_id(&page, "h-room");
    let icon = page
        .document_mut()
        .create(Element::new("i").class("fas fa-sort"));
    page.document_mut().append_child(header, icon).unwrap();

    page.dispatch(Event::Click { target: icon }).await;
    assert_eq!(names(&page), vec!["apple Wu", "Banana Li", "Cherry Zhao"]);
    page.dispatch(Event::Click { target: icon }).await;
    assert_eq!(names(&page), vec!["Cherry Zhao", "Banana Li", "apple Wu"]);
}

#[tokio::test(start_paused = true)]
async fn test_search_input_filters_target_table() {
    let mut page = test_page(Arc::new(MemoryClipboard::new()));
    let search = by_id(&page, "search");

    page.dispatch(Event::Input {
        target: search,
        value: "ZHAO".into(),
    })
    .await;
    assert_eq!(visible_rows(&page), vec!["r2"]);
    assert_eq!(page.document().node(search).unwrap().value(), "ZHAO");

    page.dispatch(click(&page, "h-name")).await;
    assert_eq!(visible_rows(&page), vec!["r2"]);

    page.dispatch(Event::Input {
        target: search,
        value: String::new(),
    })
    .await;
    assert_eq!(visible_rows(&page), vec!["r1", "r0", "r2"]);
}

// ============================================================================
// Clipboard
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_copy_success_shows_toast() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let mut page = test_page(clipboard.clone());

    page.dispatch(click(&page, "copy")).await;

    assert_eq!(clipboard.contents().as_deref(), Some("student:S-1001"));
    let toast = &page.notifications().live()[0];
    assert_eq!(toast.severity, Severity::Success);
    assert_eq!(toast.message, "Copied to clipboard");
    assert_eq!(
        page.document().parent(toast.node),
        Some(by_id(&page, "toasts"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_copy_failure_shows_error_toast() {
    let mut page = test_page(Arc::new(MemoryClipboard::failing()));

    page.dispatch(click(&page, "copy")).await;

    let toast = &page.notifications().live()[0];
    assert_eq!(toast.severity, Severity::Error);
    assert_eq!(toast.message, "Could not copy to clipboard");
}

#[tokio::test(start_paused = true)]
async fn test_copy_falls_back_to_button_text() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let doc = Document::new(
        Element::div().child(Element::button(" R-204 ").id("copy").class("btn-copy")),
    );
    let mut page = Page::builder(doc).clipboard(clipboard.clone()).build().unwrap();

    page.dispatch(click(&page, "copy")).await;
    assert_eq!(clipboard.contents().as_deref(), Some("R-204"));
}

// ============================================================================
// Forms and buttons
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_declined_delete_prevents_default() {
    let doc = students_page();
    let mut page = Page::builder(doc).confirm(NeverConfirm).build().unwrap();
    let outcome = page.dispatch(click(&page, "r0-delete")).await;
    assert!(outcome.default_prevented);

    let mut page = Page::builder(students_page())
        .confirm(|message: &str| message.contains("delete"))
        .build()
        .unwrap();
    let outcome = page.dispatch(click(&page, "r0-delete")).await;
    assert!(outcome.handled);
    assert!(!outcome.default_prevented);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_form_is_blocked_and_marked() {
    let mut page = test_page(Arc::new(MemoryClipboard::new()));
    let form = by_id(&page, "checkin");

    let outcome = page.dispatch(Event::Submit { target: form }).await;
    assert!(outcome.default_prevented);
    assert!(outcome.propagation_stopped);
    let doc = page.document();
    assert!(doc.node(form).unwrap().has_class("was-validated"));
    assert!(!doc.node(by_id(&page, "save")).unwrap().is_disabled());
}

#[tokio::test(start_paused = true)]
async fn test_valid_modal_form_disables_submit() {
    let mut page = test_page(Arc::new(MemoryClipboard::new()));
    let form = by_id(&page, "checkin");
    page.dispatch(Event::Input {
        target: by_id(&page, "student"),
        value: "Li Wei".into(),
    })
    .await;
    page.dispatch(Event::Input {
        target: by_id(&page, "fee"),
        value: "12.5".into(),
    })
    .await;

    let outcome = page.dispatch(Event::Submit { target: form }).await;
    assert!(!outcome.default_prevented);

    let save = by_id(&page, "save");
    let doc = page.document();
    assert!(doc.node(save).unwrap().is_disabled());
    assert_eq!(doc.text_content(save).trim(), "Processing...");
    assert!(doc.query(save, "span.loading").unwrap().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_non_numeric_fee_fails_validation() {
    let mut page = test_page(Arc::new(MemoryClipboard::new()));
    page.dispatch(Event::Input {
        target: by_id(&page, "student"),
        value: "Li Wei".into(),
    })
    .await;
    page.dispatch(Event::Input {
        target: by_id(&page, "fee"),
        value: "twelve".into(),
    })
    .await;

    let outcome = page
        .dispatch(Event::Submit {
            target: by_id(&page, "checkin"),
        })
        .await;
    assert!(outcome.default_prevented);
}

#[tokio::test(start_paused = true)]
async fn test_number_input_formats_on_blur() {
    let mut page = test_page(Arc::new(MemoryClipboard::new()));
    let fee = by_id(&page, "fee");

    page.dispatch(Event::Input {
        target: fee,
        value: "3.14159".into(),
    })
    .await;
    assert!(page.dispatch(Event::Blur { target: fee }).await.handled);
    assert_eq!(page.document().node(fee).unwrap().value(), "3.14");

    page.dispatch(Event::Input {
        target: fee,
        value: String::new(),
    })
    .await;
    assert!(!page.dispatch(Event::Blur { target: fee }).await.handled);
    assert_eq!(page.document().node(fee).unwrap().value(), "");
}

#[tokio::test(start_paused = true)]
async fn test_partly_numeric_fee_is_left_as_typed() {
    let mut page = test_page(Arc::new(MemoryClipboard::new()));
    let fee = by_id(&page, "fee");

    page.dispatch(Event::Input {
        target: fee,
        value: "12abc".into(),
    })
    .await;
    assert!(!page.dispatch(Event::Blur { target: fee }).await.handled);
    assert_eq!(page.document().node(fee).unwrap().value(), "12abc");

    page.dispatch(Event::Input {
        target: by_id(&page, "student"),
        value: "Li Wei".into(),
    })
    .await;
    let outcome = page
        .dispatch(Event::Submit {
            target: by_id(&page, "checkin"),
        })
        .await;
    assert!(outcome.default_prevented);

    page.dispatch(Event::Input {
        target: fee,
        value: " 1e2 ".into(),
    })
    .await;
    assert!(page.dispatch(Event::Blur { target: fee }).await.handled);
    assert_eq!(page.document().node(fee).unwrap().value(), "100.00");
}

#[tokio::test(start_paused = true)]
async fn test_image_preview_sets_data_url() {
    let files = Arc::new(MemorySource::new());
    files.insert("/tmp/avatar.png", b"png".to_vec());
    let mut page = Page::builder(students_page())
        .files(files)
        .build()
        .unwrap();
    let photo = by_id(&page, "photo");
    let preview = by_id(&page, "photo-preview");

    page.dispatch(Event::Change {
        target: photo,
        value: "/tmp/missing.png".into(),
    })
    .await;
    assert!(page.document().node(preview).unwrap().is_hidden());

    page.dispatch(Event::Change {
        target: photo,
        value: "/tmp/avatar.png".into(),
    })
    .await;
    let node = page.document().node(preview).unwrap();
    assert_eq!(node.attr("src"), Some("data:image/png;base64,cG5n"));
    assert!(!node.is_hidden());
}

#[tokio::test(start_paused = true)]
async fn test_init_defaults_dates_and_adopts_alerts() {
    let mut page = test_page(Arc::new(MemoryClipboard::new()));
    let alerts = by_id(&page, "alerts");
    let flash = page
        .document_mut()
        .create(Element::div().class("alert alert-success").child(Element::text("Welcome back")));
    page.document_mut().append_child(alerts, flash).unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
    assert_eq!(page.init_with_date(Instant::now(), today), 1);
    assert_eq!(
        page.document().node(by_id(&page, "date")).unwrap().value(),
        "2024-09-01"
    );

    page.settle().await;
    assert!(!page.document().contains(flash));
}

// ============================================================================
// Notifications and the event loop
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_show_alert_without_container_is_absorbed() {
    let mut page = Page::new(Document::new(Element::div())).unwrap();
    assert_eq!(page.show_success("Saved"), None);
    assert!(page.notifications().live().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_close_button_click_dismisses() {
    let mut page = test_page(Arc::new(MemoryClipboard::new()));
    let id = page.show_info("Room 101 assigned").unwrap();
    let node = page.notifications().get(id).unwrap().node;
    let close = page
        .document()
        .query(node, "[data-bs-dismiss=alert]")
        .unwrap()
        .unwrap();

    assert!(page.dispatch(Event::Click { target: close }).await.handled);
    assert!(!page.notifications().is_live(id));
    assert!(!page.dispatch(Event::Click { target: close }).await.handled);
    assert!(!page.dismiss(id));
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_processes_events_and_expires_alerts() {
    let config = KitConfig::default().with_alert_timeout(Duration::from_millis(500));
    let mut page = Page::builder(students_page())
        .config(config)
        .clipboard(Arc::new(MemoryClipboard::new()))
        .build()
        .unwrap();
    let header = by_id(&page, "h-name");
    let alert = page.show_warning("Check-in closes soon").unwrap();

    let (tx, rx) = mpsc::channel(8);
    let feeder = tokio::spawn(async move {
        tx.send(Event::Click { target: header }).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        tx.send(Event::Click { target: header }).await.unwrap();
    });

    page.run(rx).await;
    feeder.await.unwrap();

    assert!(!page.notifications().is_live(alert));
    assert_eq!(names(&page), vec!["Cherry Zhao", "Banana Li", "apple Wu"]);
}

#[tokio::test(start_paused = true)]
async fn test_events_on_removed_nodes_are_ignored() {
    let mut page = test_page(Arc::new(MemoryClipboard::new()));
    let row = by_id(&page, "r0");
    page.document_mut().remove(row).unwrap();
    assert!(!page.dispatch(Event::Click { target: row }).await.handled);
}

#[tokio::test(start_paused = true)]
async fn test_dismissed_toast_never_expires_twice() {
    let mut page = test_page(Arc::new(MemoryClipboard::new()));
    let id = page.show_toast("Saved", Severity::Success).unwrap();
    assert!(page.dismiss(id));
    tokio::time::advance(Duration::from_secs(6)).await;
    assert!(page.tick(Instant::now()).is_empty());
    assert_eq!(page.next_deadline(), None);
}

#[tokio::test(start_paused = true)]
async fn test_loading_state_round_trip() {
    let mut page = test_page(Arc::new(MemoryClipboard::new()));
    let save = by_id(&page, "save");

    let original = page.show_loading(save).unwrap();
    assert_eq!(original, "Save");
    assert_eq!(page.document().text_content(save).trim(), "Loading...");
    assert!(page.document().node(save).unwrap().is_disabled());

    page.hide_loading(save, Some(&original)).unwrap();
    assert_eq!(page.document().text_content(save), "Save");
    assert!(!page.document().node(save).unwrap().is_disabled());

    page.show_loading(save).unwrap();
    page.hide_loading(save, None).unwrap();
    assert_eq!(page.document().text_content(save), "Submit");
}
