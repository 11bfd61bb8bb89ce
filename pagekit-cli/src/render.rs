//! Plain-text rendering of the demo page state.

use pagekit::Page;
use pagekit::table::{RowModel, SortDirection};

use crate::demo::COLUMNS;

pub fn print_table(page: &Page) {
    let doc = page.document();
    let Some(table) = doc.get_element_by_id("students") else {
        return;
    };
    let state = page.sort().state(table);

    let header: Vec<String> = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, label)| match state {
            Some(s) if s.column == i => {
                let arrow = match s.direction {
                    SortDirection::Ascending => "^",
                    SortDirection::Descending => "v",
                };
                format!("{:<12}", format!("{} {}", label, arrow))
            }
            _ => format!("{:<12}", label),
        })
        .collect();
    println!("{}", header.join(" ").trim_end());

    let model = RowModel::new(doc, table);
    let mut hidden = 0;
    for row in model.all_rows() {
        if doc.node(row).is_some_and(|n| n.is_hidden()) {
            hidden += 1;
            continue;
        }
        let cells: Vec<String> = (0..COLUMNS.len())
            .map(|i| format!("{:<12}", model.cell_text(row, i)))
            .collect();
        println!("{}", cells.join(" ").trim_end());
    }
    if hidden > 0 {
        println!("({} rows hidden by search)", hidden);
    }
}

pub fn print_notifications(page: &Page) {
    let live = page.notifications().live();
    if live.is_empty() {
        println!("No notifications");
        return;
    }
    for notification in live {
        println!(
            "[{:?} {}] {}",
            notification.kind,
            notification.severity.style(),
            notification.message
        );
    }
}
