//! The dormitory admin page used by the demo, and the scripted session
//! replayed against it.

use log::warn;
use pagedom::{Document, Element, Event, NodeId};

struct Student {
    id: &'static str,
    name: &'static str,
    building: &'static str,
    room: &'static str,
    fee: &'static str,
}

const STUDENTS: &[Student] = &[
    Student { id: "S-1007", name: "Zhang Min", building: "East", room: "204", fee: "1200.00" },
    Student { id: "S-1002", name: "alice Wang", building: "West", room: "12", fee: "950.50" },
    Student { id: "S-1011", name: "Li Wei", building: "East", room: "101", fee: "1200.00" },
    Student { id: "S-1004", name: "Bob Chen", building: "North", room: "3", fee: "800.00" },
    Student { id: "S-1009", name: "Chen Jing", building: "West", room: "12", fee: "950.50" },
];

pub const COLUMNS: &[&str] = &["ID", "Name", "Building", "Room", "Fee"];

fn student_row(student: &Student) -> Element {
    Element::tr()
        .child(
            Element::td(student.id).child(
                Element::button("")
                    .id(format!("copy-{}", student.id))
                    .class("btn btn-sm btn-copy")
                    .data("copy-text", student.id)
                    .child(Element::new("i").class("fas fa-copy")),
            ),
        )
        .child(Element::td(student.name))
        .child(Element::td(student.building))
        .child(Element::td(student.room))
        .child(Element::td(student.fee))
        .child(
            Element::td("").child(
                Element::button("Delete").class("btn btn-sm btn-danger btn-delete"),
            ),
        )
}

/// Student list with a search box, sortable headers and a server flash.
pub fn students_page() -> Document {
    let header = Element::tr()
        .children(
            COLUMNS
                .iter()
                .map(|label| Element::th(*label).class("sortable")),
        )
        .child(Element::th("Actions"));

    let main = Element::new("main").child(
        Element::div()
            .class("container")
            .child(Element::new("h1").child(Element::text("Students")))
            .child(
                Element::div().class("alert-container").child(
                    Element::div()
                        .class("alert alert-info alert-dismissible fade show")
                        .child(Element::text("Check-in for the autumn term is open")),
                ),
            )
            .child(
                Element::input("text")
                    .id("student-search")
                    .class("form-control search-input")
                    .attr("placeholder", "Search students")
                    .data("target", "#students"),
            )
            .child(
                Element::table()
                    .id("students")
                    .class("table table-hover")
                    .child(Element::thead().child(header))
                    .child(Element::tbody().children(STUDENTS.iter().map(student_row))),
            ),
    );

    Document::new(
        Element::new("body")
            .child(main)
            .child(Element::div().class("toast-container")),
    )
}

/// Events for one scripted session: search, then header clicks, then a copy.
pub fn script(doc: &Document, search: Option<&str>, sort: &[usize], copy: Option<&str>) -> Vec<Event> {
    let mut events = Vec::new();

    if let Some(term) = search
        && let Some(input) = doc.get_element_by_id("student-search")
    {
        events.push(Event::Input {
            target: input,
            value: term.to_string(),
        });
    }

    let headers: Vec<NodeId> = doc.query_all(doc.root(), "th.sortable").unwrap_or_default();
    for column in sort {
        match headers.get(*column) {
            Some(header) => events.push(Event::Click { target: *header }),
            None => warn!("No sortable column {}", column),
        }
    }

    if let Some(student) = copy {
        match doc.get_element_by_id(&format!("copy-{}", student)) {
            Some(button) => events.push(Event::Click { target: button }),
            None => warn!("No copy button for student {}", student),
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_skips_unknown_targets() {
        let doc = students_page();
        let events = script(&doc, Some("east"), &[1, 9, 1], Some("S-0000"));
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], Event::Input { value, .. } if value == "east"));
        assert!(matches!(events[1], Event::Click { .. }));
    }

    #[test]
    fn test_page_renders_every_student() {
        let doc = students_page();
        let table = doc.get_element_by_id("students").unwrap();
        let rows = pagekit::table::RowModel::new(&doc, table).rows();
        assert_eq!(rows.len(), STUDENTS.len());
    }
}
