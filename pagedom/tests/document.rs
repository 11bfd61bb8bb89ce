use pagedom::{find_element, Content, Document, DomError, Element, Selector};

fn users_table() -> Element {
    Element::div().id("page").child(
        Element::table()
            .id("users")
            .child(
                Element::thead().child(
                    Element::tr()
                        .child(Element::th("Name").id("h-name").class("sortable"))
                        .child(Element::th("Age").id("h-age").class("sortable")),
                ),
            )
            .child(
                Element::tbody()
                    .child(
                        Element::tr()
                            .id("r1")
                            .child(Element::td("Alice"))
                            .child(Element::td("30")),
                    )
                    .child(
                        Element::tr()
                            .id("r2")
                            .child(Element::td("Bob"))
                            .child(Element::td("25")),
                    ),
            ),
    )
}

// ============================================================================
// Building and mounting
// ============================================================================

#[test]
fn test_element_text_becomes_leading_child() {
    let th = Element::th("Name").child(Element::new("i").class("fas fa-sort"));
    match &th.content {
        Content::Children(children) => {
            assert_eq!(children.len(), 2);
            assert!(children[0].is_text());
            assert_eq!(children[1].classes, vec!["fas", "fa-sort"]);
        }
        other => panic!("expected children, got {other:?}"),
    }
    assert_eq!(th.content.text(), "Name");
}

#[test]
fn test_find_element_in_builder_tree() {
    let tree = users_table();
    let found = find_element(&tree, "r2").unwrap();
    assert_eq!(found.tag, "tr");
    assert!(find_element(&tree, "missing").is_none());
}

#[test]
fn test_mount_preserves_structure() {
    let doc = Document::new(users_table());
    let table = doc.get_element_by_id("users").unwrap();
    assert_eq!(doc.node(table).unwrap().tag(), "table");
    assert_eq!(doc.element_children(table).len(), 2);

    let r1 = doc.get_element_by_id("r1").unwrap();
    assert_eq!(doc.text_content(r1), "Alice30");
    assert!(doc.is_attached(r1));
}

#[test]
fn test_element_index_skips_text_nodes() {
    let doc = Document::new(
        Element::tr()
            .child(Element::text("  "))
            .child(Element::th("A").id("a"))
            .child(Element::text("\n"))
            .child(Element::th("B").id("b")),
    );
    let b = doc.get_element_by_id("b").unwrap();
    assert_eq!(doc.element_index(b), Some(1));
}

#[test]
fn test_data_attributes() {
    let doc = Document::new(
        Element::input("search")
            .id("q")
            .class("search-input")
            .data("target", "#users"),
    );
    let q = doc.get_element_by_id("q").unwrap();
    assert_eq!(doc.node(q).unwrap().data("target"), Some("#users"));
    assert_eq!(doc.node(q).unwrap().attr("type"), Some("search"));
}

// ============================================================================
// Mutation
// ============================================================================

#[test]
fn test_append_child_moves_instead_of_duplicating() {
    let mut doc = Document::new(users_table());
    let body = doc.query(doc.root(), "tbody").unwrap().unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();
    let r2 = doc.get_element_by_id("r2").unwrap();

    doc.append_child(body, r1).unwrap();
    assert_eq!(doc.children(body), &[r2, r1]);

    // Appending again is a no-op reorder
    doc.append_child(body, r1).unwrap();
    assert_eq!(doc.children(body), &[r2, r1]);
}

#[test]
fn test_insert_first() {
    let mut doc = Document::new(Element::div().id("box").child(Element::div().id("old")));
    let container = doc.get_element_by_id("box").unwrap();
    let fresh = doc.create(Element::div().id("new"));
    assert!(!doc.is_attached(fresh));

    doc.insert_first(container, fresh).unwrap();
    let ids: Vec<_> = doc
        .children(container)
        .iter()
        .map(|c| doc.node(*c).unwrap().id().to_string())
        .collect();
    assert_eq!(ids, vec!["new", "old"]);
}

#[test]
fn test_append_rejects_cycles() {
    let mut doc = Document::new(users_table());
    let table = doc.get_element_by_id("users").unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();
    assert_eq!(
        doc.append_child(r1, table),
        Err(DomError::WouldCycle {
            parent: r1,
            child: table
        })
    );
}

#[test]
fn test_remove_twice_is_reported() {
    let mut doc = Document::new(users_table());
    let r1 = doc.get_element_by_id("r1").unwrap();
    let before = doc.len();

    doc.remove(r1).unwrap();
    assert!(!doc.contains(r1));
    // Row plus two cells plus two text nodes
    assert_eq!(doc.len(), before - 5);
    assert_eq!(doc.remove(r1), Err(DomError::UnknownNode(r1)));
}

#[test]
fn test_stale_handle_does_not_alias_reused_slot() {
    let mut doc = Document::new(Element::div());
    let first = doc.create(Element::div().id("first"));
    doc.remove(first).unwrap();
    let second = doc.create(Element::div().id("second"));

    assert_ne!(first, second);
    assert!(doc.node(first).is_none());
    assert_eq!(doc.node(second).unwrap().id(), "second");
}

#[test]
fn test_root_cannot_be_removed() {
    let mut doc = Document::new(Element::div());
    assert_eq!(doc.remove(doc.root()), Err(DomError::RootNode));
}

#[test]
fn test_set_text_replaces_children() {
    let mut doc = Document::new(
        Element::button("Save")
            .id("save")
            .child(Element::new("i").class("fas fa-save")),
    );
    let save = doc.get_element_by_id("save").unwrap();
    doc.set_text(save, "Processing...").unwrap();
    assert_eq!(doc.text_content(save), "Processing...");
    assert_eq!(doc.children(save).len(), 1);
}

#[test]
fn test_class_and_state_mutation() {
    let mut doc = Document::new(Element::th("Name").id("h"));
    let h = doc.get_element_by_id("h").unwrap();
    {
        let node = doc.node_mut(h).unwrap();
        node.add_class("sort-asc");
        node.add_class("sort-asc");
        node.set_hidden(true);
    }
    assert_eq!(doc.node(h).unwrap().classes(), &["sort-asc".to_string()]);
    assert!(doc.node(h).unwrap().is_hidden());

    doc.node_mut(h).unwrap().remove_class("sort-asc");
    assert!(!doc.node(h).unwrap().has_class("sort-asc"));
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_query_all_in_document_order() {
    let doc = Document::new(users_table());
    let rows = doc.query_all(doc.root(), "tbody tr").unwrap();
    let ids: Vec<_> = rows.iter().map(|r| doc.node(*r).unwrap().id()).collect();
    assert_eq!(ids, vec!["r1", "r2"]);
}

#[test]
fn test_closest() {
    let doc = Document::new(users_table());
    let header = doc.get_element_by_id("h-age").unwrap();
    let table = Selector::parse("table").unwrap();
    assert_eq!(doc.closest(header, &table), doc.get_element_by_id("users"));

    let missing = Selector::parse("form").unwrap();
    assert_eq!(doc.closest(header, &missing), None);
}

#[test]
fn test_query_invalid_selector() {
    let doc = Document::new(users_table());
    assert!(matches!(
        doc.query(doc.root(), "tr["),
        Err(DomError::Selector(_))
    ));
}
