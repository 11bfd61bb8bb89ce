use pagedom::{Document, NodeId};

/// Read-only view of a table's body rows.
///
/// Sorting works on the first `tbody`, filtering on all of them.
#[derive(Debug, Clone, Copy)]
pub struct RowModel<'a> {
    doc: &'a Document,
    table: NodeId,
}

impl<'a> RowModel<'a> {
    /// Rows of `table`'s first `tbody`. A `tbody` target is used directly.
    pub fn new(doc: &'a Document, table: NodeId) -> Self {
        Self { doc, table }
    }

    /// Every `tbody` of the table in document order, or the target itself
    /// when it is a `tbody`.
    pub fn bodies(&self) -> Vec<NodeId> {
        match self.doc.node(self.table) {
            Some(node) if node.tag() == "tbody" => vec![self.table],
            Some(_) => self
                .doc
                .element_children(self.table)
                .into_iter()
                .filter(|child| self.doc.node(*child).is_some_and(|n| n.tag() == "tbody"))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn body(&self) -> Option<NodeId> {
        self.bodies().first().copied()
    }

    /// Current rows of the first body in document order. Empty without a body.
    pub fn rows(&self) -> Vec<NodeId> {
        self.body()
            .map(|body| self.body_rows(body))
            .unwrap_or_default()
    }

    /// Rows of every body, in document order.
    pub fn all_rows(&self) -> Vec<NodeId> {
        self.bodies()
            .into_iter()
            .flat_map(|body| self.body_rows(body))
            .collect()
    }

    fn body_rows(&self, body: NodeId) -> Vec<NodeId> {
        self.doc
            .element_children(body)
            .into_iter()
            .filter(|row| self.doc.node(*row).is_some_and(|n| n.tag() == "tr"))
            .collect()
    }

    /// Trimmed text of every cell in `row`.
    pub fn cells(&self, row: NodeId) -> Vec<String> {
        self.doc
            .element_children(row)
            .into_iter()
            .map(|cell| self.doc.text_content(cell).trim().to_string())
            .collect()
    }

    /// Trimmed text of the cell at `column`, empty if the row is short.
    pub fn cell_text(&self, row: NodeId, column: usize) -> String {
        self.doc
            .element_children(row)
            .get(column)
            .map(|cell| self.doc.text_content(*cell).trim().to_string())
            .unwrap_or_default()
    }

    /// Cell texts joined by a single space.
    pub fn row_text(&self, row: NodeId) -> String {
        self.cells(row).join(" ")
    }
}
