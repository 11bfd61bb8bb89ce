use std::collections::HashMap;

use log::{debug, warn};
use pagedom::{Document, DomError, NodeId, Selector};

use super::{CellValue, RowModel, compare_cells, stable_sort_by};
use crate::config::{Markers, marker_selector};
use crate::error::KitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// The active sort of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
}

/// Sorts tables when their sortable headers are clicked.
///
/// The active column and direction of each table are kept here, keyed by the
/// table node. The header classes only mirror that state.
#[derive(Debug)]
pub struct SortController {
    sortable: Selector,
    table: Selector,
    asc_class: String,
    desc_class: String,
    states: HashMap<NodeId, SortState>,
}

impl SortController {
    pub fn new(markers: &Markers) -> Result<Self, KitError> {
        Ok(Self {
            sortable: marker_selector(&markers.sortable)?,
            table: marker_selector("table")?,
            asc_class: markers.sort_asc_class.clone(),
            desc_class: markers.sort_desc_class.clone(),
            states: HashMap::new(),
        })
    }

    /// Active sort of `table`, if it was ever sorted.
    pub fn state(&self, table: NodeId) -> Option<SortState> {
        self.states.get(&table).copied()
    }

    /// The sortable header `node` belongs to, if any.
    pub fn header_for(&self, doc: &Document, node: NodeId) -> Option<NodeId> {
        doc.closest(node, &self.sortable)
    }

    /// Sort the header's table by the header's column.
    ///
    /// Clicking the active column flips its direction, any other column
    /// starts ascending. A table never sorted here reads the clicked
    /// header's rendered indicator class as its current sort. Headers
    /// outside a table do nothing.
    pub fn on_header_click(&mut self, doc: &mut Document, header: NodeId) -> Option<SortState> {
        let Some(table) = doc.closest(header, &self.table) else {
            debug!("Sortable header {} is not inside a table", header);
            return None;
        };
        let Some(column) = doc.element_index(header) else {
            debug!("Sortable header {} has no column position", header);
            return None;
        };

        let previous = self
            .states
            .get(&table)
            .copied()
            .or_else(|| self.rendered_state(doc, header, column));
        let direction = match previous {
            Some(state) if state.column == column => state.direction.toggle(),
            _ => SortDirection::Ascending,
        };

        match self.apply(doc, table, Some(header), column, direction) {
            Ok(rows) => {
                debug!(
                    "Sorted {} rows of {} by column {} {:?}",
                    rows, table, column, direction
                );
                Some(SortState { column, direction })
            }
            Err(e) => {
                warn!("Failed to sort {}: {}", table, e);
                None
            }
        }
    }

    /// Sort `table` by `column` and record it as the table's active sort.
    ///
    /// Returns the number of rows reordered.
    pub fn sort_table(
        &mut self,
        doc: &mut Document,
        table: NodeId,
        column: usize,
        direction: SortDirection,
    ) -> Result<usize, DomError> {
        if !doc.contains(table) {
            return Err(DomError::UnknownNode(table));
        }
        let header = self
            .headers(doc, table)
            .into_iter()
            .find(|h| doc.element_index(*h) == Some(column));
        self.apply(doc, table, header, column, direction)
    }

    fn apply(
        &mut self,
        doc: &mut Document,
        table: NodeId,
        header: Option<NodeId>,
        column: usize,
        direction: SortDirection,
    ) -> Result<usize, DomError> {
        self.states.insert(table, SortState { column, direction });
        self.mark_headers(doc, table, header, direction)?;
        sort_rows(doc, table, column, direction)
    }

    /// Sortable headers belonging to `table` itself, not to a nested table.
    fn headers(&self, doc: &Document, table: NodeId) -> Vec<NodeId> {
        doc.select_all(table, &self.sortable)
            .into_iter()
            .filter(|h| doc.closest(*h, &self.table) == Some(table))
            .collect()
    }

    /// The sort a header's indicator class says is already applied.
    fn rendered_state(&self, doc: &Document, header: NodeId, column: usize) -> Option<SortState> {
        let node = doc.node(header)?;
        let direction = if node.has_class(&self.asc_class) {
            SortDirection::Ascending
        } else if node.has_class(&self.desc_class) {
            SortDirection::Descending
        } else {
            return None;
        };
        Some(SortState { column, direction })
    }

    /// Clear every indicator in `table`, then mark `active` alone.
    fn mark_headers(
        &self,
        doc: &mut Document,
        table: NodeId,
        active: Option<NodeId>,
        direction: SortDirection,
    ) -> Result<(), DomError> {
        for header in self.headers(doc, table) {
            let node = doc.node_mut(header)?;
            node.remove_class(&self.asc_class);
            node.remove_class(&self.desc_class);
        }
        if let Some(header) = active {
            let class = match direction {
                SortDirection::Ascending => &self.asc_class,
                SortDirection::Descending => &self.desc_class,
            };
            doc.node_mut(header)?.add_class(class);
        }
        Ok(())
    }
}

/// Reorder the body rows of `table` by `column`, leaving visibility alone.
///
/// Each cell is parsed once; rows are re-appended in their new order.
pub fn sort_rows(
    doc: &mut Document,
    table: NodeId,
    column: usize,
    direction: SortDirection,
) -> Result<usize, DomError> {
    let model = RowModel::new(doc, table);
    let Some(body) = model.body() else {
        return Ok(0);
    };
    let mut keyed: Vec<(NodeId, CellValue)> = model
        .rows()
        .into_iter()
        .map(|row| (row, CellValue::parse(&model.cell_text(row, column))))
        .collect();

    stable_sort_by(&mut keyed, |a, b| compare_cells(&a.1, &b.1, direction));

    for (row, _) in &keyed {
        doc.append_child(body, *row)?;
    }
    Ok(keyed.len())
}
