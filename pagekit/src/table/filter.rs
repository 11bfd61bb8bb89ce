use std::collections::HashMap;

use log::debug;
use pagedom::{Document, NodeId, Selector};

use super::RowModel;
use crate::config::Markers;

/// Row counts after a filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterSummary {
    pub visible: usize,
    pub hidden: usize,
}

/// Hides table rows that do not contain the search term.
#[derive(Debug)]
pub struct FilterController {
    target_key: String,
    terms: HashMap<NodeId, String>,
}

impl FilterController {
    pub fn new(markers: &Markers) -> Self {
        Self {
            target_key: markers.search_target_key.clone(),
            terms: HashMap::new(),
        }
    }

    /// Current lowercase term of `table`.
    pub fn term(&self, table: NodeId) -> Option<&str> {
        self.terms.get(&table).map(String::as_str)
    }

    /// The table a search input points at through its target selector.
    pub fn resolve_target(&self, doc: &Document, input: NodeId) -> Option<NodeId> {
        let target = doc.node(input)?.data(&self.target_key)?;
        match Selector::parse(target) {
            Ok(selector) => doc.select(doc.root(), &selector),
            Err(e) => {
                debug!("Search input {} has invalid target '{}': {}", input, target, e);
                None
            }
        }
    }

    /// Filter the input's target table. Inputs without a usable target do nothing.
    pub fn on_input(&mut self, doc: &mut Document, input: NodeId, term: &str) -> Option<FilterSummary> {
        let Some(table) = self.resolve_target(doc, input) else {
            debug!("Search input {} has no matching target", input);
            return None;
        };
        Some(self.on_search_input(doc, term, table))
    }

    /// Show the rows of `table` whose text contains `term`, ignoring case.
    ///
    /// Rows of every `tbody` are filtered.
    ///
    /// An empty term shows every row. Row order is never changed.
    pub fn on_search_input(&mut self, doc: &mut Document, term: &str, table: NodeId) -> FilterSummary {
        let term = term.to_lowercase();
        let rows: Vec<(NodeId, bool)> = {
            let model = RowModel::new(doc, table);
            model
                .all_rows()
                .into_iter()
                .map(|row| (row, model.row_text(row).to_lowercase().contains(&term)))
                .collect()
        };

        let mut summary = FilterSummary::default();
        for (row, visible) in rows {
            if let Ok(node) = doc.node_mut(row) {
                node.set_hidden(!visible);
            }
            if visible {
                summary.visible += 1;
            } else {
                summary.hidden += 1;
            }
        }
        debug!(
            "Filtered {} by '{}': {} visible, {} hidden",
            table, term, summary.visible, summary.hidden
        );
        self.terms.insert(table, term);
        summary
    }
}
