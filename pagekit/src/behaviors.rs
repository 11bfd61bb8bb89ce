//! Small form and button behaviours
//!
//! Each function does one thing to the document and reports what happened;
//! [`Page`](crate::Page) decides when to call them.

use chrono::NaiveDate;
use log::debug;
use pagedom::{Document, DomError, Element, EventOutcome, NodeId, Selector};

/// Yes/no question put to the user before a destructive action.
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Accepts every confirmation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Declines every confirmation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, _message: &str) -> bool {
        false
    }
}

/// Ask before deleting. A declined confirmation prevents the default action.
pub fn confirm_delete(confirm: &dyn Confirm, message: &str) -> EventOutcome {
    if confirm.confirm(message) {
        EventOutcome::handled()
    } else {
        debug!("Delete declined");
        let mut outcome = EventOutcome::handled();
        outcome.prevent_default();
        outcome
    }
}

/// The whole of `value` read as a finite number, surrounding blanks allowed.
fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_control(tag: &str) -> bool {
    matches!(tag, "input" | "select" | "textarea")
}

/// Whether every control in `form` holds an acceptable value.
///
/// Required controls must not be blank and number inputs must hold a number
/// when filled in. Disabled controls are skipped.
pub fn is_form_valid(doc: &Document, form: NodeId) -> bool {
    doc.descendants(form).into_iter().all(|id| {
        let Some(node) = doc.node(id) else {
            return true;
        };
        if !is_control(node.tag()) || node.is_disabled() {
            return true;
        }
        let value = node.value().trim();
        if node.has_attr("required") && value.is_empty() {
            return false;
        }
        if node.attr("type") == Some("number") && !value.is_empty() {
            return parse_number(value).is_some();
        }
        true
    })
}

/// Validate `form` on submit and mark it as validated.
///
/// An invalid form has its submission prevented and propagation stopped.
pub fn validate_form(
    doc: &mut Document,
    form: NodeId,
    validated_class: &str,
) -> Result<EventOutcome, DomError> {
    let valid = is_form_valid(doc, form);
    doc.node_mut(form)?.add_class(validated_class);

    let mut outcome = EventOutcome::handled();
    if !valid {
        debug!("Form {} failed validation", form);
        outcome.prevent_default();
        outcome.stop_propagation();
    }
    Ok(outcome)
}

/// Disable the submit button of a form being sent and show `label` on it.
///
/// Returns the button, if the form has one.
pub fn guard_modal_submit(
    doc: &mut Document,
    form: NodeId,
    label: &str,
) -> Result<Option<NodeId>, DomError> {
    let Some(button) = doc.query(form, "button[type=submit]")? else {
        return Ok(None);
    };
    show_loading(doc, button, label)?;
    Ok(Some(button))
}

/// Disable `button` and replace its label with a spinner and `label`.
///
/// Returns the previous label so it can be restored with [`hide_loading`].
pub fn show_loading(doc: &mut Document, button: NodeId, label: &str) -> Result<String, DomError> {
    let previous = doc.text_content(button).trim().to_string();
    doc.node_mut(button)?.set_disabled(true);
    doc.set_text(button, format!(" {}", label))?;
    let spinner = doc.create(Element::new("span").class("loading"));
    doc.insert_first(button, spinner)?;
    Ok(previous)
}

/// Re-enable `button` with `original` as its label, or `fallback`.
pub fn hide_loading(
    doc: &mut Document,
    button: NodeId,
    original: Option<&str>,
    fallback: &str,
) -> Result<(), DomError> {
    doc.node_mut(button)?.set_disabled(false);
    doc.set_text(button, original.unwrap_or(fallback))
}

/// Rewrite a number input's value with two decimals.
///
/// Returns `false` and leaves the value alone when it is empty or not
/// entirely a number, so `12abc` stays as typed.
pub fn format_number_input(doc: &mut Document, input: NodeId) -> Result<bool, DomError> {
    let node = doc.node_mut(input)?;
    let Some(value) = parse_number(node.value()) else {
        return Ok(false);
    };
    node.set_value(format!("{:.2}", value));
    Ok(true)
}

/// Set empty date inputs matching `selector` to `today`.
///
/// Returns the number of inputs filled.
pub fn fill_date_defaults(doc: &mut Document, selector: &Selector, today: NaiveDate) -> usize {
    let value = today.format("%Y-%m-%d").to_string();
    let empty: Vec<NodeId> = doc
        .select_all(doc.root(), selector)
        .into_iter()
        .filter(|id| doc.node(*id).is_some_and(|n| n.value().is_empty()))
        .collect();

    for id in &empty {
        if let Ok(node) = doc.node_mut(*id) {
            node.set_value(value.clone());
        }
    }
    empty.len()
}

/// The `#<id>-preview` element of an image input.
pub fn preview_target(doc: &Document, input: NodeId) -> Option<NodeId> {
    let id = doc.node(input)?.id();
    if id.is_empty() {
        return None;
    }
    doc.get_element_by_id(&format!("{}-preview", id))
}

/// Point `preview` at `src` and show it.
pub fn show_preview(doc: &mut Document, preview: NodeId, src: String) -> Result<(), DomError> {
    let node = doc.node_mut(preview)?;
    node.set_attr("src", src);
    node.set_hidden(false);
    Ok(())
}
