use crate::document::NodeId;

/// User interaction events with element targeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Mouse click or keyboard activation
    Click { target: NodeId },
    /// Text typed into a control; `value` is the control's new value
    Input { target: NodeId, value: String },
    /// Committed change of a control (file picked, option selected)
    Change { target: NodeId, value: String },
    /// Control lost focus
    Blur { target: NodeId },
    /// Form submission, targeted at the form
    Submit { target: NodeId },
}

impl Event {
    pub fn target(&self) -> NodeId {
        match self {
            Self::Click { target }
            | Self::Input { target, .. }
            | Self::Change { target, .. }
            | Self::Blur { target }
            | Self::Submit { target } => *target,
        }
    }

    /// Lowercase event name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::Input { .. } => "input",
            Self::Change { .. } => "change",
            Self::Blur { .. } => "blur",
            Self::Submit { .. } => "submit",
        }
    }
}

/// What handlers did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// At least one handler ran.
    pub handled: bool,
    /// The default action (navigation, form submission) must not happen.
    pub default_prevented: bool,
    /// Outer handlers must not see the event.
    pub propagation_stopped: bool,
}

impl EventOutcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }

    pub fn prevent_default(&mut self) {
        self.handled = true;
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.handled = true;
        self.propagation_stopped = true;
    }

    /// Fold another handler's outcome into this one.
    pub fn merge(&mut self, other: EventOutcome) {
        self.handled |= other.handled;
        self.default_prevented |= other.default_prevented;
        self.propagation_stopped |= other.propagation_stopped;
    }
}
