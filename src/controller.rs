//! The single writer of the Parameter Set.
//!
//! Every edit goes through [`apply`], which takes the current set and returns
//! its replacement. Nothing else mutates state.

use crate::params::{DATE, ParamSet};

/// Selector value meaning "unset".
pub const UNSET: &str = "--";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// New value of the date/time picker; empty clears everything.
    SetDate(String),
    /// Select a value for a format parameter; empty or a sentinel clears it.
    SetParam { name: String, value: String },
    /// Drop every parameter except `date`.
    Reset,
}

fn is_unset_sentinel(value: &str) -> bool {
    value.is_empty() || value == UNSET || value.eq_ignore_ascii_case("none")
}

pub fn apply(state: &ParamSet, action: Action) -> ParamSet {
    match action {
        Action::SetDate(value) if value.is_empty() => {
            if !state.is_empty() {
                tracing::debug!("date cleared, dropping {} parameter(s)", state.len());
            }
            ParamSet::new()
        }
        Action::SetDate(value) => {
            let mut next = state.clone();
            next.insert_first(DATE, &value);
            next
        }
        Action::SetParam { name, value } => {
            let mut next = state.clone();
            if is_unset_sentinel(&value) {
                next.remove(&name);
            } else {
                next.push(&name, &value);
            }
            next
        }
        Action::Reset => {
            let mut next = ParamSet::new();
            if let Some(date) = state.get(DATE) {
                next.set(DATE, date);
            }
            next
        }
    }
}

/// Owns the current Parameter Set for an interactive session.
///
/// Each dispatched action overwrites the state; earlier states are not kept.
#[derive(Debug, Default)]
pub struct Controller {
    state: ParamSet,
}

impl Controller {
    pub fn new(state: ParamSet) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ParamSet {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> &ParamSet {
        tracing::trace!(?action, "dispatch");
        self.state = apply(&self.state, action);
        &self.state
    }
}
