//! Authored correctness predicates.
//!
//! A check sees the whole live widget list of a scene, so it can combine
//! several widgets into one verdict.

use std::collections::BTreeSet;
use std::sync::Arc;

use casebook_core::error::DomainError;
use casebook_ui::{Component, Widget};
use serde::Deserialize;

use super::model::ScenePredicate;

/// A correctness rule over a scene's widgets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    /// Every gradeable widget is correct; at least one must be gradeable.
    #[default]
    AllCorrect,
    /// Widget `widget` reports itself correct.
    Widget {
        /// Widget index.
        widget: usize,
    },
    /// Selector `widget` has exactly `indices` selected.
    Selection {
        /// Widget index.
        widget: usize,
        /// Expected selection.
        indices: BTreeSet<usize>,
    },
    /// Choice `widget` has `option` picked.
    Choice {
        /// Widget index.
        widget: usize,
        /// Expected option.
        option: usize,
    },
    /// Drag board `widget` has token `i` on `targets[i]` for every token.
    Placement {
        /// Widget index.
        widget: usize,
        /// Expected target per token.
        targets: Vec<usize>,
    },
    /// Every nested check passes.
    All {
        /// Nested checks.
        checks: Vec<Check>,
    },
    /// At least one nested check passes.
    Any {
        /// Nested checks.
        checks: Vec<Check>,
    },
}

impl Check {
    /// Evaluates the rule.
    #[must_use]
    pub fn evaluate(&self, widgets: &[Widget]) -> bool {
        match self {
            Self::AllCorrect => {
                let grades: Vec<bool> = widgets.iter().filter_map(Component::is_correct).collect();
                !grades.is_empty() && grades.into_iter().all(|ok| ok)
            }
            Self::Widget { widget } => widgets
                .get(*widget)
                .and_then(Component::is_correct)
                .unwrap_or(false),
            Self::Selection { widget, indices } => widgets
                .get(*widget)
                .and_then(Widget::as_selector)
                .is_some_and(|selector| selector.matches(indices)),
            Self::Choice { widget, option } => widgets
                .get(*widget)
                .and_then(Widget::as_choice)
                .is_some_and(|choice| choice.picked() == Some(*option)),
            Self::Placement { widget, targets } => widgets
                .get(*widget)
                .and_then(Widget::as_drag)
                .is_some_and(|drag| {
                    drag.placements().len() == targets.len()
                        && drag
                            .placements()
                            .iter()
                            .zip(targets)
                            .all(|(got, want)| *got == Some(*want))
                }),
            Self::All { checks } => checks.iter().all(|check| check.evaluate(widgets)),
            Self::Any { checks } => checks.iter().any(|check| check.evaluate(widgets)),
        }
    }

    /// Rejects checks that reference widgets outside `0..widget_count`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidContent` naming the first bad index.
    pub fn validate(&self, widget_count: usize) -> Result<(), DomainError> {
        match self {
            Self::AllCorrect => Ok(()),
            Self::Widget { widget }
            | Self::Selection { widget, .. }
            | Self::Choice { widget, .. }
            | Self::Placement { widget, .. } => {
                if *widget < widget_count {
                    Ok(())
                } else {
                    Err(DomainError::InvalidContent(format!(
                        "check references widget {widget} but the scene has {widget_count}"
                    )))
                }
            }
            Self::All { checks } | Self::Any { checks } => checks
                .iter()
                .try_for_each(|check| check.validate(widget_count)),
        }
    }

    /// Wraps the rule as a scene predicate.
    #[must_use]
    pub fn into_predicate(self) -> ScenePredicate {
        Arc::new(move |widgets| self.evaluate(widgets))
    }
}
