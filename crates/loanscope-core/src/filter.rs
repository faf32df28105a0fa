//! Brush filter state machine.
//!
//! Follows the update pattern `State + Message → State`: a [`FilterState`]
//! is mutated only through [`State::update`], and the records a chart sees
//! are always derived from it with [`FilterState::view`].
//!
//! At most one range predicate is active. Brushing a second field replaces
//! the first one instead of intersecting with it.
//!
//! # Examples
//!
//! ```
//! use loanscope_core::{FilterMessage, FilterState, State, Transition};
//!
//! let mut filter = FilterState::default();
//! let t = filter
//!     .update(FilterMessage::apply("edad", [18.0, 25.0]))
//!     .unwrap();
//! assert_eq!(t, Transition::Changed);
//! assert!(filter.is_filtered());
//!
//! filter.update(FilterMessage::Clear).unwrap();
//! assert!(!filter.is_filtered());
//! ```

use crate::error::FilterError;
use crate::record::{NumericField, Record};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// State updated by messages.
pub trait State: Clone + Serialize + for<'de> Deserialize<'de> {
    /// Message type for state updates
    type Message;
    /// Error returned when a message is rejected
    type Error;

    /// Update state in response to a message.
    ///
    /// A rejected message leaves the state untouched.
    fn update(&mut self, msg: Self::Message) -> Result<Transition, Self::Error>;
}

/// Whether an update changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State differs from before the update
    Changed,
    /// Update was a no-op
    Unchanged,
}

/// An inclusive range predicate on one numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter {
    /// Field being filtered
    pub field: NumericField,
    /// Inclusive lower bound
    pub lo: f64,
    /// Inclusive upper bound
    pub hi: f64,
}

impl RangeFilter {
    /// Create a range filter. Bounds given in reverse order are swapped.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is NaN or infinite.
    pub fn new(field: NumericField, range: [f64; 2]) -> Result<Self, FilterError> {
        let [a, b] = range;
        if !a.is_finite() || !b.is_finite() {
            return Err(FilterError::InvalidRange {
                field: field.to_string(),
                lo: a.to_string(),
                hi: b.to_string(),
            });
        }
        Ok(Self {
            field,
            lo: a.min(b),
            hi: a.max(b),
        })
    }

    /// Check whether a record falls inside the range.
    #[must_use]
    pub fn contains(&self, record: &Record) -> bool {
        let value = record.numeric(self.field);
        value >= self.lo && value <= self.hi
    }
}

/// Messages accepted by [`FilterState`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterMessage {
    /// Replace any active predicate with a range on `field`
    ApplyRange {
        /// Field name as it appears in the input data
        field: String,
        /// Range bounds, in either order
        range: [f64; 2],
    },
    /// Drop the active predicate
    Clear,
}

impl FilterMessage {
    /// Convenience constructor for [`FilterMessage::ApplyRange`].
    pub fn apply(field: impl Into<String>, range: [f64; 2]) -> Self {
        Self::ApplyRange {
            field: field.into(),
            range,
        }
    }
}

/// The single active filter predicate, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FilterState {
    /// Every record is visible
    #[default]
    Unfiltered,
    /// Only records inside the range are visible
    FilteredBy(RangeFilter),
}

impl FilterState {
    /// Check whether a predicate is active.
    #[must_use]
    pub const fn is_filtered(&self) -> bool {
        matches!(self, Self::FilteredBy(_))
    }

    /// The active predicate.
    #[must_use]
    pub const fn active(&self) -> Option<&RangeFilter> {
        match self {
            Self::Unfiltered => None,
            Self::FilteredBy(filter) => Some(filter),
        }
    }

    /// Check whether a record passes the current state.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.active().map_or(true, |filter| filter.contains(record))
    }

    /// Derive the filtered view over `records`, preserving load order.
    #[must_use]
    pub fn view<'a>(&self, records: &'a [Record]) -> FilteredView<'a> {
        FilteredView {
            records: records.iter().filter(|r| self.matches(r)).collect(),
        }
    }

    fn replace(&mut self, next: Self) -> Transition {
        if *self == next {
            Transition::Unchanged
        } else {
            *self = next;
            Transition::Changed
        }
    }
}

impl State for FilterState {
    type Message = FilterMessage;
    type Error = FilterError;

    fn update(&mut self, msg: Self::Message) -> Result<Transition, Self::Error> {
        match msg {
            FilterMessage::ApplyRange { field, range } => {
                let field = field.parse::<NumericField>()?;
                let filter = RangeFilter::new(field, range)?;
                Ok(self.replace(Self::FilteredBy(filter)))
            }
            FilterMessage::Clear => Ok(self.replace(Self::Unfiltered)),
        }
    }
}

/// Read-only sequence of records passing the current filter, in load order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    /// View over every record.
    #[must_use]
    pub fn all(records: &'a [Record]) -> Self {
        Self {
            records: records.iter().collect(),
        }
    }

    /// Ids of the visible records.
    #[must_use]
    pub fn ids(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.id).collect()
    }
}

impl<'a> Deref for FilteredView<'a> {
    type Target = [&'a Record];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl<'a> FromIterator<&'a Record> for FilteredView<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use loanscope_test::fixture::{sample_rows, RowBuilder};
    use proptest::prelude::*;
    use serde_json::json;

    fn records() -> Vec<Record> {
        normalize(&json!([
            RowBuilder::new().age(19).risk_score(350).build(),
            RowBuilder::new().age(24).risk_score(420).build(),
            RowBuilder::new().age(25).risk_score(610).build(),
            RowBuilder::new().age(40).risk_score(480).build(),
            RowBuilder::new().age(61).risk_score(900).build(),
        ]))
        .unwrap()
    }

    #[test]
    fn test_default_is_unfiltered() {
        let recs = records();
        let state = FilterState::default();
        assert!(!state.is_filtered());
        assert_eq!(state.view(&recs).len(), recs.len());
    }

    #[test]
    fn test_apply_range_is_inclusive() {
        let recs = records();
        let mut state = FilterState::default();
        state.update(FilterMessage::apply("edad", [19.0, 25.0])).unwrap();
        assert_eq!(state.view(&recs).ids(), vec![0, 1, 2]);
    }

    #[test]
    fn test_reversed_range_is_swapped() {
        let recs = records();
        let mut state = FilterState::default();
        state.update(FilterMessage::apply("edad", [25.0, 19.0])).unwrap();
        let filter = state.active().copied().unwrap();
        assert_eq!((filter.lo, filter.hi), (19.0, 25.0));
        assert_eq!(state.view(&recs).ids(), vec![0, 1, 2]);
    }

    #[test]
    fn test_new_filter_replaces_previous() {
        let recs = records();
        let mut state = FilterState::default();
        state
            .update(FilterMessage::apply("score_riesgo", [300.0, 500.0]))
            .unwrap();
        assert_eq!(state.view(&recs).ids(), vec![0, 1, 3]);

        state.update(FilterMessage::apply("edad", [18.0, 25.0])).unwrap();
        // Record 2 has score 610: visible because only the age range applies.
        assert_eq!(state.view(&recs).ids(), vec![0, 1, 2]);
        assert_eq!(
            state.active().map(|f| f.field),
            Some(NumericField::Age)
        );
    }

    #[test]
    fn test_repeated_apply_is_idempotent() {
        let recs = records();
        let mut state = FilterState::default();
        let first = state.update(FilterMessage::apply("edad", [20.0, 45.0])).unwrap();
        let view_once = state.view(&recs);
        let second = state.update(FilterMessage::apply("edad", [20.0, 45.0])).unwrap();
        assert_eq!(first, Transition::Changed);
        assert_eq!(second, Transition::Unchanged);
        assert_eq!(state.view(&recs), view_once);
    }

    #[test]
    fn test_clear_restores_everything() {
        let recs = records();
        let mut state = FilterState::default();
        state.update(FilterMessage::apply("edad", [60.0, 70.0])).unwrap();
        assert_eq!(state.view(&recs).len(), 1);
        assert_eq!(state.update(FilterMessage::Clear), Ok(Transition::Changed));
        assert_eq!(state.view(&recs).len(), recs.len());
        assert_eq!(state.update(FilterMessage::Clear), Ok(Transition::Unchanged));
    }

    #[test]
    fn test_unknown_field_leaves_state_untouched() {
        let mut state = FilterState::default();
        state.update(FilterMessage::apply("edad", [18.0, 30.0])).unwrap();
        let before = state;
        let err = state
            .update(FilterMessage::apply("comuna", [0.0, 1.0]))
            .unwrap_err();
        assert_eq!(err, FilterError::UnknownField("comuna".to_string()));
        assert_eq!(state, before);
    }

    #[test]
    fn test_non_finite_range_rejected() {
        let mut state = FilterState::default();
        let err = state
            .update(FilterMessage::apply("edad", [f64::NAN, 30.0]))
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidRange { .. }));
        assert_eq!(state, FilterState::Unfiltered);
    }

    #[test]
    fn test_empty_range_gives_empty_view() {
        let recs = records();
        let mut state = FilterState::default();
        state.update(FilterMessage::apply("edad", [100.0, 120.0])).unwrap();
        assert!(state.view(&recs).is_empty());
    }

    #[test]
    fn test_state_serde_roundtrip() {
        let mut state = FilterState::default();
        state.update(FilterMessage::apply("monto_solicitado", [0.0, 5e6])).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let back: FilterState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Apply(NumericField, f64, f64),
        Clear,
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (
                prop::sample::select(NumericField::ALL.to_vec()),
                0.0f64..3_000_000.0,
                0.0f64..3_000_000.0
            )
                .prop_map(|(f, a, b)| Op::Apply(f, a, b)),
            Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_clear_restores_full_set(ops in prop::collection::vec(arb_op(), 0..12)) {
            let recs = normalize(&sample_rows(60)).unwrap();
            let mut state = FilterState::default();
            for op in ops {
                let msg = match op {
                    Op::Apply(field, a, b) => FilterMessage::apply(field.name(), [a, b]),
                    Op::Clear => FilterMessage::Clear,
                };
                state.update(msg).unwrap();
            }
            state.update(FilterMessage::Clear).unwrap();
            prop_assert_eq!(state.view(&recs).ids(), (0..recs.len()).collect::<Vec<_>>());
        }

        #[test]
        fn prop_last_filter_wins(
            first in arb_op(),
            field in prop::sample::select(NumericField::ALL.to_vec()),
            lo in 0.0f64..1_000.0,
            hi in 0.0f64..1_000.0,
        ) {
            let recs = normalize(&sample_rows(60)).unwrap();
            let mut fresh = FilterState::default();
            fresh.update(FilterMessage::apply(field.name(), [lo, hi])).unwrap();

            let mut state = FilterState::default();
            if let Op::Apply(f, a, b) = first {
                state.update(FilterMessage::apply(f.name(), [a, b])).unwrap();
            }
            state.update(FilterMessage::apply(field.name(), [lo, hi])).unwrap();
            prop_assert_eq!(state.view(&recs), fresh.view(&recs));
        }
    }
}
