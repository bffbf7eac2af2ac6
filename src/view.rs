// ---------------------------------------------------------------------------
// ViewRange – the shared visible time window
// ---------------------------------------------------------------------------

/// A visible x-axis window in elapsed-seconds units. Always finite with
/// `start < end`; construction enforces it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRange {
    pub start: f64,
    pub end: f64,
}

impl ViewRange {
    /// Build a range, rejecting inverted, empty, or non-finite windows.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        (start.is_finite() && end.is_finite() && start < end).then_some(ViewRange { start, end })
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Equality up to floating-point noise, relative to the span.
    pub fn approx_eq(&self, other: &ViewRange) -> bool {
        let tol = 1e-9 * self.span().max(other.span()).max(1e-12);
        (self.start - other.start).abs() <= tol && (self.end - other.end).abs() <= tol
    }
}

// ---------------------------------------------------------------------------
// TimeAxis – the synchronizer state machine
// ---------------------------------------------------------------------------

/// Shared time-axis state for all stacked plots.
///
/// `Auto` means no shared constraint: every plot auto-fits its own data.
/// `Locked` means every enabled plot must display exactly the stored range.
/// There is exactly one of these per session; it holds a single current
/// range with no queue or history, so when two interactions race, the last
/// one delivered wins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TimeAxis {
    #[default]
    Auto,
    Locked(ViewRange),
}

impl TimeAxis {
    /// A plot reported a user zoom/pan/box-select; its range becomes
    /// canonical for all plots.
    pub fn lock(&mut self, range: ViewRange) {
        *self = TimeAxis::Locked(range);
    }

    /// Explicit "Reset View": drop the shared constraint. Also the required
    /// transition whenever the dataset is replaced, since a stored range is
    /// meaningless against a different file's elapsed-time domain.
    pub fn reset(&mut self) {
        *self = TimeAxis::Auto;
    }

    pub fn locked_range(&self) -> Option<ViewRange> {
        match self {
            TimeAxis::Auto => None,
            TimeAxis::Locked(range) => Some(*range),
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, TimeAxis::Locked(_))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_construction_rejects_bad_windows() {
        assert!(ViewRange::new(0.0, 10.0).is_some());
        assert!(ViewRange::new(10.0, 10.0).is_none());
        assert!(ViewRange::new(10.0, 0.0).is_none());
        assert!(ViewRange::new(f64::NAN, 1.0).is_none());
        assert!(ViewRange::new(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn interaction_locks_and_reset_releases() {
        let mut axis = TimeAxis::default();
        assert_eq!(axis, TimeAxis::Auto);

        let r = ViewRange::new(2.0, 8.0).unwrap();
        axis.lock(r);
        assert_eq!(axis.locked_range(), Some(r));

        axis.reset();
        assert_eq!(axis, TimeAxis::Auto);
        assert_eq!(axis.locked_range(), None);
    }

    #[test]
    fn last_delivered_range_wins() {
        let mut axis = TimeAxis::default();
        axis.lock(ViewRange::new(0.0, 100.0).unwrap());
        axis.lock(ViewRange::new(40.0, 60.0).unwrap());
        assert_eq!(axis.locked_range(), ViewRange::new(40.0, 60.0));
    }

    #[test]
    fn approx_eq_tolerates_floating_point_noise() {
        let a = ViewRange::new(0.0, 10.0).unwrap();
        let b = ViewRange::new(0.0, 10.0 + 1e-12).unwrap();
        let c = ViewRange::new(0.0, 11.0).unwrap();
        assert!(a.approx_eq(&b));
        assert!(!a.approx_eq(&c));
    }
}
