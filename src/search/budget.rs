//! Evaluation budget for a single search phase.
//!
//! Every candidate formula costs one evaluation; a phase stops when either
//! its evaluation allowance or its wall-clock window runs out, whichever
//! comes first. The deadline is checked on every charge so a slow resolver
//! cannot blow past the window by more than one evaluation.

use std::time::{Duration, Instant};

pub(crate) struct SearchBudget {
    deadline: Instant,
    evals_left: u64,
}

impl SearchBudget {
    pub(crate) fn new(window: Duration, max_evals: u64) -> Self {
        SearchBudget { deadline: Instant::now() + window, evals_left: max_evals }
    }

    /// Charge one evaluation. Returns `false` once the budget is spent.
    pub(crate) fn charge(&mut self) -> bool {
        if self.evals_left == 0 {
            return false;
        }
        self.evals_left -= 1;
        Instant::now() < self.deadline
    }

    /// Would `evals` full evaluations fit in what is left?
    pub(crate) fn fits(&self, evals: u64) -> bool {
        evals <= self.evals_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausts_after_max_evals() {
        let mut budget = SearchBudget::new(Duration::from_secs(60), 3);
        assert!(budget.charge());
        assert!(budget.charge());
        assert!(budget.charge());
        assert!(!budget.charge());
    }

    #[test]
    fn expired_window_stops_charging() {
        let mut budget = SearchBudget::new(Duration::ZERO, 100);
        assert!(!budget.charge());
    }

    #[test]
    fn fits_tracks_remaining_evals() {
        let mut budget = SearchBudget::new(Duration::from_secs(60), 10);
        assert!(budget.fits(10));
        assert!(!budget.fits(11));
        budget.charge();
        assert!(budget.fits(9));
        assert!(!budget.fits(10));
    }
}
