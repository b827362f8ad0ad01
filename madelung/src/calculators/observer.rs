use log::{debug, info};

use super::EnergyTerm;

/// An `EnergyObserver` gets notified of the progress of an energy
/// calculation, one term at a time.
///
/// All functions have a default implementation doing nothing.
pub trait EnergyObserver {
    /// Called before starting the calculation of `term`
    fn term_started(&self, term: EnergyTerm) {
        let _ = term;
    }

    /// Called after `term` has been computed, with its `value`
    fn term_computed(&self, term: EnergyTerm, value: f64) {
        let _ = (term, value);
    }
}

/// Report progress with the `log` crate: the start of each term at the `info`
/// level and the computed values at the `debug` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl EnergyObserver for LogObserver {
    fn term_started(&self, term: EnergyTerm) {
        info!("Calculate {} part", term);
    }

    fn term_computed(&self, term: EnergyTerm, value: f64) {
        debug!("{} = {:.2e}", term, value);
    }
}

/// Ignore all progress notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl EnergyObserver for SilentObserver {}
