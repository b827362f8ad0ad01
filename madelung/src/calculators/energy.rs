use serde::ser::{Serialize, Serializer, SerializeMap};

use super::EnergyObserver;

/// The different contributions to the electrostatic energy of a periodic
/// system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnergyTerm {
    /// Pairwise sum in real space, screened or not
    Real,
    /// Fourier space sum of the Ewald method
    Reciprocal,
    /// Removal of the interaction of each charge with its own screening
    /// gaussian
    SelfEnergy,
    /// Boundary correction for a surrounding medium of finite permittivity
    Dipole,
    /// Correction for the uniform background neutralizing a charged cell
    Neutralization,
}

impl EnergyTerm {
    /// Get the name of this term, as used in logs and serialized results
    pub fn name(&self) -> &'static str {
        match self {
            EnergyTerm::Real => "real",
            EnergyTerm::Reciprocal => "reciprocal",
            EnergyTerm::SelfEnergy => "self",
            EnergyTerm::Dipole => "dipole",
            EnergyTerm::Neutralization => "neutralization",
        }
    }
}

impl std::fmt::Display for EnergyTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of an energy calculation, containing all the terms that were
/// computed and their sum.
///
/// Terms which were not computed (for example the dipole correction with
/// metallic boundary conditions) are absent from the result, which is
/// different from a term computed to be zero.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyResult {
    /// computed terms, in the order they were computed
    terms: Vec<(EnergyTerm, f64)>,
    /// sum of all the terms
    total: f64,
}

impl EnergyResult {
    /// Get the total energy, i.e. the sum of all computed terms
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Get the value of a single `term`, or `None` if it was not computed
    pub fn get(&self, term: EnergyTerm) -> Option<f64> {
        self.terms.iter()
            .find(|(t, _)| *t == term)
            .map(|&(_, value)| value)
    }

    /// Iterate over the computed terms, in the order they were computed
    pub fn terms(&self) -> impl Iterator<Item = (EnergyTerm, f64)> + '_ {
        self.terms.iter().copied()
    }

    /// Get the real space energy. This term is computed by all calculators.
    pub fn real(&self) -> f64 {
        self.get(EnergyTerm::Real).unwrap_or(0.0)
    }

    /// Get the reciprocal space energy, if it was computed
    pub fn reciprocal(&self) -> Option<f64> {
        self.get(EnergyTerm::Reciprocal)
    }

    /// Get the self energy correction, if it was computed
    pub fn self_energy(&self) -> Option<f64> {
        self.get(EnergyTerm::SelfEnergy)
    }

    /// Get the dipole correction, if it was computed
    pub fn dipole(&self) -> Option<f64> {
        self.get(EnergyTerm::Dipole)
    }

    /// Get the neutralization correction, if it was computed
    pub fn neutralization(&self) -> Option<f64> {
        self.get(EnergyTerm::Neutralization)
    }
}

impl std::fmt::Display for EnergyResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (term, value) in &self.terms {
            write!(f, "{} = {:.6e}, ", term, value)?;
        }
        write!(f, "total = {:.6e}", self.total)
    }
}

impl Serialize for EnergyResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.terms.len() + 1))?;
        for (term, value) in &self.terms {
            map.serialize_entry(term.name(), value)?;
        }
        map.serialize_entry("total", &self.total)?;
        map.end()
    }
}

/// Accumulate energy terms one at a time to create an [`EnergyResult`]
#[derive(Debug, Clone, Default)]
pub(crate) struct EnergyResultBuilder {
    terms: Vec<(EnergyTerm, f64)>,
    total: f64,
}

impl EnergyResultBuilder {
    pub fn new() -> EnergyResultBuilder {
        EnergyResultBuilder::default()
    }

    /// Add a new term to the result
    pub fn add(&mut self, term: EnergyTerm, value: f64) {
        assert!(
            self.terms.iter().all(|(t, _)| *t != term),
            "{} energy is already part of this result", term
        );

        self.terms.push((term, value));
        self.total += value;
    }

    /// Compute a single `term`, notifying the `observer` before and after
    /// the calculation, and add it to the result
    pub fn observe(&mut self, observer: &dyn EnergyObserver, term: EnergyTerm, compute: impl FnOnce() -> f64) {
        observer.term_started(term);
        let value = compute();
        observer.term_computed(term, value);
        self.add(term, value);
    }

    /// Add a `term` which is only part of some calculations. `compute`
    /// returns `None` when the term does not apply, in which case the term
    /// is absent from the result and the observer is not notified.
    pub fn observe_optional(&mut self, observer: &dyn EnergyObserver, term: EnergyTerm, compute: impl FnOnce() -> Option<f64>) {
        if let Some(value) = compute() {
            observer.term_started(term);
            observer.term_computed(term, value);
            self.add(term, value);
        }
    }

    pub fn finish(self) -> EnergyResult {
        EnergyResult {
            terms: self.terms,
            total: self.total,
        }
    }
}
