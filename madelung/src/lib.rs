#![warn(clippy::all, clippy::pedantic)]

// disable some style lints
#![allow(clippy::needless_return, clippy::must_use_candidate, clippy::comparison_chain)]
#![allow(clippy::redundant_field_names, clippy::redundant_closure_for_method_calls)]
#![allow(clippy::unreadable_literal, clippy::missing_errors_doc, clippy::module_name_repetitions)]

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]

// Tests lints
#![cfg_attr(test, allow(clippy::float_cmp))]

//! Electrostatic energy of periodic systems of point charges, using Ewald
//! summation or a direct sum over minimum image pairs.

pub mod types;
pub use types::*;

pub mod math;

mod errors;
pub use self::errors::Error;

pub mod systems;
pub use systems::{CubicCell, ParticleSystem};

pub mod calculators;
pub use calculators::{EnergyCalculator, EnergyResult, EnergyTerm};

mod calculator;
pub use calculator::Calculator;
