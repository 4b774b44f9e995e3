//! Built-in pipeline providers
//!
//! The provider set is open: displacement, edge softening, curve piping,
//! shut-lining, thickening and third-party stages all plug in through the
//! same contract. The two stages here are the ones with enough algorithmic
//! meat to exercise every corner of that contract (parameters, progress,
//! cancellation, incomplete results, cheap hash probes).

mod displacement;
mod thickening;

pub use displacement::DisplacementProvider;
pub use thickening::ThickeningProvider;
