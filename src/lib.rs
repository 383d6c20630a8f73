//! Continuous-energy Monte Carlo neutron transport core.
//!
//! Simulates neutron random walks through piecewise-homogeneous media:
//! cross-section lookup on a unionized energy grid, stochastic selection
//! of collision distance, nuclide, and reaction channel, evaluated-data
//! angular and secondary-energy sampling, elastic and inelastic
//! kinematics, and fission-site banking with survival biasing. Geometry
//! traversal, data parsing, and the outer batch driver are consumed
//! through the interfaces in [`geometry`], [`tally`], and [`grid`].

mod angle_distribution;
mod bank;
mod collision;
mod data;
mod energy_distribution;
mod error;
mod fast_rng;
mod fission;
mod geometry;
mod grid;
mod interpolate;
mod material;
mod model;
mod nuclide;
mod particle;
mod physics;
mod reaction;
mod sampling;
mod settings;
mod source;
mod tally;
mod transport;
mod xs;

pub use angle_distribution::{
    sample_isotropic, AngleDistribution, AngleTable, Interpolation, TabularAngle,
};
pub use bank::{FissionBank, FissionSite};
pub use data::{
    is_disappearance, is_fission, is_inelastic_scatter, reaction_name, ENERGY_FLOOR,
    MAX_DAUGHTER_ENERGY,
};
pub use energy_distribution::{
    ContinuousTabular, CorrelatedAngleEnergy, CorrelatedTable, EnergyDistribution, KalbachMann,
    KalbachTable, SpectrumTable,
};
pub use error::{Result, TransportError};
pub use fast_rng::FastRng;
pub use fission::create_fission_sites;
pub use geometry::{BoundaryDistance, Geometry, SphereCell};
pub use grid::NuclearData;
pub use interpolate::{binary_search, interpolate_linear, Tabulated1D};
pub use material::{Material, MaterialNuclide};
pub use model::{GenerationResult, Keff, Model};
pub use nuclide::{NuBar, Nuclide, PrecursorGroup};
pub use particle::Particle;
pub use physics::{cm_to_lab, elastic_scatter, inelastic_scatter, rotate_angle};
pub use reaction::Reaction;
pub use sampling::{chi_squared, maxwell, watt, wigner};
pub use settings::Settings;
pub use source::{IndependentSource, SourceAngle};
pub use tally::{CollisionTally, NoTally, Tally};
pub use transport::Worker;
pub use xs::{calculate_xs, find_energy_index, MacroXs, MicroXs};
