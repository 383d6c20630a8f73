use thiserror::Error;

/// Errors raised by the transport core.
///
/// Fatal conditions surface as `Err` values and propagate to the driver,
/// which terminates the cycle. Recoverable conditions (out-of-range
/// cosine, unmodelled reaction, low-energy kill) are logged and never
/// reach this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("particle {id} could not be located at ({x:.6e}, {y:.6e}, {z:.6e})")]
    ParticleLost { id: u64, x: f64, y: f64, z: f64 },

    #[error("nuclide sampling exhausted the composition of material {material}; macroscopic total {macro_total:.6e} is inconsistent with the microscopic values")]
    NuclideSamplingExhausted { material: usize, macro_total: f64 },

    #[error("reaction sampling exhausted the reaction list of nuclide {nuclide} at {energy:.6e} MeV")]
    ReactionSamplingExhausted { nuclide: String, energy: f64 },

    #[error("tabulated record has {nr} interpolation regions; only a single lin-lin region is supported")]
    MultiRegionTabulation { nr: usize },

    #[error("unknown interpolation code {0}")]
    UnknownInterpolation(i32),

    #[error("tabular energy distribution contains {nd} discrete lines")]
    DiscreteLines { nd: usize },

    #[error("energy law {law} is not implemented")]
    UnsupportedLaw { law: i32 },

    #[error("N-body phase space requires 3, 4, or 5 bodies, got {0}")]
    InvalidBodyCount(u32),

    #[error("correlated energy-angle law {law} requires a scattering-cosine output slot")]
    MissingCosineSlot { law: i32 },

    #[error("empty tabulated record")]
    EmptyTabulation,

    #[error("particle has no material assigned at a collision site")]
    MissingMaterial,

    #[error("nuclide {0} has no fission data")]
    NotFissionable(String),

    #[error("fission channel MT={mt} carries no daughter energy spectrum")]
    MissingFissionSpectrum { mt: i32 },
}

pub type Result<T> = std::result::Result<T, TransportError>;
