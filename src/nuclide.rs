// Read-only per-nuclide cross-section and fission data.
//
// A nuclide owns its energy grid and the summed total/elastic/absorption
// (and fission) arrays on that grid; individual channels live in the
// reaction list with threshold-aligned arrays. `grid_index` maps unionized
// grid points onto this nuclide's grid and is filled in once when the data
// set is assembled.

use serde::{Deserialize, Serialize};

use crate::data;
use crate::energy_distribution::EnergyDistribution;
use crate::error::{Result, TransportError};
use crate::interpolate::Tabulated1D;
use crate::reaction::Reaction;

/// Average neutron multiplicity as a function of energy: a polynomial in E
/// or a tabulated curve, per the evaluated-data representations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form")]
pub enum NuBar {
    Polynomial { coefficients: Vec<f64> },
    Tabulated(Tabulated1D),
}

impl NuBar {
    /// Evaluate nu-bar at energy `e` (MeV).
    pub fn evaluate(&self, e: f64) -> Result<f64> {
        match self {
            NuBar::Polynomial { coefficients } => {
                if coefficients.is_empty() {
                    return Err(TransportError::EmptyTabulation);
                }
                // Horner, highest order first accumulation over c_i E^i
                let mut value = 0.0;
                for &c in coefficients.iter().rev() {
                    value = value * e + c;
                }
                Ok(value)
            }
            NuBar::Tabulated(tab) => tab.evaluate(e),
        }
    }
}

/// Delayed-neutron precursor group: decay constant plus the energy-dependent
/// group yield fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecursorGroup {
    /// Decay constant in 1/s.
    pub decay_constant: f64,
    /// Fractional group yield as a function of incident energy.
    pub yield_fraction: Tabulated1D,
}

/// A nuclide's complete transport data, immutable during a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nuclide {
    /// Canonical name, e.g. "U235".
    pub name: String,
    /// Atomic weight ratio (target mass / neutron mass).
    pub awr: f64,
    /// Energy grid in MeV, strictly increasing.
    pub energy: Vec<f64>,
    /// Total cross section on the grid, barns.
    pub total: Vec<f64>,
    /// Elastic cross section on the grid, barns.
    pub elastic: Vec<f64>,
    /// Absorption (disappearance) cross section on the grid, barns.
    pub absorption: Vec<f64>,
    /// Fission cross section on the grid, barns; empty unless fissionable.
    #[serde(default)]
    pub fission: Vec<f64>,
    pub fissionable: bool,
    /// Unionized-grid index -> own-grid index, monotone non-decreasing.
    /// Built once by the data assembly; empty until then.
    #[serde(skip, default)]
    pub grid_index: Vec<usize>,
    /// Reaction channels.
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    /// Index of the total-fission channel in `reactions`.
    #[serde(default)]
    pub index_fission: Option<usize>,
    /// True when partial fission channels (MT 19-21, 38) are present.
    #[serde(default)]
    pub has_partial_fission: bool,
    /// Total nu-bar tabulation.
    #[serde(default)]
    pub nu_total: Option<NuBar>,
    /// Prompt nu-bar; absent means prompt = total.
    #[serde(default)]
    pub nu_prompt: Option<NuBar>,
    /// Delayed nu-bar.
    #[serde(default)]
    pub nu_delayed: Option<NuBar>,
    /// Delayed-neutron precursor groups.
    #[serde(default)]
    pub precursors: Vec<PrecursorGroup>,
    /// Delayed-neutron energy spectra, one per precursor group.
    #[serde(default)]
    pub delayed_spectra: Vec<EnergyDistribution>,
}

impl Nuclide {
    /// Non-fissionable nuclide from summed cross-section arrays. The
    /// reaction list starts empty.
    pub fn new(
        name: impl Into<String>,
        awr: f64,
        energy: Vec<f64>,
        total: Vec<f64>,
        elastic: Vec<f64>,
        absorption: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            awr,
            energy,
            total,
            elastic,
            absorption,
            fission: Vec::new(),
            fissionable: false,
            grid_index: Vec::new(),
            reactions: Vec::new(),
            index_fission: None,
            has_partial_fission: false,
            nu_total: None,
            nu_prompt: None,
            nu_delayed: None,
            precursors: Vec::new(),
            delayed_spectra: Vec::new(),
        }
    }

    /// Attach a reaction channel, maintaining the fission bookkeeping.
    pub fn add_reaction(&mut self, reaction: Reaction) {
        if reaction.mt == data::MT_FISSION {
            self.index_fission = Some(self.reactions.len());
            self.fissionable = true;
        } else if data::is_fission(reaction.mt) {
            self.has_partial_fission = true;
            self.fissionable = true;
            if self.index_fission.is_none() {
                self.index_fission = Some(self.reactions.len());
            }
        }
        self.reactions.push(reaction);
    }

    /// Total nu-bar at energy `e`; zero for non-fissionable nuclides.
    pub fn nu_total(&self, e: f64) -> Result<f64> {
        match &self.nu_total {
            Some(nu) => nu.evaluate(e),
            None => Ok(0.0),
        }
    }

    /// Prompt nu-bar at energy `e`, falling back to the total tabulation
    /// when no separate prompt curve exists.
    pub fn nu_prompt(&self, e: f64) -> Result<f64> {
        match &self.nu_prompt {
            Some(nu) => nu.evaluate(e),
            None => self.nu_total(e),
        }
    }

    /// Delayed nu-bar at energy `e`; zero when no delayed data exists.
    pub fn nu_delayed(&self, e: f64) -> Result<f64> {
        match &self.nu_delayed {
            Some(nu) => nu.evaluate(e),
            None => Ok(0.0),
        }
    }

    /// The elastic channel (MT = 2), if present.
    pub fn elastic_reaction(&self) -> Option<&Reaction> {
        self.reactions.iter().find(|r| r.mt == data::MT_ELASTIC)
    }

    /// Summed cross sections at own-grid point `grid_index` with
    /// interpolation fraction `f`. Returns (total, elastic, absorption,
    /// fission).
    pub fn micro_xs_at(&self, grid_index: usize, f: f64) -> (f64, f64, f64, f64) {
        let lerp = |xs: &[f64]| -> f64 {
            if xs.is_empty() {
                return 0.0;
            }
            let i = grid_index.min(xs.len() - 1);
            if i + 1 < xs.len() {
                (1.0 - f) * xs[i] + f * xs[i + 1]
            } else {
                xs[i]
            }
        };
        (
            lerp(&self.total),
            lerp(&self.elastic),
            lerp(&self.absorption),
            lerp(&self.fission),
        )
    }

    /// Check the structural invariants: a strictly increasing grid and
    /// cross-section arrays of matching length.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.energy.len() < 2 {
            return Err(format!("{}: energy grid needs at least 2 points", self.name));
        }
        if !self.energy.windows(2).all(|w| w[0] < w[1]) {
            return Err(format!("{}: energy grid is not strictly increasing", self.name));
        }
        let n = self.energy.len();
        for (label, xs) in [
            ("total", &self.total),
            ("elastic", &self.elastic),
            ("absorption", &self.absorption),
        ] {
            if xs.len() != n {
                return Err(format!(
                    "{}: {} array length {} does not match grid length {}",
                    self.name,
                    label,
                    xs.len(),
                    n
                ));
            }
        }
        if self.fissionable && self.fission.len() != n {
            return Err(format!(
                "{}: fission array length {} does not match grid length {}",
                self.name,
                self.fission.len(),
                n
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_nuclide() -> Nuclide {
        Nuclide::new(
            "Test1",
            1.0,
            vec![1e-5, 1.0, 10.0],
            vec![3.0, 2.0, 1.0],
            vec![2.0, 1.5, 0.5],
            vec![1.0, 0.5, 0.5],
        )
    }

    #[test]
    fn test_validate_ok() {
        assert!(simple_nuclide().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unsorted_grid() {
        let mut nuc = simple_nuclide();
        nuc.energy = vec![1.0, 1.0, 10.0];
        assert!(nuc.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let mut nuc = simple_nuclide();
        nuc.elastic.pop();
        assert!(nuc.validate().is_err());
    }

    #[test]
    fn test_micro_xs_lerp() {
        let nuc = simple_nuclide();
        let (t, el, a, f) = nuc.micro_xs_at(0, 0.5);
        assert_eq!(t, 2.5);
        assert_eq!(el, 1.75);
        assert_eq!(a, 0.75);
        assert_eq!(f, 0.0);
    }

    #[test]
    fn test_nu_polynomial() {
        let nu = NuBar::Polynomial {
            coefficients: vec![2.4, 0.1],
        };
        assert!((nu.evaluate(2.0).unwrap() - 2.6).abs() < 1e-12);
    }

    #[test]
    fn test_nu_tabulated() {
        let nu = NuBar::Tabulated(Tabulated1D::new(vec![0.0, 10.0], vec![2.0, 3.0]));
        assert!((nu.evaluate(5.0).unwrap() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_nu_prompt_falls_back_to_total() {
        let mut nuc = simple_nuclide();
        nuc.nu_total = Some(NuBar::Polynomial {
            coefficients: vec![2.5],
        });
        assert_eq!(nuc.nu_prompt(1.0).unwrap(), 2.5);
        assert_eq!(nuc.nu_delayed(1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_deserialize_from_json() {
        // The shape the data-loading layer produces
        let json = r#"{
            "name": "Li6",
            "awr": 5.963,
            "energy": [1e-5, 1.0, 20.0],
            "total": [3.0, 1.2, 1.0],
            "elastic": [2.0, 1.0, 0.9],
            "absorption": [1.0, 0.2, 0.1],
            "fissionable": false,
            "reactions": [{
                "mt": 51,
                "q_value": -1.0,
                "threshold_idx": 1,
                "cross_section": [0.0, 0.1],
                "multiplicity": -1,
                "energy": {
                    "law": "LevelInelastic",
                    "mass_ratio": 0.735,
                    "threshold": 1.17
                }
            }]
        }"#;
        let nuc: Nuclide = serde_json::from_str(json).expect("nuclide JSON should parse");
        assert_eq!(nuc.name, "Li6");
        assert!(nuc.validate().is_ok());
        assert_eq!(nuc.reactions.len(), 1);
        let rxn = &nuc.reactions[0];
        assert_eq!(rxn.mt, 51);
        assert!(rxn.in_cm_frame());
        match rxn.energy.as_ref().unwrap() {
            EnergyDistribution::LevelInelastic { threshold, .. } => {
                assert!((threshold - 1.17).abs() < 1e-12)
            }
            other => panic!("wrong law deserialized: {:?}", other),
        }
    }

    #[test]
    fn test_add_reaction_tracks_fission() {
        let mut nuc = simple_nuclide();
        nuc.add_reaction(Reaction {
            mt: 2,
            q_value: 0.0,
            threshold_idx: 0,
            cross_section: vec![2.0, 1.5, 0.5],
            multiplicity: 1,
            angle: None,
            energy: None,
        });
        assert!(!nuc.fissionable);
        nuc.add_reaction(Reaction {
            mt: 18,
            q_value: 193.0,
            threshold_idx: 0,
            cross_section: vec![1.0, 1.0, 1.0],
            multiplicity: 0,
            angle: None,
            energy: None,
        });
        assert!(nuc.fissionable);
        assert_eq!(nuc.index_fission, Some(1));
        assert!(!nuc.has_partial_fission);
        nuc.add_reaction(Reaction {
            mt: 19,
            q_value: 193.0,
            threshold_idx: 0,
            cross_section: vec![1.0, 1.0, 1.0],
            multiplicity: 0,
            angle: None,
            energy: None,
        });
        assert!(nuc.has_partial_fission);
    }
}
