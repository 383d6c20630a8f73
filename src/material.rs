use serde::{Deserialize, Serialize};

/// One constituent of a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialNuclide {
    /// Index into the shared nuclide arena.
    pub nuclide: usize,
    /// Atom density in atoms/(barn cm).
    pub atom_density: f64,
}

/// A piecewise-homogeneous material: an ordered list of nuclides with atom
/// densities. Macroscopic cross sections are atom-density-weighted sums of
/// the constituent microscopic values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(default)]
    pub name: Option<String>,
    pub nuclides: Vec<MaterialNuclide>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            nuclides: Vec::new(),
        }
    }

    pub fn add_nuclide(&mut self, nuclide: usize, atom_density: f64) {
        self.nuclides.push(MaterialNuclide {
            nuclide,
            atom_density,
        });
    }

    pub fn n_nuclides(&self) -> usize {
        self.nuclides.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_composition() {
        let mut m = Material::new("fuel");
        m.add_nuclide(0, 0.02);
        m.add_nuclide(1, 0.04);
        assert_eq!(m.n_nuclides(), 2);
        assert_eq!(m.nuclides[0].nuclide, 0);
        assert_eq!(m.nuclides[1].atom_density, 0.04);
        assert_eq!(m.name.as_deref(), Some("fuel"));
    }
}
