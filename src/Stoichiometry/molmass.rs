use crate::Stoichiometry::formula_parser::{ElementCounts, Formula, parse_formula};
use nalgebra::DMatrix;
/// Molar masses of chemical formulae and the element composition matrix
///
///
use std::collections::{BTreeSet, HashMap};

/// Source of molar masses for the stoichiometry calculator.
/// Returns the molar mass in g/mol or None if the formula is not a valid substance.
pub trait MolarMassLookup {
    fn molar_mass(&self, formula: &str) -> Option<f64>;
}

/// table of molar masses given directly by formula: {"H2O": 18.015, ...}
impl MolarMassLookup for HashMap<String, f64> {
    fn molar_mass(&self, formula: &str) -> Option<f64> {
        self.get(formula).copied()
    }
}

// Define a struct to hold element data
pub struct Element {
    name: &'static str,
    atomic_mass: f64,
}

const fn el(name: &'static str, atomic_mass: f64) -> Element {
    Element { name, atomic_mass }
}

// standard atomic weights, g/mol; for elements without stable isotopes - mass number of the longest-lived isotope
const ELEMENTS: &[Element] = &[
    el("H", 1.008),
    el("He", 4.0026),
    el("Li", 6.94),
    el("Be", 9.0122),
    el("B", 10.81),
    el("C", 12.011),
    el("N", 14.007),
    el("O", 15.999),
    el("F", 18.998),
    el("Ne", 20.18),
    el("Na", 22.99),
    el("Mg", 24.305),
    el("Al", 26.982),
    el("Si", 28.085),
    el("P", 30.974),
    el("S", 32.06),
    el("Cl", 35.45),
    el("Ar", 39.948),
    el("K", 39.098),
    el("Ca", 40.078),
    el("Sc", 44.956),
    el("Ti", 47.867),
    el("V", 50.942),
    el("Cr", 51.996),
    el("Mn", 54.938),
    el("Fe", 55.845),
    el("Co", 58.933),
    el("Ni", 58.693),
    el("Cu", 63.546),
    el("Zn", 65.38),
    el("Ga", 69.723),
    el("Ge", 72.63),
    el("As", 74.922),
    el("Se", 78.971),
    el("Br", 79.904),
    el("Kr", 83.798),
    el("Rb", 85.468),
    el("Sr", 87.62),
    el("Y", 88.906),
    el("Zr", 91.224),
    el("Nb", 92.906),
    el("Mo", 95.95),
    el("Tc", 98.0),
    el("Ru", 101.07),
    el("Rh", 102.91),
    el("Pd", 106.42),
    el("Ag", 107.87),
    el("Cd", 112.41),
    el("In", 114.82),
    el("Sn", 118.71),
    el("Sb", 121.76),
    el("Te", 127.6),
    el("I", 126.9),
    el("Xe", 131.29),
    el("Cs", 132.91),
    el("Ba", 137.33),
    el("La", 138.91),
    el("Ce", 140.12),
    el("Pr", 140.91),
    el("Nd", 144.24),
    el("Pm", 145.0),
    el("Sm", 150.36),
    el("Eu", 151.96),
    el("Gd", 157.25),
    el("Tb", 158.93),
    el("Dy", 162.5),
    el("Ho", 164.93),
    el("Er", 167.26),
    el("Tm", 168.93),
    el("Yb", 173.05),
    el("Lu", 174.97),
    el("Hf", 178.49),
    el("Ta", 180.95),
    el("W", 183.84),
    el("Re", 186.21),
    el("Os", 190.23),
    el("Ir", 192.22),
    el("Pt", 195.08),
    el("Au", 196.97),
    el("Hg", 200.59),
    el("Tl", 204.38),
    el("Pb", 207.2),
    el("Bi", 208.98),
    el("Po", 209.0),
    el("At", 210.0),
    el("Rn", 222.0),
    el("Fr", 223.0),
    el("Ra", 226.0),
    el("Ac", 227.0),
    el("Th", 232.04),
    el("Pa", 231.04),
    el("U", 238.03),
    el("Np", 237.0),
    el("Pu", 244.0),
    el("Am", 243.0),
    el("Cm", 247.0),
    el("Bk", 247.0),
    el("Cf", 251.0),
    el("Es", 252.0),
    el("Fm", 257.0),
    el("Md", 258.0),
    el("No", 259.0),
    el("Lr", 266.0),
];

/// Built-in molar mass lookup: sum of standard atomic weights over the parsed formula.
/// Atomic masses of single elements may be overridden (e.g. from the config file).
#[derive(Debug, Clone, Default)]
pub struct PeriodicTable {
    pub overrides: HashMap<String, f64>,
}

impl PeriodicTable {
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    pub fn with_overrides(overrides: HashMap<String, f64>) -> Self {
        Self { overrides }
    }

    pub fn atomic_mass(&self, symbol: &str) -> Option<f64> {
        if let Some(&mass) = self.overrides.get(symbol) {
            return Some(mass);
        }
        ELEMENTS
            .iter()
            .find(|e| e.name == symbol)
            .map(|e| e.atomic_mass)
    }

    /// molar mass of an already parsed composition, None if any element is unknown
    pub fn molar_mass_of_composition(&self, counts: &ElementCounts) -> Option<f64> {
        let mut molar_mass = 0.0;
        for (element, &count) in counts {
            molar_mass += self.atomic_mass(element)? * count as f64;
        }
        Some(molar_mass)
    }
}

impl MolarMassLookup for PeriodicTable {
    fn molar_mass(&self, formula: &str) -> Option<f64> {
        let counts = parse_formula(formula).ok()?;
        self.molar_mass_of_composition(&counts)
    }
}

/// Element composition matrix of a vector of substances: rows are the elements (sorted by symbol),
/// columns are the substances in the given order. Returns the matrix and the vector of elements.
/// Entries are i128 so that any atom count accepted by the parser is stored exactly
pub fn create_elem_composition_matrix(formulae: &[&Formula]) -> (DMatrix<i128>, Vec<String>) {
    let elements: Vec<String> = formulae
        .iter()
        .flat_map(|f| f.elements())
        .map(|el| el.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let matrix = DMatrix::from_fn(elements.len(), formulae.len(), |row, col| {
        // usize is at most 64 bits wide, widening to i128 is lossless
        formulae[col].count_of(&elements[row]) as i128
    });
    (matrix, elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_calculate_molar_mass() {
        let table = PeriodicTable::new();
        assert_relative_eq!(table.molar_mass("H2O").unwrap(), 18.01528, epsilon = 1e-2);
        assert_relative_eq!(table.molar_mass("NaCl").unwrap(), 58.44, epsilon = 1e-2);
        assert_relative_eq!(table.molar_mass("C6H8O6").unwrap(), 176.12, epsilon = 1e-2);
        assert_relative_eq!(table.molar_mass("Ca(NO3)2").unwrap(), 164.09, epsilon = 1e-2);
        assert_relative_eq!(table.molar_mass("KMnO4").unwrap(), 158.03, epsilon = 1e-2);
    }

    #[test]
    fn test_invalid_formulae_are_not_found() {
        let table = PeriodicTable::new();
        assert_eq!(table.molar_mass("Xx2"), None);
        assert_eq!(table.molar_mass("Na2("), None);
        assert_eq!(table.molar_mass(""), None);
    }

    #[test]
    fn test_overrides() {
        let table = PeriodicTable::with_overrides(HashMap::from([
            ("H".to_string(), 1.0),
            ("Xx".to_string(), 100.0),
        ]));
        assert_relative_eq!(table.molar_mass("H2").unwrap(), 2.0);
        assert_relative_eq!(table.molar_mass("XxO").unwrap(), 115.999, epsilon = 1e-9);
    }

    #[test]
    fn test_lookup_by_table_of_formulae() {
        let table = HashMap::from([("H2O".to_string(), 18.0)]);
        assert_eq!(table.molar_mass("H2O"), Some(18.0));
        assert_eq!(table.molar_mass("H2O2"), None);
    }

    #[test]
    fn test_element_matrix() {
        let formulae: Vec<Formula> = ["H2O", "NaCl", "C3H8", "CH4"]
            .iter()
            .map(|f| Formula::parse(f).unwrap())
            .collect();
        let refs: Vec<&Formula> = formulae.iter().collect();
        let (matrix, elements) = create_elem_composition_matrix(&refs);
        assert_eq!(elements, vec!["C", "Cl", "H", "Na", "O"]);
        assert_eq!(matrix.nrows(), 5);
        assert_eq!(matrix.ncols(), 4);
        // C3H8 column
        assert_eq!(matrix[(0, 2)], 3);
        assert_eq!(matrix[(2, 2)], 8);
        assert_eq!(matrix[(4, 2)], 0);
    }
}
