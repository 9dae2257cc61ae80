//! Stoichiometric calculations on a balanced equation.
//!
//! Given masses or moles of some reactants, finds the limiting reagent and the extent of
//! reaction (number of "reaction acts" in moles), then derives moles and masses of every
//! substance and the excess of every reactant.
use crate::Stoichiometry::equation_balancer::BalancedEquation;
use crate::Stoichiometry::molmass::MolarMassLookup;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoichError {
    #[error("molar mass of '{0}' is unknown")]
    UnknownSpecies(String),
    #[error("'{0}' is not on the supplied side of the equation")]
    InvalidInputSpecies(String),
    #[error("at least one known amount is required")]
    NoKnownAmounts,
    #[error("invalid amount {value} for '{formula}'")]
    InvalidAmount { formula: String, value: f64 },
    #[error("amount of '{0}' is given more than once")]
    DuplicateAmount(String),
    #[error("'{0}' occurs more than once in the equation")]
    DuplicateSpecies(String),
    #[error("unknown unit '{0}', use g or mol")]
    UnknownUnit(String),
    #[error("'{0}' is not of the form \"[number] [g/mol]\"")]
    InvalidExpression(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountUnit {
    Grams,
    Moles,
}

impl FromStr for AmountUnit {
    type Err = StoichError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => Ok(AmountUnit::Grams),
            "mol" | "mole" | "moles" => Ok(AmountUnit::Moles),
            _ => Err(StoichError::UnknownUnit(s.to_string())),
        }
    }
}

impl fmt::Display for AmountUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountUnit::Grams => write!(f, "g"),
            AmountUnit::Moles => write!(f, "mol"),
        }
    }
}

/// amount of a substance supplied by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownAmount {
    pub value: f64,
    pub unit: AmountUnit,
    pub formula: String,
}

impl KnownAmount {
    pub fn new(value: f64, unit: AmountUnit, formula: &str) -> Self {
        Self {
            value,
            unit,
            formula: formula.to_string(),
        }
    }

    pub fn grams(value: f64, formula: &str) -> Self {
        Self::new(value, AmountUnit::Grams, formula)
    }

    pub fn moles(value: f64, formula: &str) -> Self {
        Self::new(value, AmountUnit::Moles, formula)
    }

    /// parses user input in the form "[number] [g/mol]", e.g. "25 g" or "0.5 mol"
    pub fn parse(input: &str, formula: &str) -> Result<Self, StoichError> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let invalid = || StoichError::InvalidExpression(input.trim().to_string());
        let [number, unit] = parts.as_slice() else {
            return Err(invalid());
        };
        let value: f64 = number.parse().map_err(|_| invalid())?;
        Ok(Self::new(value, unit.parse()?, formula))
    }

    // moles and mass of the substance
    fn resolve(&self, molar_mass: f64) -> (f64, f64) {
        match self.unit {
            AmountUnit::Grams => (self.value / molar_mass, self.value),
            AmountUnit::Moles => (self.value, self.value * molar_mass),
        }
    }
}

/// Calculated state of one substance. Excess fields are set only for the side
/// whose amounts were supplied (reactants for `compute`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesState {
    pub formula: String,
    pub coefficient: u64,
    pub molar_mass: f64,
    pub moles: f64,
    pub mass: f64,
    pub excess_moles: Option<f64>,
    pub excess_mass: Option<f64>,
}

impl SpeciesState {
    /// mass that actually takes part in the reaction
    pub fn reacted_mass(&self) -> f64 {
        self.mass - self.excess_mass.unwrap_or(0.0)
    }

    pub fn reacted_moles(&self) -> f64 {
        self.moles - self.excess_moles.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoichiometryReport {
    /// the equation itself, as balanced
    pub equation: String,
    pub reactants: Vec<SpeciesState>,
    pub products: Vec<SpeciesState>,
    /// the substance with the smallest moles/coefficient ratio. For `compute_from_products`
    /// this is the product which limits the yield
    pub limiting_reagent: String,
    /// extent of reaction, mol
    pub rxn_count: f64,
}

impl StoichiometryReport {
    pub fn get(&self, formula: &str) -> Option<&SpeciesState> {
        self.reactants
            .iter()
            .chain(self.products.iter())
            .find(|s| s.formula == formula)
    }

    /// formula -> state for every substance of the equation
    pub fn species_map(&self) -> HashMap<String, SpeciesState> {
        self.reactants
            .iter()
            .chain(self.products.iter())
            .map(|s| (s.formula.clone(), s.clone()))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// working record before the extent of reaction is known
struct Pending {
    formula: String,
    coefficient: u64,
    molar_mass: f64,
    known: Option<(f64, f64)>,
}

/// Calculate moles and masses of all substances of the equation from the known amounts of
/// some reactants.
///
/// # Examples
/// ```
/// use StoichKit::Stoichiometry::equation_balancer::balance;
/// use StoichKit::Stoichiometry::molmass::PeriodicTable;
/// use StoichKit::Stoichiometry::stoichiometry_calculator::{compute, KnownAmount};
/// let equation = balance(&["H2", "O2"], &["H2O"]).unwrap();
/// let known = vec![KnownAmount::moles(4.0, "H2"), KnownAmount::moles(1.0, "O2")];
/// let report = compute(&equation, &known, &PeriodicTable::new()).unwrap();
/// assert_eq!(report.limiting_reagent, "O2");
/// ```
pub fn compute<L: MolarMassLookup + ?Sized>(
    equation: &BalancedEquation,
    known_amounts: &[KnownAmount],
    lookup: &L,
) -> Result<StoichiometryReport, StoichError> {
    if known_amounts.is_empty() {
        return Err(StoichError::NoKnownAmounts);
    }
    let mut seen = HashSet::new();
    for term in equation.reactants.iter().chain(equation.products.iter()) {
        if !seen.insert(term.formula.text.as_str()) {
            return Err(StoichError::DuplicateSpecies(term.formula.text.clone()));
        }
    }

    let molar_mass_of = |formula: &str| -> Result<f64, StoichError> {
        match lookup.molar_mass(formula) {
            Some(m) if m.is_finite() && m > 0.0 => Ok(m),
            _ => Err(StoichError::UnknownSpecies(formula.to_string())),
        }
    };
    let mut reactants = equation
        .reactants
        .iter()
        .map(|t| {
            Ok(Pending {
                formula: t.formula.text.clone(),
                coefficient: t.coefficient,
                molar_mass: molar_mass_of(&t.formula.text)?,
                known: None,
            })
        })
        .collect::<Result<Vec<_>, StoichError>>()?;
    let products = equation
        .products
        .iter()
        .map(|t| Ok((t, molar_mass_of(&t.formula.text)?)))
        .collect::<Result<Vec<_>, StoichError>>()?;

    for amount in known_amounts {
        let reactant = reactants
            .iter_mut()
            .find(|r| r.formula == amount.formula)
            .ok_or_else(|| StoichError::InvalidInputSpecies(amount.formula.clone()))?;
        if !amount.value.is_finite() || amount.value < 0.0 {
            return Err(StoichError::InvalidAmount {
                formula: amount.formula.clone(),
                value: amount.value,
            });
        }
        if reactant.known.is_some() {
            return Err(StoichError::DuplicateAmount(amount.formula.clone()));
        }
        reactant.known = Some(amount.resolve(reactant.molar_mass));
    }

    // limiting reagent: smallest moles/coefficient, ties go to the smallest formula
    let (rxn_count, limiting_reagent) = reactants
        .iter()
        .filter_map(|r| {
            r.known
                .map(|(moles, _)| (moles / r.coefficient as f64, r.formula.as_str()))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)))
        .map(|(ratio, formula)| (ratio, formula.to_string()))
        .ok_or(StoichError::NoKnownAmounts)?;

    let reactants = reactants
        .into_iter()
        .map(|r| {
            let required = r.coefficient as f64 * rxn_count;
            let (moles, mass) = r.known.unwrap_or((required, required * r.molar_mass));
            let excess_moles = if r.formula == limiting_reagent {
                0.0
            } else {
                // negative values may only come from rounding
                (moles - required).max(0.0)
            };
            SpeciesState {
                excess_mass: Some(excess_moles * r.molar_mass),
                excess_moles: Some(excess_moles),
                formula: r.formula,
                coefficient: r.coefficient,
                molar_mass: r.molar_mass,
                moles,
                mass,
            }
        })
        .collect();

    let products = products
        .into_iter()
        .map(|(t, molar_mass)| {
            let moles = t.coefficient as f64 * rxn_count;
            SpeciesState {
                formula: t.formula.text.clone(),
                coefficient: t.coefficient,
                molar_mass,
                moles,
                mass: moles * molar_mass,
                excess_moles: None,
                excess_mass: None,
            }
        })
        .collect();

    Ok(StoichiometryReport {
        equation: equation.to_string(),
        reactants,
        products,
        limiting_reagent,
        rxn_count,
    })
}

/// Same as `compute` but the known amounts are given for products: how much of every reactant
/// is needed to obtain them. The report keeps reactants and products in their places,
/// excess values are reported for products.
pub fn compute_from_products<L: MolarMassLookup + ?Sized>(
    equation: &BalancedEquation,
    known_amounts: &[KnownAmount],
    lookup: &L,
) -> Result<StoichiometryReport, StoichError> {
    let reversed = compute(&equation.reversed(), known_amounts, lookup)?;
    Ok(StoichiometryReport {
        equation: equation.to_string(),
        reactants: reversed.products,
        products: reversed.reactants,
        limiting_reagent: reversed.limiting_reagent,
        rxn_count: reversed.rxn_count,
    })
}
