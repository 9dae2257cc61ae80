//! Balancing of chemical equations.
//!
//! The element balance of an equation with R reactants and P products is a homogeneous linear
//! system E x (R+P). Its solution space is one-dimensional for a properly written equation, so the
//! coefficient of the last product is fixed at 1, its column is moved to the right-hand side
//! and the remaining system is solved exactly over rationals by Gauss-Jordan elimination.
//! Clearing the denominators with their least common multiple gives the smallest
//! positive integer coefficients.
use crate::Stoichiometry::formula_parser::{Formula, ParseError};
use crate::Stoichiometry::molmass::create_elem_composition_matrix;
use crate::Stoichiometry::rational::{Rational, gcd, lcm};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BalanceError {
    #[error("invalid formula '{formula}': {source}")]
    InvalidFormula {
        formula: String,
        #[source]
        source: ParseError,
    },
    #[error("equation must have at least one reactant and one product")]
    EmptyEquation,
    #[error(
        "elements of reactants and products do not match (only in reactants: {reactants_only:?}, only in products: {products_only:?})"
    )]
    ElementMismatch {
        reactants_only: Vec<String>,
        products_only: Vec<String>,
    },
    #[error("equation has no unique balance")]
    NoUniqueSolution,
    #[error("equation can only be balanced with zero or negative coefficients")]
    NoPositiveSolution,
    #[error("stoichiometric coefficients are too large")]
    CoefficientOverflow,
}

/// a substance of the balanced equation with its stoichiometric coefficient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub coefficient: u64,
    pub formula: Formula,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coefficient == 1 {
            write!(f, "{}", self.formula)
        } else {
            write!(f, "{}{}", self.coefficient, self.formula)
        }
    }
}

/// Reactants and products in the order given by the user, each with its coefficient.
/// The element balance holds and the coefficients have no common divisor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancedEquation {
    pub reactants: Vec<Term>,
    pub products: Vec<Term>,
}

impl BalancedEquation {
    /// (coefficient, formula) pairs of reactants
    pub fn reactant_pairs(&self) -> Vec<(u64, &str)> {
        self.reactants
            .iter()
            .map(|t| (t.coefficient, t.formula.text.as_str()))
            .collect()
    }

    /// (coefficient, formula) pairs of products
    pub fn product_pairs(&self) -> Vec<(u64, &str)> {
        self.products
            .iter()
            .map(|t| (t.coefficient, t.formula.text.as_str()))
            .collect()
    }

    pub fn coefficients(&self) -> Vec<u64> {
        self.reactants
            .iter()
            .chain(self.products.iter())
            .map(|t| t.coefficient)
            .collect()
    }

    /// the same reaction read from right to left
    pub fn reversed(&self) -> BalancedEquation {
        BalancedEquation {
            reactants: self.products.clone(),
            products: self.reactants.clone(),
        }
    }

    /// checks the element balance: for every element the atoms of reactants times their
    /// coefficients must equal the atoms of products. A sum too large for u128 counts as unbalanced
    pub fn is_balanced(&self) -> bool {
        let formulae: Vec<&Formula> = self
            .reactants
            .iter()
            .chain(self.products.iter())
            .map(|t| &t.formula)
            .collect();
        let (matrix, _) = create_elem_composition_matrix(&formulae);
        let coefficients = self.coefficients();
        let n_reactants = self.reactants.len();
        let side_total = |row: usize, mut columns: std::ops::Range<usize>| -> Option<u128> {
            columns.try_fold(0u128, |acc, col| {
                let atoms = u128::try_from(matrix[(row, col)]).ok()?;
                acc.checked_add(atoms.checked_mul(u128::from(coefficients[col]))?)
            })
        };
        (0..matrix.nrows()).all(|row| {
            match (
                side_total(row, 0..n_reactants),
                side_total(row, n_reactants..formulae.len()),
            ) {
                (Some(left), Some(right)) => left == right,
                _ => false,
            }
        })
    }
}

impl fmt::Display for BalancedEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |terms: &[Term]| {
            terms
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(" + ")
        };
        write!(
            f,
            "{} --> {}",
            join(self.reactants.as_slice()),
            join(self.products.as_slice())
        )
    }
}

fn parse_all<S: AsRef<str>>(formulae: &[S]) -> Result<Vec<Formula>, BalanceError> {
    formulae
        .iter()
        .map(|f| {
            Formula::parse(f.as_ref()).map_err(|source| BalanceError::InvalidFormula {
                formula: f.as_ref().to_string(),
                source,
            })
        })
        .collect()
}

fn elements_of(formulae: &[Formula]) -> BTreeSet<String> {
    formulae
        .iter()
        .flat_map(|f| f.elements())
        .map(|el| el.to_string())
        .collect()
}

/// Find the smallest positive integer coefficients of the equation reactants --> products.
///
/// # Examples
/// ```
/// use StoichKit::Stoichiometry::equation_balancer::balance;
/// let equation = balance(&["CH4", "O2"], &["CO2", "H2O"]).unwrap();
/// assert_eq!(equation.to_string(), "CH4 + 2O2 --> CO2 + 2H2O");
/// ```
pub fn balance<S: AsRef<str>>(
    reactants: &[S],
    products: &[S],
) -> Result<BalancedEquation, BalanceError> {
    if reactants.is_empty() || products.is_empty() {
        return Err(BalanceError::EmptyEquation);
    }
    let reactants = parse_all(reactants)?;
    let products = parse_all(products)?;

    let reactant_elements = elements_of(&reactants);
    let product_elements = elements_of(&products);
    if reactant_elements != product_elements {
        return Err(BalanceError::ElementMismatch {
            reactants_only: reactant_elements
                .difference(&product_elements)
                .cloned()
                .collect(),
            products_only: product_elements
                .difference(&reactant_elements)
                .cloned()
                .collect(),
        });
    }

    let formulae: Vec<&Formula> = reactants.iter().chain(products.iter()).collect();
    let (composition, _elements) = create_elem_composition_matrix(&formulae);
    let n_reactants = reactants.len();
    let n = formulae.len();
    // reactant columns positive, product columns negative, the last product column
    // moved to the right-hand side, i.e. positive again
    let augmented = DMatrix::from_fn(composition.nrows(), n, |row, col| {
        let count = composition[(row, col)];
        if col < n_reactants || col == n - 1 {
            Rational::integer(count)
        } else {
            Rational::integer(-count)
        }
    });

    let mut solution = solve_augmented(augmented)?;
    // anchored coefficient of the last product
    solution.push(Rational::ONE);
    if !solution.iter().all(|x| x.is_positive()) {
        return Err(BalanceError::NoPositiveSolution);
    }

    let coefficients = clear_denominators(&solution)?;
    debug_assert_eq!(
        coefficients
            .iter()
            .fold(0i128, |acc, &c| gcd(acc, i128::from(c))),
        1
    );

    let mut coefficients = coefficients.into_iter();
    let mut attach = |formulae: Vec<Formula>| -> Vec<Term> {
        formulae
            .into_iter()
            .zip(coefficients.by_ref())
            .map(|(formula, coefficient)| Term {
                coefficient,
                formula,
            })
            .collect()
    };
    let reactants = attach(reactants);
    let products = attach(products);
    Ok(BalancedEquation {
        reactants,
        products,
    })
}

/// Gauss-Jordan elimination of an augmented matrix [A | b] with exact arithmetic.
/// Returns the solution of A x = b if it exists and is unique.
fn solve_augmented(mut m: DMatrix<Rational>) -> Result<Vec<Rational>, BalanceError> {
    let overflow = || BalanceError::CoefficientOverflow;
    let rows = m.nrows();
    let unknowns = m.ncols() - 1;
    let mut pivot_cols = Vec::with_capacity(unknowns);
    let mut pivot_row = 0;
    for col in 0..unknowns {
        if pivot_row == rows {
            break;
        }
        let Some(found) = (pivot_row..rows).find(|&r| !m[(r, col)].is_zero()) else {
            continue;
        };
        m.swap_rows(pivot_row, found);
        let pivot = m[(pivot_row, col)];
        for c in col..m.ncols() {
            m[(pivot_row, c)] = m[(pivot_row, c)].checked_div(pivot).ok_or_else(overflow)?;
        }
        for r in 0..rows {
            if r == pivot_row || m[(r, col)].is_zero() {
                continue;
            }
            let factor = m[(r, col)];
            for c in col..m.ncols() {
                let delta = factor
                    .checked_mul(m[(pivot_row, c)])
                    .ok_or_else(overflow)?;
                m[(r, c)] = m[(r, c)].checked_sub(delta).ok_or_else(overflow)?;
            }
        }
        pivot_cols.push(col);
        pivot_row += 1;
    }
    // rows without pivot must read 0 = 0, otherwise the system is inconsistent
    if (pivot_row..rows).any(|r| !m[(r, unknowns)].is_zero()) {
        return Err(BalanceError::NoUniqueSolution);
    }
    // a free unknown means more than one independent way to balance
    if pivot_cols.len() < unknowns {
        return Err(BalanceError::NoUniqueSolution);
    }
    let mut solution = vec![Rational::ZERO; unknowns];
    for (row, &col) in pivot_cols.iter().enumerate() {
        solution[col] = m[(row, unknowns)];
    }
    Ok(solution)
}

/// multiplies the vector by the lcm of denominators, the result is integral
fn clear_denominators(values: &[Rational]) -> Result<Vec<u64>, BalanceError> {
    let mut multiplier: i128 = 1;
    for x in values {
        multiplier = lcm(multiplier, x.denom()).ok_or(BalanceError::CoefficientOverflow)?;
    }
    values
        .iter()
        .map(|x| {
            x.numer()
                .checked_mul(multiplier / x.denom())
                .and_then(|c| u64::try_from(c).ok())
                .ok_or(BalanceError::CoefficientOverflow)
        })
        .collect()
}
