/// Parser of chemical formulae with nested brackets: "Ca3(PO4)2" -> {"Ca": 3, "P": 2, "O": 8}
///
///  # Examples
/// ```
/// use StoichKit::Stoichiometry::formula_parser::parse_formula;
/// let atomic_composition = parse_formula("(NH4)3PO4").unwrap();
/// assert_eq!(atomic_composition, parse_formula("N3H12PO4").unwrap());
/// ```
pub mod formula_parser;

/// Module to calculate the molar mass of a chemical formula and the element composition matrix.
/// The stoichiometry calculator gets molar masses through the MolarMassLookup trait,
/// PeriodicTable is the built-in implementation
///
///  # Examples
/// ```
/// use StoichKit::Stoichiometry::molmass::{MolarMassLookup, PeriodicTable};
/// let molar_mass = PeriodicTable::new().molar_mass("C6H8O6").unwrap();
/// println!("Molar mass: {:?} g/mol", molar_mass);
/// ```
pub mod molmass;

/// exact fractions for the balancer
pub mod rational;

/// eng
/// The module takes as input vectors of formulae of reactants and products and finds the smallest
/// positive integer stoichiometric coefficients. The linear system of element balances is solved exactly,
/// the result does not depend on the order of elements, only on the order of substances given by the user.
/// Errors: invalid formula, empty equation, elements of reactants and products do not match,
/// no unique balance, no balance with positive coefficients
/// ru
/// Модуль берет на вход векторы формул реагентов и продуктов и находит наименьшие
/// положительные целые стехиометрические коэффициенты. Система уравнений баланса элементов решается точно,
/// в рациональных числах.
///
///  # Examples
/// ```
/// use StoichKit::Stoichiometry::equation_balancer::balance;
/// let equation = balance(&["Al2(CO3)3", "H3PO4"], &["AlPO4", "CO2", "H2O"]).unwrap();
/// assert_eq!(equation.to_string(), "Al2(CO3)3 + 2H3PO4 --> 2AlPO4 + 3CO2 + 3H2O");
/// ```
pub mod equation_balancer;

/// Limiting reagent, extent of reaction, moles, masses and excess of every substance of a balanced
/// equation from known masses or moles of some reactants (or products)
///
///  # Examples
/// ```
/// use StoichKit::Stoichiometry::equation_balancer::balance;
/// use StoichKit::Stoichiometry::molmass::PeriodicTable;
/// use StoichKit::Stoichiometry::stoichiometry_calculator::{compute, KnownAmount};
/// let equation = balance(&["HCl", "KMnO4"], &["Cl2", "KCl", "MnCl2", "H2O"]).unwrap();
/// let known = vec![KnownAmount::grams(25.0, "KMnO4"), KnownAmount::grams(85.0, "HCl")];
/// let report = compute(&equation, &known, &PeriodicTable::new()).unwrap();
/// let mut table_text = Vec::new();
/// report.write_report(&mut table_text, 4).unwrap();
/// assert!(String::from_utf8(table_text).unwrap().contains("Cl2"));
/// ```
pub mod stoichiometry_calculator;

/// tables of results
pub mod stoichiometry_output;
