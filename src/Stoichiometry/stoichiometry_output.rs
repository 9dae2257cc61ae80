//! # Pretty Printing of Stoichiometric Results
//!
//! Formatted tables of reactants and products of a [`StoichiometryReport`],
//! built with prettytable. Tables are returned as values so that the caller decides
//! where they go; `write_report` puts the whole summary into any writer.

use super::stoichiometry_calculator::{SpeciesState, StoichiometryReport};
use prettytable::{Cell, Row, Table, row};
use std::io::{self, Write};

fn fmt_value(value: f64, decimal_places: usize) -> String {
    format!("{:.*}", decimal_places, value)
}

fn fmt_option(value: Option<f64>, decimal_places: usize) -> String {
    value
        .map(|v| fmt_value(v, decimal_places))
        .unwrap_or_else(|| "-".to_string())
}

impl StoichiometryReport {
    fn species_table(species: &[SpeciesState], decimal_places: usize) -> Table {
        let mut table = Table::new();
        table.add_row(row![
            "Formula",
            "Coefficient",
            "Molar mass, g/mol",
            "Moles, mol",
            "Mass, g",
            "Excess moles, mol",
            "Excess mass, g"
        ]);
        for s in species {
            table.add_row(Row::new(vec![
                Cell::new(&s.formula),
                Cell::new(&s.coefficient.to_string()),
                Cell::new(&fmt_value(s.molar_mass, decimal_places)),
                Cell::new(&fmt_value(s.moles, decimal_places)),
                Cell::new(&fmt_value(s.mass, decimal_places)),
                Cell::new(&fmt_option(s.excess_moles, decimal_places)),
                Cell::new(&fmt_option(s.excess_mass, decimal_places)),
            ]));
        }
        table
    }

    /// Table columns: formula, coefficient, molar mass, moles, mass, excess moles and mass
    pub fn reactants_table(&self, decimal_places: usize) -> Table {
        Self::species_table(&self.reactants, decimal_places)
    }

    /// Same columns as for reactants, excess is "-" unless amounts were given for products
    pub fn products_table(&self, decimal_places: usize) -> Table {
        Self::species_table(&self.products, decimal_places)
    }

    /// limiting reagent and extent of reaction followed by both tables
    pub fn write_report<W: Write>(&self, output: &mut W, decimal_places: usize) -> io::Result<()> {
        writeln!(
            output,
            "Limiting: {}, extent of reaction: {} mol",
            self.limiting_reagent,
            fmt_value(self.rxn_count, decimal_places)
        )?;
        writeln!(output, "Reactants:\n{}", self.reactants_table(decimal_places))?;
        writeln!(output, "Products:\n{}", self.products_table(decimal_places))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::Stoichiometry::equation_balancer::balance;
    use crate::Stoichiometry::molmass::PeriodicTable;
    use crate::Stoichiometry::stoichiometry_calculator::{KnownAmount, compute};

    #[test]
    fn test_tables() {
        let eq = balance(&["H2", "O2"], &["H2O"]).unwrap();
        let known = vec![KnownAmount::moles(4.0, "H2"), KnownAmount::moles(1.0, "O2")];
        let report = compute(&eq, &known, &PeriodicTable::new()).unwrap();

        let reactants = report.reactants_table(2);
        assert_eq!(reactants.len(), 3);
        let text = reactants.to_string();
        assert!(text.contains("H2"));
        assert!(text.contains("4.00"));
        // excess of H2: 2 mol
        assert!(text.contains("2.00"));

        let products = report.products_table(3).to_string();
        assert!(products.contains("36.030"));
        assert!(products.contains(" - "));
    }

    #[test]
    fn test_write_report() {
        let eq = balance(&["N2", "H2"], &["NH3"]).unwrap();
        let known = vec![KnownAmount::grams(28.014, "N2"), KnownAmount::moles(6.0, "H2")];
        let report = compute(&eq, &known, &PeriodicTable::new()).unwrap();
        let mut output = Vec::new();
        report.write_report(&mut output, 3).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("Limiting: N2, extent of reaction: 1.000 mol"));
        assert!(text.contains("Reactants:"));
        assert!(text.contains("Products:"));
        assert!(text.contains("NH3"));
    }
}
