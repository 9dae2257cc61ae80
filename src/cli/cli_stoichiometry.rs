use super::cli_balancer::{read_equation, read_line};
use crate::Stoichiometry::equation_balancer::BalancedEquation;
use crate::Stoichiometry::stoichiometry_calculator::{
    KnownAmount, compute, compute_from_products,
};
use crate::settings::Settings;
use log::{info, warn};
use std::io::{self, BufRead, Write};

// answers meaning "yes"
const YES_STRS: [&str; 6] = ["yes", "yee", "yup", "yep", "y", "yeehaw"];

/// Asks for amounts of every substance of one side of the equation in the form "[number] [g/mol]".
/// Empty input skips the substance, malformed input is reported and skipped
fn read_amounts<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    formulae: &[String],
) -> io::Result<Vec<KnownAmount>> {
    let mut amounts = Vec::new();
    for formula in formulae {
        write!(output, "{}  ", formula)?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        match KnownAmount::parse(&line, formula) {
            Ok(amount) => amounts.push(amount),
            Err(e) => writeln!(output, "Error: Invalid expression ({})", e)?,
        }
    }
    Ok(amounts)
}

/// Repeated calculations on one equation until the user declines. Returns false at the end of input
fn equation_loop<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    equation: &BalancedEquation,
    settings: &Settings,
) -> io::Result<bool> {
    let table = settings.periodic_table();
    let decimal_places = settings.config.decimal_places;
    loop {
        write!(output, "Would you like to input reactants (r) or products (p)?  ")?;
        output.flush()?;
        let Some(answer) = read_line(input)? else {
            return Ok(false);
        };
        let input_products = matches!(answer.to_lowercase().as_str(), "products" | "p");
        let side: Vec<String> = if input_products {
            equation.products.iter().map(|t| t.formula.text.clone()).collect()
        } else {
            equation.reactants.iter().map(|t| t.formula.text.clone()).collect()
        };

        writeln!(
            output,
            "\nPlease name the amount for each of the {} in the format \"[number] [g/mol]\".",
            if input_products { "products" } else { "reactants" }
        )?;
        let amounts = read_amounts(input, output, &side)?;
        if amounts.is_empty() {
            writeln!(output, "Error: You must name at least one amount")?;
            continue;
        }
        writeln!(output)?;

        let result = if input_products {
            compute_from_products(equation, &amounts, &table)
        } else {
            compute(equation, &amounts, &table)
        };
        match result {
            Ok(report) => {
                info!(
                    "{}: limiting {}, extent {}",
                    report.equation, report.limiting_reagent, report.rxn_count
                );
                report.write_report(output, decimal_places)?;
            }
            Err(e) => {
                warn!("stoichiometry of {} failed: {}", equation, e);
                writeln!(output, "Error: {}\n", e)?;
                continue;
            }
        }

        write!(
            output,
            "\n\nWould you like continue using the same chemical equation?  "
        )?;
        output.flush()?;
        let Some(again) = read_line(input)? else {
            return Ok(false);
        };
        if !YES_STRS.contains(&again.to_lowercase().as_str()) {
            return Ok(true);
        }
    }
}

/// one equation with any number of stoichiometric calculations on it
pub fn stoichiometry_session<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    settings: &Settings,
) -> io::Result<()> {
    writeln!(output, "\n=== Stoichiometry Solver ===")?;
    writeln!(
        output,
        "Next, you will input the amount in the format \"[number] [unit]\" for each of the reactants/products. Leave the input blank if there is the perfect amount needed.\n"
    )?;
    let Some(equation) = read_equation(input, output)? else {
        return Ok(());
    };
    writeln!(output, "{}", equation)?;
    if equation_loop(input, output, &equation, settings)? {
        writeln!(output, "\n{}\n", "-".repeat(80))?;
    }
    Ok(())
}
