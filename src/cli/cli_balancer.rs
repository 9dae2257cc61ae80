use crate::Stoichiometry::equation_balancer::{BalancedEquation, balance};
use log::{info, warn};
use std::io::{self, BufRead, Write};

/// reads one line, None at the end of input
pub(crate) fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Numbered prompts "1  ", "2  ", ... until an empty line
pub fn formula_list_from_inputs<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Vec<String>> {
    let mut formula_list = Vec::new();
    loop {
        write!(output, "{}  ", formula_list.len() + 1)?;
        output.flush()?;
        match read_line(input)? {
            Some(formula) if !formula.is_empty() => formula_list.push(formula),
            _ => break,
        }
    }
    Ok(formula_list)
}

/// Asks for reactants and products and balances the equation. Errors of balancing are
/// reported to the user and give None
pub fn read_equation<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<BalancedEquation>> {
    writeln!(
        output,
        "Please name the reactants. To finish, press enter with an empty string."
    )?;
    let reactants = formula_list_from_inputs(input, output)?;
    writeln!(
        output,
        "Please name the products. To finish, press enter with an empty string."
    )?;
    let products = formula_list_from_inputs(input, output)?;
    writeln!(output)?;

    match balance(&reactants, &products) {
        Ok(equation) => {
            info!("balanced: {}", equation);
            Ok(Some(equation))
        }
        Err(e) => {
            warn!("balancing of {:?} --> {:?} failed: {}", reactants, products, e);
            writeln!(output, "Error: {}\n", e)?;
            Ok(None)
        }
    }
}

/// one round of the equation balancer
pub fn balancer_session<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<()> {
    writeln!(output, "\n=== Chemical Equation Balancer ===")?;
    writeln!(
        output,
        "After inputting the chemical formulas for the reactants and the products, a string representing the balanced chemical equation will be given.\n"
    )?;
    if let Some(equation) = read_equation(input, output)? {
        writeln!(output, "{}\n\n{}\n", equation, "-".repeat(80))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_balancer_session() {
        let mut input = Cursor::new("CH4\nO2\n\nCO2\nH2O\n\n");
        let mut output = Vec::new();
        balancer_session(&mut input, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("CH4 + 2O2 --> CO2 + 2H2O"));
    }

    #[test]
    fn test_invalid_equation_is_reported() {
        let mut input = Cursor::new("Fe\n\nO2\n\n");
        let mut output = Vec::new();
        let equation = read_equation(&mut input, &mut output).unwrap();
        assert!(equation.is_none());
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Error: elements of reactants and products do not match"));
    }

    #[test]
    fn test_formula_list_stops_at_end_of_input() {
        let mut input = Cursor::new("H2\nO2");
        let mut output = Vec::new();
        let list = formula_list_from_inputs(&mut input, &mut output).unwrap();
        assert_eq!(list, vec!["H2".to_string(), "O2".to_string()]);
    }
}
