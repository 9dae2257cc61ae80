use super::cli_balancer::read_line;
use crate::settings::Settings;
use log::{info, warn};
use std::io::{self, BufRead, Write};

fn show_settings_menu<W: Write>(output: &mut W, settings: &Settings) -> io::Result<()> {
    writeln!(output, "\n=== Settings ({}) ===", settings.config_file())?;
    writeln!(output, "decimal places: {}", settings.config.decimal_places)?;
    let mut overrides: Vec<_> = settings.config.atomic_mass_overrides.iter().collect();
    overrides.sort_by(|a, b| a.0.cmp(b.0));
    for (element, mass) in overrides {
        writeln!(output, "atomic mass of {}: {}", element, mass)?;
    }
    writeln!(output, "\x1b[33m1. Set atomic mass\x1b[0m")?;
    writeln!(output, "\x1b[33m2. Set decimal places\x1b[0m")?;
    writeln!(output, "\x1b[33m3. Save settings\x1b[0m")?;
    writeln!(output, "\x1b[33m0. Back\x1b[0m")?;
    write!(output, "\x1b[36mEnter your choice: \x1b[0m")?;
    output.flush()
}

// "Xx 100.5" -> atomic mass override
fn set_atomic_mass<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    settings: &mut Settings,
) -> io::Result<()> {
    write!(output, "Element and atomic mass, e.g. \"Xx 100.5\":  ")?;
    output.flush()?;
    let Some(line) = read_line(input)? else {
        return Ok(());
    };
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [element, mass] = parts.as_slice() else {
        writeln!(output, "Error: Invalid expression ({})", line)?;
        return Ok(());
    };
    let Ok(mass) = mass.parse::<f64>() else {
        writeln!(output, "Error: '{}' is not a number", mass)?;
        return Ok(());
    };
    match settings.set_atomic_mass(element, mass) {
        Ok(()) => info!("atomic mass of {} set to {}", element, mass),
        Err(e) => writeln!(output, "Error: {}", e)?,
    }
    Ok(())
}

fn set_decimal_places<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    settings: &mut Settings,
) -> io::Result<()> {
    write!(output, "Decimal places:  ")?;
    output.flush()?;
    let Some(line) = read_line(input)? else {
        return Ok(());
    };
    match line.parse::<usize>() {
        Ok(places) => settings.config.decimal_places = places,
        Err(_) => writeln!(output, "Error: '{}' is not a number of decimal places", line)?,
    }
    Ok(())
}

/// view and change the configuration, optionally writing it to the config file
pub fn settings_menu<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    settings: &mut Settings,
) -> io::Result<()> {
    loop {
        show_settings_menu(output, settings)?;
        let Some(choice) = read_line(input)? else {
            break;
        };
        match choice.as_str() {
            "1" => set_atomic_mass(input, output, settings)?,
            "2" => set_decimal_places(input, output, settings)?,
            "3" => match settings.save_config() {
                Ok(()) => writeln!(output, "Settings saved to {}", settings.config_file())?,
                Err(e) => {
                    warn!("settings are not saved: {}", e);
                    writeln!(output, "Error: {}", e)?;
                }
            },
            "0" => break,
            _ => writeln!(output, "Invalid option")?,
        }
    }
    Ok(())
}
