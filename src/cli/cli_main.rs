use super::cli_balancer::{balancer_session, read_line};
use super::cli_settings::settings_menu;
use super::cli_stoichiometry::stoichiometry_session;
use crate::settings::Settings;
use std::io::{self, BufRead, Write};

pub fn run_interactive_menu(settings: &mut Settings) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    menu_loop(&mut input, &mut output, settings)
}

/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options (1, 2, 3, 0)

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(
        output,
        "\x1b[34m\n Welcome to StoichKit: chemical equation balancer and stoichiometry solver \n \x1b[0m"
    )?;
    writeln!(output, "\x1b[33m1. Balance chemical equation\x1b[0m")?;
    writeln!(output, "\x1b[33m2. Stoichiometry\x1b[0m")?;
    writeln!(output, "\x1b[33m3. Settings\x1b[0m")?;
    writeln!(output, "\x1b[33m0. Exit\x1b[0m")?;
    write!(output, "\x1b[36mEnter your choice: \x1b[0m")?;
    output.flush()
}

pub fn menu_loop<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    settings: &mut Settings,
) -> io::Result<()> {
    loop {
        show_main_menu(output)?;
        let Some(choice) = read_line(input)? else {
            break;
        };
        match choice.as_str() {
            "1" => balancer_session(input, output)?,
            "2" => stoichiometry_session(input, output, settings)?,
            "3" => settings_menu(input, output, settings)?,
            "0" => {
                writeln!(output, "Goodbye!")?;
                break;
            }
            _ => writeln!(output, "Invalid choice. Please try again.")?,
        }
    }
    Ok(())
}
