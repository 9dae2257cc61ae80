use StoichKit::cli::cli_main::run_interactive_menu;
use StoichKit::settings::Settings;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

pub fn main() {
    let mut settings = Settings::new();
    let log_config = ConfigBuilder::new().set_time_level(log::LevelFilter::Off).build();
    if let Err(e) = TermLogger::init(
        settings.config.level_filter(),
        log_config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("logger is not initialised: {}", e);
    }
    log::info!("settings file: {}", settings.config_file());
    if let Err(e) = run_interactive_menu(&mut settings) {
        log::error!("terminal input/output failed: {}", e);
    }
}
