pub mod cli_balancer;
pub mod cli_main;
pub mod cli_settings;
pub mod cli_stoichiometry;
