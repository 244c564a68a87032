use std::env::{self, VarError};

const HELP: &str = include_str!("./cli-help.txt");

/// Only these variables are echoed back. The process environment can hold unrelated credentials, so it is never
/// dumped wholesale.
const CONFIG_ENVS: [&str; 11] = [
    "RUST_LOG",
    "DRINKS_HOST",
    "DRINKS_PORT",
    "DRINKS_DATABASE_URL",
    "DRINKS_RESET_DATABASE",
    "DRINKS_AUTH0_DOMAIN",
    "DRINKS_API_AUDIENCE",
    "DRINKS_JWKS_URL",
    "DRINKS_JWKS_CACHE_TTL",
    "DRINKS_JWKS_TIMEOUT",
    "DRINKS_TOKEN_LEEWAY",
];

/// The server takes no arguments. Any argument at all prints the help and the current configuration, and the caller
/// should exit instead of starting the server.
pub fn handle_command_line_args() -> bool {
    if env::args().len() <= 1 {
        return false;
    }
    println!("\n{HELP}\n");
    println!("Current configuration:");
    for (name, value) in config_summary() {
        println!("  {name:<30} {value}");
    }
    true
}

fn config_summary() -> Vec<(&'static str, String)> {
    CONFIG_ENVS
        .iter()
        .map(|&name| {
            let value = match env::var(name) {
                Ok(s) => s,
                Err(VarError::NotPresent) => "Not set".into(),
                Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
            };
            (name, value)
        })
        .collect()
}
