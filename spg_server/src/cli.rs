use std::{env, env::VarError};

// Listed explicitly so that secrets are never printed
const DISPLAY_ENVS: [&str; 11] = [
    "RUST_LOG",
    "SPG_HOST",
    "SPG_PORT",
    "SPG_DATABASE_URL",
    "SPG_PUBLIC_URL",
    "SPG_GATEWAY_PUBLIC_KEY",
    "SPG_GATEWAY_SANDBOX",
    "SPG_GATEWAY_CURRENCY",
    "SPG_GATEWAY_CHECKOUT_URL",
    "SPG_GATEWAY_API_VERSION",
    "SPG_GATEWAY_SIGNATURE_ALGORITHM",
];

/// The server is configured through the environment only. Any argument prints the help text and the current
/// (non-secret) settings, and returns `true` so that `main` exits without starting the server.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
