use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
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
    // SBP_PAYMENT_SECRET is deliberately absent
    const DISPLAY_ENVS: [&str; 11] = [
        "RUST_LOG",
        "SBP_HOST",
        "SBP_PORT",
        "SBP_DATABASE_URL",
        "SBP_MAX_DB_CONNECTIONS",
        "SBP_NOTIFICATION_URL",
        "SBP_NOTIFICATION_TIMEOUT_SECS",
        "SBP_STORAGE_RETRIES",
        "SBP_RETRY_BASE_DELAY_MS",
        "SBP_DEFAULT_FORM_TYPE",
        "SBP_FALLBACK_PATH",
    ];

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
