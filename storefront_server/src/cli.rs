use std::{env, env::VarError};

/// The server takes no arguments. Passing any prints the help text and the current settings instead of starting.
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
    // Listed explicitly so that nothing unexpected from the environment is echoed
    const DISPLAY_ENVS: [&str; 12] = [
        "RUST_LOG",
        "SF_HOST",
        "SF_PORT",
        "SF_DATABASE_URL",
        "SF_DB_MAX_CONNECTIONS",
        "SF_DB_TIMEOUT",
        "SF_DEV_MODE",
        "SF_STRICT_TRANSITIONS",
        "SF_MAX_UNIT_PRICE",
        "SF_MAX_LINE_QUANTITY",
        "SF_IDEMPOTENCY_WINDOW",
        "SF_RUN_MIGRATIONS",
    ];

    println!("Current environment values:");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
