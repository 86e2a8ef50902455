//! Config subcommands handler

use std::path::Path;

use anyhow::Result;

use super::{config_path, load_config};

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("# {}", config_path(path)?.display());
    print!("{}", toml_str);
    Ok(())
}

/// Print the configuration file path, noting when it does not exist yet.
#[cfg(not(tarpaulin_include))]
pub fn handle_path(path: Option<&Path>) -> Result<()> {
    let path = config_path(path)?;
    if path.exists() {
        println!("{}", path.display());
    } else {
        println!("{} (not created, defaults in use)", path.display());
    }
    Ok(())
}
