//! Kinds command handler

use std::path::Path;

use anyhow::Result;

use chatlens::analyzer::{AnalysisKind, Router};
use chatlens::AnalyzerService;

use super::load_config;

/// List analysis kinds with their backend role and description.
#[cfg(not(tarpaulin_include))]
pub fn handle(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let service = AnalyzerService::from_config_with_env(&config, |_| None);
    print!("{}", kinds_table(service.router()));
    Ok(())
}

/// One line per kind: name, alias, role, token budget, description.
pub fn kinds_table(router: &Router) -> String {
    let mut out = format!(
        "{:<12} {:<16} {:<10} {:>6}  {}\n",
        "KIND", "ALIAS", "BACKEND", "TOKENS", "DESCRIPTION"
    );
    for kind in AnalysisKind::all() {
        let route = router.route(*kind);
        out.push_str(&format!(
            "{:<12} {:<16} {:<10} {:>6}  {}\n",
            kind.as_str(),
            kind.alias(),
            route.role.to_string(),
            route.max_output_tokens,
            kind.description()
        ));
    }
    out
}
