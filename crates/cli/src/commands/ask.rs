use std::path::Path;

use anyhow::Context;
use permia_core::{AssistantConfig, Role};

use super::{build_assistant, load_catalog, render_result, render_status};

pub async fn run(
    config: &AssistantConfig,
    role: &str,
    catalog_path: Option<&Path>,
    query: &str,
) -> anyhow::Result<()> {
    let role: Role = role.parse().context("invalid --role value")?;
    let catalog = load_catalog(role, catalog_path)?;
    let mut assistant = build_assistant(config, role, catalog)?;

    let result = assistant.process_query(query).await;
    println!("{}", render_result(&result));
    println!("\n{}", render_status(&assistant.status()));
    Ok(())
}
