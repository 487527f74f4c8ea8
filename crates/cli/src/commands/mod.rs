pub mod ask;
pub mod config;
pub mod repl;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use permia_agent::client::GeminiClient;
use permia_agent::credentials::CredentialPool;
use permia_agent::pipeline::{Answer, Assistant, EngineStatus, QueryResult};
use permia_core::{AssistantConfig, Catalog, Role};

pub fn load_catalog(role: Role, path: Option<&Path>) -> anyhow::Result<Catalog> {
    match path {
        Some(path) => {
            let payload = std::fs::read_to_string(path)
                .with_context(|| format!("could not read catalog file `{}`", path.display()))?;
            Catalog::from_json(&payload)
                .with_context(|| format!("could not parse catalog file `{}`", path.display()))
        }
        None => Ok(permia_core::fixtures::demo_catalog(role)),
    }
}

pub fn build_assistant(
    config: &AssistantConfig,
    role: Role,
    catalog: Catalog,
) -> anyhow::Result<Assistant> {
    let pool = Arc::new(CredentialPool::new(config.generation.credentials.clone()));
    if pool.is_empty() {
        tracing::warn!("no generation credentials configured; answers degrade to local mode");
    }
    let client = GeminiClient::new(Duration::from_secs(config.generation.request_timeout_secs))
        .context("could not build the generation HTTP client")?;

    Ok(Assistant::new(
        role,
        Arc::new(catalog),
        pool,
        Arc::new(client),
        config.generation.model.clone(),
        Duration::from_millis(config.generation.rotation_pause_ms),
    ))
}

pub fn render_status(status: &EngineStatus) -> String {
    format!(
        "modelo={} claves={} peticiones={} rotaciones={} saturaciones={}",
        status.model,
        status.pool.pool_size,
        status.pool.total_requests,
        status.pool.rotations,
        status.pool.failures,
    )
}

pub fn render_result(result: &QueryResult) -> String {
    match result {
        QueryResult::Success(answer) => render_answer(answer),
        QueryResult::Error { message } => message.clone(),
    }
}

fn render_answer(answer: &Answer) -> String {
    let mut out = String::new();
    out.push_str(&format!("[{}] {}\n\n", answer.context_id, answer.interpretation_title));
    out.push_str(&answer.narrative);
    out.push('\n');

    if answer.show_card {
        out.push_str(&format!(
            "\n  Duración:      {}\n  Beneficiarios: {}\n  Condiciones:   {}\n  Acreditación:  {}\n",
            answer.operative.duration,
            answer.operative.beneficiaries,
            answer.operative.conditions,
            answer.operative.documentation,
        ));
    }

    out.push_str(&format!("\n{}", answer.next_step_hint));
    for option in &answer.clarification_options {
        out.push_str(&format!("\n  - {option}"));
    }
    out
}
