use permia_core::config::LogFormat;
use permia_core::AssistantConfig;
use serde_json::json;

/// Prints the effective configuration after file, env and flag overrides.
/// Credentials are reported as a count only.
pub fn run(config: &AssistantConfig) -> anyhow::Result<()> {
    let payload = json!({
        "generation": {
            "model": config.generation.model,
            "api_keys": format!("<redacted: {} configured>", config.generation.credentials.len()),
            "request_timeout_secs": config.generation.request_timeout_secs,
            "rotation_pause_ms": config.generation.rotation_pause_ms,
        },
        "logging": {
            "level": config.logging.level,
            "format": match config.logging.format {
                LogFormat::Compact => "compact",
                LogFormat::Pretty => "pretty",
                LogFormat::Json => "json",
            },
        },
    });

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use permia_core::AssistantConfig;

    use super::run;

    #[test]
    fn default_config_renders_without_secrets() {
        run(&AssistantConfig::default()).expect("render should succeed");
    }
}
