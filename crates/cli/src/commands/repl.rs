use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;
use permia_core::{AssistantConfig, Role};

use super::{build_assistant, load_catalog, render_result, render_status};

/// Interactive loop over one session history. `:estado` prints the engine
/// diagnostics, `:salir` (or end of input) leaves.
pub async fn run(
    config: &AssistantConfig,
    role: &str,
    catalog_path: Option<&Path>,
) -> anyhow::Result<()> {
    let role: Role = role.parse().context("invalid --role value")?;
    let catalog = load_catalog(role, catalog_path)?;
    let mut assistant = build_assistant(config, role, catalog)?;

    println!(
        "Asistente de permisos Art. 11 ({}). Escribe tu consulta, :estado o :salir.",
        role.label()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().context("could not flush stdout")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("could not read from stdin")?;
        let query = line.trim();

        match query {
            "" => continue,
            ":salir" | ":exit" | ":q" => break,
            ":estado" => {
                println!("{}", render_status(&assistant.status()));
                continue;
            }
            _ => {}
        }

        let result = assistant.process_query(query).await;
        println!("{}\n", render_result(&result));
    }

    Ok(())
}
