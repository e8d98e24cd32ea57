//! # Nodewatch Receiver
//!
//! Assina o tópico MQTT em que os nós sensores publicam o frame de texto,
//! decodifica cada frame e mantém a última leitura de cada nó (1–4).
//!
//! ## Uso
//! ```bash
//! nodewatch_receiver                       # config.toml ao lado do executável
//! nodewatch_receiver --config outro.toml   # caminho explícito
//! ```

mod ingest;
mod net_thread;
mod report;

use anyhow::{Context, bail};
use nodewatch_core::config::AppConfig;
use nodewatch_core::store::LatestReadings;
use std::path::PathBuf;
use tracing::{error, warn};

fn main() -> anyhow::Result<()> {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Config ──
    let config_path = config_path_from_args()?;
    let config = AppConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        bail!("Configuração inválida ({} erro(s))", errors.len());
    }

    // ── MQTT ──
    let rx = net_thread::spawn_receiver_thread(&config.broker)
        .context("Falha ao criar thread MQTT")?;

    // ── Loop principal ──
    let store = LatestReadings::new();
    let stats = ingest::run(&store, &rx, &config);

    // A thread MQTT só solta o channel se morrer
    bail!(
        "Thread MQTT encerrada inesperadamente ({} aplicados, {} ignorados, {} rejeitados)",
        stats.applied,
        stats.ignored,
        stats.rejected
    )
}

/// Lê `--config <path>` dos argumentos; sem ele usa o caminho padrão.
fn config_path_from_args() -> anyhow::Result<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args.next().context("--config requer um caminho")?;
            return Ok(PathBuf::from(path));
        }
    }
    Ok(AppConfig::default_path())
}
