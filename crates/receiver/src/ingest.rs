//! Processamento de um frame recebido: decodifica, atualiza o store e
//! reporta alertas.

use crate::net_thread::FrameMessage;
use crate::report;
use crossbeam_channel::Receiver;
use nodewatch_core::alerts::{self, AlertLevel};
use nodewatch_core::config::AppConfig;
use nodewatch_core::protocol::{FrameAnomaly, decode_frame};
use nodewatch_core::store::LatestReadings;
use tracing::{debug, error, info, warn};

/// Resultado de um frame, para logs e testes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Frame sem nenhum grupo completo.
    Ignored,
    /// Store atualizado com `nodes` leituras.
    Applied { nodes: usize },
    /// Frame rejeitado, store intacto.
    Rejected,
}

/// Contagem de frames processados pelo loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub applied: u64,
    pub ignored: u64,
    pub rejected: u64,
}

/// Consome frames até a thread MQTT soltar o lado emissor do channel.
pub fn run(
    store: &LatestReadings,
    rx: &Receiver<FrameMessage>,
    config: &AppConfig,
) -> IngestStats {
    let mut stats = IngestStats::default();
    for msg in rx.iter() {
        match handle_frame(store, &msg, config) {
            Outcome::Applied { nodes } => {
                stats.applied += 1;
                debug!("{nodes} nó(s) atualizado(s)");
            }
            Outcome::Ignored => stats.ignored += 1,
            Outcome::Rejected => stats.rejected += 1,
        }
    }
    stats
}

/// Processa um frame. Nunca falha: erros viram log e o loop continua.
pub fn handle_frame(store: &LatestReadings, msg: &FrameMessage, config: &AppConfig) -> Outcome {
    debug!("Frame de {} ({} bytes): {:?}", msg.topic, msg.raw_size, msg.payload);

    let decoded = match decode_frame(&msg.payload) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("Frame descartado ({}): {e}", msg.topic);
            return Outcome::Rejected;
        }
    };

    for anomaly in &decoded.anomalies {
        match anomaly {
            FrameAnomaly::TruncatedGroup { node_id, available } => {
                warn!("Grupo do nó {node_id} incompleto ({available} token(s)), descartado");
            }
            other => debug!("Anomalia: {other:?}"),
        }
    }

    if decoded.is_empty() {
        info!("Frame sem leituras em {}, ignorado", msg.topic);
        return Outcome::Ignored;
    }

    store.apply(&decoded);
    let snapshot = store.snapshot();

    for alert in alerts::evaluate_alerts(&snapshot, &config.alerts) {
        match alert.level {
            AlertLevel::Critical => error!(
                "Nó {} – {}: {} (CRÍTICO)",
                alert.node_id,
                alert.field.label(),
                alert.value
            ),
            AlertLevel::Warning => warn!(
                "Nó {} – {}: {}",
                alert.node_id,
                alert.field.label(),
                alert.value
            ),
            AlertLevel::Normal => {}
        }
    }

    if config.report.log_table {
        info!("Últimas leituras:\n{}", report::render_table(&snapshot));
    }

    Outcome::Applied {
        nodes: decoded.readings.len(),
    }
}
