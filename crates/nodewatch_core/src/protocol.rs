//! Decodificador do frame de texto publicado pelos nós.
//!
//! Formato do frame:
//!
//! ```text
//! ┌─────────┬─────────────┬─────┬───────┬─────────┐┌─────────┬── ...
//! │ Node(1) │ Temperatura │ Pax │ Fumaça│ Umidade ││ Node(2) │
//! └─────────┴─────────────┴─────┴───────┴─────────┘└─────────┴── ...
//! ```
//!
//! - Tokens inteiros separados por espaço, grupos de 5 concatenados
//! - Valores `1..=5` são marcadores de nó; marcadores repetidos no mesmo
//!   frame são descartados antes do agrupamento
//! - Somente `1..=4` iniciam um grupo; o resto é token solto
//! - `255` em qualquer campo de valor vira `"FIRE"`
//!
//! A deduplicação olha o valor bruto de todos os tokens, inclusive os que
//! depois caem dentro da janela de um grupo. Um valor de campo entre 1 e 5
//! que repete um marcador anterior é removido.

use crate::types::{NodeId, Reading};
use std::collections::{BTreeMap, HashSet};
use std::num::IntErrorKind;
use std::ops::RangeInclusive;
use tracing::{debug, info};

/// Faixa de valores tratados como marcador de nó na deduplicação.
pub const MARKER_RANGE: RangeInclusive<i64> = 1..=5;

/// Tamanho de um grupo: ID + 4 campos.
pub const GROUP_LEN: usize = 5;

/// Erros que invalidam o frame inteiro.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("Token inválido na posição {position}: {token:?}")]
    MalformedToken { position: usize, token: String },
}

/// Condições não fatais observadas durante a decodificação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameAnomaly {
    /// Marcador repetido removido na deduplicação (posição no frame bruto).
    DuplicateMarker { position: usize, value: i64 },
    /// Token que não inicia grupo válido (posição na sequência filtrada).
    StrayToken { position: usize, value: i64 },
    /// Grupo final com menos de 5 tokens, descartado.
    TruncatedGroup { node_id: NodeId, available: usize },
}

/// Resultado de um frame decodificado.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Uma leitura por nó que apareceu em grupo completo.
    pub readings: BTreeMap<NodeId, Reading>,
    pub anomalies: Vec<FrameAnomaly>,
}

impl DecodedFrame {
    /// `true` quando nenhum nó foi decodificado.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.anomalies
            .iter()
            .any(|a| matches!(a, FrameAnomaly::TruncatedGroup { .. }))
    }
}

/// Token já convertido, mantendo o texto original para os campos.
#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    raw: &'a str,
    value: i64,
}

/// Decodifica um frame em leituras por nó.
///
/// Frame vazio (ou só espaços) retorna resultado vazio sem erro.
/// Um token não inteiro rejeita o frame todo, sem leituras parciais.
/// Inteiros fora da faixa de `i64` são aceitos como valor de campo.
pub fn decode_frame(frame: &str) -> Result<DecodedFrame, FrameError> {
    let frame = frame.trim();
    if frame.is_empty() {
        debug!("Frame vazio ignorado");
        return Ok(DecodedFrame::default());
    }

    let tokens = tokenize(frame)?;
    let mut decoded = DecodedFrame::default();

    let filtered = dedup_markers(&tokens, &mut decoded.anomalies);
    debug!(
        "Tokens filtrados: {:?}",
        filtered.iter().map(|t| t.raw).collect::<Vec<_>>()
    );

    group_readings(&filtered, &mut decoded);

    info!(
        "Frame decodificado: {} nó(s), {} anomalia(s)",
        decoded.readings.len(),
        decoded.anomalies.len()
    );
    Ok(decoded)
}

fn tokenize(frame: &str) -> Result<Vec<Token<'_>>, FrameError> {
    frame
        .split_whitespace()
        .enumerate()
        .map(|(position, raw)| {
            let value = match raw.parse::<i64>() {
                Ok(value) => value,
                // Inteiro fora de i64 continua valendo como campo; saturado,
                // nunca cai na faixa de marcadores
                Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
                Err(e) if *e.kind() == IntErrorKind::NegOverflow => i64::MIN,
                Err(_) => {
                    return Err(FrameError::MalformedToken {
                        position,
                        token: raw.to_string(),
                    });
                }
            };
            Ok(Token { raw, value })
        })
        .collect()
}

/// Remove marcadores (1–5) já vistos no frame. Outros valores passam.
fn dedup_markers<'a>(tokens: &[Token<'a>], anomalies: &mut Vec<FrameAnomaly>) -> Vec<Token<'a>> {
    let mut seen = HashSet::new();
    let mut filtered = Vec::with_capacity(tokens.len());

    for (position, token) in tokens.iter().enumerate() {
        if MARKER_RANGE.contains(&token.value) && !seen.insert(token.value) {
            anomalies.push(FrameAnomaly::DuplicateMarker {
                position,
                value: token.value,
            });
            continue;
        }
        filtered.push(*token);
    }

    filtered
}

fn group_readings(tokens: &[Token<'_>], decoded: &mut DecodedFrame) {
    let mut i = 0;
    while i < tokens.len() {
        let Ok(node_id) = NodeId::try_from(tokens[i].value) else {
            decoded.anomalies.push(FrameAnomaly::StrayToken {
                position: i,
                value: tokens[i].value,
            });
            i += 1;
            continue;
        };

        let Some(group) = tokens.get(i..i + GROUP_LEN) else {
            let available = tokens.len() - i;
            debug!("Grupo do nó {node_id} truncado ({available} de {GROUP_LEN} tokens)");
            decoded
                .anomalies
                .push(FrameAnomaly::TruncatedGroup { node_id, available });
            break;
        };

        let reading = Reading::from_raw(
            node_id,
            [group[1].raw, group[2].raw, group[3].raw, group[4].raw],
        );
        debug!("{reading}");
        // Grupo posterior do mesmo nó sobrescreve o anterior
        decoded.readings.insert(node_id, reading);
        i += GROUP_LEN;
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
