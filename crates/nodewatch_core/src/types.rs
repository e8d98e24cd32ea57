//! Tipos de dados dos nós sensores.
//!
//! Cada nó publica quatro campos (temperatura, ocupação, fumaça, umidade).
//! Os valores ficam como string porque a apresentação interpola o texto
//! diretamente e o sentinela de alarme é substituído por `"FIRE"`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token bruto que sinaliza alarme no campo.
pub const SENTINEL: &str = "255";

/// Marcador de alarme exibido no lugar do sentinela.
pub const ALARM_MARKER: &str = "FIRE";

/// Quantidade de nós com slot de armazenamento.
pub const NODE_COUNT: usize = 4;

// ──────────────────────────────────────────────
// NodeId
// ──────────────────────────────────────────────

/// Identificador de nó válido para armazenamento (1–4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct NodeId(u8);

/// Valor fora da faixa de nós armazenáveis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("ID de nó inválido: {0} (faixa 1–{NODE_COUNT})")]
pub struct InvalidNodeId(pub i64);

impl NodeId {
    /// Todos os nós, em ordem de slot.
    pub const ALL: [NodeId; NODE_COUNT] = [NodeId(1), NodeId(2), NodeId(3), NodeId(4)];

    /// Valor numérico do ID.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Índice do slot no store (0-based).
    pub fn slot(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<i64> for NodeId {
    type Error = InvalidNodeId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (1..=NODE_COUNT as i64).contains(&value) {
            Ok(NodeId(value as u8))
        } else {
            Err(InvalidNodeId(value))
        }
    }
}

impl TryFrom<u8> for NodeId {
    type Error = InvalidNodeId;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        NodeId::try_from(i64::from(value))
    }
}

impl From<NodeId> for u8 {
    fn from(id: NodeId) -> u8 {
        id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ──────────────────────────────────────────────
// Campos
// ──────────────────────────────────────────────

/// Campo de valor de uma leitura, na ordem em que chega no grupo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Temperature,
    Pax,
    Smoke,
    Humidity,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Temperature, Field::Pax, Field::Smoke, Field::Humidity];

    /// Rótulo curto para logs e tabelas.
    pub fn label(self) -> &'static str {
        match self {
            Field::Temperature => "Temperatura",
            Field::Pax => "Pax",
            Field::Smoke => "Fumaça",
            Field::Humidity => "Umidade",
        }
    }
}

/// Converte o token bruto de um campo, trocando o sentinela pelo alarme.
pub fn substitute_sentinel(raw: &str) -> String {
    if raw == SENTINEL {
        ALARM_MARKER.to_string()
    } else {
        raw.to_string()
    }
}

// ──────────────────────────────────────────────
// Reading
// ──────────────────────────────────────────────

/// Leitura completa de um nó.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub node_id: NodeId,
    /// Temperatura (numeral ou `"FIRE"`)
    pub temperature: String,
    /// Ocupação / contagem de pessoas
    pub pax: String,
    /// Nível de fumaça
    pub smoke: String,
    /// Umidade relativa
    pub humidity: String,
}

impl Reading {
    /// Monta uma leitura a partir dos quatro tokens brutos do grupo,
    /// aplicando a substituição do sentinela em cada campo.
    pub fn from_raw(node_id: NodeId, raw: [&str; 4]) -> Self {
        let [temperature, pax, smoke, humidity] = raw;
        Self {
            node_id,
            temperature: substitute_sentinel(temperature),
            pax: substitute_sentinel(pax),
            smoke: substitute_sentinel(smoke),
            humidity: substitute_sentinel(humidity),
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Temperature => &self.temperature,
            Field::Pax => &self.pax,
            Field::Smoke => &self.smoke,
            Field::Humidity => &self.humidity,
        }
    }

    /// Campos que carregam o marcador de alarme.
    pub fn alarm_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|&f| self.value(f) == ALARM_MARKER)
            .collect()
    }

    pub fn has_alarm(&self) -> bool {
        Field::ALL.into_iter().any(|f| self.value(f) == ALARM_MARKER)
    }

    /// Valor numérico do campo; `None` para alarme ou texto não numérico.
    pub fn numeric(&self, field: Field) -> Option<f64> {
        self.value(field).parse().ok()
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node {}: Temperatura: {}, Pax: {}, Fumaça: {}, Umidade: {}",
            self.node_id, self.temperature, self.pax, self.smoke, self.humidity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_range() {
        assert!(NodeId::try_from(0i64).is_err());
        assert_eq!(NodeId::try_from(1i64).unwrap().get(), 1);
        assert_eq!(NodeId::try_from(4i64).unwrap().slot(), 3);
        assert_eq!(NodeId::try_from(5i64), Err(InvalidNodeId(5)));
        assert!(NodeId::try_from(-1i64).is_err());
    }

    #[test]
    fn sentinel_becomes_fire_on_every_field() {
        let id = NodeId::try_from(2i64).unwrap();
        let r = Reading::from_raw(id, ["255", "255", "255", "255"]);
        assert_eq!(r.alarm_fields(), Field::ALL.to_vec());
        assert!(r.has_alarm());
    }

    #[test]
    fn non_sentinel_values_are_kept_verbatim() {
        let id = NodeId::try_from(1i64).unwrap();
        let r = Reading::from_raw(id, ["0255", "-3", "254", "256"]);
        assert_eq!(r.temperature, "0255");
        assert_eq!(r.pax, "-3");
        assert!(!r.has_alarm());
        assert_eq!(r.numeric(Field::Smoke), Some(254.0));
    }

    #[test]
    fn reading_roundtrip_toml() {
        let id = NodeId::try_from(4i64).unwrap();
        let reading = Reading::from_raw(id, ["21", "7", "255", "40"]);
        let text = toml::to_string(&reading).unwrap();
        assert!(text.contains("node_id = 4"));
        let parsed: Reading = toml::from_str(&text).unwrap();
        assert_eq!(parsed, reading);
    }

    #[test]
    fn deserialize_rejects_node_five() {
        let text = r#"
node_id = 5
temperature = "21"
pax = "7"
smoke = "0"
humidity = "40"
"#;
        let err = toml::from_str::<Reading>(text).unwrap_err();
        assert!(err.to_string().contains("ID de nó inválido: 5"), "{err}");
    }

    #[test]
    fn numeric_is_none_for_alarm() {
        let id = NodeId::try_from(3i64).unwrap();
        let r = Reading::from_raw(id, ["255", "1", "2", "3"]);
        assert_eq!(r.numeric(Field::Temperature), None);
        assert_eq!(r.numeric(Field::Humidity), Some(3.0));
    }
}
