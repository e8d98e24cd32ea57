//! Store das últimas leituras por nó.
//!
//! Um slot por nó (1–4). O slot fica vazio até a primeira leitura e depois
//! guarda sempre a mais recente (last-write-wins). Escritas são serializadas
//! por um `RwLock`; leitores copiam os quatro slots de uma vez, então nunca
//! veem um frame aplicado pela metade.

use crate::protocol::DecodedFrame;
use crate::types::{Field, NODE_COUNT, NodeId, Reading};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

/// Placeholder exibido para campos de nós sem dados.
pub const NO_DATA: &str = "--";

#[derive(Debug, Default)]
struct Slots {
    readings: [Option<Reading>; NODE_COUNT],
    revision: u64,
}

/// Últimas leituras conhecidas, compartilhadas via `Arc<LatestReadings>`.
#[derive(Debug, Default)]
pub struct LatestReadings {
    inner: RwLock<Slots>,
}

impl LatestReadings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mescla as leituras no store, sobrescrevendo por nó.
    ///
    /// Nós ausentes em `readings` mantêm o valor anterior. Um mapa vazio
    /// não altera nada (nem a revisão).
    pub fn update(&self, readings: &BTreeMap<NodeId, Reading>) {
        if readings.is_empty() {
            return;
        }

        let mut slots = self.inner.write();
        for (id, reading) in readings {
            debug_assert_eq!(*id, reading.node_id);
            slots.readings[id.slot()] = Some(reading.clone());
        }
        slots.revision += 1;
        debug!(
            "Store atualizado (rev {}): nós {:?}",
            slots.revision,
            readings.keys().map(|id| id.get()).collect::<Vec<_>>()
        );
    }

    /// Aplica o resultado de um frame decodificado.
    pub fn apply(&self, decoded: &DecodedFrame) {
        self.update(&decoded.readings);
    }

    /// Cópia consistente dos quatro slots.
    pub fn snapshot(&self) -> Snapshot {
        let slots = self.inner.read();
        Snapshot {
            readings: slots.readings.clone(),
            revision: slots.revision,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<Reading> {
        self.inner.read().readings[id.slot()].clone()
    }
}

/// Estado do store em um instante.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    readings: [Option<Reading>; NODE_COUNT],
    /// Número de atualizações não vazias aplicadas até aqui.
    pub revision: u64,
}

impl Snapshot {
    pub fn get(&self, id: NodeId) -> Option<&Reading> {
        self.readings[id.slot()].as_ref()
    }

    /// Slots em ordem de nó.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Option<&Reading>)> + '_ {
        NodeId::ALL.into_iter().map(|id| (id, self.get(id)))
    }

    /// Quantidade de nós que já receberam leitura.
    pub fn populated(&self) -> usize {
        self.readings.iter().filter(|r| r.is_some()).count()
    }

    /// Linhas prontas para exibição, com [`NO_DATA`] nos nós vazios.
    pub fn display_rows(&self) -> [DisplayRow; NODE_COUNT] {
        NodeId::ALL.map(|id| DisplayRow::new(id, self.get(id)))
    }
}

/// Uma linha da tabela de apresentação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub node_id: NodeId,
    pub has_data: bool,
    pub temperature: String,
    pub pax: String,
    pub smoke: String,
    pub humidity: String,
}

impl DisplayRow {
    fn new(node_id: NodeId, reading: Option<&Reading>) -> Self {
        let text = |field: Field| {
            reading
                .map(|r| r.value(field).to_string())
                .unwrap_or_else(|| NO_DATA.to_string())
        };
        Self {
            node_id,
            has_data: reading.is_some(),
            temperature: text(Field::Temperature),
            pax: text(Field::Pax),
            smoke: text(Field::Smoke),
            humidity: text(Field::Humidity),
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
}
