//! # Nodewatch Core
//!
//! Crate compartilhada que decodifica o frame de texto dos nós sensores,
//! guarda a última leitura de cada nó e define a configuração TOML.
//!
//! ## Módulos
//! - [`types`] – `NodeId`, `Reading` e constantes do sentinela
//! - [`protocol`] – Decodificador do frame (dedup de marcadores + grupos)
//! - [`store`] – Últimas leituras por nó, snapshot para exibição
//! - [`config`] – Configuração unificada via TOML
//! - [`alerts`] – Thresholds e níveis de alerta

pub mod types;
pub mod protocol;
pub mod store;
pub mod config;
pub mod alerts;

// Re-exports convenientes
pub use types::{NodeId, Reading};
pub use protocol::{decode_frame, DecodedFrame, FrameError};
pub use store::{LatestReadings, Snapshot};
pub use config::AppConfig;
