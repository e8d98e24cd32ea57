//! Configuração unificada via TOML.
//!
//! Um único `config.toml` ao lado do executável, com seções `[broker]`,
//! `[alerts]` e `[report]`. Campos ausentes usam o valor padrão.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Erros ao gravar a configuração.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Erro de serialização: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Erro ao gravar {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Conexão com o broker MQTT.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Endereço do broker
    pub host: String,
    /// Porta TCP
    pub port: u16,
    /// Tópico em que os nós publicam o frame
    pub topic: String,
    /// Prefixo do client id (sufixo é um UUID v4)
    pub client_id_prefix: String,
    /// Keep-alive da sessão MQTT (segundos)
    pub keep_alive_secs: u64,
    /// Capacidade do channel entre a thread MQTT e o loop principal
    pub channel_capacity: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 1883,
            topic: "nodewatch/frame".into(),
            client_id_prefix: "nodewatch".into(),
            keep_alive_secs: 30,
            channel_capacity: 64,
        }
    }
}

/// Thresholds de alerta para os campos numéricos.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    pub temperature_warning: f64,
    pub temperature_critical: f64,
    pub smoke_warning: f64,
    pub smoke_critical: f64,
    pub humidity_warning: f64,
    pub humidity_critical: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            temperature_warning: 45.0,
            temperature_critical: 60.0,
            smoke_warning: 50.0,
            smoke_critical: 100.0,
            humidity_warning: 80.0,
            humidity_critical: 95.0,
        }
    }
}

/// Saída do snapshot no log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Loga a tabela dos quatro nós após cada atualização
    pub log_table: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { log_table: true }
    }
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub broker: BrokerConfig,
    pub alerts: AlertThresholds,
    pub report: ReportConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let broker = &self.broker;

        if broker.host.trim().is_empty() {
            errors.push("Host do broker não pode ser vazio".into());
        }
        if broker.port == 0 {
            errors.push("Porta do broker não pode ser 0".into());
        }
        if broker.topic.is_empty() {
            errors.push("Tópico não pode ser vazio".into());
        } else if broker.topic.contains(['#', '+']) {
            errors.push(format!(
                "Tópico não pode ter curingas: {} (um único tópico por frame)",
                broker.topic
            ));
        }
        if broker.keep_alive_secs < 5 {
            errors.push(format!(
                "Keep-alive inválido: {}s (mínimo 5s)",
                broker.keep_alive_secs
            ));
        }
        if broker.channel_capacity == 0 {
            errors.push("Capacidade do channel deve ser > 0".into());
        }

        let t = &self.alerts;
        for (name, warn, crit) in [
            ("temperature", t.temperature_warning, t.temperature_critical),
            ("smoke", t.smoke_warning, t.smoke_critical),
            ("humidity", t.humidity_warning, t.humidity_critical),
        ] {
            if warn > crit {
                errors.push(format!(
                    "Threshold de {name}: warning ({warn}) maior que critical ({crit})"
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        let errors = config.validate();
        assert!(errors.is_empty(), "Erros: {:?}", errors);
    }

    #[test]
    fn roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.broker.port, parsed.broker.port);
        assert_eq!(config.broker.topic, parsed.broker.topic);
        assert_eq!(config.alerts.smoke_critical, parsed.alerts.smoke_critical);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let partial = r#"
[broker]
host = "192.168.34.222"
topic = "andar/2/nos"
"#;
        let config: AppConfig = toml::from_str(partial).unwrap();
        assert_eq!(config.broker.host, "192.168.34.222");
        assert_eq!(config.broker.topic, "andar/2/nos");
        // Outros campos devem ter valor padrão
        assert_eq!(config.broker.port, 1883);
        assert_eq!(config.alerts.temperature_warning, 45.0);
        assert!(config.report.log_table);
    }

    #[test]
    fn rejects_wildcard_topic_and_inverted_thresholds() {
        let mut config = AppConfig::default();
        config.broker.topic = "nodewatch/#".into();
        config.alerts.smoke_warning = 200.0;
        let errors = config.validate();
        assert_eq!(errors.len(), 2, "Erros: {:?}", errors);
        assert!(errors[0].contains("curingas"));
        assert!(errors[1].contains("smoke"));
    }

    #[test]
    fn load_missing_file_falls_back_to_default() {
        let path = std::env::temp_dir().join("nodewatch-config-inexistente.toml");
        let config = AppConfig::load(&path);
        assert_eq!(config.broker.port, 1883);
    }

    #[test]
    fn save_then_load() {
        let path =
            std::env::temp_dir().join(format!("nodewatch-config-{}.toml", std::process::id()));
        let mut config = AppConfig::default();
        config.broker.port = 8883;
        config.report.log_table = false;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.broker.port, 8883);
        assert!(!loaded.report.log_table);
    }
}
