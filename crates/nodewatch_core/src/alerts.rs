//! Sistema de alertas – níveis e avaliação de thresholds por nó.

use crate::config::AlertThresholds;
use crate::store::Snapshot;
use crate::types::{Field, NodeId, Reading};
use serde::{Deserialize, Serialize};

/// Nível de alerta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Normal,
    Warning,
    Critical,
}

/// Um alerta disparado.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub node_id: NodeId,
    pub field: Field,
    /// Valor exibido (numeral ou `"FIRE"`)
    pub value: String,
    pub level: AlertLevel,
}

/// Avalia todos os nós presentes no snapshot.
pub fn evaluate_alerts(snapshot: &Snapshot, thresholds: &AlertThresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();
    for reading in snapshot.iter().filter_map(|(_, r)| r) {
        evaluate_reading(&mut alerts, reading, thresholds);
    }
    alerts
}

fn evaluate_reading(alerts: &mut Vec<Alert>, reading: &Reading, thresholds: &AlertThresholds) {
    // Alarme do próprio nó sempre é crítico
    for field in reading.alarm_fields() {
        push(alerts, reading, field, AlertLevel::Critical);
    }

    check(
        alerts,
        reading,
        Field::Temperature,
        thresholds.temperature_warning,
        thresholds.temperature_critical,
    );
    check(
        alerts,
        reading,
        Field::Smoke,
        thresholds.smoke_warning,
        thresholds.smoke_critical,
    );
    check(
        alerts,
        reading,
        Field::Humidity,
        thresholds.humidity_warning,
        thresholds.humidity_critical,
    );
}

fn check(alerts: &mut Vec<Alert>, reading: &Reading, field: Field, warn: f64, crit: f64) {
    let Some(value) = reading.numeric(field) else {
        return; // Alarme ou valor não numérico
    };
    match level_for_value(value, warn, crit) {
        AlertLevel::Normal => {}
        level => push(alerts, reading, field, level),
    }
}

fn push(alerts: &mut Vec<Alert>, reading: &Reading, field: Field, level: AlertLevel) {
    alerts.push(Alert {
        node_id: reading.node_id,
        field,
        value: reading.value(field).to_string(),
        level,
    });
}

/// Retorna o [`AlertLevel`] para um valor dado thresholds.
pub fn level_for_value(value: f64, warn: f64, crit: f64) -> AlertLevel {
    if value >= crit {
        AlertLevel::Critical
    } else if value >= warn {
        AlertLevel::Warning
    } else {
        AlertLevel::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::decode_frame;
    use crate::store::LatestReadings;

    fn snapshot_of(frame: &str) -> Snapshot {
        let store = LatestReadings::new();
        store.apply(&decode_frame(frame).unwrap());
        store.snapshot()
    }

    #[test]
    fn no_alerts_for_normal_values() {
        let snap = snapshot_of("1 22 6 10 45 2 24 7 12 50");
        let alerts = evaluate_alerts(&snap, &AlertThresholds::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn fire_marker_is_critical() {
        let snap = snapshot_of("2 10 255 255 20");
        let alerts = evaluate_alerts(&snap, &AlertThresholds::default());
        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|a| a.level == AlertLevel::Critical));
        assert_eq!(alerts[0].field, Field::Pax);
        assert_eq!(alerts[1].field, Field::Smoke);
        assert_eq!(alerts[1].value, "FIRE");
    }

    #[test]
    fn threshold_alerts() {
        let thresholds = AlertThresholds::default();
        let frame = format!(
            "3 {} 6 {} 40",
            thresholds.temperature_critical as i64,
            thresholds.smoke_warning as i64
        );
        let alerts = evaluate_alerts(&snapshot_of(&frame), &thresholds);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].field, Field::Temperature);
        assert_eq!(alerts[0].level, AlertLevel::Critical);
        assert_eq!(alerts[1].field, Field::Smoke);
        assert_eq!(alerts[1].level, AlertLevel::Warning);
    }

    #[test]
    fn absent_nodes_produce_no_alerts() {
        let alerts = evaluate_alerts(&Snapshot::default(), &AlertThresholds::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn warning_level() {
        assert_eq!(level_for_value(75.0, 70.0, 85.0), AlertLevel::Warning);
        assert_eq!(level_for_value(90.0, 70.0, 85.0), AlertLevel::Critical);
        assert_eq!(level_for_value(50.0, 70.0, 85.0), AlertLevel::Normal);
    }
}
