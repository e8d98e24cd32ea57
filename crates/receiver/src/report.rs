//! Tabela de texto com as últimas leituras dos quatro nós.

use nodewatch_core::store::Snapshot;
use nodewatch_core::types::Field;

const ID_WIDTH: usize = 6;
const COL_WIDTH: usize = 12;

/// Renderiza o snapshot como tabela de largura fixa.
///
/// ```text
/// Node  Temperatura Pax         Fumaça      Umidade
/// 1     22          6           FIRE        45
/// 2     --          --          --          --
/// ```
pub fn render_table(snapshot: &Snapshot) -> String {
    let header = Field::ALL.map(|field| field.label());
    let mut lines = vec![table_line("Node", &header)];

    for row in snapshot.display_rows() {
        let cells = Field::ALL.map(|field| row.value(field));
        lines.push(table_line(&row.node_id.to_string(), &cells));
    }

    lines.push(format!("rev {}", snapshot.revision));
    lines.join("\n")
}

fn table_line(id: &str, cells: &[&str]) -> String {
    let cells: String = cells
        .iter()
        .map(|cell| format!("{cell:<COL_WIDTH$}"))
        .collect();
    format!("{id:<ID_WIDTH$}{cells}").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodewatch_core::protocol::decode_frame;
    use nodewatch_core::store::{LatestReadings, NO_DATA};

    #[test]
    fn empty_store_shows_placeholders() {
        let table = render_table(&LatestReadings::new().snapshot());
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Node"));
        for line in &lines[1..5] {
            assert_eq!(line.matches(NO_DATA).count(), 4, "linha: {line}");
        }
        assert_eq!(lines[5], "rev 0");
    }

    #[test]
    fn header_has_fixed_width_columns() {
        let table = render_table(&LatestReadings::new().snapshot());
        assert_eq!(
            table.lines().next().unwrap(),
            "Node  Temperatura Pax         Fumaça      Umidade"
        );
        assert!(table.ends_with("rev 0"));
    }

    #[test]
    fn populated_node_shows_values() {
        let store = LatestReadings::new();
        store.apply(&decode_frame("2 10 255 255 20").unwrap());
        let table = render_table(&store.snapshot());
        let row = table.lines().nth(2).unwrap();
        let cols: Vec<_> = row.split_whitespace().collect();
        assert_eq!(cols, ["2", "10", "FIRE", "FIRE", "20"]);
    }
}
