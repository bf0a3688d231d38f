use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One data line of the source CSV, fields in declaration order.
/// Ephemeral: produced here, consumed immediately by the mapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub contact_date: String,
    pub name: String,
    pub contact_handle: String,
    pub source: String,
    pub budget_sent: String,
    pub outcome: String,
    pub contact_quality: String,
    pub closed_value: String,
    pub note: String,
}

impl RawRow {
    fn from_record(record: &csv::StringRecord) -> Self {
        let col = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        RawRow {
            contact_date: col(0),
            name: col(1),
            contact_handle: col(2),
            source: col(3),
            budget_sent: col(4),
            outcome: col(5),
            contact_quality: col(6),
            closed_value: col(7),
            note: col(8),
        }
    }

    /// Rows with neither a date nor a name carry no usable data.
    fn is_noise(&self) -> bool {
        self.contact_date.is_empty() && self.name.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Parse the whole source text into data rows.
///
/// The single header line is skipped, blank lines are skipped, and rows whose
/// first two columns are both empty are discarded as noise. Fields follow the
/// standard CSV grammar: quoted fields may contain the delimiter, and a
/// doubled `""` inside quotes is a literal quote. Short records are padded
/// with empty fields.
pub fn parse_leads(text: &str) -> Result<Vec<RawRow>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.is_empty() {
            continue;
        }
        let row = RawRow::from_record(&record);
        if row.is_noise() {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Data,Nome,Contato,Origem,Orcamento Enviado,Resultado,Qualidade,Valor Fechado,Observacoes";

    fn parse(lines: &[&str]) -> Vec<RawRow> {
        let text = format!("{HEADER}\n{}\n", lines.join("\n"));
        parse_leads(&text).unwrap()
    }

    #[test]
    fn header_is_skipped() {
        let rows = parse(&["12/03,Maria,@maria,Indicação,Sim,Venda,Bom,\"1.250,00\",cliente antiga"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Maria");
        assert_eq!(rows[0].closed_value, "1.250,00");
    }

    #[test]
    fn quoted_field_may_contain_comma() {
        let rows = parse(&["12/03,Maria,@maria,Indicação,Sim,Venda,Bom,,\"pediu orçamento, vai pensar\""]);
        assert_eq!(rows[0].note, "pediu orçamento, vai pensar");
    }

    #[test]
    fn doubled_quote_is_literal() {
        let rows = parse(&["12/03,\"Maria \"\"Mari\"\" Souza\",@maria,,,,,,"]);
        assert_eq!(rows[0].name, "Maria \"Mari\" Souza");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let rows = parse(&["12/03,Maria,,,,,,,", "", "14/03,Joana,,,,,,,"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "Joana");
    }

    #[test]
    fn noise_rows_without_date_and_name_are_discarded() {
        let rows = parse(&[",,@fantasma,Anúncio,,,,,", "12/03,Maria,,,,,,,"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Maria");
    }

    #[test]
    fn short_rows_are_padded() {
        let rows = parse(&["12/03,Maria,@maria"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].contact_handle, "@maria");
        assert_eq!(rows[0].note, "");
    }

    #[test]
    fn fields_are_trimmed() {
        let rows = parse(&["12/03, Maria , @maria ,,,,,,"]);
        assert_eq!(rows[0].name, "Maria");
        assert_eq!(rows[0].contact_handle, "@maria");
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(parse_leads("").unwrap().is_empty());
        assert!(parse_leads(&format!("{HEADER}\n")).unwrap().is_empty());
    }
}
