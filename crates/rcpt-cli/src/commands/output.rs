//! Output formatting for extracted and stored transactions.

use serde::Serialize;

use rcpt_core::{OwnedCandidate, StoredTransaction};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Flat view of a transaction used for CSV and text output.
#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub owner_id: String,
    pub kind: String,
    pub amount: String,
    pub date: String,
    pub description: String,
    pub category: String,
}

impl From<&OwnedCandidate> for TransactionRow {
    fn from(owned: &OwnedCandidate) -> Self {
        let c = &owned.candidate;
        Self {
            id: String::new(),
            owner_id: owned.owner_id.to_string(),
            kind: c.kind().to_string(),
            amount: c.amount().to_string(),
            date: c.date().to_string(),
            description: c.description().to_string(),
            category: c.category().to_string(),
        }
    }
}

impl From<&StoredTransaction> for TransactionRow {
    fn from(stored: &StoredTransaction) -> Self {
        let r = &stored.record;
        Self {
            id: stored.id.to_string(),
            owner_id: r.owner_id.to_string(),
            kind: r.kind.to_string(),
            amount: r.amount.to_string(),
            date: r.date.to_string(),
            description: r.description.clone(),
            category: r.category.clone(),
        }
    }
}

/// Format a scan preview.
pub fn format_candidate(owned: &OwnedCandidate, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(owned)?),
        OutputFormat::Csv => format_csv(&[TransactionRow::from(owned)]),
        OutputFormat::Text => Ok(format_text(&TransactionRow::from(owned))),
    }
}

/// Format stored transactions.
pub fn format_stored(
    transactions: &[StoredTransaction],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(transactions)?),
        OutputFormat::Csv => {
            let rows: Vec<TransactionRow> = transactions.iter().map(TransactionRow::from).collect();
            format_csv(&rows)
        }
        OutputFormat::Text => Ok(transactions
            .iter()
            .map(|t| format_text(&TransactionRow::from(t)))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn format_csv(rows: &[TransactionRow]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(row: &TransactionRow) -> String {
    let mut output = String::new();

    if !row.id.is_empty() {
        output.push_str(&format!("Transaction: {}\n", row.id));
    }
    output.push_str(&format!("Owner:       {}\n", row.owner_id));
    output.push_str(&format!("Type:        {}\n", row.kind));
    output.push_str(&format!("Amount:      {}\n", row.amount));
    output.push_str(&format!("Date:        {}\n", row.date));
    output.push_str(&format!("Description: {}\n", row.description));
    output.push_str(&format!("Category:    {}\n", row.category));

    output
}
