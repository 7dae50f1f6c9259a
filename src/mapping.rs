//! Column mapping from arbitrary export headers to record fields
//!
//! Bank exports name their columns however they like ("Buchungstag",
//! "Value date", "Betrag (EUR)", ...). Import settings carry one ordered
//! rule per logical field, each with `|`-separated wildcard alternatives.
//! The rules are compiled once per configuration; resolving a header row
//! produces an immutable column-index-to-field table that is reused for
//! every data row of the file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::numeric::{parse_decimal, NumberFormat};
use crate::pattern::WildcardPattern;
use crate::types::{ImportError, ImportResult, TransactionRecord};

/// The logical fields a column can map onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordField {
    Date,
    ValueDate,
    Amount,
    Type,
    Subject,
    Iban,
    Bic,
    Currency,
    Info,
}

impl RecordField {
    /// Resolve the textual field name used in external configuration.
    /// Unknown names are a setup failure, reported before any row is read.
    pub fn from_name(name: &str) -> ImportResult<Self> {
        match name {
            "date" => Ok(Self::Date),
            "valueDate" => Ok(Self::ValueDate),
            "amount" => Ok(Self::Amount),
            "type" => Ok(Self::Type),
            "subject" => Ok(Self::Subject),
            "iban" => Ok(Self::Iban),
            "bic" => Ok(Self::Bic),
            "currency" => Ok(Self::Currency),
            "info" => Ok(Self::Info),
            other => Err(ImportError::Configuration(format!(
                "Unknown record field '{other}' in column mapping"
            ))),
        }
    }
}

/// One configured mapping rule: a field plus its ordered wildcard
/// alternatives. The first alternative that matches a header cell wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRule {
    pub field: RecordField,
    pub patterns: Vec<WildcardPattern>,
}

impl MappingRule {
    /// Build a rule from configuration text, e.g.
    /// `MappingRule::new("amount", "Betrag*|Amount*|Umsatz")`.
    pub fn new(field_name: &str, patterns: &str) -> ImportResult<Self> {
        let field = RecordField::from_name(field_name)?;
        let compiled: Vec<WildcardPattern> = patterns
            .split('|')
            .filter(|p| !p.is_empty())
            .map(WildcardPattern::compile)
            .collect();
        if compiled.is_empty() {
            return Err(ImportError::Configuration(format!(
                "Empty pattern list for field '{field_name}'"
            )));
        }
        Ok(Self {
            field,
            patterns: compiled,
        })
    }

    /// Whether any alternative of this rule accepts the header cell
    pub fn matches(&self, header_cell: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(header_cell))
    }
}

/// Date formats tried in order when the settings do not configure any
const DEFAULT_DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%Y-%m-%d", "%d/%m/%Y"];

/// One import configuration: mapping rules plus parsing conventions.
/// Built once per settings record, reused for every imported file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Ordered column-mapping rules
    pub rules: Vec<MappingRule>,
    /// Ordered numeric formats tried per amount cell; empty means
    /// auto-detection per cell
    pub number_formats: Vec<NumberFormat>,
    /// Ordered chrono format strings tried per date cell
    pub date_formats: Vec<String>,
    /// Character-encoding hint for the collaborator that decodes the raw
    /// bytes; the core itself only sees decoded text
    pub encoding: Option<String>,
}

impl ImportSettings {
    /// Build settings from configuration text.
    ///
    /// `rules` are `(fieldName, wildcardAlternatives)` pairs and
    /// `number_patterns` display patterns such as `"###,##0.0#"`. Any
    /// unknown field name, empty alternative list or malformed number
    /// pattern fails here, before a single row is processed.
    pub fn new<'a, R, P>(rules: R, number_patterns: P) -> ImportResult<Self>
    where
        R: IntoIterator<Item = (&'a str, &'a str)>,
        P: IntoIterator<Item = &'a str>,
    {
        let rules = rules
            .into_iter()
            .map(|(field, patterns)| MappingRule::new(field, patterns))
            .collect::<ImportResult<Vec<_>>>()?;
        let number_formats = number_patterns
            .into_iter()
            .map(NumberFormat::from_pattern)
            .collect::<ImportResult<Vec<_>>>()?;

        Ok(Self {
            rules,
            number_formats,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            encoding: None,
        })
    }

    fn parse_date(&self, cell: &str) -> Option<NaiveDate> {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.date_formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
    }
}

/// Resolved mapping from column index to record field for one header row
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    columns: Vec<Option<RecordField>>,
}

impl ColumnMap {
    /// Match the header row against the configured rules.
    ///
    /// Header cells are visited in order; each cell claims the first rule
    /// (in rule order) that is still unclaimed and matches it. A rule
    /// therefore maps at most one column, and unmatched header cells are
    /// simply ignored.
    pub fn resolve(settings: &ImportSettings, headers: &[String]) -> Self {
        let mut claimed = vec![false; settings.rules.len()];
        let columns = headers
            .iter()
            .map(|cell| {
                let position = settings
                    .rules
                    .iter()
                    .enumerate()
                    .position(|(index, rule)| !claimed[index] && rule.matches(cell))?;
                claimed[position] = true;
                Some(settings.rules[position].field)
            })
            .collect();
        Self { columns }
    }

    /// The field a column resolved to, if any
    pub fn field_at(&self, column: usize) -> Option<RecordField> {
        self.columns.get(column).copied().flatten()
    }

    /// Build one transaction record from a data row.
    ///
    /// A cell that fails to parse as its column's type leaves the field
    /// unset; row-level parse misses never abort the import.
    pub fn read_record(&self, settings: &ImportSettings, cells: &[String]) -> TransactionRecord {
        let mut record = TransactionRecord::new();
        for (column, cell) in cells.iter().enumerate() {
            let Some(field) = self.field_at(column) else {
                continue;
            };
            match field {
                RecordField::Date => record.date = settings.parse_date(cell),
                RecordField::ValueDate => record.value_date = settings.parse_date(cell),
                RecordField::Amount => {
                    record.amount = parse_decimal(cell, &settings.number_formats)
                }
                RecordField::Type => record.kind = non_blank(cell),
                RecordField::Subject => record.subject = non_blank(cell),
                RecordField::Iban => record.iban = non_blank(cell),
                RecordField::Bic => record.bic = non_blank(cell),
                RecordField::Currency => record.currency = non_blank(cell),
                RecordField::Info => record.info = non_blank(cell),
            }
        }
        record
    }

    /// Read all data rows of a file into records
    pub fn read_records(
        &self,
        settings: &ImportSettings,
        rows: &[Vec<String>],
    ) -> Vec<TransactionRecord> {
        rows.iter()
            .map(|cells| self.read_record(settings, cells))
            .collect()
    }
}

fn non_blank(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
