//! Line-based key-field recognizer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::patterns::{DATE_KEYWORD, NAME_KEYWORD, SIGNATURE_KEYWORD};
use crate::models::config::{FieldConfig, MatchPolicy};

/// Value recorded for a signature line instead of its content.
pub const SIGNATURE_MARKER: &str = "Campo de assinatura identificado";

/// The three recognized key fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyField {
    Name,
    Date,
    Signature,
}

impl KeyField {
    /// Classify a line into at most one field.
    ///
    /// Name is checked before date, date before signature.
    pub fn classify(line: &str) -> Option<Self> {
        if NAME_KEYWORD.is_match(line) {
            Some(Self::Name)
        } else if DATE_KEYWORD.is_match(line) {
            Some(Self::Date)
        } else if SIGNATURE_KEYWORD.is_match(line) {
            Some(Self::Signature)
        } else {
            None
        }
    }

    /// Label used in serialized output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Nome",
            Self::Date => "Data",
            Self::Signature => "Assinatura",
        }
    }

    /// Value recorded when `line` matches this field.
    fn value_for(self, line: &str) -> String {
        match self {
            Self::Name | Self::Date => line.to_string(),
            Self::Signature => SIGNATURE_MARKER.to_string(),
        }
    }
}

/// A line that matched a key field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub field: KeyField,
    /// Zero-based line index.
    pub line: usize,
    pub value: String,
}

/// Recognized key fields; absent fields serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFields {
    #[serde(rename = "Nome")]
    pub name: Option<String>,

    #[serde(rename = "Data")]
    pub date: Option<String>,

    #[serde(rename = "Assinatura")]
    pub signature: Option<String>,
}

impl KeyFields {
    pub fn get(&self, field: KeyField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// True when no field was recognized.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.date.is_none() && self.signature.is_none()
    }

    fn slot(&self, field: KeyField) -> &Option<String> {
        match field {
            KeyField::Name => &self.name,
            KeyField::Date => &self.date,
            KeyField::Signature => &self.signature,
        }
    }

    fn slot_mut(&mut self, field: KeyField) -> &mut Option<String> {
        match field {
            KeyField::Name => &mut self.name,
            KeyField::Date => &mut self.date,
            KeyField::Signature => &mut self.signature,
        }
    }
}

/// Scans text line by line for name, date and signature markers.
#[derive(Debug, Clone, Default)]
pub struct KeyFieldRecognizer {
    policy: MatchPolicy,
}

impl KeyFieldRecognizer {
    /// Create a recognizer with the default last-match-wins policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recognizer from configuration.
    pub fn from_config(config: &FieldConfig) -> Self {
        Self::new().with_policy(config.policy)
    }

    /// Set which match is kept when a field matches several lines.
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Every matching line, top to bottom.
    pub fn matches(&self, text: &str) -> Vec<FieldMatch> {
        text.split('\n')
            .enumerate()
            .filter_map(|(index, line)| {
                KeyField::classify(line).map(|field| FieldMatch {
                    field,
                    line: index,
                    value: field.value_for(line),
                })
            })
            .collect()
    }

    /// Build the field map according to the match policy.
    pub fn recognize(&self, text: &str) -> KeyFields {
        let mut fields = KeyFields::default();

        for m in self.matches(text) {
            let slot = fields.slot_mut(m.field);
            if self.policy == MatchPolicy::FirstWins && slot.is_some() {
                continue;
            }
            debug!("Line {} matched {}", m.line + 1, m.field.label());
            *slot = Some(m.value);
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recognizes_all_three_fields() {
        let text = "Nome: Ana\nData: 2024-01-01\nAssinatura";
        let fields = KeyFieldRecognizer::new().recognize(text);

        assert_eq!(
            fields,
            KeyFields {
                name: Some("Nome: Ana".to_string()),
                date: Some("Data: 2024-01-01".to_string()),
                signature: Some(SIGNATURE_MARKER.to_string()),
            }
        );
    }

    #[test]
    fn test_no_keywords_leaves_fields_empty() {
        let fields = KeyFieldRecognizer::new().recognize("Contrato de prestação\nValor: 100,00");
        assert!(fields.is_empty());
        assert_eq!(fields, KeyFields::default());
    }

    #[test]
    fn test_one_category_per_line() {
        // Name wins over date, date over signature.
        let fields = KeyFieldRecognizer::new().recognize("Nome e Data\nData da assinatura: Assinatura");
        assert_eq!(fields.get(KeyField::Name), Some("Nome e Data"));
        assert_eq!(fields.get(KeyField::Date), Some("Data da assinatura: Assinatura"));
        assert_eq!(fields.get(KeyField::Signature), None);
    }

    #[test]
    fn test_last_match_wins_by_default() {
        let text = "Name: Ana\nName: Bia";
        let fields = KeyFieldRecognizer::new().recognize(text);
        assert_eq!(fields.get(KeyField::Name), Some("Name: Bia"));
    }

    #[test]
    fn test_first_match_policy() {
        let text = "Name: Ana\nDate: today\nName: Bia\nDate: tomorrow";
        let fields = KeyFieldRecognizer::new()
            .with_policy(MatchPolicy::FirstWins)
            .recognize(text);
        assert_eq!(fields.get(KeyField::Name), Some("Name: Ana"));
        assert_eq!(fields.get(KeyField::Date), Some("Date: today"));
    }

    #[test]
    fn test_english_keywords_any_case() {
        let text = "FULL NAME: ANA\ndate of birth\nSignature: ____";
        let fields = KeyFieldRecognizer::new().recognize(text);
        assert_eq!(fields.get(KeyField::Name), Some("FULL NAME: ANA"));
        assert_eq!(fields.get(KeyField::Date), Some("date of birth"));
        assert_eq!(fields.get(KeyField::Signature), Some(SIGNATURE_MARKER));
    }

    #[test]
    fn test_matches_report_line_numbers() {
        let matches = KeyFieldRecognizer::new().matches("intro\nNome: Ana\n\nsignature");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].field, KeyField::Name);
        assert_eq!(matches[0].line, 1);
        assert_eq!(matches[1].field, KeyField::Signature);
        assert_eq!(matches[1].line, 3);
    }

    #[test]
    fn test_serializes_with_portuguese_labels() {
        let fields = KeyFields {
            name: Some("Nome: Ana".to_string()),
            ..KeyFields::default()
        };
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "Nome": "Nome: Ana", "Data": null, "Assinatura": null })
        );
    }
}
