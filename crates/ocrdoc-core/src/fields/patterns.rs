//! Keyword patterns for key-field recognition.
//!
//! Portuguese keywords match case-sensitively, English ones ignore case.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref NAME_KEYWORD: Regex = Regex::new(r"Nome|(?i:name)").unwrap();

    pub static ref DATE_KEYWORD: Regex = Regex::new(r"Data|(?i:date)").unwrap();

    pub static ref SIGNATURE_KEYWORD: Regex = Regex::new(r"Assinatura|(?i:signature)").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portuguese_keywords_are_case_sensitive() {
        assert!(NAME_KEYWORD.is_match("Nome: Ana"));
        assert!(!NAME_KEYWORD.is_match("NOME: Ana"));
        assert!(!NAME_KEYWORD.is_match("nome: Ana"));
        assert!(DATE_KEYWORD.is_match("Data: 01/01/2024"));
        assert!(!DATE_KEYWORD.is_match("DATA: 01/01/2024"));
        assert!(SIGNATURE_KEYWORD.is_match("Assinatura do cliente"));
        assert!(!SIGNATURE_KEYWORD.is_match("assinatura do cliente"));
    }

    #[test]
    fn test_english_keywords_ignore_case() {
        assert!(NAME_KEYWORD.is_match("Full NAME: Ana"));
        assert!(NAME_KEYWORD.is_match("surname"));
        assert!(DATE_KEYWORD.is_match("Due Date"));
        assert!(DATE_KEYWORD.is_match("UPDATED"));
        assert!(SIGNATURE_KEYWORD.is_match("SIGNATURE:"));
    }
}
