//! German identifier schemes.

use std::sync::OnceLock;

use regex::Regex;

use crate::dates::DateSampler;
use crate::errors::GenerationError;
use crate::locale::{IdCardScheme, PassportScheme, VatScheme};
use crate::random::RandomSource;

fn compiled(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("identifier pattern failed to compile: {error}"))
    })
}

const ID_CARD_TYPE_LETTERS: [&str; 10] = ["L", "M", "N", "P", "R", "T", "V", "W", "X", "Y"];
const ID_CARD_PATTERN: &str = "^[LMNPRTVWXY][0-9]{8}$";
static ID_CARD_RE: OnceLock<Regex> = OnceLock::new();

/// German identity card number: a document type letter and eight digits.
pub struct GermanIdentityCardNumber;

impl IdCardScheme for GermanIdentityCardNumber {
    fn construct(
        &self,
        rng: &mut RandomSource,
        _dates: &DateSampler,
    ) -> Result<String, GenerationError> {
        let letter = rng.choose_one(&ID_CARD_TYPE_LETTERS)?;
        Ok(format!("{letter}{}", rng.numeric_string(8)))
    }

    fn validate(&self, value: &str) -> bool {
        compiled(&ID_CARD_RE, ID_CARD_PATTERN).is_match(value)
    }
}

const PASSPORT_TYPE_LETTERS: [&str; 6] = ["C", "F", "G", "H", "J", "K"];
const PASSPORT_PATTERN: &str = "^[CFGHJK][0-9]{8}$";
static PASSPORT_RE: OnceLock<Regex> = OnceLock::new();

/// German passport number: a series letter and eight digits.
pub struct GermanPassportNumber;

impl PassportScheme for GermanPassportNumber {
    fn construct(&self, rng: &mut RandomSource) -> Result<String, GenerationError> {
        let letter = rng.choose_one(&PASSPORT_TYPE_LETTERS)?;
        Ok(format!("{letter}{}", rng.numeric_string(8)))
    }

    fn validate(&self, value: &str) -> bool {
        compiled(&PASSPORT_RE, PASSPORT_PATTERN).is_match(value)
    }
}

const VAT_PATTERN: &str = "^[0-9]{9}$";
static VAT_RE: OnceLock<Regex> = OnceLock::new();

/// German VAT identification number: nine digits.
pub struct GermanVatNumber;

impl VatScheme for GermanVatNumber {
    fn construct(
        &self,
        rng: &mut RandomSource,
        _dates: &DateSampler,
    ) -> Result<String, GenerationError> {
        Ok(rng.numeric_string(9))
    }

    fn validate(&self, value: &str) -> bool {
        compiled(&VAT_RE, VAT_PATTERN).is_match(value)
    }
}
