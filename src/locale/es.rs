//! Spanish identifier schemes.

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

const DNI_PATTERN: &str = r"^\d{8}-?[A-Z]$";
static DNI_RE: OnceLock<Regex> = OnceLock::new();

/// DNI, the Spanish national identity document: eight digits and a control
/// letter, hyphen optional on input.
pub struct DocumentoNacionalDeIdentidad;

impl IdCardScheme for DocumentoNacionalDeIdentidad {
    fn construct(
        &self,
        rng: &mut RandomSource,
        _dates: &DateSampler,
    ) -> Result<String, GenerationError> {
        Ok(format!(
            "{}-{}",
            rng.numeric_string(8),
            rng.alphabetic_upper(1)
        ))
    }

    fn validate(&self, value: &str) -> bool {
        compiled(&DNI_RE, DNI_PATTERN).is_match(value)
    }
}

const PASSPORT_PATTERN: &str = r"^[A-Z]{3}\d{6}$";
static PASSPORT_RE: OnceLock<Regex> = OnceLock::new();

/// Spanish passport number: a three letter series and six digits.
pub struct SpanishPassportNumber;

impl PassportScheme for SpanishPassportNumber {
    fn construct(&self, rng: &mut RandomSource) -> Result<String, GenerationError> {
        Ok(format!(
            "{}{}",
            rng.alphabetic_upper(3),
            rng.numeric_string(6)
        ))
    }

    fn validate(&self, value: &str) -> bool {
        compiled(&PASSPORT_RE, PASSPORT_PATTERN).is_match(value)
    }
}

const CIF_PATTERN: &str = r"^[A-Z]\d{7}[A-Z0-9]$";
static CIF_RE: OnceLock<Regex> = OnceLock::new();

/// CIF, the Spanish tax identification code for legal entities: an
/// organisation letter, seven digits and a control character.
pub struct CodigoDeIdentificacionFiscal;

impl VatScheme for CodigoDeIdentificacionFiscal {
    fn construct(
        &self,
        rng: &mut RandomSource,
        _dates: &DateSampler,
    ) -> Result<String, GenerationError> {
        Ok(format!(
            "{}{}{}",
            rng.alphabetic_upper(1),
            rng.numeric_string(7),
            rng.alphanumeric(1).to_ascii_uppercase()
        ))
    }

    fn validate(&self, value: &str) -> bool {
        compiled(&CIF_RE, CIF_PATTERN).is_match(value)
    }
}
