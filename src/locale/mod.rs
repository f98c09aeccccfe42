//! Locale capability registry.
//!
//! Each supported language binds five strategy implementations: address
//! formatting, national identity card numbers, national identification
//! numbers, passport numbers and VAT numbers. A bundle is selected once per
//! session; unknown language tags fall back to English.

use chrono::NaiveDate;
use tracing::warn;

use crate::catalog::DataCatalog;
use crate::dates::DateSampler;
use crate::errors::GenerationError;
use crate::person::{Address, Sex};
use crate::random::RandomSource;

pub mod de;
pub mod en;
pub mod es;
pub mod pl;
pub mod sv;

/// Supported data-set languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Lang {
    En,
    Pl,
    Sv,
    De,
    Es,
}

impl Lang {
    pub fn tag(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Pl => "pl",
            Lang::Sv => "sv",
            Lang::De => "de",
            Lang::Es => "es",
        }
    }

    /// Resolves a language tag, case-insensitively. Unknown tags resolve to
    /// English: a deliberate fallback, not a failure.
    pub fn resolve(tag: &str) -> Lang {
        match Lang::parse(tag) {
            Some(lang) => lang,
            None => {
                warn!(tag, "unknown locale, falling back to en");
                Lang::En
            }
        }
    }

    /// Like [`Lang::resolve`] but refuses unknown tags.
    pub fn resolve_strict(tag: &str) -> Result<Lang, GenerationError> {
        Lang::parse(tag).ok_or_else(|| GenerationError::UnsupportedLocale(tag.to_string()))
    }

    fn parse(tag: &str) -> Option<Lang> {
        // Accept both bare codes and region-qualified tags like "pl-PL".
        let code = tag.split(['-', '_']).next().unwrap_or(tag);
        match code.to_ascii_uppercase().as_str() {
            "EN" => Some(Lang::En),
            "PL" => Some(Lang::Pl),
            "SV" => Some(Lang::Sv),
            "DE" => Some(Lang::De),
            "ES" => Some(Lang::Es),
            _ => None,
        }
    }
}

/// Countries a generated person may hold as nationality, with their ISO 3166
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Country {
    Poland,
    UnitedKingdom,
    Australia,
    UnitedStates,
    Canada,
    Spain,
    Germany,
    Sweden,
    Uganda,
}

impl Country {
    pub fn code(self) -> &'static str {
        match self {
            Country::Poland => "PL",
            Country::UnitedKingdom => "GB",
            Country::Australia => "AU",
            Country::UnitedStates => "US",
            Country::Canada => "CA",
            Country::Spain => "ES",
            Country::Germany => "DE",
            Country::Sweden => "SE",
            Country::Uganda => "UG",
        }
    }

    /// Countries where `lang` is spoken. The nationality step falls back to
    /// [`Country::Uganda`] when this comes back empty.
    pub fn for_language(lang: Lang) -> &'static [Country] {
        match lang {
            Lang::En => &[
                Country::UnitedKingdom,
                Country::Australia,
                Country::UnitedStates,
                Country::Canada,
            ],
            Lang::Pl => &[Country::Poland],
            Lang::Sv => &[Country::Sweden],
            Lang::De => &[Country::Germany],
            Lang::Es => &[Country::Spain],
        }
    }
}

/// Address line formatting strategy.
pub trait AddressScheme: Send + Sync {
    fn assemble(
        &self,
        rng: &mut RandomSource,
        catalog: &DataCatalog,
    ) -> Result<Address, GenerationError>;
}

/// National identity card number strategy.
pub trait IdCardScheme: Send + Sync {
    fn construct(
        &self,
        rng: &mut RandomSource,
        dates: &DateSampler,
    ) -> Result<String, GenerationError>;

    fn validate(&self, value: &str) -> bool;
}

/// National identification number strategy. Consumes the person's date of
/// birth and sex when they are known; otherwise draws its own.
pub trait IdNumberScheme: Send + Sync {
    fn construct(
        &self,
        rng: &mut RandomSource,
        dates: &DateSampler,
        date_of_birth: Option<NaiveDate>,
        sex: Option<Sex>,
    ) -> Result<String, GenerationError>;

    fn validate(&self, value: &str) -> bool;
}

/// Passport number strategy.
pub trait PassportScheme: Send + Sync {
    fn construct(&self, rng: &mut RandomSource) -> Result<String, GenerationError>;

    fn validate(&self, value: &str) -> bool;
}

/// VAT identification number strategy.
pub trait VatScheme: Send + Sync {
    fn construct(
        &self,
        rng: &mut RandomSource,
        dates: &DateSampler,
    ) -> Result<String, GenerationError>;

    fn validate(&self, value: &str) -> bool;
}

/// The capability implementations selected for one generation session.
///
/// `id_number` is absent for languages whose data set carries no national
/// identification scheme; dependent fields stay unset rather than holding a
/// placeholder value.
pub struct LocaleBundle {
    pub lang: Lang,
    pub address: Box<dyn AddressScheme>,
    pub id_card: Box<dyn IdCardScheme>,
    pub id_number: Option<Box<dyn IdNumberScheme>>,
    pub passport: Box<dyn PassportScheme>,
    pub vat: Box<dyn VatScheme>,
}

impl LocaleBundle {
    /// Explicit capability registry: built once at session start, no runtime
    /// discovery involved.
    pub fn for_lang(lang: Lang) -> LocaleBundle {
        match lang {
            Lang::En => LocaleBundle {
                lang,
                address: Box::new(en::EnAddressScheme),
                id_card: Box::new(en::SocialSecurityNumber),
                id_number: None,
                passport: Box::new(en::EnPassportNumber),
                vat: Box::new(en::EmployerIdentificationNumber),
            },
            Lang::Pl => LocaleBundle {
                lang,
                address: Box::new(StreetFirstAddressScheme),
                id_card: Box::new(pl::PolishIdentityCardNumber),
                id_number: Some(Box::new(pl::Pesel)),
                passport: Box::new(pl::PolishPassportNumber),
                vat: Box::new(pl::PolishVatNumber),
            },
            Lang::Sv => LocaleBundle {
                lang,
                address: Box::new(StreetFirstAddressScheme),
                id_card: Box::new(sv::SwedishIdentityCardNumber),
                id_number: Some(Box::new(sv::Personnummer)),
                passport: Box::new(sv::SwedishPassportNumber),
                vat: Box::new(sv::SwedishVatNumber),
            },
            Lang::De => LocaleBundle {
                lang,
                address: Box::new(StreetFirstAddressScheme),
                id_card: Box::new(de::GermanIdentityCardNumber),
                id_number: None,
                passport: Box::new(de::GermanPassportNumber),
                vat: Box::new(de::GermanVatNumber),
            },
            Lang::Es => LocaleBundle {
                lang,
                address: Box::new(StreetFirstAddressScheme),
                id_card: Box::new(es::DocumentoNacionalDeIdentidad),
                id_number: None,
                passport: Box::new(es::SpanishPassportNumber),
                vat: Box::new(es::CodigoDeIdentificacionFiscal),
            },
        }
    }
}

/// Continental address layout: street name first, then house number.
pub struct StreetFirstAddressScheme;

impl AddressScheme for StreetFirstAddressScheme {
    fn assemble(
        &self,
        rng: &mut RandomSource,
        catalog: &DataCatalog,
    ) -> Result<Address, GenerationError> {
        let street = catalog.get_random_value("street", rng)?;
        let street_number = rng.next_int(1, 199).to_string();
        let apartment_number = if rng.next_bool() {
            Some(rng.next_int(1, 350).to_string())
        } else {
            None
        };
        let postal_format = catalog.get_random_value("postal_code", rng)?;
        let postal_code = rng.numerify(&postal_format);
        let city = catalog.get_random_value("city", rng)?;
        Ok(Address {
            street,
            street_number,
            apartment_number,
            postal_code,
            city,
            number_first: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_resolve_case_insensitively() {
        assert_eq!(Lang::resolve("pl"), Lang::Pl);
        assert_eq!(Lang::resolve("PL"), Lang::Pl);
        assert_eq!(Lang::resolve("sv-SE"), Lang::Sv);
    }

    #[test]
    fn unknown_tags_fall_back_to_english() {
        assert_eq!(Lang::resolve("xx"), Lang::En);
        assert_eq!(Lang::resolve(""), Lang::En);
    }

    #[test]
    fn strict_resolution_refuses_unknown_tags() {
        assert!(matches!(
            Lang::resolve_strict("xx"),
            Err(GenerationError::UnsupportedLocale(_))
        ));
        assert_eq!(Lang::resolve_strict("de").unwrap(), Lang::De);
    }

    #[test]
    fn every_language_maps_to_at_least_one_country() {
        for lang in [Lang::En, Lang::Pl, Lang::Sv, Lang::De, Lang::Es] {
            assert!(!Country::for_language(lang).is_empty());
        }
    }
}
