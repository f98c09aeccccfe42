//! English-language identifier schemes (US-style documents).

use crate::catalog::DataCatalog;
use crate::dates::DateSampler;
use crate::errors::GenerationError;
use crate::locale::{AddressScheme, IdCardScheme, PassportScheme, VatScheme};
use crate::person::Address;
use crate::random::RandomSource;
use crate::text::left_pad;

/// Anglophone address layout: house number first, then the street name.
pub struct EnAddressScheme;

impl AddressScheme for EnAddressScheme {
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
            number_first: true,
        })
    }
}

const SSN_LENGTH: usize = 11;
// 666 and the 900+ block are never assigned.
const SSN_MAX_AREA: i32 = 899;
const SSN_UNASSIGNED_AREA: i32 = 666;

/// US Social Security number, `AAA-GG-SSSS`, used as the identity card
/// number for the English data set.
pub struct SocialSecurityNumber;

fn social_security_number(rng: &mut RandomSource) -> String {
    let mut area;
    loop {
        area = rng.next_int(1, SSN_MAX_AREA);
        if area != SSN_UNASSIGNED_AREA {
            break;
        }
    }
    let group = rng.next_int(1, 99);
    let serial = rng.next_int(1, 9999);
    format!("{area:03}-{group:02}-{serial:04}")
}

fn ssn_is_valid(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != SSN_LENGTH || bytes[3] != b'-' || bytes[6] != b'-' {
        return false;
    }
    if !value
        .chars()
        .enumerate()
        .all(|(index, ch)| index == 3 || index == 6 || ch.is_ascii_digit())
    {
        return false;
    }
    let parts: Vec<&str> = value.split('-').collect();
    let [area, group, serial] = parts[..] else {
        return false;
    };
    let Some((area, (group, serial))) = area
        .parse::<i32>()
        .ok()
        .zip(group.parse::<i32>().ok().zip(serial.parse::<i32>().ok()))
    else {
        return false;
    };
    (1..=SSN_MAX_AREA).contains(&area)
        && area != SSN_UNASSIGNED_AREA
        && (1..=99).contains(&group)
        && (1..=9999).contains(&serial)
}

impl IdCardScheme for SocialSecurityNumber {
    fn construct(
        &self,
        rng: &mut RandomSource,
        _dates: &DateSampler,
    ) -> Result<String, GenerationError> {
        Ok(social_security_number(rng))
    }

    fn validate(&self, value: &str) -> bool {
        ssn_is_valid(value)
    }
}

/// US passport number: nine digits.
pub struct EnPassportNumber;

impl PassportScheme for EnPassportNumber {
    fn construct(&self, rng: &mut RandomSource) -> Result<String, GenerationError> {
        Ok(rng.numeric_string(9))
    }

    fn validate(&self, value: &str) -> bool {
        value.len() == 9 && value.chars().all(|ch| ch.is_ascii_digit())
    }
}

const EIN_LENGTH: usize = 10;
// Campus prefixes the IRS has never issued.
const EIN_EXCLUDED_AREAS: [i32; 17] = [
    7, 8, 9, 17, 18, 19, 28, 29, 41, 47, 49, 69, 70, 79, 89, 96, 97,
];

/// US Employer Identification Number, `AA-SSSSSSS`, serving as the VAT
/// number for the English data set.
pub struct EmployerIdentificationNumber;

impl VatScheme for EmployerIdentificationNumber {
    fn construct(
        &self,
        rng: &mut RandomSource,
        _dates: &DateSampler,
    ) -> Result<String, GenerationError> {
        let mut area;
        loop {
            area = rng.next_int(0, 99);
            if !EIN_EXCLUDED_AREAS.contains(&area) {
                break;
            }
        }
        let serial = left_pad(&rng.next_int(1, 9999).to_string(), 7, '0');
        Ok(format!("{area:02}-{serial}"))
    }

    fn validate(&self, value: &str) -> bool {
        let bytes = value.as_bytes();
        if bytes.len() != EIN_LENGTH || bytes[2] != b'-' {
            return false;
        }
        if !value
            .chars()
            .enumerate()
            .all(|(index, ch)| index == 2 || ch.is_ascii_digit())
        {
            return false;
        }
        value[..2]
            .parse::<i32>()
            .is_ok_and(|area| !EIN_EXCLUDED_AREAS.contains(&area))
    }
}
