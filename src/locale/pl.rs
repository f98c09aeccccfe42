//! Polish identifier schemes.

use chrono::{Datelike, NaiveDate};

use crate::dates::DateSampler;
use crate::errors::GenerationError;
use crate::locale::{IdCardScheme, IdNumberScheme, PassportScheme, VatScheme};
use crate::person::Sex;
use crate::random::RandomSource;
use crate::text::{left_pad, to_alpha_base26};

const PESEL_LENGTH: usize = 11;
const PESEL_WEIGHTS: [u32; 10] = [1, 3, 7, 9, 1, 3, 7, 9, 1, 3];
// Month offsets encode the century of birth, starting at 1800.
const PERIOD_OFFSETS: [u32; 5] = [80, 0, 20, 40, 60];
const SEX_CODES: [u32; 5] = [0, 2, 4, 6, 8];
const DEFAULT_BIRTH_SPAN_YEARS: u32 = 10;

/// PESEL, the Polish national identification number. Encodes the date of
/// birth (with a century offset added to the month), a serial number, a sex
/// digit (odd for men, even for women) and a mod-10 check digit.
pub struct Pesel;

fn pesel_check_digit(digits: &str) -> Option<u32> {
    let mut sum = 0;
    for (ch, weight) in digits.chars().zip(PESEL_WEIGHTS) {
        sum += ch.to_digit(10)? * weight;
    }
    Some((10 - sum % 10) % 10)
}

impl IdNumberScheme for Pesel {
    fn construct(
        &self,
        rng: &mut RandomSource,
        dates: &DateSampler,
        date_of_birth: Option<NaiveDate>,
        sex: Option<Sex>,
    ) -> Result<String, GenerationError> {
        let born =
            date_of_birth.unwrap_or_else(|| dates.date_in_past(rng, DEFAULT_BIRTH_SPAN_YEARS));
        let sex = sex.unwrap_or_else(|| {
            if rng.next_bool() {
                Sex::Male
            } else {
                Sex::Female
            }
        });
        let period = ((born.year() - 1800) / 100).clamp(0, 4) as usize;
        let month = born.month() + PERIOD_OFFSETS[period];
        let serial = rng.next_int(0, 999);
        let sex_code = SEX_CODES[rng.next_int(0, 4) as usize] + u32::from(sex == Sex::Male);
        let body = format!(
            "{:02}{:02}{:02}{:03}{}",
            born.year().rem_euclid(100),
            month,
            born.day(),
            serial,
            sex_code
        );
        let check = pesel_check_digit(&body)
            .ok_or_else(|| GenerationError::InvalidIdentifier(body.clone()))?;
        Ok(format!("{body}{check}"))
    }

    fn validate(&self, value: &str) -> bool {
        value.len() == PESEL_LENGTH
            && value.chars().all(|ch| ch.is_ascii_digit())
            && value.chars().nth(10).and_then(|ch| ch.to_digit(10)) == pesel_check_digit(value)
    }
}

const CARD_WEIGHTS: [u32; 9] = [7, 3, 1, 0, 7, 3, 1, 7, 3];
const CARD_CHECKSUM_INDEX: usize = 3;
const CARD_ISSUING_BEGIN: i32 = 2000;
// Series advance 45 positions per issuing year.
const CARD_SERIES_SPAN: i32 = 45;
const CARD_DIGITS: usize = 5;

/// Polish identity card number: a three letter series derived from the
/// issuing year, a check digit at position four, then five digits.
pub struct PolishIdentityCardNumber;

fn card_check_digit(id: &[char]) -> Option<u32> {
    let mut sum = 0;
    for (index, weight) in CARD_WEIGHTS.iter().enumerate() {
        let value = if index < CARD_CHECKSUM_INDEX {
            if !id[index].is_ascii_uppercase() {
                return None;
            }
            id[index] as u32 - 'A' as u32 + 10
        } else if index > CARD_CHECKSUM_INDEX {
            id[index].to_digit(10)?
        } else {
            0
        };
        sum += weight * value;
    }
    Some(sum % 10)
}

impl IdCardScheme for PolishIdentityCardNumber {
    fn construct(
        &self,
        rng: &mut RandomSource,
        dates: &DateSampler,
    ) -> Result<String, GenerationError> {
        let begin = NaiveDate::from_ymd_opt(CARD_ISSUING_BEGIN, 1, 1)
            .unwrap_or_else(|| dates.today());
        let issued = dates.date_between(rng, begin, dates.today());
        let max_prefix = (issued.year() - CARD_ISSUING_BEGIN).max(0) * CARD_SERIES_SPAN;
        let series_value = rng.next_int(max_prefix, max_prefix + CARD_SERIES_SPAN);
        let series = left_pad(&to_alpha_base26(series_value as u32), 3, 'A');
        let digits = left_pad(&rng.next_int(0, 99_999).to_string(), CARD_DIGITS, '0');
        let mut id: Vec<char> = format!("{series}0{digits}").chars().collect();
        let check = card_check_digit(&id)
            .ok_or_else(|| GenerationError::InvalidIdentifier(id.iter().collect()))?;
        id[CARD_CHECKSUM_INDEX] = char::from_digit(check, 10).unwrap_or('0');
        Ok(id.into_iter().collect())
    }

    fn validate(&self, value: &str) -> bool {
        let chars: Vec<char> = value.chars().collect();
        chars.len() == CARD_WEIGHTS.len()
            && card_check_digit(&chars)
                .is_some_and(|check| chars[CARD_CHECKSUM_INDEX].to_digit(10) == Some(check))
    }
}

const PASSPORT_WEIGHTS: [u32; 9] = [7, 3, 9, 1, 7, 3, 1, 7, 3];
const PASSPORT_CHECKSUM_INDEX: usize = 2;

/// Polish passport number: a two letter series, a check digit at position
/// three, then six digits. The weighted sum over all nine positions is a
/// multiple of ten for a well-formed number.
pub struct PolishPassportNumber;

impl PassportScheme for PolishPassportNumber {
    fn construct(&self, rng: &mut RandomSource) -> Result<String, GenerationError> {
        let series = rng.alphabetic_upper(2);
        let digits = rng.numeric_string(6);
        let mut sum = 0;
        for (index, ch) in series.chars().enumerate() {
            sum += (ch as u32 - 'A' as u32 + 10) * PASSPORT_WEIGHTS[index];
        }
        for (index, ch) in digits.chars().enumerate() {
            sum += ch.to_digit(10).unwrap_or(0) * PASSPORT_WEIGHTS[index + 3];
        }
        Ok(format!("{series}{}{digits}", sum % 10))
    }

    fn validate(&self, value: &str) -> bool {
        let chars: Vec<char> = value.chars().collect();
        if chars.len() != PASSPORT_WEIGHTS.len() {
            return false;
        }
        let mut sum = 0;
        for (index, weight) in PASSPORT_WEIGHTS.iter().enumerate() {
            let digit = if index < PASSPORT_CHECKSUM_INDEX {
                if !chars[index].is_ascii_uppercase() {
                    return false;
                }
                chars[index] as u32 - 'A' as u32 + 10
            } else {
                match chars[index].to_digit(10) {
                    Some(digit) => digit,
                    None => return false,
                }
            };
            sum += weight * digit;
        }
        sum % 10 == 0
    }
}

const NIP_WEIGHTS: [u32; 9] = [6, 5, 7, 2, 3, 4, 5, 6, 7];
const NIP_LENGTH: usize = 10;

/// NIP, the Polish VAT identification number: nine digits and a mod-11
/// check digit. Bodies whose weighted sum reduces to ten are never issued,
/// so construction redraws until the checksum lands in range.
pub struct PolishVatNumber;

fn nip_check_digit(digits: &str) -> Option<u32> {
    let mut sum = 0;
    for (ch, weight) in digits.chars().zip(NIP_WEIGHTS) {
        sum += ch.to_digit(10)? * weight;
    }
    match sum % 11 {
        10 => None,
        check => Some(check),
    }
}

impl VatScheme for PolishVatNumber {
    fn construct(
        &self,
        rng: &mut RandomSource,
        _dates: &DateSampler,
    ) -> Result<String, GenerationError> {
        loop {
            let body = format!("{}{}", rng.next_int(1, 9), rng.numeric_string(8));
            if let Some(check) = nip_check_digit(&body) {
                return Ok(format!("{body}{check}"));
            }
        }
    }

    fn validate(&self, value: &str) -> bool {
        value.len() == NIP_LENGTH
            && value.chars().all(|ch| ch.is_ascii_digit())
            && value.chars().nth(9).and_then(|ch| ch.to_digit(10)) == nip_check_digit(&value[..9])
    }
}
