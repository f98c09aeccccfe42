//! Swedish identifier schemes.

use chrono::{Datelike, NaiveDate};

use crate::dates::{shift_years, DateSampler};
use crate::errors::GenerationError;
use crate::locale::{IdCardScheme, IdNumberScheme, PassportScheme, VatScheme};
use crate::person::Sex;
use crate::random::RandomSource;

const PERSONNUMMER_LENGTH: usize = 11;
// Products over ten contribute their digit sum, as in the Luhn scheme.
const PERSONNUMMER_WEIGHTS: [u32; 9] = [2, 1, 2, 1, 2, 1, 2, 1, 2];
const SEX_CODES: [u32; 5] = [0, 2, 4, 6, 8];
const DEFAULT_BIRTH_SPAN_YEARS: u32 = 120;

/// Personnummer, the Swedish personal identity number, in its ten digit
/// short form: `YYMMDD-NNP` plus a check digit.
pub struct Personnummer;

fn personnummer_check_digit(body: &str) -> Option<u32> {
    let digits: Vec<u32> = body
        .chars()
        .filter(|ch| *ch != '-')
        .map(|ch| ch.to_digit(10))
        .collect::<Option<Vec<u32>>>()?;
    let mut sum = 0;
    for (digit, weight) in digits.into_iter().zip(PERSONNUMMER_WEIGHTS) {
        let product = digit * weight;
        sum += product / 10 + product % 10;
    }
    Some((10 - sum % 10) % 10)
}

impl IdNumberScheme for Personnummer {
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
        let serial = rng.next_int(0, 99);
        let sex_code = SEX_CODES[rng.next_int(0, 4) as usize] + u32::from(sex == Sex::Male);
        let body = format!(
            "{:02}{:02}{:02}-{:02}{}",
            born.year().rem_euclid(100),
            born.month(),
            born.day(),
            serial,
            sex_code
        );
        let check = personnummer_check_digit(&body)
            .ok_or_else(|| GenerationError::InvalidIdentifier(body.clone()))?;
        Ok(format!("{body}{check}"))
    }

    fn validate(&self, value: &str) -> bool {
        let bytes = value.as_bytes();
        if bytes.len() != PERSONNUMMER_LENGTH || bytes[6] != b'-' {
            return false;
        }
        if !value
            .chars()
            .enumerate()
            .all(|(index, ch)| index == 6 || ch.is_ascii_digit())
        {
            return false;
        }
        value.chars().nth(10).and_then(|ch| ch.to_digit(10))
            == personnummer_check_digit(&value[..10])
    }
}

/// Swedish national identity cards carry a plain eight digit serial.
pub struct SwedishIdentityCardNumber;

impl IdCardScheme for SwedishIdentityCardNumber {
    fn construct(
        &self,
        rng: &mut RandomSource,
        _dates: &DateSampler,
    ) -> Result<String, GenerationError> {
        Ok(rng.numeric_string(8))
    }

    fn validate(&self, value: &str) -> bool {
        value.len() == 8 && value.chars().all(|ch| ch.is_ascii_digit())
    }
}

/// Swedish passport number: eight digits.
pub struct SwedishPassportNumber;

impl PassportScheme for SwedishPassportNumber {
    fn construct(&self, rng: &mut RandomSource) -> Result<String, GenerationError> {
        Ok(rng.numeric_string(8))
    }

    fn validate(&self, value: &str) -> bool {
        value.len() == 8 && value.chars().all(|ch| ch.is_ascii_digit())
    }
}

const VAT_LENGTH: usize = 14;
// Legal form marker; 4 is not assigned.
const VAT_GROUP_NUMBERS: [u32; 8] = [1, 2, 3, 5, 6, 7, 8, 9];
const SOLE_TRADER_LOWER_AGE: i32 = 16;
const SOLE_TRADER_UPPER_AGE: i32 = 100;

/// Swedish VAT identification number: `SE`, a ten digit organisation number
/// and the `01` suffix. Roughly half of all numbers are issued to sole
/// traders, whose organisation number is their personal identity number.
pub struct SwedishVatNumber;

impl VatScheme for SwedishVatNumber {
    fn construct(
        &self,
        rng: &mut RandomSource,
        dates: &DateSampler,
    ) -> Result<String, GenerationError> {
        if rng.next_bool() {
            let earliest = shift_years(dates.today(), -SOLE_TRADER_UPPER_AGE);
            let latest = shift_years(dates.today(), -SOLE_TRADER_LOWER_AGE);
            let born = dates.date_between(rng, earliest, latest);
            let personal = Personnummer.construct(rng, dates, Some(born), None)?;
            return Ok(format!("SE{}01", personal.replace('-', "")));
        }
        let group = rng.choose_one(&VAT_GROUP_NUMBERS)?;
        let body = format!(
            "{group}{}{:02}{}",
            rng.numeric_string(1),
            rng.next_int(20, 99),
            rng.numeric_string(5)
        );
        let check = personnummer_check_digit(&body)
            .ok_or_else(|| GenerationError::InvalidIdentifier(body.clone()))?;
        Ok(format!("SE{body}{check}01"))
    }

    fn validate(&self, value: &str) -> bool {
        value.len() == VAT_LENGTH
            && value.starts_with("SE")
            && value.ends_with("01")
            && value[2..].chars().all(|ch| ch.is_ascii_digit())
            && value.chars().nth(11).and_then(|ch| ch.to_digit(10))
                == personnummer_check_digit(&value[2..12])
    }
}
