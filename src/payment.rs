//! Payment instruments: Luhn-checked credit cards and mod-97 IBANs.

use chrono::{Datelike, NaiveDateTime};
use tracing::trace;

use crate::errors::GenerationError;
use crate::locale::Lang;
use crate::session::Session;

const CREDIT_CARD_PREFIXES: &str = "creditCardPrefixes";
const CARD_VENDOR: &str = "Visa";
const CARD_BODY_LENGTH: usize = 15;
const CARD_VALIDITY_MONTHS: u32 = 36;

/// A generated credit card.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CreditCard {
    pub vendor: String,
    pub number: String,
    pub cvv: String,
    pub expiry_date: NaiveDateTime,
}

impl CreditCard {
    /// Expiry as embossed on the card, `MM/YY`.
    pub fn expiry_string(&self) -> String {
        format!(
            "{:02}/{:02}",
            self.expiry_date.month(),
            self.expiry_date.year().rem_euclid(100)
        )
    }
}

/// Luhn check digit for a card number body: doubles every second digit
/// counting from the rightmost body digit, folding products over nine.
pub fn luhn_check_digit(body: &str) -> Option<u32> {
    let len = body.len();
    let mut sum = 0;
    for (index, ch) in body.chars().enumerate() {
        let mut digit = ch.to_digit(10)?;
        if (len - index) % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit = digit % 10 + 1;
            }
        }
        sum += digit;
    }
    Some(sum * 9 % 10)
}

/// Standard Luhn validation over a full card number, check digit included.
pub fn luhn_valid(number: &str) -> bool {
    let Some(digits) = number
        .chars()
        .map(|ch| ch.to_digit(10))
        .collect::<Option<Vec<u32>>>()
    else {
        return false;
    };
    if digits.is_empty() {
        return false;
    }
    let mut sum = 0;
    for (offset, digit) in digits.iter().rev().enumerate() {
        let mut digit = *digit;
        if offset % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit = digit % 10 + 1;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}

pub(crate) fn generate_credit_card(session: &mut Session) -> Result<CreditCard, GenerationError> {
    let prefix =
        session
            .catalog
            .get_values_of_type(CREDIT_CARD_PREFIXES, CARD_VENDOR, &mut session.rng)?;
    let mut pattern = prefix;
    while pattern.chars().count() < CARD_BODY_LENGTH {
        pattern.push('#');
    }
    let body = session.rng.numerify(&pattern);
    let check = luhn_check_digit(&body)
        .ok_or_else(|| GenerationError::InvalidIdentifier(body.clone()))?;
    let expiry_date = session
        .dates
        .datetime_in_future_months(&mut session.rng, CARD_VALIDITY_MONTHS);
    Ok(CreditCard {
        vendor: CARD_VENDOR.to_string(),
        number: format!("{body}{check}"),
        cvv: session.rng.numerify("###"),
        expiry_date,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKind {
    BankCode,
    BranchCode,
    NationalCheckDigit,
    AccountNumber,
}

struct BbanSegment {
    kind: SegmentKind,
    len: usize,
    alpha: bool,
}

const fn digits(kind: SegmentKind, len: usize) -> BbanSegment {
    BbanSegment {
        kind,
        len,
        alpha: false,
    }
}

struct BbanRule {
    country: &'static str,
    segments: &'static [BbanSegment],
}

/// BBAN layouts of the supported countries, in wire order.
const BBAN_RULES: &[BbanRule] = &[
    BbanRule {
        country: "PL",
        segments: &[
            digits(SegmentKind::BankCode, 3),
            digits(SegmentKind::BranchCode, 4),
            digits(SegmentKind::NationalCheckDigit, 1),
            digits(SegmentKind::AccountNumber, 16),
        ],
    },
    BbanRule {
        country: "GB",
        segments: &[
            BbanSegment {
                kind: SegmentKind::BankCode,
                len: 4,
                alpha: true,
            },
            digits(SegmentKind::BranchCode, 6),
            digits(SegmentKind::AccountNumber, 8),
        ],
    },
    BbanRule {
        country: "DE",
        segments: &[
            digits(SegmentKind::BankCode, 8),
            digits(SegmentKind::AccountNumber, 10),
        ],
    },
    BbanRule {
        country: "ES",
        segments: &[
            digits(SegmentKind::BankCode, 4),
            digits(SegmentKind::BranchCode, 4),
            digits(SegmentKind::NationalCheckDigit, 2),
            digits(SegmentKind::AccountNumber, 10),
        ],
    },
    BbanRule {
        country: "SE",
        segments: &[
            digits(SegmentKind::BankCode, 3),
            digits(SegmentKind::AccountNumber, 16),
            digits(SegmentKind::NationalCheckDigit, 1),
        ],
    },
];

/// Default IBAN country for each bundled language.
pub(crate) fn iban_country_for(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "GB",
        Lang::Pl => "PL",
        Lang::Sv => "SE",
        Lang::De => "DE",
        Lang::Es => "ES",
    }
}

/// A generated international bank account number, with its parsed-out parts.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Iban {
    pub country: String,
    pub check_digits: String,
    pub bank_code: String,
    pub branch_code: Option<String>,
    pub national_check_digit: Option<String>,
    pub account_number: String,
    pub bban: String,
    /// The full electronic-format number.
    pub iban: String,
}

#[derive(Default)]
pub struct IbanDraft {
    country: Option<String>,
    bank_code: Option<String>,
    branch_code: Option<String>,
    national_check_digit: Option<String>,
    account_number: Option<String>,
}

/// Caller-supplied overrides for IBAN generation.
pub struct IbanProperty(Box<dyn FnOnce(&mut IbanDraft)>);

impl IbanProperty {
    /// Pins the ISO 3166 country whose BBAN layout is used.
    pub fn country(code: impl Into<String>) -> Self {
        let code = code.into().to_ascii_uppercase();
        IbanProperty(Box::new(move |draft| draft.country = Some(code)))
    }

    /// Pins the country through its language tag, e.g. `"sv"` for Sweden.
    pub fn language(tag: &str) -> Self {
        Self::country(iban_country_for(Lang::resolve(tag)))
    }

    pub fn bank_code(bank_code: impl Into<String>) -> Self {
        let bank_code = bank_code.into();
        IbanProperty(Box::new(move |draft| draft.bank_code = Some(bank_code)))
    }

    pub fn branch_code(branch_code: impl Into<String>) -> Self {
        let branch_code = branch_code.into();
        IbanProperty(Box::new(move |draft| draft.branch_code = Some(branch_code)))
    }

    pub fn national_check_digit(digit: impl Into<String>) -> Self {
        let digit = digit.into();
        IbanProperty(Box::new(move |draft| {
            draft.national_check_digit = Some(digit);
        }))
    }

    pub fn account_number(account_number: impl Into<String>) -> Self {
        let account_number = account_number.into();
        IbanProperty(Box::new(move |draft| {
            draft.account_number = Some(account_number);
        }))
    }

    fn apply(self, draft: &mut IbanDraft) {
        (self.0)(draft);
    }
}

/// ISO 7064 mod-97 remainder over the letter-expanded input.
fn mod97(input: &str) -> Option<u32> {
    let mut rem: u32 = 0;
    for ch in input.chars() {
        let value = if ch.is_ascii_digit() {
            ch.to_digit(10)?
        } else if ch.is_ascii_uppercase() {
            ch as u32 - 'A' as u32 + 10
        } else {
            return None;
        };
        rem = if value >= 10 {
            (rem * 100 + value) % 97
        } else {
            (rem * 10 + value) % 97
        };
    }
    Some(rem)
}

/// True when the full number's rearranged mod-97 remainder is one.
pub fn iban_valid(value: &str) -> bool {
    value.is_ascii()
        && value.len() > 4
        && mod97(&format!("{}{}", &value[4..], &value[..4])).is_some_and(|rem| rem == 1)
}

fn segment_value(
    session: &mut Session,
    segment: &BbanSegment,
    pinned: Option<String>,
) -> Result<String, GenerationError> {
    match pinned {
        Some(value) => {
            let well_formed = value.chars().count() == segment.len
                && value.chars().all(|ch| {
                    if segment.alpha {
                        ch.is_ascii_uppercase()
                    } else {
                        ch.is_ascii_digit()
                    }
                });
            if !well_formed {
                return Err(GenerationError::InvalidIdentifier(value));
            }
            Ok(value)
        }
        None if segment.alpha => Ok(session.rng.alphabetic_upper(segment.len)),
        None => Ok(session.rng.numeric_string(segment.len)),
    }
}

pub(crate) fn generate_iban(
    session: &mut Session,
    properties: Vec<IbanProperty>,
) -> Result<Iban, GenerationError> {
    let mut draft = IbanDraft::default();
    for property in properties {
        property.apply(&mut draft);
    }
    let country = match draft.country.take() {
        Some(country) => country,
        None => iban_country_for(session.catalog.language()?).to_string(),
    };
    let rule = BBAN_RULES
        .iter()
        .find(|rule| rule.country == country)
        .ok_or_else(|| GenerationError::UnsupportedLocale(country.clone()))?;

    let mut bank_code = String::new();
    let mut branch_code = None;
    let mut national_check_digit = None;
    let mut account_number = String::new();
    let mut bban = String::new();
    for segment in rule.segments {
        let pinned = match segment.kind {
            SegmentKind::BankCode => draft.bank_code.take(),
            SegmentKind::BranchCode => draft.branch_code.take(),
            SegmentKind::NationalCheckDigit => draft.national_check_digit.take(),
            SegmentKind::AccountNumber => draft.account_number.take(),
        };
        let value = segment_value(session, segment, pinned)?;
        bban.push_str(&value);
        match segment.kind {
            SegmentKind::BankCode => bank_code = value,
            SegmentKind::BranchCode => branch_code = Some(value),
            SegmentKind::NationalCheckDigit => national_check_digit = Some(value),
            SegmentKind::AccountNumber => account_number = value,
        }
    }

    let rem = mod97(&format!("{bban}{country}00"))
        .ok_or_else(|| GenerationError::InvalidIdentifier(bban.clone()))?;
    let check_digits = format!("{:02}", 98 - rem);
    let iban = format!("{country}{check_digits}{bban}");
    trace!(%iban, "generated iban");
    Ok(Iban {
        country,
        check_digits,
        bank_code,
        branch_code,
        national_check_digit,
        account_number,
        bban,
        iban,
    })
}
