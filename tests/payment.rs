use chrono::NaiveDate;
use wardgen::payment::{iban_valid, luhn_valid};
use wardgen::{Generator, IbanProperty};

fn generator(locale: &str, seed: u64) -> Generator {
    Generator::builder()
        .locale(locale)
        .seed(seed)
        .anchored_at(
            NaiveDate::from_ymd_opt(2024, 6, 15)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
        .build()
        .unwrap()
}

#[test]
fn credit_cards_are_sixteen_luhn_valid_digits() {
    let mut generator = generator("en", 21);
    for _ in 0..30 {
        let card = generator.credit_card().unwrap();
        assert_eq!(card.number.len(), 16);
        assert!(card.number.starts_with('4'), "{}", card.number);
        assert!(luhn_valid(&card.number), "{}", card.number);
    }
}

#[test]
fn credit_card_expiry_lies_within_three_years() {
    let mut generator = generator("en", 22);
    let now = NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    for _ in 0..20 {
        let card = generator.credit_card().unwrap();
        assert!(card.expiry_date >= now);
        assert!(card.expiry_date <= now + chrono::Duration::days(3 * 366));
    }
}

#[test]
fn iban_country_follows_the_session_locale() {
    for (locale, country) in [("en", "GB"), ("pl", "PL"), ("sv", "SE"), ("de", "DE"), ("es", "ES")]
    {
        let iban = generator(locale, 23).iban(Vec::new()).unwrap();
        assert_eq!(iban.country, country);
        assert!(iban_valid(&iban.iban), "{}", iban.iban);
    }
}

#[test]
fn iban_parts_recompose_into_the_full_number() {
    let mut generator = generator("pl", 24);
    for _ in 0..20 {
        let iban = generator.iban(Vec::new()).unwrap();
        assert_eq!(iban.iban.len(), 28);
        assert_eq!(
            iban.iban,
            format!("{}{}{}", iban.country, iban.check_digits, iban.bban)
        );
        assert!(iban.bban.starts_with(&iban.bank_code));
        assert!(iban.bban.ends_with(&iban.account_number));
    }
}

#[test]
fn pinned_account_number_is_kept() {
    let mut generator = generator("de", 25);
    let iban = generator
        .iban(vec![IbanProperty::account_number("0532013000")])
        .unwrap();
    assert_eq!(iban.account_number, "0532013000");
    assert!(iban.iban.ends_with("0532013000"));
    assert!(iban_valid(&iban.iban));
}

#[test]
fn corrupting_any_iban_digit_fails_validation() {
    let iban = generator("sv", 26).iban(Vec::new()).unwrap().iban;
    for at in 2..iban.len() {
        let mut corrupted = iban.clone().into_bytes();
        if !corrupted[at].is_ascii_digit() {
            continue;
        }
        corrupted[at] = if corrupted[at] == b'9' { b'0' } else { corrupted[at] + 1 };
        let corrupted = String::from_utf8(corrupted).unwrap();
        assert!(!iban_valid(&corrupted), "{iban} -> {corrupted}");
    }
}
