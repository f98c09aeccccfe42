use chrono::NaiveDate;
use wardgen::dates::years_between;
use wardgen::{Generator, PersonProperty, Sex};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn anchor() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn generator(locale: &str, seed: u64) -> Generator {
    Generator::builder()
        .locale(locale)
        .seed(seed)
        .anchored_at(anchor())
        .build()
        .unwrap()
}

#[test]
fn same_seed_replays_the_same_person() {
    init_tracing();
    let first = generator("en", 10).person(Vec::new()).unwrap();
    let second = generator("en", 10).person(Vec::new()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn different_seeds_generate_different_names() {
    let first = generator("en", 10).person(Vec::new()).unwrap();
    let second = generator("en", 20).person(Vec::new()).unwrap();
    assert_ne!(first.full_name(), second.full_name());
}

#[test]
fn overrides_pin_fields_and_keep_the_rest_consistent() {
    let person = generator("en", 7)
        .person(vec![
            PersonProperty::female(),
            PersonProperty::age_between(25, 59),
        ])
        .unwrap();
    assert_eq!(person.sex, Sex::Female);
    assert!((25..=59).contains(&person.age));
    assert!(person.marital_status.is_some());
    assert!(person.profession.is_some());
}

#[test]
fn age_always_agrees_with_date_of_birth() {
    let mut generator = generator("en", 3);
    for _ in 0..50 {
        let person = generator.person(Vec::new()).unwrap();
        let derived = years_between(person.date_of_birth, anchor().date());
        assert!(
            (derived - person.age as i32).abs() <= 1,
            "age {} vs derived {derived} for dob {}",
            person.age,
            person.date_of_birth
        );
    }
}

#[test]
fn minors_have_no_profession_or_marital_status() {
    let person = generator("en", 8)
        .person(vec![PersonProperty::with_age(9)])
        .unwrap();
    assert_eq!(person.age, 9);
    assert!(person.profession.is_none());
    assert!(person.marital_status.is_none());
}

#[test]
fn email_is_ascii_and_well_formed() {
    let mut generator = generator("pl", 11);
    for _ in 0..30 {
        let person = generator.person(Vec::new()).unwrap();
        assert!(person.email.is_ascii(), "{}", person.email);
        assert_eq!(person.email, person.email.to_lowercase());
        assert!(person.email.contains('@'));
        assert!(!person.email.contains(' '));
    }
}

#[test]
fn every_locale_produces_a_complete_person() {
    for locale in ["en", "pl", "sv", "de", "es"] {
        let person = generator(locale, 5).person(Vec::new()).unwrap();
        assert!(!person.first_name.is_empty(), "{locale}");
        assert!(!person.last_name.is_empty(), "{locale}");
        assert!(!person.address.city.is_empty(), "{locale}");
        assert!(!person.passport_number.is_empty(), "{locale}");
        assert!(!person.id_card_number.is_empty(), "{locale}");
    }
}
