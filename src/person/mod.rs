//! Person records and their field pipeline.
//!
//! A person is assembled by an ordered table of field steps over a draft of
//! tagged optionals. Steps later in the table read fields produced earlier
//! (the email needs the name, the national identification number needs the
//! date of birth and sex), so the order is part of the contract. Every step
//! skips fields already pinned by a [`PersonProperty`] override.

use std::fmt;

use chrono::{Duration, NaiveDate};
use tracing::trace;

use crate::company::{self, Company};
use crate::dates::{shift_years, years_between};
use crate::errors::GenerationError;
use crate::locale::Country;
use crate::session::{run_steps, Session, Step};
use crate::text::{strip_accents, strip_sharp_s};

mod properties;

pub use properties::PersonProperty;

const FIRST_NAME: &str = "firstNames";
const LAST_NAME: &str = "lastNames";
const PERSONAL_EMAIL: &str = "personalEmails";
const TELEPHONE_NUMBER_FORMATS: &str = "telephone_number_formats";
const PROFESSION: &str = "profession";
const MARITAL_STATUS: &str = "maritalStatus";
const BLOOD_TYPE: &str = "bloodType";
const PARENTS_ALIVE: &str = "parentsAlive";

pub(crate) const MIN_AGE: u32 = 1;
pub(crate) const MAX_AGE: u32 = 100;
// Below this age, profession and marital status stay unset.
const ADULT_AGE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Catalog group discriminator for sex-split name and profession lists.
    pub(crate) fn key(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

/// A postal address. `number_first` captures the locale's layout: anglophone
/// addresses lead with the house number, continental ones with the street.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Address {
    pub street: String,
    pub street_number: String,
    pub apartment_number: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub number_first: bool,
}

impl Address {
    pub fn line1(&self) -> String {
        let base = if self.number_first {
            format!("{} {}", self.street_number, self.street)
        } else {
            format!("{} {}", self.street, self.street_number)
        };
        match &self.apartment_number {
            Some(apartment) => format!("{base}/{apartment}"),
            None => base,
        }
    }

    pub fn line2(&self) -> String {
        format!("{} {}", self.postal_code, self.city)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.line1(), self.line2())
    }
}

/// Whether a parent is alive, as recorded in patient registration data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ParentStatus {
    Alive,
    Deceased,
    Unknown,
}

impl ParentStatus {
    fn from_code(code: &str) -> Option<ParentStatus> {
        match code.chars().next()? {
            'Y' => Some(ParentStatus::Alive),
            'D' => Some(ParentStatus::Deceased),
            'U' => Some(ParentStatus::Unknown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ParentsTogether {
    Together,
    Apart,
    Unknown,
}

/// A generated person.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Person {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub sex: Sex,
    pub age: u32,
    pub date_of_birth: NaiveDate,
    pub address: Address,
    pub email: String,
    pub username: String,
    pub password: String,
    pub telephone_number: String,
    pub mobile_telephone_number: String,
    pub company: Company,
    pub company_email: String,
    pub id_card_number: String,
    /// Absent for locales without a national identification scheme.
    pub id_number: Option<String>,
    pub passport_number: String,
    pub nationality: Country,
    /// Unset below the age of twenty.
    pub profession: Option<String>,
    /// Unset below the age of twenty.
    pub marital_status: Option<String>,
    pub blood_type: String,
    pub name_of_mother: String,
    pub name_of_father: String,
    pub mother_alive: ParentStatus,
    pub father_alive: ParentStatus,
    pub parents_together: ParentsTogether,
    pub insured: bool,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_male(&self) -> bool {
        self.sex == Sex::Male
    }

    pub fn is_female(&self) -> bool {
        self.sex == Sex::Female
    }
}

/// Work-in-progress person. Double options distinguish "not decided yet"
/// from "decided to leave unset".
#[derive(Default)]
pub struct PersonDraft {
    pub(crate) sex: Option<Sex>,
    pub(crate) age: Option<u32>,
    pub(crate) date_of_birth: Option<NaiveDate>,
    pub(crate) telephone_format: Option<String>,
    pub(crate) mobile_format: Option<String>,
    pub(crate) company: Option<Company>,
    pub(crate) address: Option<Address>,
    pub(crate) first_name: Option<String>,
    pub(crate) middle_name: Option<Option<String>>,
    pub(crate) last_name: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) telephone_number: Option<String>,
    pub(crate) mobile_telephone_number: Option<String>,
    pub(crate) company_email: Option<String>,
    pub(crate) id_card_number: Option<String>,
    pub(crate) id_number: Option<Option<String>>,
    pub(crate) passport_number: Option<String>,
    pub(crate) nationality: Option<Country>,
    pub(crate) profession: Option<Option<String>>,
    pub(crate) marital_status: Option<Option<String>>,
    pub(crate) blood_type: Option<String>,
    pub(crate) name_of_mother: Option<String>,
    pub(crate) name_of_father: Option<String>,
    pub(crate) mother_alive: Option<ParentStatus>,
    pub(crate) father_alive: Option<ParentStatus>,
    pub(crate) parents_together: Option<ParentsTogether>,
    pub(crate) insured: Option<bool>,
}

fn req<T>(field: Option<T>) -> Result<T, GenerationError> {
    field.ok_or(GenerationError::IncompleteDraft("person"))
}

impl PersonDraft {
    fn finish(self) -> Result<Person, GenerationError> {
        Ok(Person {
            first_name: req(self.first_name)?,
            middle_name: req(self.middle_name)?,
            last_name: req(self.last_name)?,
            sex: req(self.sex)?,
            age: req(self.age)?,
            date_of_birth: req(self.date_of_birth)?,
            address: req(self.address)?,
            email: req(self.email)?,
            username: req(self.username)?,
            password: req(self.password)?,
            telephone_number: req(self.telephone_number)?,
            mobile_telephone_number: req(self.mobile_telephone_number)?,
            company: req(self.company)?,
            company_email: req(self.company_email)?,
            id_card_number: req(self.id_card_number)?,
            id_number: req(self.id_number)?,
            passport_number: req(self.passport_number)?,
            nationality: req(self.nationality)?,
            profession: req(self.profession)?,
            marital_status: req(self.marital_status)?,
            blood_type: req(self.blood_type)?,
            name_of_mother: req(self.name_of_mother)?,
            name_of_father: req(self.name_of_father)?,
            mother_alive: req(self.mother_alive)?,
            father_alive: req(self.father_alive)?,
            parents_together: req(self.parents_together)?,
            insured: req(self.insured)?,
        })
    }
}

const STEPS: &[Step<PersonDraft>] = &[
    sex,
    company,
    first_name,
    middle_name,
    last_name,
    email,
    username,
    telephone_number,
    age,
    date_of_birth,
    company_email,
    password,
    id_card_number,
    id_number,
    passport_number,
    address,
    nationality,
    mobile_telephone_number,
    profession,
    marital_status,
    blood_type,
    name_of_mother,
    name_of_father,
    mother_alive,
    father_alive,
    parents_together,
    insurance,
];

pub(crate) fn generate(
    session: &mut Session,
    properties: Vec<PersonProperty>,
) -> Result<Person, GenerationError> {
    let mut draft = PersonDraft::default();
    for property in properties {
        property.apply(&mut draft, &mut session.rng);
    }
    run_steps(&mut draft, STEPS, session)?;
    let person = draft.finish()?;
    trace!(name = %person.full_name(), "generated person");
    Ok(person)
}

fn sex(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.sex.is_none() {
        draft.sex = Some(if session.rng.next_bool() {
            Sex::Male
        } else {
            Sex::Female
        });
    }
    Ok(())
}

fn company(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.company.is_none() {
        draft.company = Some(company::generate(session, Vec::new())?);
    }
    Ok(())
}

fn first_name(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.first_name.is_none() {
        let sex = req(draft.sex)?;
        draft.first_name = Some(session.catalog.get_values_of_type(
            FIRST_NAME,
            sex.key(),
            &mut session.rng,
        )?);
    }
    Ok(())
}

fn middle_name(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.middle_name.is_none() {
        let sex = req(draft.sex)?;
        draft.middle_name = Some(if session.rng.next_bool() {
            Some(session.catalog.get_values_of_type(
                FIRST_NAME,
                sex.key(),
                &mut session.rng,
            )?)
        } else {
            None
        });
    }
    Ok(())
}

fn last_name(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.last_name.is_none() {
        let sex = req(draft.sex)?;
        draft.last_name = Some(session.catalog.get_values_of_type(
            LAST_NAME,
            sex.key(),
            &mut session.rng,
        )?);
    }
    Ok(())
}

fn email(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.email.is_some() {
        return Ok(());
    }
    let first = req(draft.first_name.as_deref())?;
    let last = req(draft.last_name.as_deref())?;
    let prefix = match session.rng.next_int(1, 3) {
        1 => format!("{first}{last}").replace(' ', ""),
        2 => format!("{first}.{last}").replace(' ', "."),
        _ => last.replace(' ', ""),
    };
    let host = session
        .catalog
        .get_random_value(PERSONAL_EMAIL, &mut session.rng)?;
    let email = format!("{prefix}@{host}").to_lowercase();
    draft.email = Some(strip_sharp_s(&strip_accents(&email)));
    Ok(())
}

fn username(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.username.is_some() {
        return Ok(());
    }
    let first = req(draft.first_name.as_deref())?;
    let last = req(draft.last_name.as_deref())?;
    let username = if session.rng.next_bool() {
        let initial: String = first.chars().take(1).collect();
        format!("{initial}{last}")
    } else {
        let initial: String = last.chars().take(1).collect();
        format!("{first}{initial}")
    };
    draft.username = Some(strip_accents(&username.to_lowercase()));
    Ok(())
}

fn telephone_number(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.telephone_number.is_some() {
        return Ok(());
    }
    let format = match draft.telephone_format.clone() {
        Some(format) => format,
        None => session
            .catalog
            .get_random_value(TELEPHONE_NUMBER_FORMATS, &mut session.rng)?,
    };
    draft.telephone_number = Some(session.rng.numerify(&format));
    Ok(())
}

fn mobile_telephone_number(
    draft: &mut PersonDraft,
    session: &mut Session,
) -> Result<(), GenerationError> {
    if draft.mobile_telephone_number.is_some() {
        return Ok(());
    }
    let format = match draft.mobile_format.clone() {
        Some(format) => format,
        None => session
            .catalog
            .get_random_value(TELEPHONE_NUMBER_FORMATS, &mut session.rng)?,
    };
    draft.mobile_telephone_number = Some(session.rng.numerify(&format));
    Ok(())
}

/// A pinned date of birth always wins over a pinned age.
fn age(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if let Some(born) = draft.date_of_birth {
        draft.age = Some(years_between(born, session.dates.today()).max(0) as u32);
    } else if draft.age.is_none() {
        draft.age = Some(session.rng.next_int(MIN_AGE as i32, MAX_AGE as i32) as u32);
    }
    Ok(())
}

/// Uniform over the one-year window that yields exactly the drawn age.
fn date_of_birth(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.date_of_birth.is_some() {
        return Ok(());
    }
    let age = req(draft.age)?;
    let latest = shift_years(session.dates.today(), -(age as i32));
    let earliest = shift_years(latest, -1) + Duration::days(1);
    draft.date_of_birth = Some(session.dates.date_between(&mut session.rng, earliest, latest));
    Ok(())
}

fn company_email(draft: &mut PersonDraft, _session: &mut Session) -> Result<(), GenerationError> {
    if draft.company_email.is_some() {
        return Ok(());
    }
    let first = req(draft.first_name.as_deref())?;
    let last = req(draft.last_name.as_deref())?;
    let domain = req(draft.company.as_ref().map(|company| company.domain.clone()))?;
    let email = format!("{first}.{last}@{domain}")
        .to_lowercase()
        .replace(' ', ".");
    draft.company_email = Some(strip_sharp_s(&strip_accents(&email)));
    Ok(())
}

fn password(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.password.is_none() {
        draft.password = Some(session.rng.alphanumeric(8));
    }
    Ok(())
}

fn id_card_number(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.id_card_number.is_none() {
        draft.id_card_number = Some(
            session
                .bundle
                .id_card
                .construct(&mut session.rng, &session.dates)?,
        );
    }
    Ok(())
}

fn id_number(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.id_number.is_some() {
        return Ok(());
    }
    draft.id_number = Some(match &session.bundle.id_number {
        Some(scheme) => Some(scheme.construct(
            &mut session.rng,
            &session.dates,
            draft.date_of_birth,
            draft.sex,
        )?),
        None => None,
    });
    Ok(())
}

fn passport_number(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.passport_number.is_none() {
        draft.passport_number = Some(session.bundle.passport.construct(&mut session.rng)?);
    }
    Ok(())
}

fn address(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.address.is_none() {
        draft.address = Some(
            session
                .bundle
                .address
                .assemble(&mut session.rng, session.catalog.as_ref())?,
        );
    }
    Ok(())
}

fn nationality(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.nationality.is_some() {
        return Ok(());
    }
    let countries = Country::for_language(session.catalog.language()?);
    draft.nationality = Some(if countries.is_empty() {
        Country::Uganda
    } else {
        *session.rng.choose_one(countries)?
    });
    Ok(())
}

fn profession(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.profession.is_some() {
        return Ok(());
    }
    let age = req(draft.age)?;
    draft.profession = Some(if age < ADULT_AGE {
        None
    } else {
        let sex = req(draft.sex)?;
        Some(
            session
                .catalog
                .get_values_of_type(PROFESSION, sex.key(), &mut session.rng)?,
        )
    });
    Ok(())
}

fn marital_status(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.marital_status.is_some() {
        return Ok(());
    }
    let age = req(draft.age)?;
    draft.marital_status = Some(if age < ADULT_AGE {
        None
    } else {
        Some(
            session
                .catalog
                .get_random_value(MARITAL_STATUS, &mut session.rng)?,
        )
    });
    Ok(())
}

fn blood_type(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.blood_type.is_none() {
        draft.blood_type = Some(session.catalog.get_random_value(BLOOD_TYPE, &mut session.rng)?);
    }
    Ok(())
}

fn name_of_mother(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.name_of_mother.is_none() {
        draft.name_of_mother = Some(session.catalog.get_values_of_type(
            FIRST_NAME,
            Sex::Female.key(),
            &mut session.rng,
        )?);
    }
    Ok(())
}

fn name_of_father(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.name_of_father.is_none() {
        draft.name_of_father = Some(session.catalog.get_values_of_type(
            FIRST_NAME,
            Sex::Male.key(),
            &mut session.rng,
        )?);
    }
    Ok(())
}

fn parent_status(session: &mut Session) -> Result<ParentStatus, GenerationError> {
    let code = session
        .catalog
        .get_random_value(PARENTS_ALIVE, &mut session.rng)?;
    ParentStatus::from_code(&code)
        .ok_or_else(|| GenerationError::DataFile(format!("unrecognized parentsAlive code: {code}")))
}

fn mother_alive(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.mother_alive.is_none() {
        draft.mother_alive = Some(parent_status(session)?);
    }
    Ok(())
}

fn father_alive(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.father_alive.is_none() {
        draft.father_alive = Some(parent_status(session)?);
    }
    Ok(())
}

/// Unknown whenever either parent's status is unknown; apart when either
/// parent is deceased; otherwise a coin flip.
fn parents_together(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.parents_together.is_some() {
        return Ok(());
    }
    let mother = req(draft.mother_alive)?;
    let father = req(draft.father_alive)?;
    draft.parents_together = Some(
        if mother == ParentStatus::Unknown || father == ParentStatus::Unknown {
            ParentsTogether::Unknown
        } else if mother == ParentStatus::Deceased || father == ParentStatus::Deceased {
            ParentsTogether::Apart
        } else if session.rng.next_bool() {
            ParentsTogether::Together
        } else {
            ParentsTogether::Apart
        },
    );
    Ok(())
}

fn insurance(draft: &mut PersonDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.insured.is_none() {
        draft.insured = Some(session.rng.next_bool());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataCatalog;
    use crate::dates::DateSampler;
    use crate::locale::{Lang, LocaleBundle};
    use crate::random::RandomSource;
    use std::sync::Arc;

    fn session(lang: Lang, seed: u64) -> Session {
        Session {
            rng: RandomSource::from_seed(seed),
            dates: DateSampler::new(
                NaiveDate::from_ymd_opt(2024, 6, 15)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
            ),
            catalog: Arc::new(DataCatalog::builtin(lang).unwrap()),
            bundle: Arc::new(LocaleBundle::for_lang(lang)),
        }
    }

    #[test]
    fn generates_a_complete_person() {
        let mut session = session(Lang::En, 10);
        let person = generate(&mut session, Vec::new()).unwrap();
        assert!(!person.first_name.is_empty());
        assert!(!person.last_name.is_empty());
        assert!(person.email.contains('@'));
        assert!(person.email.is_ascii());
        assert!((MIN_AGE..=MAX_AGE).contains(&person.age));
        assert_eq!(person.full_name(), format!("{} {}", person.first_name, person.last_name));
        assert!(session.bundle.id_card.validate(&person.id_card_number));
        assert!(session.bundle.passport.validate(&person.passport_number));
    }

    #[test]
    fn age_follows_a_pinned_date_of_birth() {
        let mut session = session(Lang::En, 10);
        let born = NaiveDate::from_ymd_opt(1990, 1, 20).unwrap();
        let person = generate(
            &mut session,
            vec![PersonProperty::with_date_of_birth(born)],
        )
        .unwrap();
        assert_eq!(person.date_of_birth, born);
        assert_eq!(person.age, 34);
    }

    #[test]
    fn date_of_birth_matches_a_pinned_age() {
        let mut session = session(Lang::Pl, 21);
        let person = generate(&mut session, vec![PersonProperty::with_age(40)]).unwrap();
        assert_eq!(person.age, 40);
        let recomputed = years_between(person.date_of_birth, session.dates.today());
        assert_eq!(recomputed, 40);
    }

    #[test]
    fn minors_have_no_profession_or_marital_status() {
        let mut session = session(Lang::En, 3);
        let person = generate(&mut session, vec![PersonProperty::with_age(12)]).unwrap();
        assert_eq!(person.profession, None);
        assert_eq!(person.marital_status, None);
    }

    #[test]
    fn adults_have_profession_and_marital_status() {
        let mut session = session(Lang::En, 3);
        let person = generate(
            &mut session,
            vec![PersonProperty::female(), PersonProperty::age_between(25, 59)],
        )
        .unwrap();
        assert_eq!(person.sex, Sex::Female);
        assert!((25..=59).contains(&person.age));
        assert!(person.profession.is_some());
        assert!(person.marital_status.is_some());
    }

    #[test]
    fn polish_person_gets_a_pesel_consistent_with_dob() {
        let mut session = session(Lang::Pl, 77);
        let born = NaiveDate::from_ymd_opt(1985, 11, 30).unwrap();
        let person = generate(
            &mut session,
            vec![
                PersonProperty::male(),
                PersonProperty::with_date_of_birth(born),
            ],
        )
        .unwrap();
        let pesel = person.id_number.unwrap();
        assert!(pesel.starts_with("851130"), "{pesel}");
        let scheme = session.bundle.id_number.as_ref().unwrap();
        assert!(scheme.validate(&pesel));
    }

    #[test]
    fn german_person_has_no_id_number() {
        let mut session = session(Lang::De, 4);
        let person = generate(&mut session, Vec::new()).unwrap();
        assert_eq!(person.id_number, None);
    }

    #[test]
    fn deceased_parents_are_never_reported_together() {
        let mut session = session(Lang::En, 8);
        for _ in 0..40 {
            let person = generate(&mut session, Vec::new()).unwrap();
            match (person.mother_alive, person.father_alive) {
                (ParentStatus::Unknown, _) | (_, ParentStatus::Unknown) => {
                    assert_eq!(person.parents_together, ParentsTogether::Unknown)
                }
                (ParentStatus::Deceased, _) | (_, ParentStatus::Deceased) => {
                    assert_eq!(person.parents_together, ParentsTogether::Apart)
                }
                _ => {}
            }
        }
    }

    #[test]
    fn parents_keep_their_sexed_name_pools() {
        let mut session = session(Lang::Pl, 12);
        let person = generate(&mut session, Vec::new()).unwrap();
        assert!(!person.name_of_mother.is_empty());
        assert!(!person.name_of_father.is_empty());
    }

    #[test]
    fn address_lines_follow_the_locale_layout() {
        let en = Address {
            street: "Maple Avenue".into(),
            street_number: "12".into(),
            apartment_number: None,
            postal_code: "90210".into(),
            city: "Springfield".into(),
            number_first: true,
        };
        assert_eq!(en.line1(), "12 Maple Avenue");
        let pl = Address {
            street: "Kwiatowa".into(),
            street_number: "12".into(),
            apartment_number: Some("34".into()),
            postal_code: "01-123".into(),
            city: "Warszawa".into(),
            number_first: false,
        };
        assert_eq!(pl.line1(), "Kwiatowa 12/34");
        assert_eq!(pl.to_string(), "Kwiatowa 12/34\n01-123 Warszawa");
    }
}
