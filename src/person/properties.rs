//! Caller-supplied overrides for the person pipeline.

use chrono::NaiveDate;

use crate::company::Company;
use crate::locale::Country;
use crate::person::{Address, PersonDraft, Sex, MAX_AGE, MIN_AGE};
use crate::random::RandomSource;

/// Pins one draft field before the field steps run. Overrides needing
/// randomness (an age range, say) draw from the session's source at apply
/// time, so seeded runs stay reproducible.
pub struct PersonProperty(Box<dyn FnOnce(&mut PersonDraft, &mut RandomSource)>);

impl PersonProperty {
    pub fn male() -> Self {
        PersonProperty(Box::new(|draft, _| draft.sex = Some(Sex::Male)))
    }

    pub fn female() -> Self {
        PersonProperty(Box::new(|draft, _| draft.sex = Some(Sex::Female)))
    }

    /// Draws a concrete age uniformly from `[min_age, max_age]`.
    pub fn age_between(min_age: u32, max_age: u32) -> Self {
        PersonProperty(Box::new(move |draft, rng| {
            draft.age = Some(rng.next_int(min_age as i32, max_age as i32) as u32);
        }))
    }

    pub fn min_age(min_age: u32) -> Self {
        Self::age_between(min_age, MAX_AGE)
    }

    pub fn max_age(max_age: u32) -> Self {
        Self::age_between(MIN_AGE, max_age)
    }

    pub fn with_age(age: u32) -> Self {
        PersonProperty(Box::new(move |draft, _| draft.age = Some(age)))
    }

    pub fn with_date_of_birth(date_of_birth: NaiveDate) -> Self {
        PersonProperty(Box::new(move |draft, _| {
            draft.date_of_birth = Some(date_of_birth);
        }))
    }

    pub fn telephone_format(format: impl Into<String>) -> Self {
        let format = format.into();
        PersonProperty(Box::new(move |draft, _| {
            draft.telephone_format = Some(format);
        }))
    }

    pub fn mobile_telephone_format(format: impl Into<String>) -> Self {
        let format = format.into();
        PersonProperty(Box::new(move |draft, _| {
            draft.mobile_format = Some(format);
        }))
    }

    pub fn with_company(company: Company) -> Self {
        PersonProperty(Box::new(move |draft, _| draft.company = Some(company)))
    }

    pub fn with_address(address: Address) -> Self {
        PersonProperty(Box::new(move |draft, _| draft.address = Some(address)))
    }

    pub fn with_first_name(first_name: impl Into<String>) -> Self {
        let first_name = first_name.into();
        PersonProperty(Box::new(move |draft, _| {
            draft.first_name = Some(first_name);
        }))
    }

    pub fn with_middle_name(middle_name: impl Into<String>) -> Self {
        let middle_name = middle_name.into();
        PersonProperty(Box::new(move |draft, _| {
            draft.middle_name = Some(Some(middle_name));
        }))
    }

    pub fn without_middle_name() -> Self {
        PersonProperty(Box::new(|draft, _| draft.middle_name = Some(None)))
    }

    pub fn with_last_name(last_name: impl Into<String>) -> Self {
        let last_name = last_name.into();
        PersonProperty(Box::new(move |draft, _| {
            draft.last_name = Some(last_name);
        }))
    }

    pub fn with_email(email: impl Into<String>) -> Self {
        let email = email.into();
        PersonProperty(Box::new(move |draft, _| draft.email = Some(email)))
    }

    pub fn with_username(username: impl Into<String>) -> Self {
        let username = username.into();
        PersonProperty(Box::new(move |draft, _| draft.username = Some(username)))
    }

    pub fn with_password(password: impl Into<String>) -> Self {
        let password = password.into();
        PersonProperty(Box::new(move |draft, _| draft.password = Some(password)))
    }

    pub fn with_telephone_number(telephone_number: impl Into<String>) -> Self {
        let telephone_number = telephone_number.into();
        PersonProperty(Box::new(move |draft, _| {
            draft.telephone_number = Some(telephone_number);
        }))
    }

    pub fn with_mobile_telephone_number(mobile_telephone_number: impl Into<String>) -> Self {
        let mobile_telephone_number = mobile_telephone_number.into();
        PersonProperty(Box::new(move |draft, _| {
            draft.mobile_telephone_number = Some(mobile_telephone_number);
        }))
    }

    pub fn with_company_email(company_email: impl Into<String>) -> Self {
        let company_email = company_email.into();
        PersonProperty(Box::new(move |draft, _| {
            draft.company_email = Some(company_email);
        }))
    }

    pub fn with_id_card_number(id_card_number: impl Into<String>) -> Self {
        let id_card_number = id_card_number.into();
        PersonProperty(Box::new(move |draft, _| {
            draft.id_card_number = Some(id_card_number);
        }))
    }

    pub fn with_id_number(id_number: impl Into<String>) -> Self {
        let id_number = id_number.into();
        PersonProperty(Box::new(move |draft, _| {
            draft.id_number = Some(Some(id_number));
        }))
    }

    pub fn with_passport_number(passport_number: impl Into<String>) -> Self {
        let passport_number = passport_number.into();
        PersonProperty(Box::new(move |draft, _| {
            draft.passport_number = Some(passport_number);
        }))
    }

    pub fn with_nationality(nationality: Country) -> Self {
        PersonProperty(Box::new(move |draft, _| {
            draft.nationality = Some(nationality);
        }))
    }

    pub(crate) fn apply(self, draft: &mut PersonDraft, rng: &mut RandomSource) {
        (self.0)(draft, rng);
    }
}
