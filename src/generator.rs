//! Session facade tying the catalog, locale bundle and random source
//! together behind one entry point.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::catalog::DataCatalog;
use crate::company::{Company, CompanyProperty};
use crate::dates::DateSampler;
use crate::errors::GenerationError;
use crate::hospital::{ClinicalInventory, HospitalVisit, HospitalVisitProperty};
use crate::locale::{Lang, LocaleBundle};
use crate::payment::{CreditCard, Iban, IbanProperty};
use crate::person::{Person, PersonProperty};
use crate::random::RandomSource;
use crate::session::Session;

/// One generation session.
///
/// Owns its random source exclusively; the catalog and locale bundle are
/// frozen at build time and shared read-only, so independent generators can
/// run concurrently over the same data.
pub struct Generator {
    session: Session,
}

impl Generator {
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::default()
    }

    /// An entropy-seeded session for `tag`, with the built-in data set.
    pub fn new(tag: &str) -> Result<Generator, GenerationError> {
        Generator::builder().locale(tag).build()
    }

    pub fn lang(&self) -> Lang {
        self.session.bundle.lang
    }

    pub fn person(
        &mut self,
        properties: Vec<PersonProperty>,
    ) -> Result<Person, GenerationError> {
        crate::person::generate(&mut self.session, properties)
    }

    pub fn company(
        &mut self,
        properties: Vec<CompanyProperty>,
    ) -> Result<Company, GenerationError> {
        crate::company::generate(&mut self.session, properties)
    }

    pub fn credit_card(&mut self) -> Result<CreditCard, GenerationError> {
        crate::payment::generate_credit_card(&mut self.session)
    }

    pub fn iban(&mut self, properties: Vec<IbanProperty>) -> Result<Iban, GenerationError> {
        crate::payment::generate_iban(&mut self.session, properties)
    }

    pub fn hospital_visit(
        &mut self,
        inventory: &ClinicalInventory,
        properties: Vec<HospitalVisitProperty>,
    ) -> Result<HospitalVisit, GenerationError> {
        crate::hospital::generate(&mut self.session, inventory, properties)
    }
}

/// Configures and builds a [`Generator`].
#[derive(Default)]
pub struct GeneratorBuilder {
    locale: Option<String>,
    seed: Option<u64>,
    overlays: Vec<String>,
    strict_locale: bool,
    anchor: Option<NaiveDateTime>,
}

impl GeneratorBuilder {
    /// Language tag for the session, e.g. `"pl"` or `"sv-SE"`. Defaults to
    /// English.
    pub fn locale(mut self, tag: impl Into<String>) -> Self {
        self.locale = Some(tag.into());
        self
    }

    /// Fixes the random seed; two sessions built with the same configuration
    /// and seed generate identical records.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Merges an extra YAML document over the built-in data set. Overlays
    /// apply in the order given; later ones win.
    pub fn overlay_yaml(mut self, source: impl Into<String>) -> Self {
        self.overlays.push(source.into());
        self
    }

    /// Makes an unknown locale tag an error instead of falling back to
    /// English.
    pub fn strict_locale(mut self) -> Self {
        self.strict_locale = true;
        self
    }

    /// Pins "now" for the session instead of reading the wall clock.
    pub fn anchored_at(mut self, now: NaiveDateTime) -> Self {
        self.anchor = Some(now);
        self
    }

    pub fn build(self) -> Result<Generator, GenerationError> {
        let tag = self.locale.as_deref().unwrap_or("en");
        let lang = if self.strict_locale {
            Lang::resolve_strict(tag)?
        } else {
            Lang::resolve(tag)
        };
        let mut catalog = DataCatalog::builtin(lang)?;
        for overlay in &self.overlays {
            catalog.merge_yaml(overlay)?;
        }
        let rng = match self.seed {
            Some(seed) => RandomSource::from_seed(seed),
            None => RandomSource::from_entropy(),
        };
        let dates = match self.anchor {
            Some(now) => DateSampler::new(now),
            None => DateSampler::from_wall_clock(),
        };
        debug!(lang = %lang.tag(), seeded = self.seed.is_some(), "session ready");
        Ok(Generator {
            session: Session {
                rng,
                dates,
                catalog: Arc::new(catalog),
                bundle: Arc::new(LocaleBundle::for_lang(lang)),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_locale_falls_back_by_default() {
        let generator = Generator::new("xx").unwrap();
        assert_eq!(generator.lang(), Lang::En);
    }

    #[test]
    fn strict_locale_rejects_unknown_tags() {
        let result = Generator::builder().locale("xx").strict_locale().build();
        assert!(matches!(
            result,
            Err(GenerationError::UnsupportedLocale(_))
        ));
    }

    #[test]
    fn overlay_wins_over_builtin_data() {
        let mut generator = Generator::builder()
            .seed(4)
            .overlay_yaml("lastNames:\n  male:\n    - Onlyname\n  female:\n    - Onlyname\n")
            .build()
            .unwrap();
        let person = generator.person(Vec::new()).unwrap();
        assert_eq!(person.last_name, "Onlyname");
    }
}
