//! Company records and their field pipeline.

use tracing::trace;

use crate::errors::GenerationError;
use crate::session::{run_steps, Session, Step};
use crate::text::{escape_non_ascii, strip_accents};

const COMPANY_NAME: &str = "companyNames";
const COMPANY_SUFFIX: &str = "companySuffixes";
const DOMAIN: &str = "domains";
const COMPANY_EMAIL: &str = "companyEmails";
const MAX_ESCAPED_HOST_LENGTH: usize = 10;

/// A generated company.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Company {
    pub name: String,
    pub domain: String,
    /// Local part of the generic contact address, e.g. `office`.
    pub email: String,
    pub vat_number: String,
}

impl Company {
    pub fn url(&self) -> String {
        format!("http://www.{}", self.domain)
    }

    pub fn email_address(&self) -> String {
        format!("{}@{}", self.email, self.domain)
    }
}

#[derive(Default)]
pub struct CompanyDraft {
    name: Option<String>,
    domain: Option<String>,
    email: Option<String>,
    vat_number: Option<String>,
}

impl CompanyDraft {
    fn finish(self) -> Result<Company, GenerationError> {
        let (Some(name), Some(domain), Some(email), Some(vat_number)) =
            (self.name, self.domain, self.email, self.vat_number)
        else {
            return Err(GenerationError::IncompleteDraft("company"));
        };
        Ok(Company {
            name,
            domain,
            email,
            vat_number,
        })
    }
}

/// A caller-supplied override, applied to the draft before the field steps
/// run. Steps skip fields an override already pinned.
pub struct CompanyProperty(Box<dyn FnOnce(&mut CompanyDraft)>);

impl CompanyProperty {
    pub fn with_name(name: impl Into<String>) -> Self {
        let name = name.into();
        CompanyProperty(Box::new(move |draft| draft.name = Some(name)))
    }

    pub fn with_domain(domain: impl Into<String>) -> Self {
        let domain = domain.into();
        CompanyProperty(Box::new(move |draft| draft.domain = Some(domain)))
    }

    pub fn with_email(email: impl Into<String>) -> Self {
        let email = email.into();
        CompanyProperty(Box::new(move |draft| draft.email = Some(email)))
    }

    pub fn with_vat_number(vat_number: impl Into<String>) -> Self {
        let vat_number = vat_number.into();
        CompanyProperty(Box::new(move |draft| draft.vat_number = Some(vat_number)))
    }

    fn apply(self, draft: &mut CompanyDraft) {
        (self.0)(draft);
    }
}

const STEPS: &[Step<CompanyDraft>] = &[name, domain, email, vat_number];

pub(crate) fn generate(
    session: &mut Session,
    properties: Vec<CompanyProperty>,
) -> Result<Company, GenerationError> {
    let mut draft = CompanyDraft::default();
    for property in properties {
        property.apply(&mut draft);
    }
    run_steps(&mut draft, STEPS, session)?;
    let company = draft.finish()?;
    trace!(name = %company.name, "generated company");
    Ok(company)
}

fn name(draft: &mut CompanyDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.name.is_some() {
        return Ok(());
    }
    let mut name = session.catalog.get_random_value(COMPANY_NAME, &mut session.rng)?;
    if session.rng.next_bool() {
        let suffix = session
            .catalog
            .get_random_value(COMPANY_SUFFIX, &mut session.rng)?;
        name = format!("{name} {suffix}");
    }
    draft.name = Some(name);
    Ok(())
}

/// Derives the web domain from the company name: lowercase, no whitespace,
/// no dots or slashes, accents folded, any remaining non-ASCII escaped to
/// hex. A name that needed escaping is cut to ten characters to keep the
/// host readable.
fn domain(draft: &mut CompanyDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.domain.is_some() {
        return Ok(());
    }
    let name = draft
        .name
        .as_deref()
        .ok_or(GenerationError::IncompleteDraft("company"))?;
    let collapsed: String = name.to_lowercase().split_whitespace().collect();
    let host = strip_accents(collapsed.trim_matches('.')).replace('/', "");
    let plain_len = host.chars().count();
    let escaped = escape_non_ascii(&host);
    let host = if escaped.len() > plain_len && escaped.len() > MAX_ESCAPED_HOST_LENGTH {
        escaped[..MAX_ESCAPED_HOST_LENGTH].to_string()
    } else {
        escaped
    };
    let tld = session.catalog.get_random_value(DOMAIN, &mut session.rng)?;
    draft.domain = Some(format!("{host}.{tld}"));
    Ok(())
}

fn email(draft: &mut CompanyDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.email.is_some() {
        return Ok(());
    }
    draft.email = Some(
        session
            .catalog
            .get_random_value(COMPANY_EMAIL, &mut session.rng)?,
    );
    Ok(())
}

fn vat_number(draft: &mut CompanyDraft, session: &mut Session) -> Result<(), GenerationError> {
    if draft.vat_number.is_some() {
        return Ok(());
    }
    draft.vat_number = Some(
        session
            .bundle
            .vat
            .construct(&mut session.rng, &session.dates)?,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataCatalog;
    use crate::dates::DateSampler;
    use crate::locale::{Lang, LocaleBundle};
    use crate::random::RandomSource;
    use chrono::NaiveDate;
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
    fn generates_a_complete_company() {
        let mut session = session(Lang::En, 42);
        let company = generate(&mut session, Vec::new()).unwrap();
        assert!(!company.name.is_empty());
        assert!(company.domain.contains('.'));
        assert!(company.email_address().contains('@'));
        assert!(company.url().starts_with("http://www."));
        assert!(session.bundle.vat.validate(&company.vat_number));
    }

    #[test]
    fn domain_is_derived_from_a_pinned_name() {
        let mut session = session(Lang::En, 1);
        let company = generate(
            &mut session,
            vec![CompanyProperty::with_name("Acme Widget Works")],
        )
        .unwrap();
        let host = company.domain.split('.').next().unwrap();
        assert_eq!(host, "acmewidgetworks");
    }

    #[test]
    fn domain_folds_accents_and_strips_separators() {
        let mut session = session(Lang::Pl, 1);
        let company = generate(
            &mut session,
            vec![CompanyProperty::with_name("Żółć / Spółka.")],
        )
        .unwrap();
        let host = company.domain.split('.').next().unwrap();
        assert_eq!(host, "zolcspolka");
    }

    #[test]
    fn overrides_pin_every_field() {
        let mut session = session(Lang::De, 5);
        let company = generate(
            &mut session,
            vec![
                CompanyProperty::with_name("Beispiel"),
                CompanyProperty::with_domain("beispiel.de"),
                CompanyProperty::with_email("kontakt"),
                CompanyProperty::with_vat_number("123456789"),
            ],
        )
        .unwrap();
        assert_eq!(company.email_address(), "kontakt@beispiel.de");
        assert_eq!(company.vat_number, "123456789");
    }
}
