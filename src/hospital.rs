//! Hospital visit records built against a caller-supplied clinical inventory.
//!
//! Wards, disease pools and admission/discharge types live in the caller's
//! database; the generator only picks among them and keeps the visit's dates
//! internally consistent.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use tracing::trace;

use crate::errors::GenerationError;
use crate::person::{Person, PersonProperty};
use crate::session::Session;

const PEDIATRIC_AGE_LIMIT: u32 = 12;
const MATERNITY_AGE_MIN: u32 = 18;
const MATERNITY_AGE_MAX: u32 = 39;
const MIN_STAY_DAYS: i32 = 4;
const MAX_STAY_DAYS: i32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Disease {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Ward {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AdmissionType {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DischargeType {
    pub code: String,
    pub description: String,
}

/// The clinical reference data a visit is drawn from. All of it is owned and
/// persisted by the caller; empty pools surface as [`GenerationError::EmptyInput`]
/// at draw time.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClinicalInventory {
    pub maternal_diseases: Vec<Disease>,
    pub non_communicable_diseases: Vec<Disease>,
    pub notifiable_diseases: Vec<Disease>,
    pub infectious_diseases: Vec<Disease>,
    pub children_ward: Ward,
    pub female_ward: Ward,
    pub male_ward: Ward,
    pub maternity_ward: Ward,
    pub admission_types: Vec<AdmissionType>,
    pub discharge_types: Vec<DischargeType>,
}

/// Present only when the patient has left the hospital.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Discharge {
    pub date: NaiveDateTime,
    pub diagnosis: Disease,
    pub discharge_type: DischargeType,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HospitalVisit {
    pub person: Person,
    pub disease: Disease,
    pub ward: Ward,
    pub admission_type: AdmissionType,
    pub admission_date: NaiveDateTime,
    pub discharge: Option<Discharge>,
}

impl HospitalVisit {
    pub fn is_discharged(&self) -> bool {
        self.discharge.is_some()
    }
}

#[derive(Default)]
pub struct VisitDraft {
    pub(crate) person: Option<Person>,
    pub(crate) disease: Option<Disease>,
    pub(crate) ward: Option<Ward>,
    pub(crate) admission_type: Option<AdmissionType>,
    pub(crate) admission_date: Option<NaiveDateTime>,
    pub(crate) discharged: Option<bool>,
    pub(crate) discharge_date: Option<NaiveDateTime>,
    pub(crate) diagnosis: Option<Disease>,
    pub(crate) discharge_type: Option<DischargeType>,
    pub(crate) discharge_percentage: i32,
}

impl VisitDraft {
    fn finish(self) -> Result<HospitalVisit, GenerationError> {
        let (Some(person), Some(disease), Some(ward), Some(admission_type), Some(admission_date)) = (
            self.person,
            self.disease,
            self.ward,
            self.admission_type,
            self.admission_date,
        ) else {
            return Err(GenerationError::IncompleteDraft("hospital visit"));
        };
        let discharge = if self.discharged == Some(true) {
            let (Some(date), Some(diagnosis), Some(discharge_type)) =
                (self.discharge_date, self.diagnosis, self.discharge_type)
            else {
                return Err(GenerationError::IncompleteDraft("hospital visit"));
            };
            Some(Discharge {
                date,
                diagnosis,
                discharge_type,
            })
        } else {
            None
        };
        Ok(HospitalVisit {
            person,
            disease,
            ward,
            admission_type,
            admission_date,
            discharge,
        })
    }
}

/// Caller-supplied overrides for visit generation.
pub struct HospitalVisitProperty(Box<dyn FnOnce(&mut VisitDraft)>);

impl HospitalVisitProperty {
    pub fn with_person(person: Person) -> Self {
        HospitalVisitProperty(Box::new(move |draft| draft.person = Some(person)))
    }

    pub fn with_disease(disease: Disease) -> Self {
        HospitalVisitProperty(Box::new(move |draft| draft.disease = Some(disease)))
    }

    pub fn with_ward(ward: Ward) -> Self {
        HospitalVisitProperty(Box::new(move |draft| draft.ward = Some(ward)))
    }

    pub fn with_admission_type(admission_type: AdmissionType) -> Self {
        HospitalVisitProperty(Box::new(move |draft| {
            draft.admission_type = Some(admission_type);
        }))
    }

    pub fn with_admission_date(date: NaiveDateTime) -> Self {
        HospitalVisitProperty(Box::new(move |draft| draft.admission_date = Some(date)))
    }

    /// Probability, in whole percent, that the visit has ended in a discharge.
    pub fn discharge_percentage(percentage: i32) -> Self {
        HospitalVisitProperty(Box::new(move |draft| {
            draft.discharge_percentage = percentage.clamp(0, 100);
        }))
    }

    /// Pins the discharged flag instead of rolling it.
    pub fn discharged(discharged: bool) -> Self {
        HospitalVisitProperty(Box::new(move |draft| draft.discharged = Some(discharged)))
    }

    pub fn with_discharge_date(date: NaiveDateTime) -> Self {
        HospitalVisitProperty(Box::new(move |draft| draft.discharge_date = Some(date)))
    }

    pub fn with_diagnosis(diagnosis: Disease) -> Self {
        HospitalVisitProperty(Box::new(move |draft| draft.diagnosis = Some(diagnosis)))
    }

    pub fn with_discharge_type(discharge_type: DischargeType) -> Self {
        HospitalVisitProperty(Box::new(move |draft| {
            draft.discharge_type = Some(discharge_type);
        }))
    }

    fn apply(self, draft: &mut VisitDraft) {
        (self.0)(draft);
    }
}

type VisitStep =
    fn(&mut VisitDraft, &mut Session, &ClinicalInventory) -> Result<(), GenerationError>;

/// Field order is fixed: the ward needs the person, the discharge window
/// needs the admission date, and diagnosis only exists once discharge stands.
const STEPS: &[VisitStep] = &[
    person,
    disease,
    ward,
    admission_type,
    admission_date,
    discharge_date,
    diagnosis,
    discharge_type,
];

pub(crate) fn generate(
    session: &mut Session,
    inventory: &ClinicalInventory,
    properties: Vec<HospitalVisitProperty>,
) -> Result<HospitalVisit, GenerationError> {
    let mut draft = VisitDraft::default();
    for property in properties {
        property.apply(&mut draft);
    }
    for step in STEPS {
        step(&mut draft, session, inventory)?;
    }
    let visit = draft.finish()?;
    trace!(
        ward = %visit.ward.code,
        discharged = visit.is_discharged(),
        "generated hospital visit"
    );
    Ok(visit)
}

fn person(
    draft: &mut VisitDraft,
    session: &mut Session,
    _inventory: &ClinicalInventory,
) -> Result<(), GenerationError> {
    if draft.person.is_some() {
        return Ok(());
    }
    draft.person = Some(crate::person::generate(session, Vec::<PersonProperty>::new())?);
    Ok(())
}

fn draft_person(draft: &VisitDraft) -> Result<&Person, GenerationError> {
    draft
        .person
        .as_ref()
        .ok_or(GenerationError::IncompleteDraft("hospital visit"))
}

fn pick_condition(
    session: &mut Session,
    inventory: &ClinicalInventory,
    maternal_candidate: bool,
) -> Result<Disease, GenerationError> {
    let pool = if maternal_candidate && session.rng.next_bool() {
        &inventory.maternal_diseases
    } else {
        match session.rng.next_int(0, 2) {
            0 => &inventory.non_communicable_diseases,
            1 => &inventory.notifiable_diseases,
            _ => &inventory.infectious_diseases,
        }
    };
    Ok(session.rng.choose_one(pool)?.clone())
}

fn disease(
    draft: &mut VisitDraft,
    session: &mut Session,
    inventory: &ClinicalInventory,
) -> Result<(), GenerationError> {
    if draft.disease.is_some() {
        return Ok(());
    }
    let maternal_candidate = draft_person(draft)?.is_female();
    draft.disease = Some(pick_condition(session, inventory, maternal_candidate)?);
    Ok(())
}

fn ward(
    draft: &mut VisitDraft,
    _session: &mut Session,
    inventory: &ClinicalInventory,
) -> Result<(), GenerationError> {
    if draft.ward.is_some() {
        return Ok(());
    }
    let person = draft_person(draft)?;
    let ward = if person.age <= PEDIATRIC_AGE_LIMIT {
        &inventory.children_ward
    } else if person.is_male() {
        &inventory.male_ward
    } else if (MATERNITY_AGE_MIN..=MATERNITY_AGE_MAX).contains(&person.age) {
        &inventory.maternity_ward
    } else {
        &inventory.female_ward
    };
    draft.ward = Some(ward.clone());
    Ok(())
}

fn admission_type(
    draft: &mut VisitDraft,
    session: &mut Session,
    inventory: &ClinicalInventory,
) -> Result<(), GenerationError> {
    if draft.admission_type.is_some() {
        return Ok(());
    }
    draft.admission_type = Some(session.rng.choose_one(&inventory.admission_types)?.clone());
    Ok(())
}

/// Picks a day inside a `days`-long window ending `days` days before now,
/// pinned to midnight.
fn admission_date(
    draft: &mut VisitDraft,
    session: &mut Session,
    _inventory: &ClinicalInventory,
) -> Result<(), GenerationError> {
    if draft.admission_date.is_some() {
        return Ok(());
    }
    let days = session.rng.next_int(MIN_STAY_DAYS, MAX_STAY_DAYS);
    let latest = session.dates.now() - Duration::days(days as i64);
    let earliest = latest - Duration::days(days as i64 - 1);
    let at = session
        .dates
        .datetime_between(&mut session.rng, earliest, latest);
    draft.admission_date = Some(at.date().and_time(NaiveTime::MIN));
    Ok(())
}

fn discharge_date(
    draft: &mut VisitDraft,
    session: &mut Session,
    _inventory: &ClinicalInventory,
) -> Result<(), GenerationError> {
    let Some(admitted) = draft.admission_date else {
        draft.discharged = Some(false);
        return Ok(());
    };
    let discharged = match draft.discharged {
        Some(discharged) => discharged,
        None => {
            let discharged = session.rng.next_int(1, 100) <= draft.discharge_percentage;
            draft.discharged = Some(discharged);
            discharged
        }
    };
    if !discharged || draft.discharge_date.is_some() {
        return Ok(());
    }
    let at = session.dates.datetime_between(
        &mut session.rng,
        admitted + Duration::days(1),
        session.dates.now(),
    );
    draft.discharge_date = Some(at.date().and_time(NaiveTime::MIN));
    Ok(())
}

fn diagnosis(
    draft: &mut VisitDraft,
    session: &mut Session,
    inventory: &ClinicalInventory,
) -> Result<(), GenerationError> {
    if draft.discharged != Some(true) || draft.diagnosis.is_some() {
        return Ok(());
    }
    let maternal_candidate = draft_person(draft)?.is_female();
    draft.diagnosis = Some(pick_condition(session, inventory, maternal_candidate)?);
    Ok(())
}

fn discharge_type(
    draft: &mut VisitDraft,
    session: &mut Session,
    inventory: &ClinicalInventory,
) -> Result<(), GenerationError> {
    if draft.discharged != Some(true) || draft.discharge_type.is_some() {
        return Ok(());
    }
    draft.discharge_type = Some(session.rng.choose_one(&inventory.discharge_types)?.clone());
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

    fn session(seed: u64) -> Session {
        Session {
            rng: RandomSource::from_seed(seed),
            dates: DateSampler::new(
                NaiveDate::from_ymd_opt(2024, 6, 15)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
            ),
            catalog: Arc::new(DataCatalog::builtin(Lang::En).unwrap()),
            bundle: Arc::new(LocaleBundle::for_lang(Lang::En)),
        }
    }

    fn disease(code: &str) -> Disease {
        Disease {
            code: code.into(),
            description: format!("disease {code}"),
        }
    }

    fn inventory() -> ClinicalInventory {
        ClinicalInventory {
            maternal_diseases: vec![disease("MP1"), disease("MP2")],
            non_communicable_diseases: vec![disease("NC1"), disease("NC2")],
            notifiable_diseases: vec![disease("ND1")],
            infectious_diseases: vec![disease("OC1"), disease("OC2")],
            children_ward: Ward {
                code: "C".into(),
                name: "Children".into(),
            },
            female_ward: Ward {
                code: "F".into(),
                name: "Female".into(),
            },
            male_ward: Ward {
                code: "I".into(),
                name: "Male".into(),
            },
            maternity_ward: Ward {
                code: "M".into(),
                name: "Maternity".into(),
            },
            admission_types: vec![AdmissionType {
                code: "A".into(),
                description: "Ambulance".into(),
            }],
            discharge_types: vec![DischargeType {
                code: "D".into(),
                description: "Cured".into(),
            }],
        }
    }

    fn patient(session: &mut Session, properties: Vec<PersonProperty>) -> Person {
        crate::person::generate(session, properties).unwrap()
    }

    #[test]
    fn zero_percentage_never_discharges() {
        let inventory = inventory();
        for seed in 0..20 {
            let mut session = session(seed);
            let visit = generate(
                &mut session,
                &inventory,
                vec![HospitalVisitProperty::discharge_percentage(0)],
            )
            .unwrap();
            assert!(visit.discharge.is_none());
        }
    }

    #[test]
    fn full_percentage_discharges_after_admission() {
        let inventory = inventory();
        for seed in 0..20 {
            let mut session = session(seed);
            let visit = generate(
                &mut session,
                &inventory,
                vec![HospitalVisitProperty::discharge_percentage(100)],
            )
            .unwrap();
            let discharge = visit.discharge.expect("forced discharge");
            assert!(discharge.date > visit.admission_date);
            assert!(discharge.date <= session.dates.now());
            assert_eq!(discharge.date.time(), NaiveTime::MIN);
            assert_eq!(visit.admission_date.time(), NaiveTime::MIN);
        }
    }

    #[test]
    fn admission_window_ends_before_now() {
        let inventory = inventory();
        let mut session = session(3);
        for _ in 0..20 {
            let visit = generate(&mut session, &inventory, Vec::new()).unwrap();
            let lead = session.dates.now() - visit.admission_date;
            assert!(lead.num_days() >= MIN_STAY_DAYS as i64);
            assert!(lead.num_days() <= 2 * MAX_STAY_DAYS as i64);
        }
    }

    #[test]
    fn children_go_to_the_pediatric_ward() {
        let inventory = inventory();
        let mut session = session(5);
        let child = patient(&mut session, vec![PersonProperty::with_age(8)]);
        let visit = generate(
            &mut session,
            &inventory,
            vec![HospitalVisitProperty::with_person(child)],
        )
        .unwrap();
        assert_eq!(visit.ward.code, "C");
    }

    #[test]
    fn fertile_age_women_go_to_maternity() {
        let inventory = inventory();
        let mut session = session(6);
        let woman = patient(
            &mut session,
            vec![PersonProperty::female(), PersonProperty::with_age(27)],
        );
        let visit = generate(
            &mut session,
            &inventory,
            vec![HospitalVisitProperty::with_person(woman)],
        )
        .unwrap();
        assert_eq!(visit.ward.code, "M");

        let older = patient(
            &mut session,
            vec![PersonProperty::female(), PersonProperty::with_age(62)],
        );
        let visit = generate(
            &mut session,
            &inventory,
            vec![HospitalVisitProperty::with_person(older)],
        )
        .unwrap();
        assert_eq!(visit.ward.code, "F");
    }

    #[test]
    fn adult_men_go_to_the_male_ward() {
        let inventory = inventory();
        let mut session = session(7);
        let man = patient(
            &mut session,
            vec![PersonProperty::male(), PersonProperty::with_age(45)],
        );
        let visit = generate(
            &mut session,
            &inventory,
            vec![HospitalVisitProperty::with_person(man)],
        )
        .unwrap();
        assert_eq!(visit.ward.code, "I");
    }

    #[test]
    fn pinned_disease_survives() {
        let inventory = inventory();
        let mut session = session(8);
        let visit = generate(
            &mut session,
            &inventory,
            vec![HospitalVisitProperty::with_disease(disease("X99"))],
        )
        .unwrap();
        assert_eq!(visit.disease.code, "X99");
    }
}
