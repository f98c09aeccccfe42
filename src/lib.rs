//! Locale-aware synthetic record generator.
//!
//! Produces internally consistent fake people, companies, payment
//! instruments and hospital visits for seeding test and demo databases.
//! Generated national identifiers carry valid check digits for their
//! country, and cross-field invariants hold within a record: a person's age
//! agrees with their date of birth, a discharge date follows its admission.
//!
//! ```no_run
//! use wardgen::{Generator, PersonProperty};
//!
//! # fn main() -> Result<(), wardgen::GenerationError> {
//! let mut generator = Generator::builder().locale("pl").seed(10).build()?;
//! let person = generator.person(vec![
//!     PersonProperty::female(),
//!     PersonProperty::age_between(25, 59),
//! ])?;
//! println!("{} {}", person.full_name(), person.id_number.as_deref().unwrap_or("-"));
//! # Ok(())
//! # }
//! ```
//!
//! A [`Generator`] is one generation session: it owns its random source, so
//! a fixed seed replays the same records. The data catalog and locale bundle
//! behind it are immutable and shared.

pub mod catalog;
pub mod company;
pub mod dates;
pub mod errors;
pub mod generator;
pub mod hospital;
pub mod locale;
pub mod payment;
pub mod person;
pub mod random;
pub mod session;
pub mod text;

pub use company::{Company, CompanyProperty};
pub use errors::GenerationError;
pub use generator::{Generator, GeneratorBuilder};
pub use hospital::{
    AdmissionType, ClinicalInventory, Discharge, DischargeType, Disease, HospitalVisit,
    HospitalVisitProperty, Ward,
};
pub use locale::{Country, Lang};
pub use payment::{CreditCard, Iban, IbanProperty};
pub use person::{Address, ParentStatus, ParentsTogether, Person, PersonProperty, Sex};
