use std::sync::Arc;

use crate::catalog::DataCatalog;
use crate::dates::DateSampler;
use crate::errors::GenerationError;
use crate::locale::LocaleBundle;
use crate::random::RandomSource;

/// Everything one generation session owns or shares.
///
/// The random source is exclusive to the session; the catalog and locale
/// bundle are immutable after construction and shared read-only across
/// sessions.
pub struct Session {
    pub rng: RandomSource,
    pub dates: DateSampler,
    pub catalog: Arc<DataCatalog>,
    pub bundle: Arc<LocaleBundle>,
}

/// One generator step of an entity pipeline. Steps are idempotent: a step
/// returns immediately when its field was already set by an override or an
/// earlier step, so callers can pin any subset of fields.
pub type Step<D> = fn(&mut D, &mut Session) -> Result<(), GenerationError>;

/// Runs an entity's ordered step table over its draft. Ordering is fixed per
/// entity kind because later steps read fields produced by earlier ones.
pub fn run_steps<D>(
    draft: &mut D,
    steps: &[Step<D>],
    session: &mut Session,
) -> Result<(), GenerationError> {
    for step in steps {
        step(draft, session)?;
    }
    Ok(())
}
