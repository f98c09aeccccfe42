use std::collections::BTreeMap;

use serde_yaml::Value;
use tracing::debug;

use crate::errors::GenerationError;
use crate::locale::Lang;
use crate::random::RandomSource;

/// One value stored under a catalog key.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogValue {
    Scalar(String),
    List(Vec<String>),
    /// Nested mapping keyed by a secondary discriminator such as sex or a
    /// card vendor.
    Groups(BTreeMap<String, Vec<String>>),
}

/// Locale-scoped, case-insensitive key-value store backing all sampling.
///
/// Built once per session by merging the base data set with a locale overlay;
/// immutable afterwards and safe to share read-only across sessions. Keys are
/// normalized to lower case on write and on read.
#[derive(Debug, Clone, Default)]
pub struct DataCatalog {
    entries: BTreeMap<String, CatalogValue>,
}

impl DataCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in data set for `lang`: the shared base file merged with the
    /// language overlay.
    pub fn builtin(lang: Lang) -> Result<Self, GenerationError> {
        let mut catalog = Self::new();
        catalog.merge_yaml(include_str!("../data/seed.yml"))?;
        catalog.merge_yaml(match lang {
            Lang::En => include_str!("../data/seed_en.yml"),
            Lang::Pl => include_str!("../data/seed_pl.yml"),
            Lang::Sv => include_str!("../data/seed_sv.yml"),
            Lang::De => include_str!("../data/seed_de.yml"),
            Lang::Es => include_str!("../data/seed_es.yml"),
        })?;
        debug!(lang = %lang.tag(), keys = catalog.entries.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Merges one YAML document into the store. Later merges win: scalars and
    /// lists replace the previous value outright, while nested mappings are
    /// merged key-by-key (one level deep) so an overlay can extend a base
    /// mapping without discarding its other entries.
    pub fn merge_yaml(&mut self, source: &str) -> Result<(), GenerationError> {
        let document: Value = serde_yaml::from_str(source)?;
        let Value::Mapping(mapping) = document else {
            return Err(GenerationError::DataFile(
                "top level of a data file must be a mapping".to_string(),
            ));
        };

        for (key, value) in mapping {
            let Value::String(key) = key else {
                return Err(GenerationError::DataFile(
                    "data file keys must be strings".to_string(),
                ));
            };
            let key = key.to_lowercase();
            let incoming = convert(&key, value)?;
            match (self.entries.get_mut(&key), incoming) {
                (Some(CatalogValue::Groups(existing)), CatalogValue::Groups(overlay)) => {
                    for (inner, values) in overlay {
                        existing.insert(inner, values);
                    }
                }
                (_, incoming) => {
                    self.entries.insert(key, incoming);
                }
            }
        }
        Ok(())
    }

    /// Scalar value under `key`.
    pub fn get_string(&self, key: &str) -> Result<&str, GenerationError> {
        match self.lookup(key)? {
            CatalogValue::Scalar(value) => Ok(value),
            _ => Err(GenerationError::WrongShape {
                key: key.to_lowercase(),
                expected: "scalar",
            }),
        }
    }

    /// Ordered list under `key`.
    pub fn get_string_list(&self, key: &str) -> Result<&[String], GenerationError> {
        match self.lookup(key)? {
            CatalogValue::List(values) => Ok(values),
            _ => Err(GenerationError::WrongShape {
                key: key.to_lowercase(),
                expected: "list",
            }),
        }
    }

    /// One random element of the list under `key`.
    pub fn get_random_value(
        &self,
        key: &str,
        rng: &mut RandomSource,
    ) -> Result<String, GenerationError> {
        let values = self.get_string_list(key)?;
        Ok(rng.choose_one(values)?.clone())
    }

    /// One random element of the `discriminator` group nested under `key`.
    pub fn get_values_of_type(
        &self,
        key: &str,
        discriminator: &str,
        rng: &mut RandomSource,
    ) -> Result<String, GenerationError> {
        let CatalogValue::Groups(groups) = self.lookup(key)? else {
            return Err(GenerationError::WrongShape {
                key: key.to_lowercase(),
                expected: "mapping",
            });
        };
        let values = groups.get(&discriminator.to_lowercase()).ok_or_else(|| {
            GenerationError::MissingKey {
                key: format!("{}.{}", key.to_lowercase(), discriminator.to_lowercase()),
            }
        })?;
        Ok(rng.choose_one(values)?.clone())
    }

    /// The language this catalog was assembled for, read from the overlay's
    /// `language` key. Unknown codes fall back to English.
    pub fn language(&self) -> Result<Lang, GenerationError> {
        Ok(Lang::resolve(self.get_string("language")?))
    }

    fn lookup(&self, key: &str) -> Result<&CatalogValue, GenerationError> {
        self.entries
            .get(&key.to_lowercase())
            .ok_or_else(|| GenerationError::MissingKey {
                key: key.to_lowercase(),
            })
    }
}

fn convert(key: &str, value: Value) -> Result<CatalogValue, GenerationError> {
    match value {
        Value::String(s) => Ok(CatalogValue::Scalar(s)),
        Value::Number(n) => Ok(CatalogValue::Scalar(n.to_string())),
        Value::Bool(b) => Ok(CatalogValue::Scalar(b.to_string())),
        Value::Sequence(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(scalar_to_string(key, item)?);
            }
            Ok(CatalogValue::List(values))
        }
        Value::Mapping(mapping) => {
            let mut groups = BTreeMap::new();
            for (inner, value) in mapping {
                let Value::String(inner) = inner else {
                    return Err(GenerationError::DataFile(format!(
                        "nested keys under '{key}' must be strings"
                    )));
                };
                let Value::Sequence(items) = value else {
                    return Err(GenerationError::DataFile(format!(
                        "nested value '{key}.{inner}' must be a list"
                    )));
                };
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(scalar_to_string(key, item)?);
                }
                groups.insert(inner.to_lowercase(), values);
            }
            Ok(CatalogValue::Groups(groups))
        }
        other => Err(GenerationError::DataFile(format!(
            "unsupported value under '{key}': {other:?}"
        ))),
    }
}

fn scalar_to_string(key: &str, value: Value) -> Result<String, GenerationError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(GenerationError::DataFile(format!(
            "list items under '{key}' must be scalars, found {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_from(sources: &[&str]) -> DataCatalog {
        let mut catalog = DataCatalog::new();
        for source in sources {
            catalog.merge_yaml(source).expect("valid yaml");
        }
        catalog
    }

    #[test]
    fn keys_are_case_insensitive() {
        let catalog = catalog_from(&["City: Kampala\n"]);
        assert_eq!(catalog.get_string("city").unwrap(), "Kampala");
        assert_eq!(catalog.get_string("City").unwrap(), "Kampala");
        assert_eq!(catalog.get_string("CITY").unwrap(), "Kampala");
    }

    #[test]
    fn missing_key_is_an_error() {
        let catalog = catalog_from(&["city: Kampala\n"]);
        assert!(matches!(
            catalog.get_string("street"),
            Err(GenerationError::MissingKey { .. })
        ));
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let catalog = catalog_from(&["street:\n  - High Street\n"]);
        assert!(matches!(
            catalog.get_string("street"),
            Err(GenerationError::WrongShape { .. })
        ));
    }

    #[test]
    fn later_merge_replaces_scalars_and_lists() {
        let catalog = catalog_from(&[
            "city: Kampala\nstreet:\n  - Old Road\n",
            "city: Gulu\nstreet:\n  - New Road\n",
        ]);
        assert_eq!(catalog.get_string("city").unwrap(), "Gulu");
        assert_eq!(catalog.get_string_list("street").unwrap(), ["New Road"]);
    }

    #[test]
    fn nested_mappings_deep_merge_one_level() {
        let catalog = catalog_from(&[
            "firstNames:\n  male:\n    - John\n  female:\n    - Jane\n",
            "firstNames:\n  male:\n    - Jan\n",
        ]);
        let mut rng = RandomSource::from_seed(1);
        // Overlay replaced the male group but the base female group survives.
        assert_eq!(
            catalog
                .get_values_of_type("firstnames", "male", &mut rng)
                .unwrap(),
            "Jan"
        );
        assert_eq!(
            catalog
                .get_values_of_type("firstnames", "female", &mut rng)
                .unwrap(),
            "Jane"
        );
    }

    #[test]
    fn missing_discriminator_is_an_error() {
        let catalog = catalog_from(&["firstNames:\n  male:\n    - John\n"]);
        let mut rng = RandomSource::from_seed(1);
        assert!(matches!(
            catalog.get_values_of_type("firstnames", "other", &mut rng),
            Err(GenerationError::MissingKey { .. })
        ));
    }

    #[test]
    fn builtin_catalogs_carry_required_keys() {
        for lang in [Lang::En, Lang::Pl, Lang::Sv, Lang::De, Lang::Es] {
            let catalog = DataCatalog::builtin(lang).expect("builtin data parses");
            for key in [
                "firstnames",
                "lastnames",
                "profession",
                "creditcardprefixes",
                "personalemails",
                "telephone_number_formats",
                "maritalstatus",
                "bloodtype",
                "parentsalive",
                "city",
                "street",
                "postal_code",
                "companynames",
                "companysuffixes",
                "domains",
                "companyemails",
            ] {
                assert!(
                    catalog.lookup(key).is_ok(),
                    "{key} missing for {}",
                    lang.tag()
                );
            }
            assert_eq!(catalog.language().unwrap(), lang);
        }
    }
}
