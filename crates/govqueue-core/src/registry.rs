//! Category registry: the read-only mapping behind sequence labels and
//! wait-time estimation.
//!
//! The registry is built once at startup from the service catalog section
//! of the configuration and validated for completeness -- every
//! [`ServiceCategory`] must be present with a non-empty prefix and a
//! positive average duration. A category absent from the catalog is a
//! configuration fault, not a runtime condition, so lookups after
//! construction are infallible.

use std::collections::BTreeMap;

use govqueue_types::ServiceCategory;

use crate::config::CategoryEntryConfig;

/// Errors that can occur when building the category registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A required category has no catalog entry.
    #[error("category {0} is missing from the service catalog")]
    MissingCategory(ServiceCategory),

    /// The catalog names a category the system does not know.
    #[error("unknown category in service catalog: {0}")]
    UnknownCategory(String),

    /// A catalog entry has an empty display prefix.
    #[error("category {0} has an empty display prefix")]
    EmptyPrefix(ServiceCategory),

    /// A catalog entry has a zero average duration.
    #[error("category {0} has a zero average service duration")]
    ZeroDuration(ServiceCategory),
}

/// Display and estimation parameters for one service category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    /// Display label, e.g. "Revenue Services".
    pub label: String,
    /// Display-id prefix, e.g. "R".
    pub prefix: String,
    /// Fixed average service duration in minutes.
    pub average_minutes: u32,
}

/// Read-only mapping from category to display prefix and average duration.
///
/// Consulted by issuance (prefix for the sequence label) and by the queue
/// ordering engine (average duration for the wait estimate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    revenue: CategoryInfo,
    aadhaar: CategoryInfo,
    ration: CategoryInfo,
    utility: CategoryInfo,
}

impl CategoryRegistry {
    /// Build the registry from the configured service catalog.
    ///
    /// Catalog keys are the lowercase category names (`revenue`,
    /// `aadhaar`, `ration`, `utility`).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if any category is missing, unknown, or
    /// carries an empty prefix or zero duration.
    pub fn from_catalog(
        catalog: &BTreeMap<String, CategoryEntryConfig>,
    ) -> Result<Self, RegistryError> {
        for key in catalog.keys() {
            if parse_category_key(key).is_none() {
                return Err(RegistryError::UnknownCategory(key.clone()));
            }
        }

        Ok(Self {
            revenue: entry_for(catalog, ServiceCategory::Revenue)?,
            aadhaar: entry_for(catalog, ServiceCategory::Aadhaar)?,
            ration: entry_for(catalog, ServiceCategory::Ration)?,
            utility: entry_for(catalog, ServiceCategory::Utility)?,
        })
    }

    /// Look up the parameters for a category. Infallible: construction
    /// guarantees every category is present.
    pub const fn info(&self, category: ServiceCategory) -> &CategoryInfo {
        match category {
            ServiceCategory::Revenue => &self.revenue,
            ServiceCategory::Aadhaar => &self.aadhaar,
            ServiceCategory::Ration => &self.ration,
            ServiceCategory::Utility => &self.utility,
        }
    }

    /// The display-id prefix for a category.
    pub fn prefix(&self, category: ServiceCategory) -> &str {
        &self.info(category).prefix
    }

    /// The fixed average service duration for a category, in minutes.
    pub const fn average_minutes(&self, category: ServiceCategory) -> u32 {
        self.info(category).average_minutes
    }
}

/// The lowercase catalog key for a category.
const fn category_key(category: ServiceCategory) -> &'static str {
    match category {
        ServiceCategory::Revenue => "revenue",
        ServiceCategory::Aadhaar => "aadhaar",
        ServiceCategory::Ration => "ration",
        ServiceCategory::Utility => "utility",
    }
}

/// Parse a catalog key back to a category. Returns `None` for unknown keys.
fn parse_category_key(key: &str) -> Option<ServiceCategory> {
    ServiceCategory::ALL
        .into_iter()
        .find(|c| category_key(*c) == key)
}

/// Fetch and validate the catalog entry for one category.
fn entry_for(
    catalog: &BTreeMap<String, CategoryEntryConfig>,
    category: ServiceCategory,
) -> Result<CategoryInfo, RegistryError> {
    let entry = catalog
        .get(category_key(category))
        .ok_or(RegistryError::MissingCategory(category))?;

    if entry.prefix.is_empty() {
        return Err(RegistryError::EmptyPrefix(category));
    }
    if entry.average_minutes == 0 {
        return Err(RegistryError::ZeroDuration(category));
    }

    Ok(CategoryInfo {
        label: entry.label.clone(),
        prefix: entry.prefix.clone(),
        average_minutes: entry.average_minutes,
    })
}
