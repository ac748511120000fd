//! Counter registry: the set of service counters and their current
//! assignments.
//!
//! Counters are created once from configuration, mutated only through the
//! dispatch controller's operations, and reinitialized wholesale by the
//! day-boundary reset. Each counter holds at most one token at a time.

use govqueue_types::{Counter, CounterId, TokenId};

use crate::config::CounterEntryConfig;

/// Errors that can occur when building the counter registry.
#[derive(Debug, thiserror::Error)]
pub enum CounterConfigError {
    /// Two configured counters share an id.
    #[error("duplicate counter id: {0}")]
    DuplicateCounter(CounterId),

    /// The configuration defines no counters at all.
    #[error("at least one counter must be configured")]
    NoCounters,
}

/// The set of service counters for the operational day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterRegistry {
    /// All counters, in configured order.
    counters: Vec<Counter>,
}

impl CounterRegistry {
    /// Build the registry from configuration, with every counter active
    /// and unoccupied.
    ///
    /// # Errors
    ///
    /// Returns [`CounterConfigError`] if the set is empty or contains a
    /// duplicate id.
    pub fn from_config(entries: &[CounterEntryConfig]) -> Result<Self, CounterConfigError> {
        if entries.is_empty() {
            return Err(CounterConfigError::NoCounters);
        }

        let mut counters: Vec<Counter> = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = CounterId::new(entry.id);
            if counters.iter().any(|c| c.id == id) {
                return Err(CounterConfigError::DuplicateCounter(id));
            }
            counters.push(Counter {
                id,
                name: entry.name.clone(),
                is_active: true,
                current_token_id: None,
            });
        }

        Ok(Self { counters })
    }

    /// Rebuild the registry from a persisted counter list.
    pub const fn restore(counters: Vec<Counter>) -> Self {
        Self { counters }
    }

    /// Return the number of counters.
    pub const fn len(&self) -> usize {
        self.counters.len()
    }

    /// Return whether the registry holds no counters.
    pub const fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Return all counters, in configured order.
    pub fn all(&self) -> &[Counter] {
        &self.counters
    }

    /// Look up a counter by id.
    pub fn get(&self, id: CounterId) -> Option<&Counter> {
        self.counters.iter().find(|c| c.id == id)
    }

    /// Look up a counter mutably. Only the dispatch controller mutates
    /// counters.
    pub(crate) fn get_mut(&mut self, id: CounterId) -> Option<&mut Counter> {
        self.counters.iter_mut().find(|c| c.id == id)
    }

    /// Return the counter currently serving the given token, if any.
    pub fn serving(&self, token_id: TokenId) -> Option<&Counter> {
        self.counters
            .iter()
            .find(|c| c.current_token_id == Some(token_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueueConfig;

    fn default_entries() -> Vec<CounterEntryConfig> {
        QueueConfig::default().counters
    }

    #[test]
    fn default_counters_build_unoccupied_and_active() {
        let registry = CounterRegistry::from_config(&default_entries());
        let Ok(registry) = registry else {
            return;
        };
        assert_eq!(registry.len(), 3);
        assert!(registry.all().iter().all(|c| c.is_active));
        assert!(registry.all().iter().all(|c| c.current_token_id.is_none()));
    }

    #[test]
    fn empty_counter_set_is_rejected() {
        let result = CounterRegistry::from_config(&[]);
        assert!(matches!(result, Err(CounterConfigError::NoCounters)));
    }

    #[test]
    fn duplicate_counter_id_is_rejected() {
        let entries = vec![
            CounterEntryConfig {
                id: 1,
                name: "Counter 1".to_owned(),
            },
            CounterEntryConfig {
                id: 1,
                name: "Counter 1 again".to_owned(),
            },
        ];
        let result = CounterRegistry::from_config(&entries);
        assert!(matches!(
            result,
            Err(CounterConfigError::DuplicateCounter(_)),
        ));
    }

    #[test]
    fn get_finds_counter_by_id() {
        let Ok(registry) = CounterRegistry::from_config(&default_entries()) else {
            return;
        };
        assert!(registry.get(CounterId::new(2)).is_some());
        assert!(registry.get(CounterId::new(99)).is_none());
    }

    #[test]
    fn serving_finds_assigned_counter() {
        let Ok(mut registry) = CounterRegistry::from_config(&default_entries()) else {
            return;
        };
        let token = TokenId::new();
        if let Some(counter) = registry.get_mut(CounterId::new(1)) {
            counter.current_token_id = Some(token);
        }
        assert_eq!(
            registry.serving(token).map(|c| c.id),
            Some(CounterId::new(1)),
        );
        assert!(registry.serving(TokenId::new()).is_none());
    }
}
