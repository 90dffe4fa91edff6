use std::collections::BTreeMap;

use crate::catalog::model::{Service, ServiceCategory};

/// Which service is shown in detail for each category, keyed by category position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    entries: BTreeMap<usize, usize>,
}

impl SelectionState {
    /// Every category starts on its first service.
    pub fn for_categories(count: usize) -> Self {
        Self {
            entries: (0..count).map(|index| (index, 0)).collect(),
        }
    }

    /// Replace the entry for one category. Other categories are untouched.
    pub fn select(&mut self, category: usize, service: usize) {
        self.entries.insert(category, service);
    }

    pub fn selected(&self, category: usize) -> Option<usize> {
        self.entries.get(&category).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The service to show in detail, if the entry exists and is in range.
    pub fn resolve<'a>(
        &self,
        categories: &'a [ServiceCategory],
        category: usize,
    ) -> Option<&'a Service> {
        let service = self.selected(category)?;
        categories.get(category)?.services.get(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, services: usize) -> ServiceCategory {
        ServiceCategory {
            name: name.to_string(),
            services: (0..services)
                .map(|i| Service {
                    id: format!("{name}-{i}"),
                    name: format!("{name} {i}"),
                    description: String::new(),
                    unit: "kg".to_string(),
                    estimated_duration: String::new(),
                    price: 1000,
                })
                .collect(),
        }
    }

    #[test]
    fn test_every_category_defaults_to_first_service() {
        for count in [0, 1, 5] {
            let state = SelectionState::for_categories(count);
            assert_eq!(state.len(), count);
            assert!((0..count).all(|i| state.selected(i) == Some(0)));
        }
    }

    #[test]
    fn test_select_only_touches_one_category() {
        let count = 4;
        for target in 0..count {
            let mut state = SelectionState::for_categories(count);
            state.select(target, 2);

            for other in (0..count).filter(|&i| i != target) {
                assert_eq!(state.selected(other), Some(0));
            }
            assert_eq!(state.selected(target), Some(2));
        }
    }

    #[test]
    fn test_resolve_guards_out_of_range_entries() {
        let categories = vec![category("a", 3), category("b", 1)];
        let mut state = SelectionState::for_categories(categories.len());

        assert_eq!(state.resolve(&categories, 0).unwrap().id, "a-0");

        state.select(1, 4);
        assert!(state.resolve(&categories, 1).is_none());

        // No entry at all for a category that was never loaded.
        assert!(state.resolve(&categories, 7).is_none());
        assert!(SelectionState::default().resolve(&categories, 0).is_none());
    }
}
