//! Ordered set of selected profile dimensions.

use serde::{Deserialize, Deserializer, Serialize};

use super::options::ProfileDimension;

/// The teacher's DPL selection.
///
/// Each dimension appears at most once. Insertion order is kept because it
/// is the order the teacher clicked the toggles, which is the order the
/// prompt lists them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProfileSelection {
    items: Vec<ProfileDimension>,
}

impl ProfileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dim`. Returns `false` if it was already selected.
    pub fn insert(&mut self, dim: ProfileDimension) -> bool {
        if self.contains(dim) {
            return false;
        }
        self.items.push(dim);
        true
    }

    /// Remove `dim`. Returns `false` if it was not selected.
    pub fn remove(&mut self, dim: ProfileDimension) -> bool {
        let before = self.items.len();
        self.items.retain(|d| *d != dim);
        self.items.len() != before
    }

    /// Flip the selection state of `dim`; returns whether it is now selected.
    pub fn toggle(&mut self, dim: ProfileDimension) -> bool {
        if self.remove(dim) {
            false
        } else {
            self.items.push(dim);
            true
        }
    }

    pub fn contains(&self, dim: ProfileDimension) -> bool {
        self.items.contains(&dim)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ProfileDimension> + '_ {
        self.items.iter().copied()
    }

    /// Labels joined with `", "`, in selection order.
    pub fn joined_labels(&self) -> String {
        self.items
            .iter()
            .map(|d| d.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<ProfileDimension> for ProfileSelection {
    fn from_iter<I: IntoIterator<Item = ProfileDimension>>(iter: I) -> Self {
        let mut selection = Self::new();
        for dim in iter {
            selection.insert(dim);
        }
        selection
    }
}

impl<'de> Deserialize<'de> for ProfileSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Duplicates in a hand-written list collapse to one entry.
        let items = Vec::<ProfileDimension>::deserialize(deserializer)?;
        Ok(items.into_iter().collect())
    }
}
