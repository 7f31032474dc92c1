//! Persisted view preference types.
//!
//! The table itself keeps no state across mounts. These are the values a caller
//! may remember and re-supply as the initial sort and page size.

use crate::table::sort::SortSpec;
use serde::{Deserialize, Serialize};

/// Sort and page size of one table view.
///
/// Both fields are optional so a stored entry written before a column existed,
/// or without a page size, still deserializes.
///
/// # Examples
///
/// ```
/// use clinic_table::storage::ViewPreferences;
/// use clinic_table::SortSpec;
///
/// let prefs = ViewPreferences::new(Some(SortSpec::descending("visit_date")), Some(20));
/// let json = serde_json::to_string(&prefs).unwrap();
/// assert_eq!(serde_json::from_str::<ViewPreferences>(&json).unwrap(), prefs);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

impl ViewPreferences {
    #[must_use]
    pub const fn new(sort: Option<SortSpec>, page_size: Option<usize>) -> Self {
        Self { sort, page_size }
    }

    /// Whether there is nothing to restore.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sort.is_none() && self.page_size.is_none()
    }
}
