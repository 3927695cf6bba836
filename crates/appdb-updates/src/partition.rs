//! Update list partitioning
//!
//! Splits the candidates of a poll into apps that can be updated in place
//! and apps that need a manual reinstall, after dropping ignored ones.

use appdb_client::UpdateCandidate;

/// One of the two update lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Updateable,
    NonUpdateable,
}

impl Section {
    /// Get the display label for this section, pluralized for `count`
    pub fn label(&self, count: usize) -> String {
        let noun = if count == 1 { "app" } else { "apps" };
        match self {
            Section::Updateable => format!("{} Updateable {}", count, noun),
            Section::NonUpdateable => format!("{} Non updateable {}", count, noun),
        }
    }
}

/// Ignore-filtered, name-sorted update lists
///
/// Both lists are sorted by lowercased name; ties keep the service's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPartition {
    pub updateable: Vec<UpdateCandidate>,
    pub non_updateable: Vec<UpdateCandidate>,
}

impl ResultPartition {
    /// Build the partition from a poll result
    ///
    /// # Arguments
    ///
    /// * `candidates` - Candidates as returned by the service
    /// * `is_ignored` - Whether a track id is on the ignore list
    pub fn from_candidates(
        candidates: &[UpdateCandidate],
        is_ignored: impl Fn(&str) -> bool,
    ) -> Self {
        let mut visible: Vec<UpdateCandidate> = candidates
            .iter()
            .filter(|c| !is_ignored(&c.track_id))
            .cloned()
            .collect();
        visible.sort_by_key(|c| c.name.to_lowercase());

        let (updateable, non_updateable): (Vec<_>, Vec<_>) =
            visible.into_iter().partition(|c| c.updateable);
        Self {
            updateable,
            non_updateable,
        }
    }

    pub fn section(&self, section: Section) -> &[UpdateCandidate] {
        match section {
            Section::Updateable => &self.updateable,
            Section::NonUpdateable => &self.non_updateable,
        }
    }

    pub fn len(&self) -> usize {
        self.updateable.len() + self.non_updateable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updateable.is_empty() && self.non_updateable.is_empty()
    }

    /// Pending update count, `None` when there is nothing to show
    pub fn badge_count(&self) -> Option<usize> {
        match self.len() {
            0 => None,
            n => Some(n),
        }
    }

    /// Find a visible candidate by track id
    pub fn find(&self, track_id: &str) -> Option<&UpdateCandidate> {
        self.updateable
            .iter()
            .chain(self.non_updateable.iter())
            .find(|c| c.track_id == track_id)
    }

    /// Remove every candidate with this track id from whichever list holds it
    ///
    /// Returns the first removed candidate.
    pub fn remove(&mut self, track_id: &str) -> Option<UpdateCandidate> {
        let removed = self.find(track_id).cloned();
        if removed.is_some() {
            self.updateable.retain(|c| c.track_id != track_id);
            self.non_updateable.retain(|c| c.track_id != track_id);
        }
        removed
    }

    /// Name to show for a candidate
    ///
    /// When several candidates of the same list share a name, the source is
    /// appended (`"Name (iOS)"`, `"Name (Cydia)"`) so rows stay distinguishable.
    /// The candidate itself is left untouched.
    pub fn display_name(&self, candidate: &UpdateCandidate) -> String {
        let section = if candidate.updateable {
            Section::Updateable
        } else {
            Section::NonUpdateable
        };
        let same_name = self
            .section(section)
            .iter()
            .filter(|c| c.name == candidate.name)
            .count();

        if same_name > 1 {
            format!("{} ({})", candidate.name, candidate.source.label())
        } else {
            candidate.name.clone()
        }
    }
}
