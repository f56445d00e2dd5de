//! Per-session search state.
//!
//! [`SessionState`] owns everything a search view needs: the directory
//! snapshot, the selected radius, the last reference point and the derived
//! filtered view. Updates replace values wholesale.
//!
//! Geocoding runs asynchronously and several searches can be in flight at
//! once. Each search takes a [`SearchTicket`] from [`SessionState::begin_search`];
//! a result is only applied when its ticket is newer than the last one
//! applied, so a slow response can never overwrite a more recent search.

use std::sync::Arc;

use crate::courts::{CourtLocation, SearchRadius};
use crate::filter::filter_by_distance;
use crate::geo::Coordinate;

/// Load state of the directory snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Sequence number handed out per search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

impl SearchTicket {
    #[must_use]
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// What happened when a geocoding outcome was offered to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchApplied {
    /// The view now shows `matches` locations around the new reference point.
    Filtered { matches: usize },
    /// The geocoder found nothing; the view is unchanged.
    NotFound,
    /// A newer search was already applied; the outcome was discarded.
    Stale,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    directory: Arc<[CourtLocation]>,
    status: DirectoryStatus,
    radius: SearchRadius,
    reference: Option<Coordinate>,
    filtered: Vec<CourtLocation>,
    next_sequence: u64,
    last_applied: Option<SearchTicket>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// A fresh session: empty directory still loading, default radius.
    #[must_use]
    pub fn new() -> Self {
        Self {
            directory: Arc::from(Vec::new()),
            status: DirectoryStatus::Loading,
            radius: SearchRadius::default(),
            reference: None,
            filtered: Vec::new(),
            next_sequence: 0,
            last_applied: None,
        }
    }

    #[must_use]
    pub fn directory(&self) -> &[CourtLocation] {
        &self.directory
    }

    #[must_use]
    pub fn status(&self) -> &DirectoryStatus {
        &self.status
    }

    #[must_use]
    pub fn radius(&self) -> SearchRadius {
        self.radius
    }

    #[must_use]
    pub fn reference(&self) -> Option<Coordinate> {
        self.reference
    }

    /// The locations currently shown.
    #[must_use]
    pub fn filtered(&self) -> &[CourtLocation] {
        &self.filtered
    }

    /// Installs a freshly loaded directory. Until a search is applied the
    /// view shows every location; an existing reference point is re-applied.
    pub fn load_directory(&mut self, locations: Vec<CourtLocation>) {
        self.directory = Arc::from(locations);
        self.status = DirectoryStatus::Ready;
        self.refilter();
        tracing::debug!(
            locations = self.directory.len(),
            shown = self.filtered.len(),
            "directory loaded into session"
        );
    }

    /// Records a failed directory load. Whatever was loaded before is kept.
    pub fn fail_directory(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(%reason, "directory load failed");
        self.status = DirectoryStatus::Failed(reason);
    }

    /// Starts a search and returns its ticket.
    pub fn begin_search(&mut self) -> SearchTicket {
        self.next_sequence += 1;
        SearchTicket(self.next_sequence)
    }

    /// Applies a geocoding outcome (`None` meaning "not found") for `ticket`.
    pub fn apply_search(
        &mut self,
        ticket: SearchTicket,
        outcome: Option<Coordinate>,
    ) -> SearchApplied {
        if self.is_stale(ticket) {
            tracing::debug!(
                sequence = ticket.sequence(),
                last_applied = self.last_applied.map(SearchTicket::sequence),
                "discarding stale search result"
            );
            return SearchApplied::Stale;
        }
        self.last_applied = Some(ticket);

        let Some(center) = outcome else {
            return SearchApplied::NotFound;
        };

        self.reference = Some(center);
        self.refilter();
        SearchApplied::Filtered {
            matches: self.filtered.len(),
        }
    }

    /// Records that the search behind `ticket` failed. The view is left as is;
    /// returns `false` when the ticket was already stale.
    pub fn fail_search(&mut self, ticket: SearchTicket) -> bool {
        if self.is_stale(ticket) {
            return false;
        }
        self.last_applied = Some(ticket);
        true
    }

    /// Selects a new radius and recomputes the view around the current
    /// reference point, if any.
    pub fn set_radius(&mut self, radius: SearchRadius) {
        self.radius = radius;
        self.refilter();
    }

    fn is_stale(&self, ticket: SearchTicket) -> bool {
        self.last_applied.is_some_and(|last| ticket <= last)
    }

    fn refilter(&mut self) {
        self.filtered = match self.reference {
            Some(center) => filter_by_distance(&self.directory, center, self.radius.km()),
            None => self.directory.to_vec(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOWNTOWN: Coordinate = Coordinate {
        latitude: 49.2827,
        longitude: -123.1207,
    };

    const NORTH_SHORE: Coordinate = Coordinate {
        latitude: 49.3,
        longitude: -123.0,
    };

    fn location(id: &str, coordinate: Coordinate) -> CourtLocation {
        CourtLocation {
            location_id: id.to_string(),
            name: id.to_string(),
            address: crate::DEFAULT_ADDRESS.to_string(),
            coordinate,
            courts: vec![],
        }
    }

    fn loaded_session() -> SessionState {
        let mut session = SessionState::new();
        session.load_directory(vec![location("A", DOWNTOWN), location("B", NORTH_SHORE)]);
        session
    }

    fn shown(session: &SessionState) -> Vec<&str> {
        session
            .filtered()
            .iter()
            .map(|l| l.location_id.as_str())
            .collect()
    }

    #[test]
    fn new_session_is_loading_and_empty() {
        let session = SessionState::new();
        assert_eq!(session.status(), &DirectoryStatus::Loading);
        assert!(session.filtered().is_empty());
        assert_eq!(session.radius(), SearchRadius::Five);
    }

    #[test]
    fn loading_directory_shows_everything() {
        let session = loaded_session();
        assert_eq!(session.status(), &DirectoryStatus::Ready);
        assert_eq!(shown(&session), vec!["A", "B"]);
    }

    #[test]
    fn failed_load_is_recorded() {
        let mut session = SessionState::new();
        session.fail_directory("connection refused");
        assert_eq!(
            session.status(),
            &DirectoryStatus::Failed("connection refused".to_string())
        );
        assert!(session.directory().is_empty());
    }

    #[test]
    fn applied_search_filters_around_reference() {
        let mut session = loaded_session();
        let ticket = session.begin_search();
        let applied = session.apply_search(ticket, Some(DOWNTOWN));
        assert_eq!(applied, SearchApplied::Filtered { matches: 1 });
        assert_eq!(shown(&session), vec!["A"]);
        assert_eq!(session.reference(), Some(DOWNTOWN));
    }

    #[test]
    fn not_found_leaves_view_unchanged() {
        let mut session = loaded_session();
        let first = session.begin_search();
        session.apply_search(first, Some(DOWNTOWN));

        let second = session.begin_search();
        let applied = session.apply_search(second, None);

        assert_eq!(applied, SearchApplied::NotFound);
        assert_eq!(shown(&session), vec!["A"]);
        assert_eq!(session.reference(), Some(DOWNTOWN));
    }

    #[test]
    fn stale_response_cannot_overwrite_newer_search() {
        let mut session = loaded_session();
        let older = session.begin_search();
        let newer = session.begin_search();

        assert_eq!(
            session.apply_search(newer, Some(NORTH_SHORE)),
            SearchApplied::Filtered { matches: 1 }
        );
        assert_eq!(
            session.apply_search(older, Some(DOWNTOWN)),
            SearchApplied::Stale
        );
        assert_eq!(shown(&session), vec!["B"]);
        assert_eq!(session.reference(), Some(NORTH_SHORE));
    }

    #[test]
    fn out_of_order_arrival_of_older_first_still_applies_both() {
        let mut session = loaded_session();
        let older = session.begin_search();
        let newer = session.begin_search();

        session.apply_search(older, Some(DOWNTOWN));
        session.apply_search(newer, Some(NORTH_SHORE));
        assert_eq!(session.reference(), Some(NORTH_SHORE));
    }

    #[test]
    fn failed_search_keeps_view_and_marks_ticket_applied() {
        let mut session = loaded_session();
        let ok = session.begin_search();
        session.apply_search(ok, Some(DOWNTOWN));

        let failing = session.begin_search();
        assert!(session.fail_search(failing));
        assert_eq!(shown(&session), vec!["A"]);
        assert!(!session.fail_search(ok));
    }

    #[test]
    fn changing_radius_refilters_around_reference() {
        let mut session = loaded_session();
        let ticket = session.begin_search();
        session.apply_search(ticket, Some(DOWNTOWN));
        assert_eq!(shown(&session), vec!["A"]);

        session.set_radius(SearchRadius::Ten);
        assert_eq!(shown(&session), vec!["A", "B"]);

        session.set_radius(SearchRadius::Two);
        assert_eq!(shown(&session), vec!["A"]);
    }

    #[test]
    fn changing_radius_without_reference_shows_everything() {
        let mut session = loaded_session();
        session.set_radius(SearchRadius::Two);
        assert_eq!(shown(&session), vec!["A", "B"]);
    }

    #[test]
    fn tickets_increase_monotonically() {
        let mut session = SessionState::new();
        let a = session.begin_search();
        let b = session.begin_search();
        assert!(b > a);
        assert_eq!(b.sequence(), a.sequence() + 1);
    }
}
