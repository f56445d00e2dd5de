use courtfinder_core::{
    haversine_km, Coordinate, CourtLocation, SearchApplied, SearchTicket, SessionState,
};
use courtfinder_geocode::GeocodeClient;

pub(crate) const NOT_FOUND_MESSAGE: &str = "Location not found. Try another name.";

/// Geocodes `address` and offers the result to `session` under `ticket`.
///
/// A geocoding failure is recorded against the ticket before it is returned,
/// so a later search is never mistaken for stale.
///
/// # Errors
///
/// Returns an error if the geocoding request fails.
pub(crate) async fn resolve_search(
    session: &tokio::sync::Mutex<SessionState>,
    geocoder: &GeocodeClient,
    ticket: SearchTicket,
    address: &str,
) -> anyhow::Result<SearchApplied> {
    match geocoder.geocode(address).await {
        Ok(outcome) => Ok(session.lock().await.apply_search(ticket, outcome)),
        Err(e) => {
            session.lock().await.fail_search(ticket);
            Err(e.into())
        }
    }
}

/// One result card line per location, with distance from `reference` when set.
pub(crate) fn render_cards(
    locations: &[CourtLocation],
    reference: Option<Coordinate>,
) -> Vec<String> {
    locations
        .iter()
        .map(|location| {
            let distance = reference
                .map(|center| format!("  ({:.1} km)", haversine_km(center, location.coordinate)))
                .unwrap_or_default();
            format!(
                "{}\n  {}\n  Courts: {}{}",
                location.name,
                location.address,
                location.court_count(),
                distance
            )
        })
        .collect()
}

/// Prints the session's current view, or the not-found message.
pub(crate) fn print_outcome(session: &SessionState, applied: SearchApplied) {
    match applied {
        SearchApplied::NotFound => println!("{NOT_FOUND_MESSAGE}"),
        SearchApplied::Stale => {
            tracing::debug!("search superseded by a newer one");
        }
        SearchApplied::Filtered { matches } => {
            if matches == 0 {
                println!("no courts within {}", session.radius());
                return;
            }
            println!("{matches} location(s) within {}:", session.radius());
            for card in render_cards(session.filtered(), session.reference()) {
                println!("{card}");
            }
        }
    }
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
