//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::Place;
use crate::trip::TripSnapshot;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Trip planner page.
#[derive(Template)]
#[template(path = "trip.html")]
pub struct TripPageTemplate {
    pub trip: TripView,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Trip panel fragment, re-rendered after every command.
#[derive(Template)]
#[template(path = "trip_panel.html")]
pub struct TripPanelTemplate {
    pub trip: TripView,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Trip view model for templates.
#[derive(Debug, Clone)]
pub struct TripView {
    pub stops: Vec<StopView>,
    pub has_changes: bool,
    pub is_saving: bool,
    pub share_link: String,
    pub route_link: String,
}

impl TripView {
    /// Create from a snapshot and the links for it.
    pub fn new(snapshot: &TripSnapshot, share_link: String, route_link: String) -> Self {
        let stops = snapshot
            .stops
            .iter()
            .enumerate()
            .map(|(i, place)| StopView::from_place(i, place, snapshot.active_info == Some(i)))
            .collect();

        Self {
            stops,
            has_changes: snapshot.has_changes,
            is_saving: snapshot.is_saving,
            share_link,
            route_link,
        }
    }

    /// Save-state banner text, if any.
    ///
    /// Only a dirty trip has a banner. Saving takes precedence over dirty.
    pub fn status_message(&self) -> Option<&'static str> {
        if !self.has_changes {
            None
        } else if self.is_saving {
            Some("Saving...")
        } else {
            Some("You have unsaved changes!")
        }
    }

    /// Whether to offer the save button.
    pub fn can_save(&self) -> bool {
        self.has_changes && !self.is_saving
    }
}

/// A stop in the trip panel.
#[derive(Debug, Clone)]
pub struct StopView {
    /// Position in the trip (0-based, what the API takes)
    pub index: usize,
    pub place_id: String,
    pub title: String,
    pub address: String,
    pub rating: Option<String>,
    /// Whether this stop's detail popup is open
    pub is_active: bool,
}

impl StopView {
    /// 1-based label shown next to the drag handle.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn from_place(index: usize, place: &Place, is_active: bool) -> Self {
        let rating = place.rating.map(|r| match place.ratings_total {
            Some(total) => format!("{r:.1} ({total})"),
            None => format!("{r:.1}"),
        });

        Self {
            index,
            place_id: place.place_id.to_string(),
            title: place.title.clone(),
            address: place.address.clone(),
            rating,
            is_active,
        }
    }
}
