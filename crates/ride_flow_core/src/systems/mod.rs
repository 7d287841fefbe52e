pub mod location_updated;
pub mod place_resolved;
pub mod quote;
pub mod route_request;
pub mod route_result;
pub mod suggestions_updated;
pub mod user_action;

use crate::config::FlowSettings;
use crate::map::{MapCommand, MapCommands};
use crate::session::TripSession;

/// Center the map on the last known user location, if any.
pub(crate) fn recenter_on_user(
    session: &TripSession,
    settings: &FlowSettings,
    map: &mut MapCommands,
) {
    if let Some(center) = session.user_location {
        map.push(MapCommand::SetRegion {
            center,
            span: settings.recenter_span,
        });
    }
}
