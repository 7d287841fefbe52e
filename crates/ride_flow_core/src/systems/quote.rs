//! Quote system: recompute the trip quote from session state after every event.

use bevy_ecs::prelude::{Res, ResMut};

use crate::config::FlowSettings;
use crate::pricing::{quote_trip, DistanceSource, RideTierCatalog};
use crate::session::TripSession;

pub fn quote_system(
    settings: Res<FlowSettings>,
    catalog: Res<RideTierCatalog>,
    mut session: ResMut<TripSession>,
) {
    let quote = match (session.user_location, session.selected_destination()) {
        (Some(from), Some(destination)) => {
            let (distance_m, source) = match session.route_result() {
                Some(route) if route.has_path() => (route.path_length_m(), DistanceSource::Routed),
                _ => (
                    from.distance_m(&destination.coordinate),
                    DistanceSource::StraightLine,
                ),
            };
            Some(quote_trip(
                &catalog,
                distance_m,
                source,
                settings.meters_per_mile,
                session.trip_times,
            ))
        }
        _ => None,
    };
    if session.quote != quote {
        session.quote = quote;
    }
}
