use super::RoutingModel;
use crate::basic_types::Solution;

/// The tour of one courier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourierRoute {
    /// Starts and ends at the origin.
    stops: Vec<usize>,
    load: u64,
    distance: u64,
}

impl CourierRoute {
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// The delivered items in visiting order, numbered from one.
    pub fn delivered_items(&self) -> Vec<usize> {
        self.stops
            .iter()
            .skip(1)
            .take(self.stops.len().saturating_sub(2))
            .map(|item| item + 1)
            .collect()
    }

    pub fn load(&self) -> u64 {
        self.load
    }

    pub fn distance(&self) -> u64 {
        self.distance
    }
}

/// A decoded assignment of items to couriers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutingSolution {
    routes: Vec<CourierRoute>,
    objective: u64,
}

impl RoutingSolution {
    /// Decodes the routes by following the taken edges from the origin; a stop without a
    /// successor ends its route.
    pub fn from_model(model: &RoutingModel, solution: &Solution) -> RoutingSolution {
        let num_stops = model.num_stops();
        let origin = num_stops.saturating_sub(1);

        let routes = (0..model.num_couriers())
            .map(|courier| {
                let mut stops = vec![origin];
                let mut current = origin;
                for _ in 0..num_stops {
                    let Some(next) = (0..num_stops)
                        .find(|&next| solution.get_literal_value(model.route(courier, current, next)))
                    else {
                        break;
                    };
                    stops.push(next);
                    current = next;
                    if next == origin {
                        break;
                    }
                }

                CourierRoute {
                    stops,
                    load: model.load(courier).to_decimal(solution),
                    distance: model.distance(courier).to_decimal(solution),
                }
            })
            .collect();

        RoutingSolution {
            routes,
            objective: model.max_distance().to_decimal(solution),
        }
    }

    pub fn routes(&self) -> &[CourierRoute] {
        &self.routes
    }

    /// The longest distance travelled by any courier.
    pub fn objective(&self) -> u64 {
        self.objective
    }
}
