use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceError {
    #[error("An instance needs at least one courier")]
    NoCouriers,
    #[error("The distance matrix has {actual} rows but {expected} are required")]
    DistanceRows { expected: usize, actual: usize },
    #[error("Row {row} of the distance matrix has {actual} entries but {expected} are required")]
    DistanceColumns {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// A capacitated multi-courier routing instance.
///
/// Items are numbered `0..n` and the origin is stop `n`. Couriers keep the order in which their
/// capacities are given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutingInstance {
    capacities: Vec<u64>,
    sizes: Vec<u64>,
    distances: Vec<Vec<u64>>,
    min_path: u64,
    max_path: u64,
    min_packs: usize,
    max_packs: usize,
}

impl RoutingInstance {
    /// Creates an instance with one courier per capacity and one item per size; `distances` is
    /// the `(n + 1) x (n + 1)` matrix over the items followed by the origin.
    pub fn new(
        capacities: Vec<u64>,
        sizes: Vec<u64>,
        distances: Vec<Vec<u64>>,
    ) -> Result<RoutingInstance, InstanceError> {
        if capacities.is_empty() {
            return Err(InstanceError::NoCouriers);
        }

        let num_stops = sizes.len() + 1;
        if distances.len() != num_stops {
            return Err(InstanceError::DistanceRows {
                expected: num_stops,
                actual: distances.len(),
            });
        }
        if let Some((row, entries)) = distances
            .iter()
            .enumerate()
            .find(|(_, entries)| entries.len() != num_stops)
        {
            return Err(InstanceError::DistanceColumns {
                row,
                expected: num_stops,
                actual: entries.len(),
            });
        }

        let origin = sizes.len();
        // every courier visits at least one item, so the farthest round trip bounds the makespan
        let min_path = (0..origin)
            .map(|item| distances[origin][item] + distances[item][origin])
            .max()
            .unwrap_or(0);
        // a tour leaves every stop at most once
        let max_path = distances
            .iter()
            .map(|row| row.iter().copied().max().unwrap_or(0))
            .sum();
        let min_packs = 1;
        let max_packs = sizes
            .len()
            .saturating_sub((capacities.len() - 1) * min_packs);

        Ok(RoutingInstance {
            capacities,
            sizes,
            distances,
            min_path,
            max_path,
            min_packs,
            max_packs,
        })
    }

    pub fn num_couriers(&self) -> usize {
        self.capacities.len()
    }

    pub fn num_items(&self) -> usize {
        self.sizes.len()
    }

    /// The index of the origin among the stops.
    pub fn origin(&self) -> usize {
        self.sizes.len()
    }

    pub fn num_stops(&self) -> usize {
        self.sizes.len() + 1
    }

    pub fn capacity(&self, courier: usize) -> u64 {
        self.capacities[courier]
    }

    pub fn size(&self, item: usize) -> u64 {
        self.sizes[item]
    }

    pub fn distance(&self, from: usize, to: usize) -> u64 {
        self.distances[from][to]
    }

    /// A lower bound on the objective: the longest round trip from the origin to a single item.
    pub fn min_path(&self) -> u64 {
        self.min_path
    }

    /// An upper bound on the length of any single tour.
    pub fn max_path(&self) -> u64 {
        self.max_path
    }

    pub fn min_packs(&self) -> usize {
        self.min_packs
    }

    pub fn max_packs(&self) -> usize {
        self.max_packs
    }
}

#[cfg(test)]
mod tests {
    use super::InstanceError;
    use super::RoutingInstance;

    fn square_distances() -> Vec<Vec<u64>> {
        vec![
            vec![0, 1, 2, 1],
            vec![1, 0, 1, 2],
            vec![2, 1, 0, 1],
            vec![1, 2, 1, 0],
        ]
    }

    #[test]
    fn bounds_are_derived_from_the_distances() {
        let instance =
            RoutingInstance::new(vec![10, 4], vec![1, 2, 3], square_distances()).expect("valid");

        assert_eq!(instance.origin(), 3);
        assert_eq!(instance.num_stops(), 4);
        assert_eq!(instance.min_path(), 4);
        assert_eq!(instance.max_path(), 8);
        assert_eq!(instance.min_packs(), 1);
        assert_eq!(instance.max_packs(), 2);
        assert_eq!(instance.capacity(1), 4);
    }

    #[test]
    fn more_couriers_than_items_leaves_no_packs() {
        let instance =
            RoutingInstance::new(vec![1; 5], vec![1, 1, 1], square_distances()).expect("valid");

        assert_eq!(instance.max_packs(), 0);
    }

    #[test]
    fn malformed_distance_matrices_are_rejected() {
        let mut distances = square_distances();
        let _ = distances[2].pop();

        assert_eq!(
            RoutingInstance::new(vec![3], vec![1, 1, 1], distances),
            Err(InstanceError::DistanceColumns {
                row: 2,
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            RoutingInstance::new(vec![3], vec![1, 1], square_distances()),
            Err(InstanceError::DistanceRows {
                expected: 3,
                actual: 4
            })
        );
        assert_eq!(
            RoutingInstance::new(vec![], vec![1, 1, 1], square_distances()),
            Err(InstanceError::NoCouriers)
        );
    }
}
