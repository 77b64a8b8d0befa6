use log::debug;

use super::RoutingInstance;
use crate::basic_types::Literal;
use crate::context::SolverContext;
use crate::encoders::cardinality::at_least_k;
use crate::encoders::cardinality::at_most_k;
use crate::encoders::cardinality::exactly_one;
use crate::encoders::BitVector;
use crate::encoders::TimeSequence;
use crate::formula::Formula;
use crate::formula::VariablePool;

/// The propositions and integers of a routing instance whose constraints have been asserted into
/// a [`SolverContext`].
#[derive(Clone, Debug)]
pub struct RoutingModel {
    /// `routes[k][i][j]` holds if courier `k` travels directly from stop `i` to stop `j`.
    routes: Vec<Vec<Vec<Literal>>>,
    /// `deliveries[k][i]` holds if courier `k` leaves item `i`, and thus delivers it.
    deliveries: Vec<Vec<Literal>>,
    loads: Vec<BitVector>,
    distances: Vec<BitVector>,
    max_distance: BitVector,
}

impl RoutingModel {
    pub fn num_couriers(&self) -> usize {
        self.routes.len()
    }

    pub fn num_stops(&self) -> usize {
        self.routes.first().map_or(0, |route| route.len())
    }

    pub fn route(&self, courier: usize, from: usize, to: usize) -> Literal {
        self.routes[courier][from][to]
    }

    pub fn delivers(&self, courier: usize, item: usize) -> Literal {
        self.deliveries[courier][item]
    }

    pub fn load(&self, courier: usize) -> &BitVector {
        &self.loads[courier]
    }

    pub fn distance(&self, courier: usize) -> &BitVector {
        &self.distances[courier]
    }

    /// The objective: the longest distance travelled by any courier.
    pub fn max_distance(&self) -> &BitVector {
        &self.max_distance
    }
}

/// Asserts the constraints of a [`RoutingInstance`] into a [`SolverContext`], exactly once.
///
/// An infeasible instance is not detected here; it makes the context unsatisfiable.
#[derive(Debug)]
pub struct RoutingModelBuilder<'a, Context> {
    instance: &'a RoutingInstance,
    context: &'a mut Context,
    num_constraints: usize,
}

impl<'a, Context: SolverContext> RoutingModelBuilder<'a, Context> {
    pub fn new(instance: &'a RoutingInstance, context: &'a mut Context) -> Self {
        RoutingModelBuilder {
            instance,
            context,
            num_constraints: 0,
        }
    }

    pub fn build(mut self) -> RoutingModel {
        let routes = (0..self.instance.num_couriers())
            .map(|_| self.create_route())
            .collect::<Vec<_>>();
        self.constrain_every_item_is_visited_once(&routes);

        let mut deliveries = vec![];
        let mut loads = vec![];
        let mut distances = vec![];
        for (courier, route) in routes.iter().enumerate() {
            self.constrain_tour(route);
            self.eliminate_subtours(route);

            let delivered = self.derive_deliveries(route);
            loads.push(self.constrain_load(courier, &delivered));
            distances.push(self.compute_distance(courier, route));
            deliveries.push(delivered);
        }

        let max_distance = self.constrain_max_distance(&distances);

        let num_variables = self.variables().num_variables();
        debug!(
            "Routing model for {} couriers and {} items uses {} propositions and {} constraints",
            self.instance.num_couriers(),
            self.instance.num_items(),
            num_variables,
            self.num_constraints
        );

        RoutingModel {
            routes,
            deliveries,
            loads,
            distances,
            max_distance,
        }
    }

    fn variables(&mut self) -> &mut VariablePool {
        self.context.variables()
    }

    fn assert(&mut self, formula: Formula) {
        self.num_constraints += 1;
        self.context.assert_formula(formula);
    }

    fn assert_constraints_of(&mut self, vector: &mut BitVector) {
        for constraint in vector.take_constraints() {
            self.assert(constraint);
        }
    }

    /// The route adjacency of one courier; no stop travels to itself.
    fn create_route(&mut self) -> Vec<Vec<Literal>> {
        let num_stops = self.instance.num_stops();
        let route = (0..num_stops)
            .map(|_| self.variables().new_literals(num_stops))
            .collect::<Vec<_>>();

        for (stop, successors) in route.iter().enumerate() {
            self.assert((!successors[stop]).into());
        }
        route
    }

    /// Across all couriers, every item is entered exactly once and left exactly once.
    fn constrain_every_item_is_visited_once(&mut self, routes: &[Vec<Vec<Literal>>]) {
        let num_stops = self.instance.num_stops();
        for item in 0..self.instance.num_items() {
            let entering = routes
                .iter()
                .flat_map(|route| (0..num_stops).map(move |from| route[from][item]))
                .collect::<Vec<_>>();
            let leaving = routes
                .iter()
                .flat_map(|route| route[item].iter().copied())
                .collect::<Vec<_>>();

            let formula = exactly_one(&entering, self.variables());
            self.assert(formula);
            let formula = exactly_one(&leaving, self.variables());
            self.assert(formula);
        }
    }

    /// The courier departs from and returns to the origin exactly once, never goes back and
    /// forth between two items, and enters exactly the items it leaves.
    fn constrain_tour(&mut self, route: &[Vec<Literal>]) {
        let origin = self.instance.origin();

        let departures = route[origin].clone();
        let formula = exactly_one(&departures, self.variables());
        self.assert(formula);
        let returns = route.iter().map(|successors| successors[origin]).collect::<Vec<_>>();
        let formula = exactly_one(&returns, self.variables());
        self.assert(formula);

        for (from, successors) in route.iter().enumerate().take(origin) {
            for to in from + 1..origin {
                self.assert(Formula::or([
                    (!successors[to]).into(),
                    (!route[to][from]).into(),
                ]));
            }

            let enters = Formula::or(route.iter().map(|row| row[from].into()));
            let leaves = Formula::or(successors.iter().map(|&literal| literal.into()));
            self.assert(Formula::iff(enters, leaves));
        }
    }

    /// Delivering an item is not a free choice: it is defined as leaving the item.
    fn derive_deliveries(&mut self, route: &[Vec<Literal>]) -> Vec<Literal> {
        let num_items = self.instance.num_items();
        let delivered = self.variables().new_literals(num_items);
        for (item, &delivers) in delivered.iter().enumerate() {
            let leaves = Formula::or(route[item].iter().map(|&literal| literal.into()));
            self.assert(Formula::iff(delivers.into(), leaves));
        }

        let formula = at_least_k(&delivered, self.instance.min_packs(), self.variables());
        self.assert(formula);
        let formula = at_most_k(&delivered, self.instance.max_packs(), self.variables());
        self.assert(formula);

        delivered
    }

    fn constrain_load(&mut self, courier: usize, delivered: &[Literal]) -> BitVector {
        let mut load = BitVector::from_value(0, self.variables());
        for (item, &delivers) in delivered.iter().enumerate() {
            let size = self.instance.size(item);
            load = load.add_int(size, delivers, self.variables());
        }
        let mut load = load.with_name(format!("load_{courier}"));

        self.assert_constraints_of(&mut load);
        self.assert(load.leq_int(self.instance.capacity(courier)));
        load
    }

    /// The sum of the distances of the edges taken, added pairwise in a balanced tree.
    fn compute_distance(&mut self, courier: usize, route: &[Vec<Literal>]) -> BitVector {
        let mut terms = vec![];
        for (from, successors) in route.iter().enumerate() {
            for (to, &travels) in successors.iter().enumerate() {
                let distance = self.instance.distance(from, to);
                if from == to || distance == 0 {
                    continue;
                }
                let term = BitVector::from_value(distance, self.variables());
                terms.push(term.multiply_by_literal(travels, self.variables()));
            }
        }

        while terms.len() > 1 {
            let mut sums = Vec::with_capacity(terms.len().div_ceil(2));
            let mut remaining = terms.into_iter();
            while let Some(lhs) = remaining.next() {
                match remaining.next() {
                    Some(rhs) => sums.push(lhs.add(rhs, self.variables())),
                    None => sums.push(lhs),
                }
            }
            terms = sums;
        }

        let distance = match terms.pop() {
            Some(distance) => distance,
            None => BitVector::from_value(0, self.variables()),
        };
        let mut distance = distance.with_name(format!("distance_{courier}"));
        self.assert_constraints_of(&mut distance);
        distance
    }

    /// Travelling from a stop to an item makes the time of the item the successor of the time
    /// of the stop. The origin is at time zero, so every visited item is reached from it.
    fn eliminate_subtours(&mut self, route: &[Vec<Literal>]) {
        let num_items = self.instance.num_items();
        let times = (0..self.instance.num_stops())
            .map(|_| TimeSequence::new(num_items, self.variables()))
            .collect::<Vec<_>>();
        for time in &times {
            let definition = time.definition(self.variables());
            self.assert(definition);
        }
        self.assert(times[self.instance.origin()].is_zero());

        for (from, successors) in route.iter().enumerate() {
            for (to, &travels) in successors.iter().enumerate().take(num_items) {
                if from != to {
                    self.assert(Formula::implies(
                        travels.into(),
                        times[to].next(&times[from]),
                    ));
                }
            }
        }
    }

    /// The objective is at least every courier distance, equal to one of them, and within the
    /// bounds of the instance.
    fn constrain_max_distance(&mut self, distances: &[BitVector]) -> BitVector {
        let width = BitVector::width_of(self.instance.max_path());
        let max_distance = BitVector::fresh(width, self.variables()).with_name("max_distance");

        for distance in distances {
            self.assert(max_distance.geq(distance));
        }
        self.assert(Formula::or(
            distances.iter().map(|distance| max_distance.equal(distance)),
        ));
        self.assert(max_distance.geq_int(self.instance.min_path()));
        self.assert(max_distance.leq_int(self.instance.max_path()));

        max_distance
    }
}

#[cfg(test)]
mod tests {
    use super::RoutingModel;
    use super::RoutingModelBuilder;
    use crate::context::CdclContext;
    use crate::context::CheckResult;
    use crate::context::SolverContext;
    use crate::formula::Formula;
    use crate::routing::RoutingInstance;
    use crate::routing::RoutingSolution;

    /// Stops on a line, with the origin at position zero.
    fn line_instance(capacities: Vec<u64>, sizes: Vec<u64>) -> RoutingInstance {
        let num_items = sizes.len();
        let position = |stop: usize| if stop == num_items { 0 } else { stop as u64 + 1 };
        let distances = (0..=num_items)
            .map(|from| {
                (0..=num_items)
                    .map(|to| position(from).abs_diff(position(to)))
                    .collect()
            })
            .collect();
        RoutingInstance::new(capacities, sizes, distances).expect("valid instance")
    }

    fn solve(instance: &RoutingInstance) -> Option<(RoutingModel, RoutingSolution)> {
        let mut context = CdclContext::default();
        let model = RoutingModelBuilder::new(instance, &mut context).build();
        match context.check() {
            CheckResult::Sat => {
                let solution = context.model().expect("check returned sat");
                let decoded = RoutingSolution::from_model(&model, solution);
                Some((model, decoded))
            }
            _ => None,
        }
    }

    fn assert_valid(instance: &RoutingInstance, solution: &RoutingSolution) {
        let mut visits = vec![0; instance.num_items()];
        for (courier, route) in solution.routes().iter().enumerate() {
            let stops = route.stops();
            assert_eq!(stops.first(), Some(&instance.origin()));
            assert_eq!(stops.last(), Some(&instance.origin()));
            assert!(stops.len() >= 3, "courier {courier} delivers nothing");

            let distance: u64 = stops
                .windows(2)
                .map(|leg| instance.distance(leg[0], leg[1]))
                .sum();
            assert_eq!(route.distance(), distance);

            let load: u64 = stops[1..stops.len() - 1]
                .iter()
                .map(|&item| instance.size(item))
                .sum();
            assert_eq!(route.load(), load);
            assert!(load <= instance.capacity(courier));

            for &item in &stops[1..stops.len() - 1] {
                visits[item] += 1;
            }
        }

        assert!(visits.iter().all(|&count| count == 1), "{visits:?}");
        let longest = solution.routes().iter().map(|route| route.distance()).max();
        assert_eq!(Some(solution.objective()), longest);
        assert!(solution.objective() >= instance.min_path());
        assert!(solution.objective() <= instance.max_path());
    }

    #[test]
    fn single_courier_visits_every_item() {
        let instance = RoutingInstance::new(
            vec![10],
            vec![1, 1, 1],
            vec![
                vec![0, 1, 2, 1],
                vec![1, 0, 1, 2],
                vec![2, 1, 0, 1],
                vec![1, 2, 1, 0],
            ],
        )
        .expect("valid instance");

        let (_, solution) = solve(&instance).expect("instance is feasible");

        assert_valid(&instance, &solution);
        let mut items = solution.routes()[0].delivered_items();
        items.sort_unstable();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn two_couriers_split_the_items_into_tours() {
        let instance = line_instance(vec![5, 5], vec![2, 3, 2, 3]);

        let (model, solution) = solve(&instance).expect("instance is feasible");

        assert_valid(&instance, &solution);
        assert_eq!(model.num_couriers(), 2);
        assert_eq!(model.num_stops(), 5);
    }

    #[test]
    fn subtours_are_excluded() {
        let instance = line_instance(vec![20], vec![1, 1, 1, 1, 1]);
        let mut context = CdclContext::default();
        let model = RoutingModelBuilder::new(&instance, &mut context).build();

        context.push();
        context.assert_formula(Formula::and([
            model.route(0, 0, 1).into(),
            model.route(0, 1, 2).into(),
            model.route(0, 2, 0).into(),
        ]));
        assert_eq!(context.check(), CheckResult::Unsat);
        context.pop().expect("a checkpoint was pushed");

        assert_eq!(context.check(), CheckResult::Sat);
    }

    #[test]
    fn loads_beyond_capacity_are_infeasible() {
        let instance = line_instance(vec![3, 3], vec![2, 2, 2]);

        assert!(solve(&instance).is_none());
    }

    #[test]
    fn deliveries_follow_the_route() {
        let instance = line_instance(vec![4, 4], vec![1, 2, 1]);
        let mut context = CdclContext::default();
        let model = RoutingModelBuilder::new(&instance, &mut context).build();

        assert_eq!(context.check(), CheckResult::Sat);
        let solution = context.model().expect("check returned sat");
        let decoded = RoutingSolution::from_model(&model, solution);

        for (courier, route) in decoded.routes().iter().enumerate() {
            for item in 0..instance.num_items() {
                assert_eq!(
                    solution.get_literal_value(model.delivers(courier, item)),
                    route.stops().contains(&item)
                );
            }
            assert_eq!(model.load(courier).name(), Some(format!("load_{courier}").as_str()));
            assert_eq!(model.distance(courier).to_decimal(solution), route.distance());
        }
        assert_eq!(model.max_distance().name(), Some("max_distance"));
    }
}
