/// The outcome of a single call to [`crate::engine::SatSolver::solve_under_assumptions`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SolverExecutionFlag {
    /// A satisfying assignment was found; it can be read through
    /// [`crate::engine::SatSolver::get_solution`].
    Feasible,
    /// The clause database is unsatisfiable regardless of the assumptions.
    Infeasible,
    /// The clause database is unsatisfiable together with the given assumptions.
    InfeasibleUnderAssumptions,
    /// The termination condition triggered before a conclusion was reached.
    Timeout,
}
