#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::instance_path;
use helpers::reported_objective;
use helpers::reported_routes;
use helpers::run_solver;

macro_rules! optimisation_test {
    ($name:ident, $file:literal, items: $items:literal, objective: $objective:literal) => {
        mod $name {
            use super::*;

            #[test]
            fn linear() {
                run_optimisation_test($file, "linear", $items, $objective);
            }

            #[test]
            fn binary_search() {
                run_optimisation_test($file, "binary-search", $items, $objective);
            }
        }
    };
}

optimisation_test!(three_items, "three_items.dat", items: 3, objective: 4);
optimisation_test!(two_sided, "two_sided.dat", items: 4, objective: 6);

fn run_optimisation_test(file_name: &str, strategy: &str, num_items: usize, objective: u64) {
    let output = run_solver(
        instance_path(file_name),
        ["--strategy".to_owned(), strategy.to_owned()],
        strategy,
    );

    assert!(output.status.success(), "{}", output.stdout);
    assert!(
        output.stdout.lines().any(|line| line == "s OPTIMUM FOUND"),
        "{}",
        output.stdout
    );
    assert_eq!(reported_objective(&output.stdout), Some(objective));
    let time = output
        .stdout
        .lines()
        .find_map(|line| line.strip_prefix("c time "))
        .expect("the run time is reported");
    assert!(time.contains('.'), "{time} has no fraction");
    assert!(time.parse::<f64>().expect("seconds") < 60.0);

    let mut delivered = reported_routes(&output.stdout)
        .into_iter()
        .inspect(|items| assert!(!items.is_empty(), "every courier delivers an item"))
        .flatten()
        .collect::<Vec<_>>();
    delivered.sort_unstable();
    assert_eq!(delivered, (1..=num_items).collect::<Vec<_>>());
}

#[test]
fn oversized_item_is_unsatisfiable() {
    let output = run_solver(instance_path("oversized_item.dat"), std::iter::empty(), "unsat");

    assert!(output.status.success());
    assert!(output.stdout.lines().any(|line| line == "s UNSATISFIABLE"));
    assert_eq!(reported_objective(&output.stdout), None);
    assert!(reported_routes(&output.stdout).is_empty());
}

#[test]
fn unsupported_file_extension_fails() {
    let output = run_solver(
        instance_path("three_items.txt"),
        std::iter::empty(),
        "unsupported",
    );

    assert!(!output.status.success());
    assert!(output.stdout.contains("Execution failed"));
}
