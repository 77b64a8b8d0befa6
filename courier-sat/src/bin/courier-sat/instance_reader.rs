//! Reader for routing instances in the `.dat` format:
//!
//! ```text
//! m
//! n
//! capacity_1 ... capacity_m
//! size_1 ... size_n
//! d_0_0 ... d_0_n
//! ...
//! d_n_0 ... d_n_n
//! ```
//!
//! The distance rows cover the items followed by the origin. Repeated spaces are allowed.

use std::path::Path;

use courier_sat::routing::RoutingInstance;
use thiserror::Error;

use crate::result::CourierResult;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum InstanceParseError {
    #[error("the file ended, expected {expected}")]
    MissingLine { expected: &'static str },
    #[error("'{token}' on line {line} is not a non-negative integer")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line} has {actual} values but {expected} are required")]
    WrongNumberOfValues {
        line: usize,
        expected: usize,
        actual: usize,
    },
}

pub(crate) fn read_instance(path: &Path) -> CourierResult<RoutingInstance> {
    let contents = std::fs::read_to_string(path)?;
    parse_instance(&contents)
}

pub(crate) fn parse_instance(contents: &str) -> CourierResult<RoutingInstance> {
    let mut lines = contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let mut next_values = |expected: &'static str| -> Result<(usize, Vec<u64>), InstanceParseError> {
        let (line, contents) = lines
            .next()
            .ok_or(InstanceParseError::MissingLine { expected })?;
        let values = contents
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<u64>()
                    .map_err(|_| InstanceParseError::InvalidNumber {
                        line,
                        token: token.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((line, values))
    };

    let num_couriers = single_value(next_values("the number of couriers")?)?;
    let num_items = single_value(next_values("the number of items")?)?;
    let capacities = exact_values(next_values("the capacities")?, num_couriers)?;
    let sizes = exact_values(next_values("the item sizes")?, num_items)?;
    let distances = (0..=num_items)
        .map(|_| exact_values(next_values("a row of the distance matrix")?, num_items + 1))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RoutingInstance::new(capacities, sizes, distances)?)
}

fn single_value((line, values): (usize, Vec<u64>)) -> Result<usize, InstanceParseError> {
    let values = exact_values((line, values), 1)?;
    Ok(values[0] as usize)
}

fn exact_values(
    (line, values): (usize, Vec<u64>),
    expected: usize,
) -> Result<Vec<u64>, InstanceParseError> {
    if values.len() != expected {
        return Err(InstanceParseError::WrongNumberOfValues {
            line,
            expected,
            actual: values.len(),
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::parse_instance;
    use super::InstanceParseError;
    use crate::result::CourierError;

    #[test]
    fn instance_with_irregular_spacing_is_read() {
        let instance = parse_instance("2\n3\n15 10\n3  2 6 \n0 3 4 5\n3 0 5 4\n4 4 0 3\n5 4 3 0\n")
            .expect("valid instance");

        assert_eq!(instance.num_couriers(), 2);
        assert_eq!(instance.num_items(), 3);
        assert_eq!(instance.capacity(1), 10);
        assert_eq!(instance.size(2), 6);
        assert_eq!(instance.distance(3, 0), 5);
    }

    #[test]
    fn missing_rows_are_reported() {
        let result = parse_instance("1\n2\n5\n1 1\n0 1 1\n1 0 1\n");

        assert!(matches!(
            result,
            Err(CourierError::InvalidInstance(InstanceParseError::MissingLine { .. }))
        ));
    }

    #[test]
    fn rows_of_the_wrong_length_are_reported() {
        let result = parse_instance("1\n1\n5\n1\n0 1 7\n1 0\n");

        assert!(matches!(
            result,
            Err(CourierError::InvalidInstance(
                InstanceParseError::WrongNumberOfValues {
                    line: 5,
                    expected: 2,
                    actual: 3
                }
            ))
        ));
    }

    #[test]
    fn non_numbers_are_reported() {
        let result = parse_instance("1\none\n");

        assert!(matches!(
            result,
            Err(CourierError::InvalidInstance(InstanceParseError::InvalidNumber { line: 2, .. }))
        ));
    }
}
