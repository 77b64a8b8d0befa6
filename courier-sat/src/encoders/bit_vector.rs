use thiserror::Error;

use crate::asserts::sat_assert_simple;
use crate::basic_types::Literal;
use crate::basic_types::Solution;
use crate::formula::Formula;
use crate::formula::VariablePool;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Multiplication requires a boolean operand, the operands have widths {lhs} and {rhs}")]
    NonBooleanMultiplier { lhs: usize, rhs: usize },
}

/// An unsigned binary integer over propositions, most significant bit first.
///
/// The value of a [`BitVector`] is only meaningful where its constraints are asserted. Every
/// arithmetic operation mints fresh propositions for its result and consumes its operands; the
/// result carries the constraints of the operands along with the ones defining its own bits.
/// Operands of different widths are aligned by treating the absent high bits as zero, so no
/// operation ever truncates.
#[derive(Clone, Debug)]
pub struct BitVector {
    bits: Vec<Literal>,
    constraints: Vec<Formula>,
    name: Option<String>,
}

impl BitVector {
    /// A vector with the binary digits of `value`; zero has width one.
    pub fn from_value(value: u64, variables: &mut VariablePool) -> BitVector {
        let width = bit_width(value);
        let bits = variables.new_literals(width);
        let constraints = bits
            .iter()
            .enumerate()
            .map(|(index, &bit)| {
                if constant_bit(value, width - 1 - index) {
                    bit.into()
                } else {
                    (!bit).into()
                }
            })
            .collect();

        BitVector {
            bits,
            constraints,
            name: None,
        }
    }

    /// The width of [`BitVector::from_value`] for `value`.
    pub fn width_of(value: u64) -> usize {
        bit_width(value)
    }

    /// Wraps existing propositions, most significant first, without constraining them.
    pub fn from_bits(bits: Vec<Literal>) -> BitVector {
        sat_assert_simple!(!bits.is_empty(), "A bit vector has at least one bit");
        BitVector {
            bits,
            constraints: vec![],
            name: None,
        }
    }

    /// An unconstrained vector of `width` fresh propositions.
    pub fn fresh(width: usize, variables: &mut VariablePool) -> BitVector {
        BitVector::from_bits(variables.new_literals(width))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> BitVector {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn width(&self) -> usize {
        self.bits.len()
    }

    pub fn is_bool(&self) -> bool {
        self.bits.len() == 1
    }

    pub fn bits(&self) -> &[Literal] {
        &self.bits
    }

    /// Removes the constraints from the vector so they can be asserted exactly once.
    pub fn take_constraints(&mut self) -> Vec<Formula> {
        std::mem::take(&mut self.constraints)
    }

    /// Prepends `num_bits` fresh high-order bits which are constrained to be false.
    pub fn extend(mut self, num_bits: usize, variables: &mut VariablePool) -> BitVector {
        let mut bits = variables.new_literals(num_bits);
        self.constraints.extend(bits.iter().map(|&bit| Formula::from(!bit)));
        bits.append(&mut self.bits);
        self.bits = bits;
        self
    }

    /// The sum of both vectors, one bit wider than the wider operand.
    pub fn add(mut self, mut other: BitVector, variables: &mut VariablePool) -> BitVector {
        let width = self.width().max(other.width());
        let mut constraints = std::mem::take(&mut self.constraints);
        constraints.append(&mut other.constraints);

        let bits = ripple_carry(
            width,
            |position| self.bit(position),
            |position| other.bit(position),
            variables,
            &mut constraints,
        );

        BitVector {
            bits,
            constraints,
            name: None,
        }
    }

    /// Adds `number` if `multiplier` holds. The result is one bit wider than the wider of this
    /// vector and `number`.
    pub fn add_int(
        mut self,
        number: u64,
        multiplier: Literal,
        variables: &mut VariablePool,
    ) -> BitVector {
        let width = self.width().max(bit_width(number));
        let mut constraints = std::mem::take(&mut self.constraints);

        let bits = ripple_carry(
            width,
            |position| self.bit(position),
            |position| {
                if constant_bit(number, position) {
                    multiplier.into()
                } else {
                    Formula::FALSE
                }
            },
            variables,
            &mut constraints,
        );

        BitVector {
            bits,
            constraints,
            name: self.name,
        }
    }

    /// The product with a boolean vector, which has the width of the non-boolean operand.
    ///
    /// Fails if neither operand is boolean.
    pub fn multiply(
        self,
        other: BitVector,
        variables: &mut VariablePool,
    ) -> Result<BitVector, ArithmeticError> {
        let (mut vector, mut boolean) = if other.is_bool() {
            (self, other)
        } else if self.is_bool() {
            (other, self)
        } else {
            return Err(ArithmeticError::NonBooleanMultiplier {
                lhs: self.width(),
                rhs: other.width(),
            });
        };

        vector.constraints.append(&mut boolean.constraints);
        Ok(vector.multiply_by_literal(boolean.bits[0], variables))
    }

    /// Every bit of the result is the corresponding bit of this vector gated by `multiplier`.
    pub fn multiply_by_literal(
        self,
        multiplier: Literal,
        variables: &mut VariablePool,
    ) -> BitVector {
        let mut constraints = self.constraints;
        let bits = self
            .bits
            .iter()
            .map(|&bit| {
                let product = variables.new_literal();
                constraints.push(Formula::iff(
                    product.into(),
                    Formula::and([bit.into(), multiplier.into()]),
                ));
                product
            })
            .collect();

        BitVector {
            bits,
            constraints,
            name: None,
        }
    }

    pub fn greater(&self, other: &BitVector) -> Formula {
        compare(
            self.width().max(other.width()),
            |position| self.bit(position),
            |position| other.bit(position),
            false,
        )
    }

    pub fn less(&self, other: &BitVector) -> Formula {
        other.greater(self)
    }

    pub fn geq(&self, other: &BitVector) -> Formula {
        compare(
            self.width().max(other.width()),
            |position| self.bit(position),
            |position| other.bit(position),
            true,
        )
    }

    pub fn leq(&self, other: &BitVector) -> Formula {
        other.geq(self)
    }

    /// Holds if both vectors decode to the same value; the extra high bits of the wider one have
    /// to be false.
    pub fn equal(&self, other: &BitVector) -> Formula {
        equal_bits(
            self.width().max(other.width()),
            |position| self.bit(position),
            |position| other.bit(position),
        )
    }

    pub fn greater_int(&self, value: u64) -> Formula {
        compare(
            self.width().max(bit_width(value)),
            |position| self.bit(position),
            |position| constant_bit(value, position).into(),
            false,
        )
    }

    pub fn less_int(&self, value: u64) -> Formula {
        compare(
            self.width().max(bit_width(value)),
            |position| constant_bit(value, position).into(),
            |position| self.bit(position),
            false,
        )
    }

    pub fn geq_int(&self, value: u64) -> Formula {
        compare(
            self.width().max(bit_width(value)),
            |position| self.bit(position),
            |position| constant_bit(value, position).into(),
            true,
        )
    }

    pub fn leq_int(&self, value: u64) -> Formula {
        compare(
            self.width().max(bit_width(value)),
            |position| constant_bit(value, position).into(),
            |position| self.bit(position),
            true,
        )
    }

    pub fn equal_int(&self, value: u64) -> Formula {
        equal_bits(
            self.width().max(bit_width(value)),
            |position| self.bit(position),
            |position| constant_bit(value, position).into(),
        )
    }

    pub fn is_zero(&self) -> Formula {
        !self.is_not_zero()
    }

    pub fn is_not_zero(&self) -> Formula {
        Formula::or(self.bits.iter().map(|&bit| bit.into()))
    }

    /// Decodes the vector as an unsigned integer; propositions absent from `solution` are false.
    pub fn to_decimal(&self, solution: &Solution) -> u64 {
        self.bits.iter().fold(0, |value, &bit| {
            (value << 1) | u64::from(solution.get_literal_value(bit))
        })
    }

    /// The bit at `position`, counted from the least significant bit; absent bits are false.
    fn bit(&self, position: usize) -> Formula {
        if position < self.bits.len() {
            self.bits[self.bits.len() - 1 - position].into()
        } else {
            Formula::FALSE
        }
    }
}

/// The number of binary digits of `value`, at least one.
fn bit_width(value: u64) -> usize {
    (u64::BITS - value.leading_zeros()).max(1) as usize
}

fn constant_bit(value: u64, position: usize) -> bool {
    position < u64::BITS as usize && (value >> position) & 1 == 1
}

/// Mints the sum bits and carries of a ripple-carry adder over `width` positions and returns the
/// result bits, most significant (the final carry) first.
fn ripple_carry(
    width: usize,
    lhs: impl Fn(usize) -> Formula,
    rhs: impl Fn(usize) -> Formula,
    variables: &mut VariablePool,
    constraints: &mut Vec<Formula>,
) -> Vec<Literal> {
    let mut bits = Vec::with_capacity(width + 1);
    let mut carry = Formula::FALSE;
    let mut carry_out = None;

    for position in 0..width {
        let (a, b) = (lhs(position), rhs(position));
        let half_sum = Formula::xor(a.clone(), b.clone());

        let sum = variables.new_literal();
        constraints.push(Formula::iff(
            sum.into(),
            Formula::xor(half_sum.clone(), carry.clone()),
        ));

        let next_carry = variables.new_literal();
        constraints.push(Formula::iff(
            next_carry.into(),
            Formula::or([Formula::and([a, b]), Formula::and([half_sum, carry])]),
        ));

        bits.push(sum);
        carry = next_carry.into();
        carry_out = Some(next_carry);
    }

    bits.extend(carry_out);
    bits.reverse();
    bits
}

/// `lhs > rhs` (or `lhs >= rhs` if `or_equal`), built from the least significant bit upwards:
/// a position decides the comparison unless both bits agree, in which case the lower positions
/// do.
fn compare(
    width: usize,
    lhs: impl Fn(usize) -> Formula,
    rhs: impl Fn(usize) -> Formula,
    or_equal: bool,
) -> Formula {
    (0..width).fold(Formula::from(or_equal), |lower, position| {
        let (a, b) = (lhs(position), rhs(position));
        Formula::or([
            Formula::and([a.clone(), !b.clone()]),
            Formula::and([Formula::iff(a, b), lower]),
        ])
    })
}

fn equal_bits(
    width: usize,
    lhs: impl Fn(usize) -> Formula,
    rhs: impl Fn(usize) -> Formula,
) -> Formula {
    Formula::and((0..width).map(|position| Formula::iff(lhs(position), rhs(position))))
}
