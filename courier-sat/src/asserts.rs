//! Leveled assertions. Cheap checks run at the simple level; the more expensive levels are only
//! enabled for debugging, since they can change the asymptotic complexity of the engine.

#[cfg(not(feature = "debug-checks"))]
pub const SAT_ASSERT_LEVEL_DEFINITION: u8 = SAT_ASSERT_SIMPLE;

#[cfg(feature = "debug-checks")]
pub const SAT_ASSERT_LEVEL_DEFINITION: u8 = SAT_ASSERT_ADVANCED;

pub const SAT_ASSERT_SIMPLE: u8 = 1;
pub const SAT_ASSERT_MODERATE: u8 = 2;
pub const SAT_ASSERT_ADVANCED: u8 = 3;
pub const SAT_ASSERT_EXTREME: u8 = 4;

macro_rules! sat_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::SAT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::SAT_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

macro_rules! sat_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::SAT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::SAT_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

macro_rules! sat_assert_ne_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::SAT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::SAT_ASSERT_SIMPLE {
            assert_ne!($($arg)*);
        }
    };
}

macro_rules! sat_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::SAT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::SAT_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

macro_rules! sat_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::SAT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::SAT_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

macro_rules! sat_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::asserts::SAT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::SAT_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}

pub(crate) use sat_assert_advanced;
pub(crate) use sat_assert_eq_simple;
pub(crate) use sat_assert_extreme;
pub(crate) use sat_assert_moderate;
pub(crate) use sat_assert_ne_simple;
pub(crate) use sat_assert_simple;
