//! Equality oracle - decides whether a destination entry needs a copy

mod compare;

pub use compare::is_up_to_date;
