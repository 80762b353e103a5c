//! Small general purpose utilities.

pub mod in_range_option;
