pub mod a1_notation;
pub mod ranges;
pub mod value_range;
