pub mod proposal;
pub mod training;
