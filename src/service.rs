pub mod aggregator;
pub mod sorting;
