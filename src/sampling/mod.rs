pub mod allocation;
pub mod quantile;
pub mod sampler;

pub use allocation::{allocate_for_class, desired_per_bin, largest_remainder};
pub use quantile::{assign_quantile_bins, Binning};
pub use sampler::{stratified_sample, ClassSample, StratifiedSample};
