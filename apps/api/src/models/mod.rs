pub mod analysis;
pub mod match_analysis;
pub mod resume;
