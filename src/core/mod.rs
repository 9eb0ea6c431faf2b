pub mod classifier;
pub mod interceptor;
pub mod normalizer;
pub mod outcome;
