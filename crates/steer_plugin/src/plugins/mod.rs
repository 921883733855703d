pub mod approximate_entropy;
pub mod block_frequency;

pub use approximate_entropy::ApproximateEntropyTest;
pub use block_frequency::BlockFrequencyTest;
