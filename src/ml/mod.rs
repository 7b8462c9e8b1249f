/*!
 * # Machine Learning Module
 *
 * Numeric building blocks shared by the analytics services: least-squares
 * trend fitting, feature standardization with nearest-neighbor voting, and
 * injectable Gaussian noise.
 */

/// Ordinary least squares line fitting
pub mod regression;

/// Standardization and k-nearest-neighbor classification
pub mod neighbors;

/// Seedable noise sources
pub mod noise;

pub use neighbors::{KNearestNeighbors, StandardScaler};
pub use noise::{GaussianNoise, NoNoise, NoiseSource, ScriptedNoise};
pub use regression::LinearModel;
