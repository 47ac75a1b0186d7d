/// Errors raised by matched-point registration before any computation runs.
#[derive(thiserror::Error, Debug)]
pub enum FitError {
    #[error("point sets must be non-empty")]
    EmptyPointSet,
    #[error("point sets differ in cardinality (p={p}, x={x})")]
    CardinalityMismatch { p: usize, x: usize },
    #[error("weights length {weights} does not match point count {points}")]
    WeightCountMismatch { points: usize, weights: usize },
    #[error("weight at index {index} is negative ({value})")]
    NegativeWeight { index: usize, value: f64 },
    #[error("weights must have a positive sum")]
    NonPositiveWeightSum,
}
