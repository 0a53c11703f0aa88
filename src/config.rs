/// Numerical parameters of the geometry layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryConfig {
  /// Absolute distance below which two physical points are considered equal
  /// when reconciling face nodes that are not shared by both elements.
  pub matching_tolerance: f64,
  /// Residual, relative to the size of the target point, at which the
  /// inverse coordinate transform stops.
  pub inverse_tolerance: f64,
  pub inverse_max_iterations: usize,
}

impl Default for GeometryConfig {
  fn default() -> Self {
    Self {
      matching_tolerance: 1e-10,
      inverse_tolerance: 1e-12,
      inverse_max_iterations: 50,
    }
  }
}

impl GeometryConfig {
  pub fn with_matching_tolerance(mut self, tolerance: f64) -> Self {
    assert!(tolerance >= 0.0, "Tolerance must be non-negative.");
    self.matching_tolerance = tolerance;
    self
  }
  pub fn with_inverse_tolerance(mut self, tolerance: f64) -> Self {
    assert!(tolerance >= 0.0, "Tolerance must be non-negative.");
    self.inverse_tolerance = tolerance;
    self
  }
  pub fn with_inverse_max_iterations(mut self, iterations: usize) -> Self {
    self.inverse_max_iterations = iterations;
    self
  }
}
