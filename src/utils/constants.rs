pub const GRAVITY: f64 = 9.80665; // m/s^2
pub const SEA_LEVEL_DENSITY: f64 = 1.225; // kg/m^3

// Regularisation of the Biot-Savart kernel near a filament, relative to the
// bound-leg length
pub const SINGULARITY_EPSILON: f64 = 1e-8;

// Relative pivot magnitude below which the influence system is treated as singular
pub const SINGULAR_PIVOT_TOLERANCE: f64 = 1e-12;

// Default hinge location of a control surface (fraction of chord)
pub const DEFAULT_HINGE_POINT: f64 = 0.75;
