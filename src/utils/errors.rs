use thiserror::Error;

/// Malformed geometry, raised when a mesh or panel layout is generated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("{owner} needs at least two cross-sections, found {found}")]
    TooFewSections { owner: String, found: usize },

    #[error("{owner} cross-section {index} has non-positive chord {chord}")]
    NonPositiveChord {
        owner: String,
        index: usize,
        chord: f64,
    },

    #[error("{owner} cross-section {index} has negative radius {radius}")]
    NegativeRadius {
        owner: String,
        index: usize,
        radius: f64,
    },

    #[error("{owner} cross-section {index} has hinge point {hinge_point} outside (0, 1)")]
    InvalidHingePoint {
        owner: String,
        index: usize,
        hinge_point: f64,
    },

    #[error("{owner} section {index} has no extent in the YZ plane")]
    ZeroSpanSection { owner: String, index: usize },

    #[error("{owner} crosses its mirror plane at cross-section {index} (y = {y})")]
    MirroredHalvesIntersect { owner: String, index: usize, y: f64 },

    #[error("Invalid mesh resolution: {0}")]
    InvalidResolution(String),

    #[error("Airplane {0} has no reference dimensions and no wing to derive them from")]
    NoReferenceDimensions(String),

    #[error("Mesh face {face} references point {index} but only {points} points exist")]
    DanglingFaceIndex {
        face: usize,
        index: usize,
        points: usize,
    },
}

/// Failures of the linear solve or of the optimization run that drives it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Airplane has no lifting panels to solve for")]
    NoPanels,

    #[error("Influence matrix is singular at row {row} (pivot {pivot:e})")]
    SingularSystem { row: usize, pivot: f64 },

    #[error("Non-finite value in {0}")]
    NonFinite(String),

    #[error("Optimization did not converge: constraint violation {violation:e} exceeds {tolerance:e}")]
    NotConverged { violation: f64, tolerance: f64 },

    #[error("Optimizer failure: {0}")]
    Optimizer(String),
}

/// Airfoil resolution and query failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("Unknown airfoil: {0}")]
    UnknownAirfoil(String),

    #[error("Chordwise fraction {x_over_c} is outside [0, 1]")]
    OutOfDomain { x_over_c: f64 },

    #[error("Invalid airfoil coordinates for {name}: {reason}")]
    InvalidCoordinates { name: String, reason: String },
}

/// A bound variable was used where its structure did not fit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VariableBindingError {
    #[error("Variable {index} is not declared in this context ({declared} declared)")]
    UnknownVariable { index: usize, declared: usize },

    #[error("Expected {expected} values, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("No state field named {0}")]
    UnknownField(String),

    #[error("A trajectory needs at least one node")]
    EmptyTrajectory,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Crate-level error. Each kind is carried through unchanged.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Binding(#[from] VariableBindingError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
