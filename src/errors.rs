use thiserror::Error;

/// Every failure the geometry core can report. Malformed input, lookup failures and degenerate
/// geometry are kept as distinct variants so that a caller can present a targeted message.
#[derive(Error, Debug)]
pub enum WingError {
    #[error("Invalid airfoil code '{code}': {reason}")]
    InvalidAirfoilCode { code: String, reason: String },

    #[error("Unsupported spacing mode '{0}', expected 'uniform' or 'cosine'")]
    UnsupportedSpacing(String),

    #[error("Invalid {name} distribution: {reason}")]
    InvalidDistribution { name: String, reason: String },

    #[error("Invalid span stations: {0}")]
    InvalidStations(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("No {0} distribution has been set")]
    MissingDistribution(&'static str),

    #[error("No NACA 5-digit camber coefficients for series {0}")]
    UnknownFiveDigitSeries(String),

    #[error("Airfoil '{0}' was not found in the coordinate catalog")]
    AirfoilNotFound(String),

    #[error("No airfoil region covers the span fraction {fraction}")]
    SpanLookup { fraction: f64 },

    #[error("Value {value} is outside the defined range [{min}, {max}]")]
    OutsideDefinedRange { value: f64, min: f64, max: f64 },

    #[error("Could not locate the leading edge turning point in the coordinate set")]
    TurningPointNotFound,

    #[error("Geometry is not uniformly blocked by station: {0}")]
    NonUniformBlocks(String),

    #[error("Not enough points: needed {needed}, got {got}")]
    NotEnoughPoints { needed: usize, got: usize },

    #[error("Surface x coordinates are not strictly monotonic near x = {0}")]
    NonMonotonicSurface(f64),

    #[error("Smoothing spline system could not be factored")]
    SingularSpline,

    #[error("Failed to read coordinate data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse '{text}' on line {line}")]
    Parse { line: usize, text: String },

    #[error("Failed to parse wing configuration: {0}")]
    Config(#[from] serde_json::Error),
}
