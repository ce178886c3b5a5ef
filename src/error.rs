use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Empty station query")]
    EmptyQuery,
    #[error("No station matches '{0}'")]
    NoStationMatch(String),
    #[error("Start platform '{platform}' does not belong to station '{station}'")]
    StartPlatformMismatch { platform: String, station: String },
    #[error("Station '{0}' has no platforms")]
    NoDeparturePlatform(String),
    #[error("No stops within walking range of ({lat:.5}, {lon:.5})")]
    NoStationsNearAddress { lat: f64, lon: f64 },
    #[error("A meeting needs at least two participants")]
    TooFewParticipants,
    #[error("At most {} participants are supported", crate::MAX_PARTICIPANTS)]
    TooManyParticipants,
    #[error("Malformed time '{0}', expected HH:MM:SS")]
    MalformedTime(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
