use thiserror::Error;

#[derive(Error, Debug)]
pub enum MpdError {
    #[error("Invalid mpd document: {0}")]
    Parse(#[from] quick_xml::DeError),

    #[error("Representation in period {period}, adaptation set {adaptation_set} has an empty id")]
    EmptyRepresentationId {
        period: usize,
        adaptation_set: usize,
    },

    #[error("Invalid duration format: {0:?}")]
    InvalidDurationFormat(String),

    #[error("Can not resolve {reference:?} against {base}: {source}")]
    UrlResolution {
        base: url::Url,
        reference: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Number or time of the media segment at index {0} exceeds the u64 range")]
    SegmentPositionOverflow(u64),

    #[error("More than {0} segments addressed, the rest is dropped")]
    TooManySegments(usize),

    #[error("Invalid root url {0:?}: {1}")]
    InvalidRootUrl(String, #[source] url::ParseError),

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    ConfigError(#[from] toml::de::Error),
}

pub type MpdResult<T> = Result<T, MpdError>;
