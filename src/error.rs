use core::fmt;

/// The result type returned by every fallible operation in this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong decoding a stream or projecting a content
/// tree into a caller-declared shape.
///
/// A malformed stream or an unsatisfiable projection always surfaces as an
/// `Err` here; this crate never panics on input-dependent conditions.
#[derive(Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The byte source ended in the middle of a token.
    UnexpectedEof,
    /// The stream did not start with the expected magic/version preamble.
    InvalidStream,
    /// A token byte has no grammar rule in the slot where it was read.
    UnexpectedToken(u8),
    /// A handle or inline content did not have the shape the grammar
    /// requires, or a numeric/string coercion during projection failed.
    TypeMismatch(String),
    /// Proxy class descriptors, unknown array element type codes, and
    /// unsupported projection target kinds (maps, complex numbers) all
    /// report this.
    NotSupported(String),
    /// Projection looked for a class entry that is not in the object's
    /// class-data mapping.
    NoSuchClass(String),
    /// Projection looked for a field that is not in the matched class's
    /// field mapping.
    NoSuchField(String),
    /// A fixed-length array target's length did not match the source
    /// array's length.
    ArraySizeMismatch { expected: usize, actual: usize },
    /// Composite projection saw an empty tag and could not infer a
    /// qualifying class name for it.
    ClassNameUnresolved,
    /// The projection target handle was null, or not a writable reference.
    InvalidTargetHandle,
    /// A `TC_REFERENCE` token named a handle absent from the handle table.
    BadHandle(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedEof => write!(f, "unexpected end of stream"),
            Error::InvalidStream => write!(f, "invalid stream preamble"),
            Error::UnexpectedToken(b) => write!(f, "unexpected token byte 0x{b:02X}"),
            Error::TypeMismatch(detail) => write!(f, "type mismatch: {detail}"),
            Error::NotSupported(detail) => write!(f, "not supported: {detail}"),
            Error::NoSuchClass(name) => write!(f, "no such class: {name:?}"),
            Error::NoSuchField(name) => write!(f, "no such field: {name:?}"),
            Error::ArraySizeMismatch { expected, actual } => write!(
                f,
                "array size mismatch: target expects {expected}, source has {actual}"
            ),
            Error::ClassNameUnresolved => {
                write!(f, "could not resolve a qualifying class name for an untagged member")
            }
            Error::InvalidTargetHandle => write!(f, "projection target is null or not writable"),
            Error::BadHandle(handle) => write!(f, "no content registered for handle 0x{handle:08X}"),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub(crate) fn type_mismatch(detail: impl Into<String>) -> Error {
        Error::TypeMismatch(detail.into())
    }

    pub(crate) fn not_supported(detail: impl Into<String>) -> Error {
        Error::NotSupported(detail.into())
    }
}
