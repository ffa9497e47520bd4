// src/error.rs

/// Failure modes of encoding, decoding, and `Payload` accessors/mutators.
///
/// Encode-side and decode-side failures share one flat enum, as the MessagePack
/// core only ever needs to hand one error type up to the caller; grouping them
/// is left to the doc comments below rather than a split into two types.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// A `str` value's byte length exceeds what any MessagePack str marker can encode (2^32-1).
    StrDataLengthTooLong,

    /// Encode side: a `bin` value's byte length exceeds what any MessagePack bin marker
    /// can encode (2^32-1). Decode side: a declared bin length exceeded
    /// `ParseLimits::max_bin_length`.
    BinDataLengthTooLong,

    /// An `arr` value's element count exceeds what any MessagePack array marker can encode.
    ArrayLengthTooLong,

    /// Reserved for host bindings that model fixed-size tuples as arrays.
    TupleLengthTooLong,

    /// A `map` value's entry count exceeds what any MessagePack map marker can encode.
    MapLengthTooLong,

    /// A numeric or timestamp value is out of the representable range for its wire encoding.
    InputValueTooLarge,

    /// Writing a fixed-width scalar (nil/bool/a fixint) to the sink failed.
    FixedValueWriting,

    /// Reading the leading marker byte from the source failed.
    TypeMarkerReading,

    /// Writing the leading marker byte to the sink failed.
    TypeMarkerWriting,

    /// Reading a str/bin/ext payload (or a container's children) from the source failed.
    DataReading,

    /// Writing a str/bin/ext payload (or a container's children) to the sink failed.
    DataWriting,

    /// Reading an ext type byte failed.
    ExtTypeReading,

    /// Writing an ext type byte failed.
    ExtTypeWriting,

    /// An ext payload's declared length does not match any valid ext wire form.
    ExtTypeLength,

    /// A value's runtime type did not match what was requested: an accessor mismatch,
    /// a non-str map key observed while decoding, or nil marker 0xC1 surfaced strictly.
    InvalidType,

    /// Reading a length prefix (str/bin/arr/map/ext) from the source failed.
    LengthReading,

    /// Writing a length prefix to the sink failed.
    LengthWriting,

    /// An invariant internal to the codec was violated; reaching this is a bug.
    Internal,

    /// Nested array/map depth exceeded `ParseLimits::max_depth`.
    MaxDepthExceeded,

    /// A declared array length exceeded `ParseLimits::max_array_length`.
    ArrayTooLarge,

    /// A declared map size exceeded `ParseLimits::max_map_size`.
    MapTooLarge,

    /// A declared str length exceeded `ParseLimits::max_string_length`.
    StringTooLong,

    /// A declared ext length exceeded `ParseLimits::max_ext_length`.
    ExtDataTooLarge,

    /// The target `Payload` arm is not `arr`.
    NotArray,

    /// The target `Payload` arm is not `map`.
    NotMap,

    /// The underlying byte sink could not accept all bytes offered to it.
    Writer,

    /// The underlying byte source could not fill the requested buffer.
    Reader,
}

// Manual implementation of Display for no_std environments.
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::StrDataLengthTooLong => write!(f, "str data length exceeds 2^32-1"),
            Self::BinDataLengthTooLong => write!(f, "bin data length exceeds 2^32-1"),
            Self::ArrayLengthTooLong => write!(f, "array length exceeds 2^32-1"),
            Self::TupleLengthTooLong => write!(f, "tuple length exceeds 2^32-1"),
            Self::MapLengthTooLong => write!(f, "map length exceeds 2^32-1"),
            Self::InputValueTooLarge => write!(f, "value out of range for its wire encoding"),
            Self::FixedValueWriting => write!(f, "failed writing a fixed-width value"),
            Self::TypeMarkerReading => write!(f, "failed reading the marker byte"),
            Self::TypeMarkerWriting => write!(f, "failed writing the marker byte"),
            Self::DataReading => write!(f, "failed reading value data"),
            Self::DataWriting => write!(f, "failed writing value data"),
            Self::ExtTypeReading => write!(f, "failed reading the ext type byte"),
            Self::ExtTypeWriting => write!(f, "failed writing the ext type byte"),
            Self::ExtTypeLength => write!(f, "ext length does not match a valid wire form"),
            Self::InvalidType => write!(f, "value has the wrong type for this operation"),
            Self::LengthReading => write!(f, "failed reading a length prefix"),
            Self::LengthWriting => write!(f, "failed writing a length prefix"),
            Self::Internal => write!(f, "internal codec invariant violated"),
            Self::MaxDepthExceeded => write!(f, "nesting depth exceeds the configured limit"),
            Self::ArrayTooLarge => write!(f, "array length exceeds the configured limit"),
            Self::MapTooLarge => write!(f, "map size exceeds the configured limit"),
            Self::StringTooLong => write!(f, "str length exceeds the configured limit"),
            Self::ExtDataTooLarge => write!(f, "ext length exceeds the configured limit"),
            Self::NotArray => write!(f, "value is not an array"),
            Self::NotMap => write!(f, "value is not a map"),
            Self::Writer => write!(f, "byte sink failed to accept all bytes"),
            Self::Reader => write!(f, "byte source failed to fill the buffer"),
        }
    }
}

// Enable standard Error trait if the "std" feature is on.
#[cfg(feature = "std")]
impl std::error::Error for Error {}
