use crate::error::TokenError;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Structural role of a token in the flattened IR.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Signal {
    BeginMessage,
    EndMessage,
    BeginField,
    Encoding,
    BeginEnum,
    EndEnum,
    ValidValue,
    BeginSet,
    EndSet,
    Choice,
    BeginComposite,
    EndComposite,
    BeginGroup,
    EndGroup,
    BeginVarData,
    EndVarData,
}

impl Signal {
    pub fn is_begin(self) -> bool {
        self.matching_end().is_some()
    }

    pub fn is_end(self) -> bool {
        matches!(
            self,
            Signal::EndMessage
                | Signal::EndEnum
                | Signal::EndSet
                | Signal::EndComposite
                | Signal::EndGroup
                | Signal::EndVarData
        )
    }

    /// The END signal closing this BEGIN signal. `BeginField` has no closing
    /// token: a field is followed by exactly one encoding or one balanced span.
    pub fn matching_end(self) -> Option<Signal> {
        match self {
            Signal::BeginMessage => Some(Signal::EndMessage),
            Signal::BeginEnum => Some(Signal::EndEnum),
            Signal::BeginSet => Some(Signal::EndSet),
            Signal::BeginComposite => Some(Signal::EndComposite),
            Signal::BeginGroup => Some(Signal::EndGroup),
            Signal::BeginVarData => Some(Signal::EndVarData),
            Signal::BeginField
            | Signal::Encoding
            | Signal::ValidValue
            | Signal::Choice
            | Signal::EndMessage
            | Signal::EndEnum
            | Signal::EndSet
            | Signal::EndComposite
            | Signal::EndGroup
            | Signal::EndVarData => None,
        }
    }

    /* Signals whose tokens carry an encoding sub-record */
    pub fn carries_encoding(self) -> bool {
        matches!(
            self,
            Signal::Encoding | Signal::BeginEnum | Signal::ValidValue | Signal::BeginSet | Signal::Choice
        )
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::BeginMessage => "BEGIN_MESSAGE",
            Signal::EndMessage => "END_MESSAGE",
            Signal::BeginField => "BEGIN_FIELD",
            Signal::Encoding => "ENCODING",
            Signal::BeginEnum => "BEGIN_ENUM",
            Signal::EndEnum => "END_ENUM",
            Signal::ValidValue => "VALID_VALUE",
            Signal::BeginSet => "BEGIN_SET",
            Signal::EndSet => "END_SET",
            Signal::Choice => "CHOICE",
            Signal::BeginComposite => "BEGIN_COMPOSITE",
            Signal::EndComposite => "END_COMPOSITE",
            Signal::BeginGroup => "BEGIN_GROUP",
            Signal::EndGroup => "END_GROUP",
            Signal::BeginVarData => "BEGIN_VAR_DATA",
            Signal::EndVarData => "END_VAR_DATA",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveType {
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
}

impl PrimitiveType {
    /* Encoded width in bytes */
    pub fn size(self) -> usize {
        match self {
            PrimitiveType::Char | PrimitiveType::Int8 | PrimitiveType::Uint8 => 1,
            PrimitiveType::Int16 | PrimitiveType::Uint16 => 2,
            PrimitiveType::Int32 | PrimitiveType::Uint32 | PrimitiveType::Float => 4,
            PrimitiveType::Int64 | PrimitiveType::Uint64 | PrimitiveType::Double => 8,
        }
    }

    pub fn primitive_name(self) -> &'static str {
        match self {
            PrimitiveType::Char => "char",
            PrimitiveType::Int8 => "int8",
            PrimitiveType::Int16 => "int16",
            PrimitiveType::Int32 => "int32",
            PrimitiveType::Int64 => "int64",
            PrimitiveType::Uint8 => "uint8",
            PrimitiveType::Uint16 => "uint16",
            PrimitiveType::Uint32 => "uint32",
            PrimitiveType::Uint64 => "uint64",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            PrimitiveType::Char
                | PrimitiveType::Uint8
                | PrimitiveType::Uint16
                | PrimitiveType::Uint32
                | PrimitiveType::Uint64
        )
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.primitive_name())
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Presence {
    #[default]
    Required,
    Optional,
    Constant,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

/// A schema-declared constant: the code of a valid value, the bit index of a
/// choice, or the value of a constant-presence field.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(untagged)]
#[serde(expecting = "expected an integer or floating point constant")]
pub enum PrimitiveValue {
    Long(i64),
    UnsignedLong(u64),
    Double(f64),
}

impl PrimitiveValue {
    /* Integral view, used for bit indices and length checks */
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            PrimitiveValue::Long(v) => u64::try_from(v).ok(),
            PrimitiveValue::UnsignedLong(v) => Some(v),
            PrimitiveValue::Double(_) => None,
        }
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveValue::Long(v) => write!(f, "{}", v),
            PrimitiveValue::UnsignedLong(v) => write!(f, "{}", v),
            PrimitiveValue::Double(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Encoding {
    pub primitive_type: PrimitiveType,
    #[serde(default)]
    pub presence: Presence,
    #[serde(default)]
    pub byte_order: ByteOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub const_val: Option<PrimitiveValue>,
}

impl Encoding {
    pub fn new(primitive_type: PrimitiveType) -> Self {
        Self {
            primitive_type,
            presence: Presence::Required,
            byte_order: ByteOrder::LittleEndian,
            const_val: None,
        }
    }

    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = presence;
        self
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn with_const_val(mut self, value: PrimitiveValue) -> Self {
        self.const_val = Some(value);
        self
    }

    /// Shorthand for a constant-presence encoding carrying `value`.
    pub fn constant(primitive_type: PrimitiveType, value: PrimitiveValue) -> Self {
        Self::new(primitive_type)
            .with_presence(Presence::Constant)
            .with_const_val(value)
    }
}

/// Schema id used when a token has none.
pub const INVALID_ID: i32 = -1;

/// The unit of IR: one node of the depth-first flattened schema.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Token {
    pub signal: Signal,
    pub name: String,
    #[serde(default = "Token::invalid_id")]
    pub id: i32,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub size: usize,
    #[serde(default = "Token::default_array_length")]
    pub array_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
}

impl Token {
    fn invalid_id() -> i32 {
        INVALID_ID
    }

    fn default_array_length() -> usize {
        1
    }

    pub fn new(signal: Signal, name: impl Into<String>) -> Self {
        Self {
            signal,
            name: name.into(),
            id: INVALID_ID,
            offset: 0,
            size: 0,
            array_length: 1,
            encoding: None,
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_array_length(mut self, array_length: usize) -> Self {
        self.array_length = array_length;
        self
    }

    /// Attaches an encoding; `size` follows as primitive width times array length.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        if self.size == 0 && encoding.presence != Presence::Constant {
            self.size = encoding.primitive_type.size() * self.array_length;
        }
        self.encoding = Some(encoding);
        self
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encoding of an encoding-carrying token.
    ///
    /// Asking for the encoding of a structural token (`BEGIN_GROUP`,
    /// `BEGIN_FIELD`, ...) is a caller error rather than an absent value.
    pub fn encoding(&self) -> Result<&Encoding, TokenError> {
        if !self.signal.carries_encoding() {
            return Err(TokenError::NoEncoding {
                signal: self.signal,
                name: self.name.clone(),
            });
        }

        self.encoding.as_ref().ok_or_else(|| TokenError::MissingEncoding {
            signal: self.signal,
            name: self.name.clone(),
        })
    }

    pub fn primitive_type(&self) -> Result<PrimitiveType, TokenError> {
        Ok(self.encoding()?.primitive_type)
    }

    /// Declared constant, absent for a plain required/optional encoding.
    pub fn const_val(&self) -> Result<Option<&PrimitiveValue>, TokenError> {
        Ok(self.encoding()?.const_val.as_ref())
    }

    pub fn is_constant(&self) -> bool {
        self.encoding
            .as_ref()
            .is_some_and(|encoding| encoding.presence == Presence::Constant)
    }
}
