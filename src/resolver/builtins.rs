use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

/// The scalar kinds builtin XSD types map onto.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Bool,
    String,
    I64,
    U16,
    U64,
    F64,
    DateTime,
    Date,
    Bytes,
}

lazy_static! {
    /// Local names of the supported builtin XSD types and their scalar kinds.
    static ref BUILTIN_TYPES: HashMap<&'static str, Builtin> = HashMap::from([
        ("boolean", Builtin::Bool),
        ("string", Builtin::String),
        ("normalizedString", Builtin::String),
        ("language", Builtin::String),
        ("Name", Builtin::String),
        ("token", Builtin::String),
        ("duration", Builtin::String),
        ("anyURI", Builtin::String),
        ("long", Builtin::I64),
        ("short", Builtin::I64),
        ("integer", Builtin::I64),
        ("int", Builtin::I64),
        ("unsignedShort", Builtin::U16),
        ("decimal", Builtin::F64),
        ("double", Builtin::F64),
        ("dateTime", Builtin::DateTime),
        ("date", Builtin::Date),
        ("base64Binary", Builtin::Bytes),
        ("positiveInteger", Builtin::U64),
    ]);
}

impl Builtin {
    /// Looks up an unprefixed XSD type name in the builtin table.
    pub fn from_xsd_name(local_name: &str) -> Option<Self> {
        BUILTIN_TYPES.get(local_name).copied()
    }

    /// All XSD names the table knows, in no particular order.
    pub fn xsd_names() -> impl Iterator<Item = (&'static str, Builtin)> {
        BUILTIN_TYPES.iter().map(|(name, builtin)| (*name, *builtin))
    }

    /// The Rust type generated code uses for this scalar.
    pub fn rust_type(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "String",
            Self::I64 => "i64",
            Self::U16 => "u16",
            Self::U64 => "u64",
            Self::F64 => "f64",
            Self::DateTime => "chrono::DateTime<chrono::FixedOffset>",
            Self::Date => "chrono::NaiveDate",
            Self::Bytes => "Vec<u8>",
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rust_type())
    }
}
