//! The fixed ARI-type enumeration (§6.3).
//!
//! Positive values identify literal types; negative values identify
//! object-reference types. The enumeration is closed: unknown values
//! encountered on the wire are an [`Error::InvalidAri`](crate::Error::InvalidAri).

use crate::error::{Error, Result};

/// One of the enumerated ARI types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum AriType {
    /// Catch-all literal type id, used only as a wildcard in some patterns.
    Literal = 255,

    /// The null primitive.
    Null = 0,
    /// A boolean primitive.
    Bool = 1,
    /// An unsigned 8-bit integer.
    Byte = 2,
    /// A signed 32-bit integer.
    Int = 4,
    /// An unsigned 32-bit integer.
    Uint = 5,
    /// A signed 64-bit integer.
    Vast = 6,
    /// An unsigned 64-bit integer.
    Uvast = 7,
    /// An IEEE-754 binary32 float.
    Real32 = 8,
    /// An IEEE-754 binary64 float.
    Real64 = 9,
    /// A text string.
    TextStr = 10,
    /// A byte string.
    ByteStr = 11,
    /// An absolute time point, offset from the DTN epoch.
    Tp = 12,
    /// A relative time delta.
    Td = 13,
    /// A parameter placeholder used during value production.
    Label = 14,
    /// An opaque CBOR-encoded byte string.
    Cbor = 15,
    /// A literal naming one of the builtin ARI types.
    Aritype = 16,
    /// An ordered list container.
    Ac = 17,
    /// A sorted map container.
    Am = 18,
    /// A fixed-column table container.
    Tbl = 19,
    /// An execution-set container.
    ExecSet = 20,
    /// A reporting-set container.
    RptSet = 21,

    /// Catch-all object-reference type id, used only as a wildcard.
    Object = -256,
    /// Catch-all namespace-reference type id, used only as a wildcard.
    Namespace = -255,

    /// A reference to an identity object.
    Ident = -1,
    /// A reference to a constant object.
    Const = -2,
    /// A reference to a control object.
    Ctrl = -3,
    /// A reference to an externally defined data object.
    Edd = -4,
    /// A reference to an operator object.
    Oper = -6,
    /// A reference to a state-based rule object.
    Sbr = -8,
    /// A reference to a time-based rule object.
    Tbr = -10,
    /// A reference to a variable object.
    Var = -11,
    /// A reference to a type-definition object.
    Typedef = -12,
}

impl AriType {
    /// All enumerated variants that can appear as a concrete type on the
    /// wire (excludes the `LITERAL`/`OBJECT`/`NAMESPACE` catch-alls).
    pub const ALL: &'static [AriType] = &[
        AriType::Null,
        AriType::Bool,
        AriType::Byte,
        AriType::Int,
        AriType::Uint,
        AriType::Vast,
        AriType::Uvast,
        AriType::Real32,
        AriType::Real64,
        AriType::TextStr,
        AriType::ByteStr,
        AriType::Tp,
        AriType::Td,
        AriType::Label,
        AriType::Cbor,
        AriType::Aritype,
        AriType::Ac,
        AriType::Am,
        AriType::Tbl,
        AriType::ExecSet,
        AriType::RptSet,
        AriType::Ident,
        AriType::Const,
        AriType::Ctrl,
        AriType::Edd,
        AriType::Oper,
        AriType::Sbr,
        AriType::Tbr,
        AriType::Var,
        AriType::Typedef,
    ];

    /// The IANA-registered enumeration value for this type.
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// True for the 21 literal (non-reference) types.
    #[must_use]
    pub fn is_literal(self) -> bool {
        self.code() >= 0
    }

    /// True for the object-reference types.
    #[must_use]
    pub fn is_reference(self) -> bool {
        !self.is_literal()
    }

    /// True for `BYTE`, `INT`, `UINT`, `VAST`, `UVAST`, `REAL32`, `REAL64`.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            AriType::Byte
                | AriType::Int
                | AriType::Uint
                | AriType::Vast
                | AriType::Uvast
                | AriType::Real32
                | AriType::Real64
        )
    }

    /// Looks up a type by its integer enumeration.
    pub fn from_code(code: i32) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.code() == code)
            .ok_or_else(|| Error::invalid_ari(format!("unknown ARI-type enumeration {code}")))
    }

    /// The canonical IANA-registered uppercase name, e.g. `"UINT"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AriType::Literal => "LITERAL",
            AriType::Null => "NULL",
            AriType::Bool => "BOOL",
            AriType::Byte => "BYTE",
            AriType::Int => "INT",
            AriType::Uint => "UINT",
            AriType::Vast => "VAST",
            AriType::Uvast => "UVAST",
            AriType::Real32 => "REAL32",
            AriType::Real64 => "REAL64",
            AriType::TextStr => "TEXTSTR",
            AriType::ByteStr => "BYTESTR",
            AriType::Tp => "TP",
            AriType::Td => "TD",
            AriType::Label => "LABEL",
            AriType::Cbor => "CBOR",
            AriType::Aritype => "ARITYPE",
            AriType::Ac => "AC",
            AriType::Am => "AM",
            AriType::Tbl => "TBL",
            AriType::ExecSet => "EXECSET",
            AriType::RptSet => "RPTSET",
            AriType::Object => "OBJECT",
            AriType::Namespace => "NAMESPACE",
            AriType::Ident => "IDENT",
            AriType::Const => "CONST",
            AriType::Ctrl => "CTRL",
            AriType::Edd => "EDD",
            AriType::Oper => "OPER",
            AriType::Sbr => "SBR",
            AriType::Tbr => "TBR",
            AriType::Var => "VAR",
            AriType::Typedef => "TYPEDEF",
        }
    }

    /// Looks up a type by its case-insensitive IANA-registered name.
    pub fn from_name(name: &str) -> Result<Self> {
        let upper = name.to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == upper)
            .ok_or_else(|| Error::invalid_ari(format!("unknown ARI-type name '{name}'")))
    }
}
