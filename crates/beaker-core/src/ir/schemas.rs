use super::types::NormalizedName;

/// A reusable type declared by a named data structure.
#[derive(Debug, Clone, PartialEq)]
pub enum IrDataType {
    Record(IrRecord),
    Alias(IrAlias),
    List(IrList),
}

impl IrDataType {
    pub fn name(&self) -> &NormalizedName {
        match self {
            IrDataType::Record(r) => &r.name,
            IrDataType::Alias(a) => &a.name,
            IrDataType::List(l) => &l.name,
        }
    }
}

/// An object type with typed fields, optionally extending another record.
#[derive(Debug, Clone, PartialEq)]
pub struct IrRecord {
    pub name: NormalizedName,
    pub description: Option<String>,
    /// PascalCase name of the extended record.
    pub base: Option<String>,
    pub fields: Vec<IrField>,
}

/// A field on a record.
#[derive(Debug, Clone, PartialEq)]
pub struct IrField {
    pub name: NormalizedName,
    pub original_name: String,
    pub field_type: IrType,
    pub required: bool,
    pub description: Option<String>,
    pub example: Option<String>,
}

/// A named primitive (e.g. `Token` declared as a `string`).
#[derive(Debug, Clone, PartialEq)]
pub struct IrAlias {
    pub name: NormalizedName,
    pub description: Option<String>,
    pub target: IrType,
}

/// A named list over one item type.
#[derive(Debug, Clone, PartialEq)]
pub struct IrList {
    pub name: NormalizedName,
    pub item: IrType,
}

/// A resolved type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrType {
    String,
    Number,
    Boolean,
    /// Untyped JSON, used for bare `object` values.
    Any,
    Array(Box<IrType>),
    Ref(String),    // reference to a named type (PascalCase)
    Indirect(String), // boxed reference that breaks a recursive cycle
}
