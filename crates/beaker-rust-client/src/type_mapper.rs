use beaker_core::ir::IrType;

/// Words that cannot be used as plain Rust identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that are not accepted as raw identifiers either.
const RESERVED: &[&str] = &["crate", "self", "super", "Self", "_"];

/// Map an `IrType` to the Rust type used in generated records.
pub fn ir_type_to_rust(ir_type: &IrType) -> String {
    match ir_type {
        IrType::String => "String".to_string(),
        IrType::Number => "f64".to_string(),
        IrType::Boolean => "bool".to_string(),
        IrType::Any => "serde_json::Value".to_string(),
        IrType::Array(inner) => format!("Vec<{}>", ir_type_to_rust(inner)),
        IrType::Ref(name) => name.clone(),
        IrType::Indirect(name) => format!("Box<{name}>"),
    }
}

/// Field type, wrapped in `Option` unless the field is required.
pub fn field_type(ir_type: &IrType, required: bool) -> String {
    let inner = ir_type_to_rust(ir_type);
    if required {
        inner
    } else {
        format!("Option<{inner}>")
    }
}

/// URI template and header values travel as text, so only types with a
/// `Display` form keep their own type.
pub fn variable_type(ir_type: &IrType, required: bool) -> String {
    let inner = match ir_type {
        IrType::Number => "f64",
        IrType::Boolean => "bool",
        _ => "String",
    };
    if required {
        inner.to_string()
    } else {
        format!("Option<{inner}>")
    }
}

/// Make a snake_case name usable as a field or module identifier.
pub fn rust_ident(name: &str) -> String {
    if name.is_empty() {
        return "_field".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{name}");
    }
    if RESERVED.contains(&name) {
        return format!("{name}_");
    }
    if KEYWORDS.contains(&name) {
        return format!("r#{name}");
    }
    name.to_string()
}
