use beaker_core::GeneratorError;
use beaker_core::config::ClientConfig;
use beaker_core::ir::{IrDataType, IrField, IrRecord, IrSpec};
use beaker_core::transform::name_normalizer::normalize_name;
use beaker_core::transform::variables::documentation;
use minijinja::{Environment, context};

use super::{comment_lines, render, visibility};
use crate::type_mapper::{field_type, ir_type_to_rust, rust_ident};

/// Emit every named data structure: records, aliases and lists.
pub fn emit_types(
    env: &Environment<'_>,
    ir: &IrSpec,
    config: &ClientConfig,
) -> Result<String, GeneratorError> {
    let types: Vec<minijinja::Value> = ir
        .types
        .iter()
        .map(|t| type_to_ctx(t, config.no_doc))
        .collect();

    render(
        env,
        "types.rs.j2",
        context! {
            vis => visibility(config.public),
            types => types,
        },
    )
}

fn type_to_ctx(data_type: &IrDataType, no_doc: bool) -> minijinja::Value {
    match data_type {
        IrDataType::Record(record) => record_to_ctx(record, no_doc),
        IrDataType::Alias(alias) => context! {
            kind => "alias",
            name => alias.name.pascal_case.clone(),
            doc => comment_lines(alias.description.as_deref(), "///", no_doc),
            target => ir_type_to_rust(&alias.target),
        },
        IrDataType::List(list) => context! {
            kind => "alias",
            name => list.name.pascal_case.clone(),
            doc => Vec::<String>::new(),
            target => format!("Vec<{}>", ir_type_to_rust(&list.item)),
        },
    }
}

fn record_to_ctx(record: &IrRecord, no_doc: bool) -> minijinja::Value {
    let fields: Vec<minijinja::Value> = record
        .fields
        .iter()
        .map(|f| field_to_ctx(f, no_doc))
        .collect();
    let base_field = record
        .base
        .as_deref()
        .map(|base| rust_ident(&normalize_name(base).snake_case));

    context! {
        kind => "record",
        name => record.name.pascal_case.clone(),
        doc => comment_lines(record.description.as_deref(), "///", no_doc),
        base => record.base.clone(),
        base_field => base_field,
        fields => fields,
    }
}

fn field_to_ctx(field: &IrField, no_doc: bool) -> minijinja::Value {
    let ident = rust_ident(&field.name.snake_case);
    let serialized = ident.strip_prefix("r#").unwrap_or(&ident);
    let rename = (serialized != field.original_name).then(|| field.original_name.clone());
    let doc = documentation(field.description.as_deref(), field.example.as_deref());

    context! {
        ident => ident,
        rename => rename,
        ty => field_type(&field.field_type, field.required),
        required => field.required,
        doc => comment_lines(doc.as_deref(), "///", no_doc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beaker_core::ir::{IrAlias, IrInfo, IrList, IrType};

    fn field(name: &str, field_type: IrType, required: bool) -> IrField {
        IrField {
            name: normalize_name(name),
            original_name: name.to_string(),
            field_type,
            required,
            description: None,
            example: None,
        }
    }

    fn emit(types: Vec<IrDataType>, config: &ClientConfig) -> String {
        let ir = IrSpec {
            info: IrInfo::default(),
            types,
            endpoints: vec![],
            groups: vec![],
        };
        emit_types(&super::super::environment().unwrap(), &ir, config).unwrap()
    }

    #[test]
    fn test_record_with_base_and_renames() {
        let out = emit(
            vec![IrDataType::Record(IrRecord {
                name: normalize_name("Coupon"),
                description: Some("A discount.".into()),
                base: Some("CouponBase".into()),
                fields: vec![
                    field("id", IrType::String, true),
                    field("percentOff", IrType::Number, false),
                    field("type", IrType::String, true),
                    field("parent", IrType::Indirect("Coupon".into()), false),
                ],
            })],
            &ClientConfig::default(),
        );

        assert!(out.contains("/// A discount.\n#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]\npub(crate) struct Coupon {"));
        assert!(out.contains("    #[serde(flatten)]\n    pub(crate) coupon_base: CouponBase,"));
        assert!(out.contains("    pub(crate) id: String,"));
        assert!(out.contains(
            "    #[serde(rename = \"percentOff\")]\n    #[serde(default, skip_serializing_if = \"Option::is_none\")]\n    pub(crate) percent_off: Option<f64>,"
        ));
        assert!(out.contains("    pub(crate) r#type: String,"));
        assert!(!out.contains("rename = \"type\""));
        assert!(out.contains("    pub(crate) parent: Option<Box<Coupon>>,"));
    }

    #[test]
    fn test_aliases_and_lists() {
        let out = emit(
            vec![
                IrDataType::Alias(IrAlias {
                    name: normalize_name("Slug"),
                    description: Some("URL-safe name".into()),
                    target: IrType::String,
                }),
                IrDataType::List(IrList {
                    name: normalize_name("Coupons"),
                    item: IrType::Ref("Coupon".into()),
                }),
            ],
            &ClientConfig {
                public: true,
                no_doc: true,
                ..ClientConfig::default()
            },
        );
        insta::assert_snapshot!(out.trim(), @r"
        pub type Slug = String;

        pub type Coupons = Vec<Coupon>;
        ");
    }
}
