use std::collections::HashSet;

use crate::error::ConversionError;
use crate::ir::{IrAlias, IrBody, IrDataType, IrField, IrList, IrRecord, IrType};
use crate::parse::data_structure::DataStructure;
use crate::parse::kind;
use crate::parse::member::{Member, MemberValue};

use super::name_normalizer::normalize_name;

/// Names declared by the document's named data structures, used to resolve
/// element kinds into IR types.
#[derive(Debug, Clone, Default)]
pub struct TypeContext {
    declared: HashSet<String>,
    lists: HashSet<String>,
}

impl TypeContext {
    pub fn new(structures: &[DataStructure]) -> Self {
        let mut ctx = Self::default();
        for ds in structures {
            match ds {
                DataStructure::Named { id, .. } => {
                    ctx.declared.insert(id.clone());
                }
                DataStructure::Array { id, .. } => {
                    ctx.declared.insert(id.clone());
                    ctx.lists.insert(id.clone());
                }
                DataStructure::Anonymous { .. } | DataStructure::Reference { .. } => {}
            }
        }
        ctx
    }

    pub fn is_declared(&self, id: &str) -> bool {
        self.declared.contains(id)
    }

    /// Map an element kind (`string`, `Coupon`, ...) to an IR type.
    pub fn kind_to_ir_type(&self, kind: &str) -> Result<IrType, ConversionError> {
        match kind {
            kind::STRING => Ok(IrType::String),
            kind::NUMBER => Ok(IrType::Number),
            kind::BOOLEAN => Ok(IrType::Boolean),
            kind::OBJECT => Ok(IrType::Any),
            kind::ARRAY => Ok(IrType::Array(Box::new(IrType::Any))),
            kind::ENUM => Err(ConversionError::NotSupported("enum value".to_string())),
            id => self.named_ref(id).map(IrType::Ref),
        }
    }

    fn named_ref(&self, id: &str) -> Result<String, ConversionError> {
        if self.declared.contains(id) {
            Ok(normalize_name(id).pascal_case)
        } else {
            Err(ConversionError::Undefined(format!("data structure `{id}`")))
        }
    }

    pub fn member_type(&self, value: &MemberValue) -> Result<IrType, ConversionError> {
        match value {
            MemberValue::String(_) => Ok(IrType::String),
            MemberValue::Number(_) => Ok(IrType::Number),
            MemberValue::Boolean(_) => Ok(IrType::Boolean),
            MemberValue::ArrayOf(Some(item)) => {
                Ok(IrType::Array(Box::new(self.kind_to_ir_type(item)?)))
            }
            MemberValue::ArrayOf(None) => Ok(IrType::Array(Box::new(IrType::Any))),
            MemberValue::Reference(id) => self.kind_to_ir_type(id),
            MemberValue::Indirect(id) => self.named_ref(id).map(IrType::Indirect),
        }
    }

    pub fn member_to_field(&self, member: &Member) -> Result<IrField, ConversionError> {
        Ok(IrField {
            name: normalize_name(&member.name),
            original_name: member.name.clone(),
            field_type: self.member_type(&member.value)?,
            required: member.required,
            description: member.description.clone(),
            example: member.example.clone(),
        })
    }

    pub fn fields(&self, members: &[Member]) -> Result<Vec<IrField>, ConversionError> {
        members.iter().map(|m| self.member_to_field(m)).collect()
    }

    /// Convert a declaration into a reusable IR type. Anonymous objects and
    /// bare references declare nothing and yield `None`.
    pub fn data_structure_to_ir(
        &self,
        ds: &DataStructure,
    ) -> Result<Option<IrDataType>, ConversionError> {
        match ds {
            DataStructure::Named {
                id,
                description,
                members,
                base_kind,
            } => {
                let name = normalize_name(id);
                let base = match base_kind.as_str() {
                    kind::OBJECT => None,
                    kind::STRING | kind::NUMBER | kind::BOOLEAN => {
                        if !members.is_empty() {
                            return Err(ConversionError::NotSupported(format!(
                                "members on `{id}`, which is based on `{base_kind}`"
                            )));
                        }
                        return Ok(Some(IrDataType::Alias(IrAlias {
                            name,
                            description: description.clone(),
                            target: self.kind_to_ir_type(base_kind)?,
                        })));
                    }
                    other if self.lists.contains(other) => {
                        return Err(ConversionError::NotSupported(format!(
                            "`{id}` extending the array data structure `{other}`"
                        )));
                    }
                    other => Some(self.named_ref(other)?),
                };
                Ok(Some(IrDataType::Record(IrRecord {
                    name,
                    description: description.clone(),
                    base,
                    fields: self.fields(members)?,
                })))
            }
            DataStructure::Array { id, element_kind } => Ok(Some(IrDataType::List(IrList {
                name: normalize_name(id),
                item: self.kind_to_ir_type(element_kind)?,
            }))),
            DataStructure::Anonymous { .. } | DataStructure::Reference { .. } => Ok(None),
        }
    }

    /// Shape of a request or response body.
    pub fn body_shape(
        &self,
        ds: Option<&DataStructure>,
        content_type: Option<&str>,
    ) -> Result<IrBody, ConversionError> {
        match ds {
            None if content_type.is_some_and(|ct| ct.starts_with("text/")) => Ok(IrBody::Text),
            None => Ok(IrBody::Empty),
            Some(DataStructure::Anonymous { members }) => Ok(IrBody::Inline(self.fields(members)?)),
            Some(DataStructure::Reference { id }) => Ok(IrBody::Type(self.kind_to_ir_type(id)?)),
            Some(DataStructure::Named { id, .. }) => Err(ConversionError::NotSupported(format!(
                "named data structure `{id}` used as a message body"
            ))),
            Some(DataStructure::Array { id, .. }) => Err(ConversionError::NotSupported(format!(
                "array data structure `{id}` used as a message body"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TypeContext {
        TypeContext::new(&[
            DataStructure::Named {
                id: "Coupon Base".into(),
                description: None,
                members: vec![],
                base_kind: "object".into(),
            },
            DataStructure::Array {
                id: "Coupons".into(),
                element_kind: "Coupon Base".into(),
            },
        ])
    }

    #[test]
    fn test_kind_to_ir_type() {
        let ctx = ctx();
        assert_eq!(ctx.kind_to_ir_type("string").unwrap(), IrType::String);
        assert_eq!(ctx.kind_to_ir_type("object").unwrap(), IrType::Any);
        assert_eq!(
            ctx.kind_to_ir_type("Coupon Base").unwrap(),
            IrType::Ref("CouponBase".into())
        );
        assert_eq!(
            ctx.kind_to_ir_type("Missing").unwrap_err(),
            ConversionError::Undefined("data structure `Missing`".into())
        );
    }

    #[test]
    fn test_member_types() {
        let ctx = ctx();
        assert_eq!(
            ctx.member_type(&MemberValue::ArrayOf(Some("string".into())))
                .unwrap(),
            IrType::Array(Box::new(IrType::String))
        );
        assert_eq!(
            ctx.member_type(&MemberValue::Indirect("Coupon Base".into()))
                .unwrap(),
            IrType::Indirect("CouponBase".into())
        );
    }

    #[test]
    fn test_named_types() {
        let ctx = ctx();
        let alias = ctx
            .data_structure_to_ir(&DataStructure::Named {
                id: "Token".into(),
                description: Some("Opaque token".into()),
                members: vec![],
                base_kind: "string".into(),
            })
            .unwrap();
        assert!(matches!(
            alias,
            Some(IrDataType::Alias(IrAlias { target: IrType::String, .. }))
        ));

        let record = ctx
            .data_structure_to_ir(&DataStructure::Named {
                id: "Coupon".into(),
                description: None,
                members: vec![],
                base_kind: "Coupon Base".into(),
            })
            .unwrap();
        let Some(IrDataType::Record(record)) = record else {
            panic!("expected record");
        };
        assert_eq!(record.base.as_deref(), Some("CouponBase"));

        let err = ctx
            .data_structure_to_ir(&DataStructure::Named {
                id: "Special".into(),
                description: None,
                members: vec![],
                base_kind: "Coupons".into(),
            })
            .unwrap_err();
        assert!(matches!(err, ConversionError::NotSupported(_)));
    }

    #[test]
    fn test_body_shapes() {
        let ctx = ctx();
        assert_eq!(ctx.body_shape(None, Some("text/plain")).unwrap(), IrBody::Text);
        assert_eq!(ctx.body_shape(None, Some("application/json")).unwrap(), IrBody::Empty);
        assert_eq!(ctx.body_shape(None, None).unwrap(), IrBody::Empty);
        assert_eq!(
            ctx.body_shape(
                Some(&DataStructure::Reference { id: "Coupons".into() }),
                Some("application/json")
            )
            .unwrap(),
            IrBody::Type(IrType::Ref("Coupons".into()))
        );

        let named = DataStructure::Named {
            id: "Coupon".into(),
            description: None,
            members: vec![],
            base_kind: "object".into(),
        };
        assert_eq!(
            ctx.body_shape(Some(&named), None).unwrap_err(),
            ConversionError::NotSupported(
                "named data structure `Coupon` used as a message body".into()
            )
        );
    }
}
