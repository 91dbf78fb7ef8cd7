//! Describe the field registry: what can be filtered, how, and sorted.

use crate::registry::{operators_for, FieldRegistry, FieldType};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorInfo {
    pub code: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    pub key: String,
    pub label: String,
    pub field_type: FieldType,
    pub sortable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub operators: Vec<OperatorInfo>,
}

pub fn list(registry: &FieldRegistry) -> Vec<FieldInfo> {
    registry
        .fields()
        .iter()
        .map(|spec| FieldInfo {
            key: spec.key.clone(),
            label: spec.label.clone(),
            field_type: spec.field_type,
            sortable: spec.sortable,
            options: spec.options.clone(),
            operators: operators_for(spec.field_type)
                .iter()
                .map(|op| OperatorInfo {
                    code: op.code,
                    label: op.label,
                })
                .collect(),
        })
        .collect()
}
