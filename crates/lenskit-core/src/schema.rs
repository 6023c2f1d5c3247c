//! Relation schema: which link fields each record type carries

use crate::error::{Error, Result};
use crate::record::RecordType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of a relation field, as seen from the type that carries it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    ForwardSingle,
    ForwardMulti,
    ReverseSingle,
    ReverseMulti,
}

impl RelationKind {
    pub fn is_reverse(&self) -> bool {
        matches!(self, Self::ReverseSingle | Self::ReverseMulti)
    }
}

/// Declared link kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    ForeignKey,
    OneToOne,
    ManyToMany,
}

impl LinkKind {
    fn forward_kind(&self) -> RelationKind {
        match self {
            Self::ForeignKey | Self::OneToOne => RelationKind::ForwardSingle,
            Self::ManyToMany => RelationKind::ForwardMulti,
        }
    }

    fn reverse_kind(&self) -> RelationKind {
        match self {
            Self::OneToOne => RelationKind::ReverseSingle,
            Self::ForeignKey | Self::ManyToMany => RelationKind::ReverseMulti,
        }
    }
}

/// A link declared on a model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkDecl {
    /// Field on the declaring model holding the key(s)
    pub field: String,

    pub kind: LinkKind,

    /// Target model label
    pub target: String,

    /// Name of the inverse field on the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_name: Option<String>,
}

/// A model and the links it declares
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDecl {
    pub name: String,

    #[serde(default, rename = "link")]
    pub links: Vec<LinkDecl>,
}

/// Schema declaration, as read from a schema file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDecl {
    #[serde(default, rename = "model")]
    pub models: Vec<ModelDecl>,
}

/// A relation field on a record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationField {
    /// Accessor name
    pub name: String,

    pub kind: RelationKind,

    /// Type of the related records
    pub target: RecordType,

    /// For reverse fields, the forward field on `target` that holds the key
    pub via: Option<String>,
}

/// Resolved relation schema
///
/// Field lists keep declaration order; traversal emits in that order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: HashMap<RecordType, Vec<RelationField>>,
    order: Vec<RecordType>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Resolve declarations, deriving the inverse of every link
    pub fn from_decl(decl: &SchemaDecl) -> Result<Self> {
        let mut schema = Schema::default();

        for model in &decl.models {
            let record_type = RecordType::parse(&model.name)?;
            if schema.fields.contains_key(&record_type) {
                return Err(Error::Configuration(format!(
                    "model declared twice: {}",
                    record_type
                )));
            }
            schema.fields.insert(record_type.clone(), Vec::new());
            schema.order.push(record_type);
        }

        for model in &decl.models {
            let source = RecordType::parse(&model.name)?;
            for link in &model.links {
                let target = RecordType::parse(&link.target)?;
                if !schema.fields.contains_key(&target) {
                    return Err(Error::Configuration(format!(
                        "{}.{} links to undeclared model {}",
                        source, link.field, target
                    )));
                }

                schema.push_field(
                    &source,
                    RelationField {
                        name: link.field.clone(),
                        kind: link.kind.forward_kind(),
                        target: target.clone(),
                        via: None,
                    },
                )?;

                let reverse_name = link.related_name.clone().unwrap_or_else(|| match link.kind {
                    LinkKind::OneToOne => source.model_name().to_string(),
                    _ => format!("{}_set", source.model_name()),
                });
                schema.push_field(
                    &target,
                    RelationField {
                        name: reverse_name,
                        kind: link.kind.reverse_kind(),
                        target: source.clone(),
                        via: Some(link.field.clone()),
                    },
                )?;
            }
        }

        tracing::debug!("Resolved schema with {} models", schema.order.len());
        Ok(schema)
    }

    fn push_field(&mut self, owner: &RecordType, field: RelationField) -> Result<()> {
        let fields = self
            .fields
            .get_mut(owner)
            .ok_or_else(|| Error::UnknownRecordType(owner.to_string()))?;
        if fields.iter().any(|f| f.name == field.name) {
            return Err(Error::Configuration(format!(
                "duplicate relation field {}.{}",
                owner, field.name
            )));
        }
        fields.push(field);
        Ok(())
    }

    /// Relation fields of a type, in declaration order
    pub fn relations_of(&self, record_type: &RecordType) -> Option<&[RelationField]> {
        self.fields.get(record_type).map(Vec::as_slice)
    }

    pub fn contains(&self, record_type: &RecordType) -> bool {
        self.fields.contains_key(record_type)
    }

    /// Declared record types, in declaration order
    pub fn record_types(&self) -> &[RecordType] {
        &self.order
    }
}

/// Programmatic schema declaration
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    decl: SchemaDecl,
}

impl SchemaBuilder {
    /// Declare a model; a no-op if a link already declared it
    pub fn model(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self
            .decl
            .models
            .iter()
            .any(|m| m.name.eq_ignore_ascii_case(&name))
        {
            self.decl.models.push(ModelDecl {
                name,
                links: Vec::new(),
            });
        }
        self
    }

    pub fn foreign_key(
        self,
        model: &str,
        field: &str,
        target: &str,
        related_name: Option<&str>,
    ) -> Self {
        self.link(model, field, LinkKind::ForeignKey, target, related_name)
    }

    pub fn one_to_one(
        self,
        model: &str,
        field: &str,
        target: &str,
        related_name: Option<&str>,
    ) -> Self {
        self.link(model, field, LinkKind::OneToOne, target, related_name)
    }

    pub fn many_to_many(
        self,
        model: &str,
        field: &str,
        target: &str,
        related_name: Option<&str>,
    ) -> Self {
        self.link(model, field, LinkKind::ManyToMany, target, related_name)
    }

    fn link(
        mut self,
        model: &str,
        field: &str,
        kind: LinkKind,
        target: &str,
        related_name: Option<&str>,
    ) -> Self {
        let link = LinkDecl {
            field: field.to_string(),
            kind,
            target: target.to_string(),
            related_name: related_name.map(str::to_string),
        };
        match self
            .decl
            .models
            .iter_mut()
            .find(|m| m.name.eq_ignore_ascii_case(model))
        {
            Some(decl) => decl.links.push(link),
            None => self.decl.models.push(ModelDecl {
                name: model.to_string(),
                links: vec![link],
            }),
        }
        self
    }

    pub fn build(self) -> Result<Schema> {
        Schema::from_decl(&self.decl)
    }
}
