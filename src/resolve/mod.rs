//! Node resolver — the recursive core.
//!
//! Resolving a node onto model `M` happens in two phases:
//!
//! 1. **Primitive binding**: serde decodes the node straight onto `M`,
//!    filling every field whose shape already matches.
//! 2. **Field dispatch**: each relation field in `M::schema()` is resolved by
//!    its directive mode and written over whatever phase 1 left there.
//!
//! ```text
//! include   node[rel]                      → Option<C>
//! includes  node[rel][..]                  → Vec<C>
//! hasone    document[rel] where id == node[idKey]     → Option<C>
//! hasmany   document[rel] where id ∈ node[idKey][..]  → Vec<C>
//! ```
//!
//! Dangling ids and missing or mis-shaped relations resolve to `None` / an
//! empty `Vec`. The first real error stops the remaining fields of the node.

use std::any::type_name;

use serde_json::Value;

use crate::config::Options;
use crate::directive::{Directive, DirectiveError, Mode};
use crate::document::{json_kind, Document};
use crate::schema::field::{Field, Slot, SlotKind};
use crate::schema::Model;
use crate::{Error, Result};

/// One resolution pass over a borrowed document.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'d> {
    document: &'d Document,
    options: &'d Options,
    depth: usize,
}

impl<'d> Resolver<'d> {
    pub fn new(document: &'d Document, options: &'d Options) -> Self {
        Self { document, options, depth: 0 }
    }

    /// Nesting depth of the node currently being resolved (root = 0).
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    /// Resolve the object `node` into a fresh `M`.
    pub fn resolve<M: Model>(&self, node: &Value) -> Result<M> {
        expect_object::<M>(node)?;
        let mut model = bind::<M>(node)?;
        self.dispatch(node, &mut model)?;
        Ok(model)
    }

    /// Resolve `node` onto an existing `M`. Phase 1 replaces the model; on a
    /// phase 2 error the fields resolved so far are kept.
    pub fn resolve_into<M: Model>(&self, node: &Value, model: &mut M) -> Result<()> {
        expect_object::<M>(node)?;
        *model = bind::<M>(node)?;
        self.dispatch(node, model)
    }

    /// Resolve a related node one level down.
    pub(crate) fn resolve_child<C: Model>(&self, node: &Value) -> Result<C> {
        let child = Resolver { depth: self.depth + 1, ..*self };
        child.resolve(node)
    }

    fn dispatch<M: Model>(&self, node: &Value, model: &mut M) -> Result<()> {
        tracing::trace!(model = type_name::<M>(), depth = self.depth(), "resolving node");

        for field in M::schema().fields() {
            let Some(directive) = self.directive_of(field)? else {
                continue;
            };

            if field.kind() != slot_for(directive.mode) {
                return Err(Error::TypeMismatch {
                    field: field.name().to_owned(),
                    expected: slot_for(directive.mode).describe(),
                });
            }

            match (&field.slot, directive.mode) {
                (Slot::One(assign), Mode::Include) => {
                    let target = node.get(&directive.relation_key).filter(|v| v.is_object());
                    assign(self, &mut *model, target)?;
                }
                (Slot::One(assign), _) => {
                    let target = self.sideloaded_one::<M>(node, directive)?;
                    assign(self, &mut *model, target)?;
                }
                (Slot::Many(assign), Mode::Includes) => {
                    let targets: Vec<&Value> = node
                        .get(&directive.relation_key)
                        .and_then(Value::as_array)
                        .map(|items| items.iter().collect())
                        .unwrap_or_default();
                    // a non-object element fails the node holding the array
                    for target in &targets {
                        expect_object::<M>(target)?;
                    }
                    assign(self, &mut *model, targets.as_slice())?;
                }
                (Slot::Many(assign), _) => {
                    let targets = self.sideloaded_many::<M>(node, directive)?;
                    assign(self, &mut *model, targets.as_slice())?;
                }
            }
        }
        Ok(())
    }

    /// Parsed directive of a field, `None` when the field is skipped.
    fn directive_of<'f, M>(&self, field: &'f Field<M>) -> Result<Option<&'f Directive>> {
        match field.directive() {
            Ok(directive) => Ok(Some(directive)),
            Err(DirectiveError::UnknownMode(mode)) if !self.options.strict_modes => {
                tracing::debug!(field = field.name(), mode = %mode, "skipping field with unrecognized mode");
                Ok(None)
            }
            Err(err) => Err(Error::BadDirective {
                field: field.name().to_owned(),
                source: err.clone(),
            }),
        }
    }

    fn sideloaded_one<M>(&self, node: &Value, directive: &Directive) -> Result<Option<&'d Value>> {
        let Some(id) = node.get(directive.id_key()).filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        let id = numeric_id::<M>(directive.id_key(), id)?;
        let found = self.lookup(&directive.relation_key, id);
        Ok(found)
    }

    fn sideloaded_many<M>(&self, node: &Value, directive: &Directive) -> Result<Vec<&'d Value>> {
        let Some(ids) = node.get(directive.id_key()).and_then(Value::as_array) else {
            return Ok(Vec::new());
        };
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            let id = numeric_id::<M>(directive.id_key(), id)?;
            if let Some(target) = self.lookup(&directive.relation_key, id) {
                found.push(target);
            }
        }
        Ok(found)
    }

    fn lookup(&self, relation_key: &str, id: f64) -> Option<&'d Value> {
        let found = self.document.find_by(relation_key, &self.options.id_key, id);
        if found.is_none() {
            tracing::debug!(relation = relation_key, id, "dangling sideloaded reference");
        }
        found
    }
}

fn expect_object<M>(node: &Value) -> Result<()> {
    if node.is_object() {
        return Ok(());
    }
    Err(Error::StructuralMismatch {
        type_name: type_name::<M>(),
        message: format!("expected object, got {}", json_kind(node)),
    })
}

/// Phase 1: structural decode of the node onto `M`.
fn bind<M: Model>(node: &Value) -> Result<M> {
    serde::Deserialize::deserialize(node).map_err(|err| Error::StructuralMismatch {
        type_name: type_name::<M>(),
        message: err.to_string(),
    })
}

fn slot_for(mode: Mode) -> SlotKind {
    if mode.is_many() { SlotKind::Many } else { SlotKind::One }
}

fn numeric_id<M>(id_key: &str, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| Error::StructuralMismatch {
        type_name: type_name::<M>(),
        message: format!("id field '{id_key}' holds a {}, expected number", json_kind(value)),
    })
}
