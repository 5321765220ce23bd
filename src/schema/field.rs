//! Field descriptors — one relation field of a model.

use std::fmt;

use serde_json::Value;

use crate::directive::{Directive, DirectiveError};
use crate::resolve::Resolver;
use crate::Result;

pub(crate) type OneFn<M> =
    Box<dyn Fn(&Resolver<'_>, &mut M, Option<&Value>) -> Result<()> + Send + Sync>;
pub(crate) type ManyFn<M> =
    Box<dyn Fn(&Resolver<'_>, &mut M, &[&Value]) -> Result<()> + Send + Sync>;

/// Shape of the Rust field a directive writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// `Option<C>`
    One,
    /// `Vec<C>`
    Many,
}

impl SlotKind {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            SlotKind::One => "single reference (Option<T>)",
            SlotKind::Many => "sequence of references (Vec<T>)",
        }
    }
}

/// Typed writer into the model field. Each variant resolves child nodes into
/// the child model type it was registered with.
pub(crate) enum Slot<M> {
    One(OneFn<M>),
    Many(ManyFn<M>),
}

impl<M> Slot<M> {
    pub(crate) fn kind(&self) -> SlotKind {
        match self {
            Slot::One(_) => SlotKind::One,
            Slot::Many(_) => SlotKind::Many,
        }
    }
}

/// A directive-bearing field of model `M`.
///
/// The directive is parsed once at registration. A parse failure is kept and
/// reported when a resolution pass reaches the field.
pub struct Field<M> {
    name: &'static str,
    raw: &'static str,
    directive: std::result::Result<Directive, DirectiveError>,
    pub(crate) slot: Slot<M>,
}

impl<M> Field<M> {
    pub(crate) fn new(name: &'static str, raw: &'static str, slot: Slot<M>) -> Self {
        Self {
            name,
            raw,
            directive: Directive::parse(raw),
            slot,
        }
    }

    /// Rust field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Directive string as registered.
    pub fn raw_directive(&self) -> &'static str {
        self.raw
    }

    pub fn directive(&self) -> std::result::Result<&Directive, &DirectiveError> {
        self.directive.as_ref()
    }

    pub fn kind(&self) -> SlotKind {
        self.slot.kind()
    }
}

impl<M> fmt::Debug for Field<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("directive", &self.directive)
            .field("kind", &self.kind())
            .finish()
    }
}
