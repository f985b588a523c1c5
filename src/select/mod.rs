//! Selection façade: comparisons and predicates that filter their owner.
//!
//! [`select`] (or [`SelectExt::select`]) attaches a [`FrameSelect`] to a frame.
//! Names resolve lazily against an explicit lookup table:
//!
//! 1. the reserved [`INDEX_KEYWORD`] yields an [`IndexSelector`];
//! 2. a column name yields a [`ColumnSelector`];
//! 3. anything else falls through to the frame's own [attributes](crate::FrameAttribute).
//!
//! Every relational, null, membership, range, textual or temporal test on the
//! resulting selectors returns the owning frame filtered by the test's mask.

mod guard;
mod mask;
mod selector;
mod temporal;
mod text;

use std::collections::HashMap;

pub use guard::{Admission, OperationGuard};
pub use mask::Inclusive;
pub use selector::{ColumnSelector, IndexSelector, RowSelection};
pub use temporal::{
    BoundaryPredicate, PeriodFreq, TemporalAttr, TemporalKind, TemporalProperty,
    TemporalSelector, DT_BOOLEAN_OPS, DT_GUARD, PERIOD_METADATA_KEY,
};
pub use text::{CharClass, PatternOptions, TextPredicate, TextSelector, TEXT_BOOLEAN_OPS, TEXT_GUARD};

use crate::{
    error::{Result, SelectError},
    frame::{Frame, FrameAttribute, Series},
};

/// Reserved name that resolves to the row index instead of a column.
pub const INDEX_KEYWORD: &str = "index";

/// Attaches the selection façade to a frame.
#[must_use]
pub fn select(frame: &Frame) -> FrameSelect<'_> {
    FrameSelect::new(frame)
}

/// Attachment point of the selection façade on the host types.
pub trait SelectExt {
    /// What `select` returns for this host type.
    type Selection<'a>
    where
        Self: 'a;

    /// Selection entry point bound to `self`.
    fn select(&self) -> Self::Selection<'_>;
}

impl SelectExt for Frame {
    type Selection<'a> = FrameSelect<'a>;

    fn select(&self) -> FrameSelect<'_> {
        FrameSelect::new(self)
    }
}

impl SelectExt for Series {
    type Selection<'a> = ColumnSelector<'a, Series>;

    fn select(&self) -> ColumnSelector<'_, Series> {
        ColumnSelector::bare(self)
    }
}

/// What a façade name resolved to.
#[derive(Debug)]
pub enum Resolved<'a> {
    /// The row index.
    Index(IndexSelector<'a, Frame>),
    /// A column of the frame.
    Column(ColumnSelector<'a, Frame>),
    /// A non-column frame attribute, passed through unfiltered.
    Attribute(FrameAttribute),
}

impl<'a> Resolved<'a> {
    /// The column selector, if the name resolved to a column.
    #[must_use]
    pub fn into_column(self) -> Option<ColumnSelector<'a, Frame>> {
        match self {
            Resolved::Column(column) => Some(column),
            _ => None,
        }
    }

    /// The index selector, if the name resolved to the index.
    #[must_use]
    pub fn into_index(self) -> Option<IndexSelector<'a, Frame>> {
        match self {
            Resolved::Index(index) => Some(index),
            _ => None,
        }
    }

    /// The frame attribute, if the name fell through to one.
    #[must_use]
    pub fn into_attribute(self) -> Option<FrameAttribute> {
        match self {
            Resolved::Attribute(attribute) => Some(attribute),
            _ => None,
        }
    }
}

/// Selection façade over one frame.
#[derive(Debug)]
pub struct FrameSelect<'a> {
    frame: &'a Frame,
    lookup: HashMap<String, usize>,
}

impl<'a> FrameSelect<'a> {
    fn new(frame: &'a Frame) -> Self {
        let mut lookup = HashMap::with_capacity(frame.num_columns());
        for (position, name) in frame.column_names().into_iter().enumerate() {
            // Duplicate names resolve to the first column.
            lookup.entry(name).or_insert(position);
        }
        Self { frame, lookup }
    }

    /// The frame every selection filters.
    #[must_use]
    pub fn frame(&self) -> &'a Frame {
        self.frame
    }

    /// Resolves `name` as the index keyword, a column, or a frame attribute, in
    /// that order.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Resolved<'a>> {
        if name == INDEX_KEYWORD {
            return Some(Resolved::Index(self.index()));
        }
        if let Some(column) = self.column(name) {
            return Some(Resolved::Column(column));
        }
        self.frame.attribute(name).map(Resolved::Attribute)
    }

    /// Attribute-style lookup.
    pub fn attr(&self, name: &str) -> Result<Resolved<'a>> {
        self.resolve(name)
            .ok_or_else(|| SelectError::AttributeNotFound(name.to_owned()))
    }

    /// Item-style lookup; an unresolved name is a missing key.
    pub fn get(&self, name: &str) -> Result<Resolved<'a>> {
        self.attr(name).map_err(SelectError::into_key_error)
    }

    /// Selector over the column `name`, ignoring the index keyword and attributes.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<ColumnSelector<'a, Frame>> {
        let position = *self.lookup.get(name)?;
        let series = self.frame.column_at(position)?;
        Some(ColumnSelector::aligned(self.frame, series))
    }

    /// Selector over the frame's row index.
    #[must_use]
    pub fn index(&self) -> IndexSelector<'a, Frame> {
        IndexSelector::new(self.frame)
    }

    /// Enumerable members: column names in frame order, then the index keyword.
    #[must_use]
    pub fn members(&self) -> Vec<String> {
        let mut members: Vec<String> = Vec::with_capacity(self.frame.num_columns() + 1);
        for name in self.frame.column_names() {
            if name != INDEX_KEYWORD && !members.contains(&name) {
                members.push(name);
            }
        }
        members.push(INDEX_KEYWORD.to_owned());
        members
    }
}
