//! Allow-list policy for typed sub-selectors.
//!
//! Each sub-selector kind declares two static name sets: the operations known to
//! return a row-aligned boolean mask, and every routine its underlying operation
//! set defines. Routines outside the allow-list are refused before any work is
//! done; names that are not routines at all pass through to the sub-selector.

use crate::{
    error::{Result, SelectError},
    logging::{select_log, LogContext},
};

/// Outcome of checking a name against an [`OperationGuard`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The name is a boolean-producing operation; its mask filters the owner.
    Allowed,
    /// The name is not a guarded routine (data, metadata, private names).
    PassThrough,
}

/// Statically declared allow-list over one typed operation set.
#[derive(Clone, Copy, Debug)]
pub struct OperationGuard {
    kind: &'static str,
    allowed: &'static [&'static str],
    routines: &'static [&'static str],
    ctx: LogContext,
}

impl OperationGuard {
    pub(crate) const fn new(
        kind: &'static str,
        allowed: &'static [&'static str],
        routines: &'static [&'static str],
        ctx: LogContext,
    ) -> Self {
        Self {
            kind,
            allowed,
            routines,
            ctx,
        }
    }

    /// Accessor name of the guarded kind (`str`, `dt`).
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Operations that produce a boolean row selection.
    #[must_use]
    pub fn allowed(&self) -> &'static [&'static str] {
        self.allowed
    }

    /// Routines of the underlying operation set that are refused.
    #[must_use]
    pub fn refused(&self) -> &'static [&'static str] {
        self.routines
    }

    /// Returns true when `name` is on the allow-list.
    #[must_use]
    pub fn is_allowed(&self, name: &str) -> bool {
        self.allowed.contains(&name)
    }

    /// Checks `name` before dispatch.
    pub fn admit(&self, name: &str) -> Result<Admission> {
        if name.starts_with('_') {
            return Ok(Admission::PassThrough);
        }
        if self.is_allowed(name) {
            return Ok(Admission::Allowed);
        }
        if self.routines.contains(&name) {
            return Err(self.reject(name, "the operation does not return a boolean row mask"));
        }
        Ok(Admission::PassThrough)
    }

    pub(crate) fn reject(&self, op: &str, reason: &'static str) -> SelectError {
        select_log!(
            log::Level::Debug,
            ctx: self.ctx,
            "operation_rejected",
            "op={} reason={:?}",
            op,
            reason,
        );
        SelectError::UnsupportedOperation {
            kind: self.kind,
            op: op.to_owned(),
            reason,
        }
    }
}
