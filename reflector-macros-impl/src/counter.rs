use proc_macro2::Span;
use reflector_core::MAX_FIELDS;

use crate::{CompileError, PField};

/// Counts the declared fields of a struct, up to a bound.
#[derive(Debug, Clone)]
pub struct FieldCounter {
    count: usize,
    limit: usize,
}

impl Default for FieldCounter {
    fn default() -> Self {
        Self::with_limit(MAX_FIELDS)
    }
}

impl FieldCounter {
    /// A counter that accepts at most `limit` fields.
    pub fn with_limit(limit: usize) -> Self {
        Self { count: 0, limit }
    }

    /// Counts one more field declared at `span`.
    pub fn push(&mut self, span: Span) -> Result<usize, CompileError> {
        if self.count == self.limit {
            return Err(CompileError::new("too many fields to reflect", span));
        }
        self.count += 1;
        Ok(self.count)
    }

    /// Counts every field of `fields`, stopping at the first one past the bound.
    pub fn count(mut self, fields: &[PField]) -> Result<usize, CompileError> {
        for field in fields {
            self.push(field.span)?;
        }
        Ok(self.count)
    }
}
