use proc_macro2::{Span, TokenStream};

use crate::{IdentOrLiteral, PField};

/// A field type captured from the struct definition.
#[derive(Debug, Clone)]
pub struct CapturedType {
    /// The field it was declared on
    pub member: IdentOrLiteral,
    /// The type, as written
    pub ty: TokenStream,
    /// Where the field was declared
    pub span: Span,
}

/// Write-once table of field types, keyed by field position.
#[derive(Debug, Clone)]
pub struct FieldTypeRegistry {
    slots: Vec<Option<CapturedType>>,
}

impl FieldTypeRegistry {
    /// A registry with `len` empty positions.
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the registry has no positions.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Stores `captured` at `index` unless something is already there.
    ///
    /// Returns whether the value was stored.
    pub fn latch(&mut self, index: usize, captured: CapturedType) -> bool {
        match self.slots.get_mut(index) {
            Some(slot @ None) => {
                *slot = Some(captured);
                true
            }
            _ => false,
        }
    }

    /// Whether `index` holds a type.
    pub fn is_latched(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// The captured types in position order, or the first empty position.
    pub fn sequence(self) -> Result<Vec<CapturedType>, usize> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(index))
            .collect()
    }
}

/// Captures the declared type of every field into a [`FieldTypeRegistry`].
#[derive(Debug, Default)]
pub struct FieldTypeExtractor {
    skipped: usize,
}

impl FieldTypeExtractor {
    /// Latches each field's type at its position.
    pub fn extract(&mut self, fields: &[PField], registry: &mut FieldTypeRegistry) {
        for (index, field) in fields.iter().enumerate() {
            let captured = CapturedType {
                member: field.member.clone(),
                ty: field.ty.clone(),
                span: field.span,
            };
            if !registry.latch(index, captured) {
                self.skipped += 1;
            }
        }
    }

    /// How many captures found their position already taken.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn captured(ty: TokenStream) -> CapturedType {
        CapturedType {
            member: IdentOrLiteral::Literal(0),
            ty,
            span: Span::call_site(),
        }
    }

    #[test]
    fn latching_is_write_once() {
        let mut registry = FieldTypeRegistry::new(2);
        assert!(!registry.is_latched(0));
        assert!(registry.latch(0, captured(quote! { u8 })));
        assert!(!registry.latch(0, captured(quote! { f64 })));
        assert!(registry.is_latched(0));

        assert!(registry.latch(1, captured(quote! { u16 })));
        let types: Vec<_> = registry
            .sequence()
            .unwrap()
            .into_iter()
            .map(|c| c.ty.to_string())
            .collect();
        assert_eq!(types, ["u8", "u16"]);
    }

    #[test]
    fn out_of_range_positions_are_not_latched() {
        let mut registry = FieldTypeRegistry::new(1);
        assert!(!registry.latch(1, captured(quote! { u8 })));
        assert!(!registry.is_latched(1));
    }

    #[test]
    fn missing_positions_are_reported() {
        let mut registry = FieldTypeRegistry::new(3);
        registry.latch(0, captured(quote! { u8 }));
        registry.latch(2, captured(quote! { u8 }));
        assert_eq!(registry.sequence().unwrap_err(), 1);
    }

    #[test]
    fn extractor_counts_duplicates() {
        let fields = vec![PField {
            member: IdentOrLiteral::Literal(0),
            ty: quote! { [f64; 2] },
            span: Span::call_site(),
        }];
        let mut registry = FieldTypeRegistry::new(1);
        let mut extractor = FieldTypeExtractor::default();
        extractor.extract(&fields, &mut registry);
        extractor.extract(&fields, &mut registry);

        assert_eq!(extractor.skipped(), 1);
        assert_eq!(registry.sequence().unwrap()[0].ty.to_string(), "[f64 ; 2]");
    }
}
