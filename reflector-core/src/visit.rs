use crate::{FieldSlot, Member, StorageCell};

/// Where an entry lives and what it holds.
#[derive(Clone, Copy, Debug)]
pub struct FieldInfo {
    /// Position in the field-type sequence.
    pub index: usize,
    /// Byte offset from the start of the reflected value.
    pub offset: usize,
    /// Size and alignment of the entry.
    pub cell: StorageCell,
    type_name: fn() -> &'static str,
}

impl FieldInfo {
    /// Describes an entry of type `F`.
    pub const fn of<F>(index: usize, offset: usize) -> Self {
        Self::from_slot(index, offset, FieldSlot::of::<F>())
    }

    /// Describes the entry stored in `slot`.
    pub const fn from_slot(index: usize, offset: usize, slot: FieldSlot) -> Self {
        Self {
            index,
            offset,
            cell: slot.cell,
            type_name: slot.type_name,
        }
    }

    /// Name of the entry's type, as given by [`core::any::type_name`].
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }
}

/// Receives every entry of a reflected value in turn.
///
/// ```
/// use reflector_core::{FieldInfo, FieldVisitor, Member};
///
/// struct Sizes(usize);
///
/// impl FieldVisitor for Sizes {
///     fn visit<F: Member>(&mut self, info: FieldInfo, _field: &mut F) {
///         self.0 += info.cell.size;
///     }
/// }
/// ```
pub trait FieldVisitor {
    /// Called once per entry, in declaration order.
    fn visit<F: Member>(&mut self, info: FieldInfo, field: &mut F);
}

impl<V: FieldVisitor + ?Sized> FieldVisitor for &mut V {
    #[inline]
    fn visit<F: Member>(&mut self, info: FieldInfo, field: &mut F) {
        (**self).visit(info, field)
    }
}
