use crate::MAX_FIELDS;

/// Size and alignment of one field slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct StorageCell {
    /// Size in bytes.
    pub size: usize,
    /// Required alignment in bytes; always a power of two.
    pub align: usize,
}

impl StorageCell {
    /// The storage cell of `T`.
    pub const fn of<T>() -> Self {
        Self {
            size: core::mem::size_of::<T>(),
            align: core::mem::align_of::<T>(),
        }
    }
}

/// A storage cell together with the name of the type stored in it.
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct FieldSlot {
    /// Size and alignment of the entry.
    pub cell: StorageCell,
    /// Returns the name of the entry type.
    pub type_name: fn() -> &'static str,
}

impl FieldSlot {
    /// Filler for positions past the end of a field list.
    pub const VACANT: Self = Self {
        cell: StorageCell { size: 0, align: 1 },
        type_name: vacant_name,
    };

    /// The slot holding a `T`.
    pub const fn of<T>() -> Self {
        Self {
            cell: StorageCell::of::<T>(),
            type_name: core::any::type_name::<T>,
        }
    }

    /// Returns `tail` shifted one position to the right, with `head` in front.
    ///
    /// Only the first `tail_len` entries of `tail` are kept.
    pub const fn prepend(
        head: FieldSlot,
        tail: &[FieldSlot; MAX_FIELDS],
        tail_len: usize,
    ) -> [FieldSlot; MAX_FIELDS] {
        assert!(tail_len < MAX_FIELDS, "too many fields to reflect");

        let mut slots = [FieldSlot::VACANT; MAX_FIELDS];
        slots[0] = head;
        let mut i = 0;
        while i < tail_len {
            slots[i + 1] = tail[i];
            i += 1;
        }
        slots
    }
}

fn vacant_name() -> &'static str {
    "<vacant>"
}

/// The byte layout of an aggregate, computed from the storage cells of its entries.
///
/// Entries are placed in order, each at the first offset past the previous entry that
/// satisfies its alignment; the aggregate is aligned to its strictest entry and padded
/// to a multiple of that alignment. This is the `#[repr(C)]` placement rule, so a
/// layout assembled from the field types of a `#[repr(C)]` struct matches the struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct StorageLayout {
    offsets: [usize; MAX_FIELDS],
    len: usize,
    /// Total size in bytes, including trailing padding.
    pub size: usize,
    /// Alignment of the whole aggregate.
    pub align: usize,
}

impl StorageLayout {
    /// Places the first `len` entries of `slots`.
    pub const fn assemble(slots: &[FieldSlot; MAX_FIELDS], len: usize) -> Self {
        assert!(len <= MAX_FIELDS, "too many fields to reflect");

        let mut offsets = [0; MAX_FIELDS];
        let mut cursor = 0;
        let mut align = 1;

        let mut i = 0;
        while i < len {
            let cell = slots[i].cell;
            cursor = align_up(cursor, cell.align);
            offsets[i] = cursor;
            cursor += cell.size;
            if cell.align > align {
                align = cell.align;
            }
            i += 1;
        }

        Self {
            offsets,
            len,
            size: align_up(cursor, align),
            align,
        }
    }

    /// Number of placed entries.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the layout has no entries.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset of entry `index` from the start of the aggregate.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`StorageLayout::len`].
    #[inline]
    pub const fn offset(&self, index: usize) -> usize {
        assert!(index < self.len, "field index out of range");
        self.offsets[index]
    }
}

const fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) & !(align - 1)
}
