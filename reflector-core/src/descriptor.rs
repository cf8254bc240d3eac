use core::fmt;
use core::marker::PhantomData;

use crate::{At, FieldInfo, FieldList, FieldSlot, MAX_FIELDS, Member, StorageLayout};

/// How a reflected type's field list was discovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mechanism {
    /// Derived from the type definition by `#[derive(Reflect)]`.
    Automatic,
    /// Declared field by field with `provide!`.
    Manual,
}

/// Ties one declared field to the entries it contributes.
///
/// `offset` is the real byte offset of the field, as reported by
/// [`core::mem::offset_of!`]; `width` is how many entries the field's type
/// contributes to the field list (see [`Member::WIDTH`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Anchor {
    /// Real offset of the declared field.
    pub offset: usize,
    /// Number of entries the declared field expands to.
    pub width: usize,
}

impl Anchor {
    /// Anchors a field of type `R` found at `offset`.
    pub const fn new<R: Member>(offset: usize) -> Self {
        Self {
            offset,
            width: R::WIDTH,
        }
    }

    /// Anchors the field picked by `borrow` and `place`.
    ///
    /// Neither selector is ever called. `borrow` proves the field can be read
    /// without `unsafe`, which rules out union fields. `place` proves its type is
    /// exactly `R`: a reference return would accept deref coercions such as
    /// `&Box<R>` to `&R`, a raw pointer return does not.
    pub const fn select<T, R: Member>(
        _borrow: fn(&T) -> &R,
        _place: fn(&T) -> *const R,
        offset: usize,
    ) -> Self {
        Self::new::<R>(offset)
    }
}

/// A type whose fields can be reflected.
///
/// Implemented by `#[derive(Reflect)]` or by `provide!`; implementing it by hand is
/// possible but rarely needed.
///
/// # Safety
///
/// `Fields` must list, in order, the types of the declared fields that `ANCHORS`
/// describe, each array field expanded into its elements. Every anchor must carry
/// the real offset of a field whose type is the one `Fields` lists at that position.
/// Offsets and sizes are checked by [`Descriptor::ASSERT_COMPATIBLE`]; field types
/// of equal size are not.
#[diagnostic::on_unimplemented(
    message = "no description was found for `{Self}`, so it cannot be reflected",
    label = "`{Self}` has no field description",
    note = "derive `Reflect` for `{Self}`, or describe its fields with `reflector::provide!`"
)]
pub unsafe trait Reflect: Sized {
    /// The field-type sequence.
    type Fields: FieldList;

    /// The mechanism that produced this implementation.
    const MECHANISM: Mechanism;

    /// One anchor per declared field, in declaration order.
    const ANCHORS: &'static [Anchor];
}

/// Compile-time facts about a reflected type.
///
/// A `Descriptor` is zero-sized; everything it knows lives in associated constants
/// that are evaluated once per type.
pub struct Descriptor<T>(PhantomData<fn() -> T>);

impl<T> Clone for Descriptor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Descriptor<T> {}

impl<T: Reflect> Descriptor<T> {
    /// Number of entries in the field-type sequence.
    pub const COUNT: usize = <T::Fields as FieldList>::LEN;

    /// The mechanism that discovered the fields.
    pub const MECHANISM: Mechanism = T::MECHANISM;

    /// Storage cell and type name of every entry.
    pub const SLOTS: [FieldSlot; MAX_FIELDS] = <T::Fields as FieldList>::SLOTS;

    /// The layout modelled from the storage cells.
    pub const LAYOUT: StorageLayout = StorageLayout::assemble(&Self::SLOTS, Self::COUNT);

    /// Checks that the modelled layout is the real layout of `T`.
    ///
    /// Evaluating this constant fails to compile unless the modelled size and
    /// alignment equal those of `T`, every anchored field sits where the model
    /// puts its first entry, and the anchors account for every entry.
    pub const ASSERT_COMPATIBLE: () = {
        let layout = Self::LAYOUT;
        assert!(
            layout.size == core::mem::size_of::<T>() && layout.align == core::mem::align_of::<T>(),
            "reflection tuple is not compatible with target type"
        );

        let anchors = T::ANCHORS;
        let mut entry = 0;
        let mut i = 0;
        while i < anchors.len() {
            let anchor = anchors[i];
            if anchor.width > 0 {
                assert!(
                    entry < layout.len() && layout.offset(entry) == anchor.offset,
                    "reflection tuple is not compatible with target type"
                );
            }
            entry += anchor.width;
            i += 1;
        }
        assert!(
            entry == Self::COUNT,
            "reflection tuple is not compatible with target type"
        );
    };

    /// Returns the descriptor of `T`, validating it.
    pub const fn new() -> Self {
        let () = Self::ASSERT_COMPATIBLE;
        Self(PhantomData)
    }

    /// Number of entries in the field-type sequence.
    pub const fn count(self) -> usize {
        Self::COUNT
    }

    /// The mechanism that discovered the fields.
    pub const fn mechanism(self) -> Mechanism {
        Self::MECHANISM
    }

    /// The validated layout of `T`.
    pub const fn layout(self) -> StorageLayout {
        let () = Self::ASSERT_COMPATIBLE;
        Self::LAYOUT
    }

    /// Byte offset of entry `index` within `T`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`Descriptor::COUNT`]; in a const context that
    /// is a compile error.
    #[inline]
    pub const fn offset(self, index: usize) -> usize {
        let () = Self::ASSERT_COMPATIBLE;
        Self::LAYOUT.offset(index)
    }

    /// Describes entry `index`, or returns `None` past the end.
    pub fn field(self, index: usize) -> Option<FieldInfo> {
        if index >= Self::COUNT {
            return None;
        }
        Some(FieldInfo::from_slot(
            index,
            self.offset(index),
            Self::SLOTS[index],
        ))
    }

    /// Describes every entry, in order.
    pub fn fields(self) -> impl ExactSizeIterator<Item = FieldInfo> + Clone {
        let () = Self::ASSERT_COMPATIBLE;
        (0..Self::COUNT).map(|index| {
            FieldInfo::from_slot(index, Self::LAYOUT.offset(index), Self::SLOTS[index])
        })
    }
}

impl<T: Reflect> fmt::Debug for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("type", &core::any::type_name::<T>())
            .field("count", &Self::COUNT)
            .field("mechanism", &Self::MECHANISM)
            .finish()
    }
}

/// Returns the validated descriptor of `T`.
///
/// ```
/// use reflector_core::{Mechanism, describe, provide};
///
/// #[derive(Clone, Copy)]
/// #[repr(C)]
/// struct Sample {
///     id: u32,
///     weight: f64,
/// }
///
/// provide!(Sample { id: u32, weight: f64 });
///
/// let descriptor = describe::<Sample>();
/// assert_eq!(descriptor.count(), 2);
/// assert_eq!(descriptor.offset(1), 8);
/// assert_eq!(descriptor.mechanism(), Mechanism::Manual);
/// ```
pub const fn describe<T: Reflect>() -> Descriptor<T> {
    Descriptor::new()
}

/// The type of entry `I` of `T`'s field-type sequence.
pub type FieldType<T, const I: usize> = <<T as Reflect>::Fields as At<I>>::Output;

/// The reference bundle of `T`: one `&'a mut` per entry, in order.
pub type Refs<'a, T> = <<T as Reflect>::Fields as FieldList>::Refs<'a>;
