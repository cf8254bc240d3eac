use core::ptr::NonNull;

use crate::{FieldSlot, FieldVisitor, MAX_FIELDS, Member, StorageLayout};

/// The empty list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HNil;

/// A list made of a head element followed by a tail list.
///
/// Field types of a reflected aggregate are stored as `HCons<R1, HCons<R2, HNil>>`;
/// the reference bundle of a view has the same shape with `&mut Ri` elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HCons<H, T>(pub H, pub T);

impl<H, T> HCons<H, T> {
    /// Returns the element at position `I`.
    #[inline]
    pub fn get<const I: usize>(&self) -> &<Self as At<I>>::Output
    where
        Self: At<I>,
    {
        At::<I>::at(self)
    }

    /// Returns the element at position `I` mutably.
    #[inline]
    pub fn get_mut<const I: usize>(&mut self) -> &mut <Self as At<I>>::Output
    where
        Self: At<I>,
    {
        At::<I>::at_mut(self)
    }
}

/// Typed access to the element at position `I` of a list.
///
/// Implemented for every position below [`MAX_FIELDS`]; an out-of-range
/// position simply has no implementation.
#[diagnostic::on_unimplemented(
    message = "field index out of range for `{Self}`",
    label = "no entry at this position"
)]
pub trait At<const I: usize> {
    /// The element type at position `I`.
    type Output;

    /// Borrows the element at position `I`.
    fn at(&self) -> &Self::Output;

    /// Mutably borrows the element at position `I`.
    fn at_mut(&mut self) -> &mut Self::Output;
}

impl<H, T> At<0> for HCons<H, T> {
    type Output = H;

    #[inline]
    fn at(&self) -> &H {
        &self.0
    }

    #[inline]
    fn at_mut(&mut self) -> &mut H {
        &mut self.0
    }
}

macro_rules! impl_at_for_hcons {
    ($prev:literal $next:literal $($rest:literal)*) => {
        impl<H, T: At<$prev>> At<$next> for HCons<H, T> {
            type Output = <T as At<$prev>>::Output;

            #[inline]
            fn at(&self) -> &Self::Output {
                At::<$prev>::at(&self.1)
            }

            #[inline]
            fn at_mut(&mut self) -> &mut Self::Output {
                At::<$prev>::at_mut(&mut self.1)
            }
        }

        impl_at_for_hcons!($next $($rest)*);
    };
    ($last:literal) => {};
}

impl_at_for_hcons!(
    0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31
    32 33 34 35 36 37 38 39 40 41 42 43 44 45 46 47 48 49 50 51 52 53 54 55 56 57 58 59 60 61
    62 63
);

/// Appends one list to another.
pub trait Concat<Rhs> {
    /// The concatenated list.
    type Output;

    /// Moves `rhs` behind the last element of `self`.
    fn concat(self, rhs: Rhs) -> Self::Output;
}

impl<Rhs> Concat<Rhs> for HNil {
    type Output = Rhs;

    #[inline]
    fn concat(self, rhs: Rhs) -> Rhs {
        rhs
    }
}

impl<H, T: Concat<Rhs>, Rhs> Concat<Rhs> for HCons<H, T> {
    type Output = HCons<H, T::Output>;

    #[inline]
    fn concat(self, rhs: Rhs) -> Self::Output {
        HCons(self.0, self.1.concat(rhs))
    }
}

/// A list of field types: the field-type sequence of a reflected aggregate.
///
/// Besides its length, the list knows the storage cell of every entry and how to
/// project a base pointer into a bundle of references, one per entry.
pub trait FieldList: Sized {
    /// Number of entries.
    const LEN: usize;

    /// One slot per entry, in order; slots past [`Self::LEN`] are vacant.
    const SLOTS: [FieldSlot; MAX_FIELDS];

    /// The reference sequence: `&'a mut Ri` for every entry `Ri`.
    type Refs<'a>
    where
        Self: 'a;

    /// Builds the reference bundle for the entries starting at `index`.
    ///
    /// # Safety
    ///
    /// `base` must point to a live value whose layout is described by `layout`, and
    /// that value must stay exclusively borrowed for `'a`.
    unsafe fn project<'a>(base: NonNull<u8>, layout: &StorageLayout, index: usize) -> Self::Refs<'a>
    where
        Self: 'a;

    /// Hands every entry starting at `index` to `visitor`, in order.
    ///
    /// # Safety
    ///
    /// Same contract as [`FieldList::project`], for the duration of the call.
    unsafe fn visit<V: FieldVisitor>(
        base: NonNull<u8>,
        layout: &StorageLayout,
        index: usize,
        visitor: &mut V,
    );
}

impl FieldList for HNil {
    const LEN: usize = 0;
    const SLOTS: [FieldSlot; MAX_FIELDS] = [FieldSlot::VACANT; MAX_FIELDS];

    type Refs<'a> = HNil;

    #[inline]
    unsafe fn project<'a>(_base: NonNull<u8>, _layout: &StorageLayout, _index: usize) -> HNil
    where
        Self: 'a,
    {
        HNil
    }

    #[inline]
    unsafe fn visit<V: FieldVisitor>(
        _base: NonNull<u8>,
        _layout: &StorageLayout,
        _index: usize,
        _visitor: &mut V,
    ) {
    }
}

impl<H: Member, T: FieldList> FieldList for HCons<H, T> {
    const LEN: usize = T::LEN + 1;
    const SLOTS: [FieldSlot; MAX_FIELDS] = FieldSlot::prepend(FieldSlot::of::<H>(), &T::SLOTS, T::LEN);

    type Refs<'a>
        = HCons<&'a mut H, T::Refs<'a>>
    where
        Self: 'a;

    #[inline]
    unsafe fn project<'a>(base: NonNull<u8>, layout: &StorageLayout, index: usize) -> Self::Refs<'a>
    where
        Self: 'a,
    {
        // SAFETY: the layout places entry `index` inside the value, aligned for `H`,
        // and entries never overlap, so each reference is unique.
        let head = unsafe { base.add(layout.offset(index)).cast::<H>().as_mut() };
        HCons(head, unsafe { T::project(base, layout, index + 1) })
    }

    #[inline]
    unsafe fn visit<V: FieldVisitor>(
        base: NonNull<u8>,
        layout: &StorageLayout,
        index: usize,
        visitor: &mut V,
    ) {
        let offset = layout.offset(index);
        // SAFETY: see `project`; only one entry is borrowed at a time.
        let field = unsafe { base.add(offset).cast::<H>().as_mut() };
        visitor.visit(crate::FieldInfo::of::<H>(index, offset), field);
        unsafe { T::visit(base, layout, index + 1, visitor) }
    }
}

/// Spells out a list type: `HList![f64, u8]` is `HCons<f64, HCons<u8, HNil>>`.
#[macro_export]
macro_rules! HList {
    () => { $crate::HNil };
    ($head:ty $(, $tail:ty)* $(,)?) => {
        $crate::HCons<$head, $crate::HList!($($tail),*)>
    };
}

/// Destructures a reference bundle in declaration order.
///
/// ```
/// use reflector_core::{HCons, HNil, fields};
///
/// let fields![] = HNil;
///
/// let bundle = HCons(1u8, HCons('x', HNil));
/// let fields![a, b] = bundle;
/// assert_eq!((a, b), (1, 'x'));
/// ```
#[macro_export]
macro_rules! fields {
    () => { $crate::HNil };
    ($head:pat $(, $tail:pat)* $(,)?) => {
        $crate::HCons($head, $crate::fields!($($tail),*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_type_eq_all;

    assert_type_eq_all!(HList![], HNil);
    assert_type_eq_all!(HList![u8, f64], HCons<u8, HCons<f64, HNil>>);
    assert_type_eq_all!(<HList![u8, f64, char] as At<2>>::Output, char);

    #[test]
    fn indexed_access() {
        let mut list = HCons(1u8, HCons(2.5f64, HCons('c', HNil)));
        assert_eq!(*list.get::<0>(), 1);
        assert_eq!(*list.get::<1>(), 2.5);
        *list.get_mut::<2>() = 'z';
        assert_eq!(list.1.1.0, 'z');
    }

    #[test]
    fn concatenation_keeps_order() {
        let joined = HCons(1u8, HCons(2u16, HNil)).concat(HCons(3u32, HNil));
        let fields![a, b, c] = joined;
        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[test]
    fn lengths() {
        assert_eq!(<HNil as FieldList>::LEN, 0);
        assert_eq!(<HList![u8, u16, u32] as FieldList>::LEN, 3);
    }

    #[test]
    fn slots_follow_entries() {
        let slots = <HList![u8, u64] as FieldList>::SLOTS;
        assert_eq!(slots[0].cell, crate::StorageCell::of::<u8>());
        assert_eq!(slots[1].cell, crate::StorageCell::of::<u64>());
        assert_eq!(slots[2].cell, FieldSlot::VACANT.cell);
        assert_eq!((slots[1].type_name)(), "u64");
    }

    #[test]
    fn projection_ends_at_the_empty_list() {
        type Entries = HList![u8, u32];

        #[repr(C)]
        struct Tagged {
            tag: u8,
            value: u32,
        }

        let mut tagged = Tagged { tag: 1, value: 2 };
        let layout = StorageLayout::assemble(&<Entries as FieldList>::SLOTS, 2);
        let base = NonNull::from(&mut tagged).cast::<u8>();
        // SAFETY: `Tagged` is repr(C) with exactly these entries.
        let fields![tag, value] = unsafe { <Entries as FieldList>::project(base, &layout, 0) };
        *tag += 1;
        *value *= 10;
        assert_eq!((tagged.tag, tagged.value), (2, 20));

        let empty = StorageLayout::assemble(&<HNil as FieldList>::SLOTS, 0);
        // SAFETY: the empty list touches no memory.
        let HNil = unsafe { <HNil as FieldList>::project(NonNull::<u8>::dangling(), &empty, 0) };
    }
}
