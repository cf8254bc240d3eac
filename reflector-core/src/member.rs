use core::marker::PhantomData;
use core::num::{
    NonZeroI8, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI128, NonZeroIsize, NonZeroU8,
    NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU128, NonZeroUsize,
};
use core::ptr::NonNull;

use crate::{FieldList, HCons, HNil};

/// A type that can be the declared type of a field in a reflected aggregate.
///
/// Most members are leaves: they contribute one entry of their own type to the
/// field-type sequence. Arrays are the exception and contribute one entry per
/// element, recursively, so `[[u8; 3]; 2]` contributes six `u8` entries.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be a field of a reflected type",
    label = "not a reflectable field type",
    note = "reflected fields must be scalars, pointers, references, arrays or types that implement `Reflect`",
    note = "opaque `Copy` types can opt in with `reflector::impl_member!`"
)]
pub trait Member: Sized {
    /// The entries this type contributes, placed in front of `Tail`.
    type Flatten<Tail: FieldList>: FieldList;

    /// How many entries this type contributes.
    const WIDTH: usize = <Self::Flatten<HNil> as FieldList>::LEN;
}

/// Marker for types whose values can be duplicated bit for bit and need no destructor.
///
/// Reflection hands out references into a value's storage as if it were a plain
/// sequence of slots, which is only sound for such types.
#[diagnostic::on_unimplemented(
    message = "reflected type must be trivial",
    label = "`{Self}` is not `Copy`",
    note = "derive `Clone` and `Copy` for `{Self}`"
)]
pub trait Trivial: Copy {}

impl<T: Copy> Trivial for T {}

/// Implements [`Member`] as a single entry for each listed type.
///
/// ```
/// #[derive(Clone, Copy)]
/// #[repr(C)]
/// struct Handle(u32);
///
/// reflector_core::impl_member!(Handle);
///
/// assert_eq!(<Handle as reflector_core::Member>::WIDTH, 1);
/// ```
#[macro_export]
macro_rules! impl_member {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Member for $ty {
                type Flatten<Tail: $crate::FieldList> = $crate::HCons<Self, Tail>;
            }
        )*
    };
}

impl_member!(
    bool, char, (),
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    f32, f64,
    NonZeroU8, NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU128, NonZeroUsize,
    NonZeroI8, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI128, NonZeroIsize,
);

impl<T: ?Sized> Member for *const T {
    type Flatten<Tail: FieldList> = HCons<Self, Tail>;
}

impl<T: ?Sized> Member for *mut T {
    type Flatten<Tail: FieldList> = HCons<Self, Tail>;
}

impl<T: ?Sized> Member for NonNull<T> {
    type Flatten<Tail: FieldList> = HCons<Self, Tail>;
}

impl<T: ?Sized> Member for &T {
    type Flatten<Tail: FieldList> = HCons<Self, Tail>;
}

impl<T: ?Sized> Member for &mut T {
    type Flatten<Tail: FieldList> = HCons<Self, Tail>;
}

impl<T: ?Sized> Member for PhantomData<T> {
    type Flatten<Tail: FieldList> = HCons<Self, Tail>;
}

impl<E: Member> Member for [E; 1] {
    type Flatten<Tail: FieldList> = E::Flatten<Tail>;
}

// Each length is split in two halves so that normalizing a long array stays
// shallow.
macro_rules! impl_member_for_arrays {
    ($($len:literal = $front:literal + $back:literal),* $(,)?) => {
        $(
            impl<E: Member> Member for [E; $len] {
                type Flatten<Tail: FieldList> =
                    <[E; $front] as Member>::Flatten<<[E; $back] as Member>::Flatten<Tail>>;
            }
        )*
    };
}

impl_member_for_arrays!(
    2 = 1 + 1, 3 = 1 + 2, 4 = 2 + 2, 5 = 2 + 3, 6 = 3 + 3, 7 = 3 + 4,
    8 = 4 + 4, 9 = 4 + 5, 10 = 5 + 5, 11 = 5 + 6, 12 = 6 + 6, 13 = 6 + 7,
    14 = 7 + 7, 15 = 7 + 8, 16 = 8 + 8, 17 = 8 + 9, 18 = 9 + 9, 19 = 9 + 10,
    20 = 10 + 10, 21 = 10 + 11, 22 = 11 + 11, 23 = 11 + 12, 24 = 12 + 12, 25 = 12 + 13,
    26 = 13 + 13, 27 = 13 + 14, 28 = 14 + 14, 29 = 14 + 15, 30 = 15 + 15, 31 = 15 + 16,
    32 = 16 + 16, 33 = 16 + 17, 34 = 17 + 17, 35 = 17 + 18, 36 = 18 + 18, 37 = 18 + 19,
    38 = 19 + 19, 39 = 19 + 20, 40 = 20 + 20, 41 = 20 + 21, 42 = 21 + 21, 43 = 21 + 22,
    44 = 22 + 22, 45 = 22 + 23, 46 = 23 + 23, 47 = 23 + 24, 48 = 24 + 24, 49 = 24 + 25,
    50 = 25 + 25, 51 = 25 + 26, 52 = 26 + 26, 53 = 26 + 27, 54 = 27 + 27, 55 = 27 + 28,
    56 = 28 + 28, 57 = 28 + 29, 58 = 29 + 29, 59 = 29 + 30, 60 = 30 + 30, 61 = 30 + 31,
    62 = 31 + 31, 63 = 31 + 32, 64 = 32 + 32,
);
