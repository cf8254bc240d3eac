/// Describes the fields of a struct by hand.
///
/// Each entry names a field and its exact declared type, in declaration order. The
/// field selector is type-checked against the struct, so a wrong name or a wrong
/// type does not compile, and the resulting descriptor is validated against the
/// real layout.
///
/// ```
/// use reflector_core::{Mechanism, Reflect, provide};
///
/// #[derive(Clone, Copy)]
/// #[repr(C)]
/// struct Vertex {
///     position: [f32; 3],
///     color: u32,
/// }
///
/// provide!(Vertex { position: [f32; 3], color: u32 });
///
/// assert_eq!(<Vertex as Reflect>::MECHANISM, Mechanism::Manual);
/// assert_eq!(reflector_core::describe::<Vertex>().count(), 4);
/// ```
///
/// Generic structs list their parameters in brackets after `impl`:
///
/// ```
/// use reflector_core::provide;
///
/// #[derive(Clone, Copy)]
/// #[repr(C)]
/// struct Pair<T> {
///     left: T,
///     right: T,
/// }
///
/// provide!(impl[T] Pair<T> { left: T, right: T });
///
/// assert_eq!(reflector_core::describe::<Pair<u16>>().offset(1), 2);
/// ```
///
/// Tuple structs use field positions:
///
/// ```
/// #[derive(Clone, Copy)]
/// #[repr(C)]
/// struct Meters(f64);
///
/// reflector_core::provide!(Meters { 0: f64 });
/// ```
#[macro_export]
macro_rules! provide {
    (impl [$($generics:tt)*] $target:ty { $($field:tt : $ty:ty),* $(,)? }) => {
        $crate::__provide_impl!([$($generics)*] $target { $($field: $ty),* });
    };
    ($target:ty { $($field:tt : $ty:ty),* $(,)? }) => {
        $crate::__provide_impl!([] $target { $($field: $ty),* });

        const _: () = $crate::Descriptor::<$target>::ASSERT_COMPATIBLE;
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __provide_impl {
    ([$($generics:tt)*] $target:ty { $($field:tt : $ty:ty),* }) => {
        unsafe impl<$($generics)*> $crate::Reflect for $target
        where
            $($ty: $crate::Member,)*
        {
            type Fields = $crate::__provide_fold!($($ty),*);

            const MECHANISM: $crate::Mechanism = $crate::Mechanism::Manual;

            const ANCHORS: &'static [$crate::Anchor] = &[
                $(
                    $crate::Anchor::select::<$target, $ty>(
                        |target| &target.$field,
                        |target: &$target| -> *const $ty { &raw const target.$field },
                        ::core::mem::offset_of!($target, $field),
                    ),
                )*
            ];
        }

        impl<$($generics)*> $crate::Member for $target {
            type Flatten<Tail: $crate::FieldList> = $crate::HCons<Self, Tail>;
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __provide_fold {
    () => { $crate::HNil };
    ($head:ty $(, $tail:ty)*) => {
        <$head as $crate::Member>::Flatten<$crate::__provide_fold!($($tail),*)>
    };
}
