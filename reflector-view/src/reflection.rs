use core::fmt;
use core::ptr::{self, NonNull};

use reflector_core::{At, Descriptor, FieldList, FieldType, FieldVisitor, Reflect, Refs};

#[allow(unused_imports)]
use crate::{debug, trace};

/// A live view over the fields of one value.
///
/// The view holds the value's exclusive borrow for `'a` and exposes each entry of
/// the value's field list by position. Offsets are compile-time constants, so
/// every access is a pointer offset.
///
/// ```
/// use reflector_core::provide;
/// use reflector_view::Reflection;
///
/// #[derive(Clone, Copy)]
/// #[repr(C)]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// provide!(Point { x: f64, y: f64 });
///
/// let mut point = Point { x: 1.0, y: 2.0 };
/// let mut view = Reflection::new(&mut point);
/// *view.get_mut::<1>() = 20.0;
/// assert_eq!(*view.get::<0>(), 1.0);
/// assert_eq!(point.y, 20.0);
/// ```
pub struct Reflection<'a, T: Reflect> {
    target: &'a mut T,
}

impl<'a, T: Reflect> Reflection<'a, T> {
    /// Number of entries in `T`'s field list.
    pub const COUNT: usize = Descriptor::<T>::COUNT;

    /// Binds a view to `target`.
    ///
    /// Fails to compile if `T`'s field description does not match its layout.
    pub fn new(target: &'a mut T) -> Self {
        let () = Descriptor::<T>::ASSERT_COMPATIBLE;
        trace!(
            "binding view over {} ({} entries)",
            core::any::type_name::<T>(),
            Self::COUNT
        );
        Self { target }
    }

    /// Borrows entry `I` of `target` directly.
    pub fn member<const I: usize>(target: &'a mut T) -> &'a mut FieldType<T, I>
    where
        T::Fields: At<I>,
    {
        Reflection::new(target).into_mut::<I>()
    }

    /// The descriptor of `T`.
    pub const fn descriptor(&self) -> Descriptor<T> {
        Descriptor::new()
    }

    /// Number of entries in the view.
    pub const fn len(&self) -> usize {
        Self::COUNT
    }

    /// Whether the view has no entries.
    pub const fn is_empty(&self) -> bool {
        Self::COUNT == 0
    }

    /// Byte offset of entry `I` within `T`.
    pub const fn offset<const I: usize>(&self) -> usize
    where
        T::Fields: At<I>,
    {
        const { Descriptor::<T>::new().offset(I) }
    }

    /// Borrows entry `I`.
    #[inline]
    pub fn get<const I: usize>(&self) -> &FieldType<T, I>
    where
        T::Fields: At<I>,
    {
        let offset = const { Descriptor::<T>::new().offset(I) };
        let base = ptr::from_ref::<T>(self.target).cast::<u8>();
        // SAFETY: the descriptor is validated, so entry `I` of type `FieldType<T, I>`
        // lives at `offset` inside the borrowed value.
        unsafe { &*base.add(offset).cast::<FieldType<T, I>>() }
    }

    /// Mutably borrows entry `I`.
    #[inline]
    pub fn get_mut<const I: usize>(&mut self) -> &mut FieldType<T, I>
    where
        T::Fields: At<I>,
    {
        let offset = const { Descriptor::<T>::new().offset(I) };
        let base = ptr::from_mut::<T>(self.target).cast::<u8>();
        // SAFETY: as in `get`; the view holds the only borrow of the value.
        unsafe { &mut *base.add(offset).cast::<FieldType<T, I>>() }
    }

    /// Consumes the view and borrows entry `I` for the rest of `'a`.
    #[inline]
    pub fn into_mut<const I: usize>(self) -> &'a mut FieldType<T, I>
    where
        T::Fields: At<I>,
    {
        let offset = const { Descriptor::<T>::new().offset(I) };
        let base = ptr::from_mut::<T>(self.target).cast::<u8>();
        // SAFETY: as in `get_mut`; the borrow is handed over to the returned reference.
        unsafe { &mut *base.add(offset).cast::<FieldType<T, I>>() }
    }

    /// Overwrites entry `I` with `value`.
    #[inline]
    pub fn set<const I: usize>(&mut self, value: FieldType<T, I>)
    where
        T::Fields: At<I>,
    {
        *self.get_mut::<I>() = value;
    }

    /// Overwrites entry `I` with `value`, returning the previous value.
    #[inline]
    pub fn replace<const I: usize>(&mut self, value: FieldType<T, I>) -> FieldType<T, I>
    where
        T::Fields: At<I>,
    {
        core::mem::replace(self.get_mut::<I>(), value)
    }

    /// A shorter view over the same value.
    #[inline]
    pub fn reborrow(&mut self) -> Reflection<'_, T> {
        Reflection {
            target: &mut *self.target,
        }
    }

    /// The viewed value.
    pub fn target(&self) -> &T {
        self.target
    }

    /// The viewed value, mutably.
    pub fn target_mut(&mut self) -> &mut T {
        self.target
    }

    /// Gives the borrow of the viewed value back.
    pub fn into_inner(self) -> &'a mut T {
        self.target
    }

    /// Borrows every entry at once, in order.
    ///
    /// Destructure the bundle with `reflector_core::fields!`.
    pub fn fields(&mut self) -> Refs<'_, T> {
        self.reborrow().into_fields()
    }

    /// Consumes the view into one reference per entry, in order.
    pub fn into_fields(self) -> Refs<'a, T> {
        let base = NonNull::from(self.target).cast::<u8>();
        // SAFETY: the layout is validated against `T`, and the bundle takes over the
        // view's exclusive borrow for `'a`.
        unsafe { <T::Fields as FieldList>::project(base, &Descriptor::<T>::LAYOUT, 0) }
    }

    /// Hands every entry to `visitor`, in order.
    pub fn for_each<V: FieldVisitor>(&mut self, visitor: &mut V) {
        debug!(
            "visiting {} entries of {}",
            Self::COUNT,
            core::any::type_name::<T>()
        );
        let mut visitor = Traced(visitor);
        let base = NonNull::from(&mut *self.target).cast::<u8>();
        // SAFETY: see `into_fields`; each entry is borrowed only during its visit.
        unsafe {
            <T::Fields as FieldList>::visit(base, &Descriptor::<T>::LAYOUT, 0, &mut visitor)
        }
    }
}

struct Traced<'v, V>(&'v mut V);

impl<V: FieldVisitor> FieldVisitor for Traced<'_, V> {
    #[inline]
    fn visit<F: reflector_core::Member>(&mut self, info: reflector_core::FieldInfo, field: &mut F) {
        trace!(
            "entry {} at offset {}: {}",
            info.index,
            info.offset,
            info.type_name()
        );
        self.0.visit(info, field)
    }
}

impl<'a, T: Reflect> From<&'a mut T> for Reflection<'a, T> {
    fn from(target: &'a mut T) -> Self {
        Self::new(target)
    }
}

impl<T: Reflect> fmt::Debug for Reflection<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflection")
            .field("type", &core::any::type_name::<T>())
            .field("count", &Self::COUNT)
            .finish_non_exhaustive()
    }
}

/// Binds a view to `target`.
pub fn reflect<T: Reflect>(target: &mut T) -> Reflection<'_, T> {
    Reflection::new(target)
}

/// Adds `.reflect()` to every reflected type.
pub trait ReflectExt: Reflect {
    /// Binds a view to `self`.
    fn reflect(&mut self) -> Reflection<'_, Self> {
        Reflection::new(self)
    }
}

impl<T: Reflect> ReflectExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use reflector_core::{FieldInfo, Member, fields, provide};

    #[derive(Clone, Copy, Debug, PartialEq)]
    #[repr(C)]
    struct Point {
        x: f64,
        y: f64,
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    #[repr(C)]
    struct Circle {
        center: Point,
        radius: f64,
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    #[repr(C)]
    struct Samples {
        tag: u8,
        values: [u16; 3],
    }

    provide!(Point { x: f64, y: f64 });
    provide!(Circle { center: Point, radius: f64 });
    provide!(Samples { tag: u8, values: [u16; 3] });

    static SEVEN: u64 = 7;
    static EIGHT: u64 = 8;

    #[derive(Clone, Copy)]
    #[repr(C)]
    struct Holder {
        value: &'static u64,
    }

    provide!(Holder { value: &'static u64 });

    #[reflector_testhelpers::test]
    fn references_alias_the_fields() {
        let mut circle = Circle {
            center: Point { x: 1.0, y: 2.0 },
            radius: 3.0,
        };
        let expected_center = ptr::from_ref(&circle.center);
        let expected_radius = ptr::from_ref(&circle.radius);

        let view = Reflection::new(&mut circle);
        assert!(ptr::eq(view.get::<0>(), expected_center));
        assert!(ptr::eq(view.get::<1>(), expected_radius));
    }

    #[reflector_testhelpers::test]
    fn second_level_writes_through() {
        let mut circle = Circle {
            center: Point { x: 1.0, y: 2.0 },
            radius: 3.0,
        };

        let center = Reflection::member::<0>(&mut circle);
        let mut inner = center.reflect();
        assert_eq!(*inner.get::<0>(), 1.0);
        inner.set::<1>(20.0);

        assert_eq!(circle.center.y, 20.0);
    }

    #[reflector_testhelpers::test]
    fn replace_returns_previous_value() {
        let mut point = Point { x: 1.0, y: 2.0 };
        let mut view = reflect(&mut point);
        assert_eq!(view.replace::<0>(5.0), 1.0);
        assert_eq!(view.target().x, 5.0);
    }

    #[reflector_testhelpers::test]
    fn arrays_expand_into_entries() {
        let mut samples = Samples {
            tag: 7,
            values: [10, 20, 30],
        };
        let mut view = samples.reflect();
        assert_eq!(view.len(), 4);
        assert_eq!(view.offset::<3>(), 6);
        *view.get_mut::<2>() += 1;

        let fields![tag, first, _, last] = view.into_fields();
        *tag = 8;
        *first = 11;
        *last = 31;

        assert_eq!(samples, Samples { tag: 8, values: [11, 21, 31] });
    }

    #[reflector_testhelpers::test]
    fn reborrowed_views_share_the_value() {
        let mut point = Point { x: 0.0, y: 0.0 };
        let mut view = Reflection::from(&mut point);
        view.reborrow().set::<0>(4.0);
        {
            let fields![x, y] = view.fields();
            *y = *x * 2.0;
        }
        assert_eq!(*view.into_inner(), Point { x: 4.0, y: 8.0 });
    }

    #[reflector_testhelpers::test]
    fn reference_fields_are_read_as_references() {
        let mut holder = Holder { value: &SEVEN };
        let mut view = holder.reflect();
        assert_eq!(**view.get::<0>(), 7);
        view.set::<0>(&EIGHT);
        assert!(ptr::eq(holder.value, &EIGHT));
    }

    struct Recorder {
        offsets: [usize; 8],
        names: [&'static str; 8],
        seen: usize,
    }

    impl FieldVisitor for Recorder {
        fn visit<F: Member>(&mut self, info: FieldInfo, _field: &mut F) {
            self.offsets[self.seen] = info.offset;
            self.names[self.seen] = info.type_name();
            self.seen += 1;
        }
    }

    #[reflector_testhelpers::test]
    fn visitor_sees_every_entry_in_order() {
        let mut samples = Samples {
            tag: 0,
            values: [0; 3],
        };
        let mut recorder = Recorder {
            offsets: [0; 8],
            names: [""; 8],
            seen: 0,
        };
        samples.reflect().for_each(&mut recorder);

        assert_eq!(recorder.seen, 4);
        assert_eq!(recorder.offsets[..4], [0, 2, 4, 6]);
        assert_eq!(recorder.names[..4], ["u8", "u16", "u16", "u16"]);
    }
}
