#![cfg(feature = "derive")]

use reflector::{FieldType, HList, Member, Reflect, ReflectExt, describe, provide};
use static_assertions::{assert_impl_all, assert_not_impl_any, assert_type_eq_all};

#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
#[repr(C)]
struct Point<T> {
    x: T,
    y: T,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
struct ManualPoint<T> {
    x: T,
    y: T,
}

provide!(impl[T: Copy] ManualPoint<T> { x: T, y: T });

#[derive(Clone, Copy, Reflect)]
#[repr(C)]
struct Buffer<T: Copy, const N: usize>
where
    [T; N]: Member,
{
    items: [T; N],
    len: u8,
}

#[derive(Clone, Copy, Reflect)]
#[repr(C)]
struct Label<'a> {
    text: &'a str,
    width: u16,
}

#[derive(Clone, Copy, Reflect)]
#[repr(transparent)]
struct Meters(f64);

assert_type_eq_all!(<Point<u8> as Reflect>::Fields, HList![u8, u8]);
assert_type_eq_all!(<ManualPoint<i64> as Reflect>::Fields, HList![i64, i64]);
assert_type_eq_all!(<Buffer<u16, 3> as Reflect>::Fields, HList![u16, u16, u16, u8]);
assert_type_eq_all!(FieldType<Label<'static>, 0>, &'static str);
assert_type_eq_all!(FieldType<Meters, 0>, f64);
assert_type_eq_all!(<Point<Point<f32>> as Reflect>::Fields, HList![Point<f32>, Point<f32>]);

assert_impl_all!(Point<f64>: Reflect, Member);
assert_not_impl_any!(Point<String>: Reflect);

#[reflector_testhelpers::test]
fn instantiations_have_their_own_layout() {
    assert_eq!(describe::<Point<u8>>().offset(1), 1);
    assert_eq!(describe::<Point<f64>>().offset(1), 8);
    assert_eq!(describe::<ManualPoint<u32>>().offset(1), 4);
    assert_eq!(describe::<Buffer<u16, 3>>().offset(3), 6);
    assert_eq!(describe::<Buffer<u8, 5>>().count(), 6);
}

#[reflector_testhelpers::test]
fn generic_views_write_through() {
    let mut point = Point { x: 1u32, y: 2 };
    point.reflect().set::<0>(10);
    assert_eq!(point, Point { x: 10, y: 2 });

    let mut manual = ManualPoint { x: 'a', y: 'b' };
    assert_eq!(manual.reflect().replace::<1>('z'), 'b');
    assert_eq!(manual.y, 'z');
}

#[reflector_testhelpers::test]
fn borrowed_fields() {
    let text = String::from("hello");
    let mut label = Label {
        text: &text,
        width: 5,
    };
    let view = label.reflect();
    assert_eq!(*view.get::<0>(), "hello");
    assert_eq!(*view.get::<1>(), 5);
}

#[reflector_testhelpers::test]
fn transparent_newtype() {
    let mut distance = Meters(3.0);
    *distance.reflect().get_mut::<0>() *= 2.0;
    assert_eq!(distance.0, 6.0);
}
