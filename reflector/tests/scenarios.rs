#![cfg(feature = "derive")]

use core::mem::offset_of;
use core::ptr;

use reflector::{FieldType, Reflect, ReflectExt, Reflection, describe, fields};
use static_assertions::assert_type_eq_all;

#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
#[repr(C)]
struct Point {
    x: f64,
    y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
#[repr(C)]
struct Circle {
    center: Point,
    radius: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
#[repr(C)]
struct Arr {
    a: [f64; 2],
}

#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
#[repr(C)]
struct Cylinder {
    base: Circle,
    height: f64,
}

assert_type_eq_all!(FieldType<Circle, 0>, Point);
assert_type_eq_all!(FieldType<Circle, 1>, f64);
assert_type_eq_all!(FieldType<Arr, 0>, f64);
assert_type_eq_all!(FieldType<Arr, 1>, f64);
assert_type_eq_all!(FieldType<Cylinder, 0>, Circle);

#[reflector_testhelpers::test]
fn circle_has_a_point_and_a_radius() {
    assert_eq!(describe::<Circle>().count(), 2);
    assert_eq!(Reflection::<Circle>::COUNT, 2);
    assert_eq!(describe::<Circle>().offset(0), offset_of!(Circle, center));
    assert_eq!(describe::<Circle>().offset(1), offset_of!(Circle, radius));
}

#[reflector_testhelpers::test]
fn second_level_reflection_writes_through() {
    let mut circle = Circle {
        center: Point { x: 1.0, y: 2.0 },
        radius: 3.0,
    };

    {
        let mut view = circle.reflect();
        let mut center = view.get_mut::<0>().reflect();
        assert_eq!(*center.get::<0>(), 1.0);
        assert_eq!(*center.get::<1>(), 2.0);
        *center.get_mut::<1>() = 20.0;
    }

    assert_eq!(circle.center.y, 20.0);
    assert_eq!(circle.center.x, 1.0);
    assert_eq!(circle.radius, 3.0);
}

#[reflector_testhelpers::test]
fn array_field_expands_into_its_elements() {
    let mut arr = Arr { a: [1.5, 2.5] };
    let expected = [ptr::from_ref(&arr.a[0]), ptr::from_ref(&arr.a[1])];

    assert_eq!(describe::<Arr>().count(), 2);

    let view = arr.reflect();
    assert!(ptr::eq(view.get::<0>(), expected[0]));
    assert!(ptr::eq(view.get::<1>(), expected[1]));

    let fields![first, second] = view.into_fields();
    core::mem::swap(first, second);
    assert_eq!(arr.a, [2.5, 1.5]);
}

#[reflector_testhelpers::test]
fn references_alias_every_field() {
    let mut cylinder = Cylinder {
        base: Circle {
            center: Point { x: 0.0, y: 0.0 },
            radius: 1.0,
        },
        height: 2.0,
    };
    let base = ptr::from_ref(&cylinder.base);
    let height = ptr::from_ref(&cylinder.height);

    let fields![b, h] = cylinder.reflect().into_fields();
    assert!(ptr::eq(b, base));
    assert!(ptr::eq(h, height));
}

#[reflector_testhelpers::test]
fn reflecting_three_levels_deep() {
    let mut cylinder = Cylinder {
        base: Circle {
            center: Point { x: 0.0, y: 0.0 },
            radius: 1.0,
        },
        height: 2.0,
    };

    let base = Reflection::member::<0>(&mut cylinder);
    let center = Reflection::member::<0>(base);
    Reflection::new(center).set::<0>(7.0);

    assert_eq!(cylinder.base.center, Point { x: 7.0, y: 0.0 });
}
