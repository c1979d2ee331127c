use glam::Vec3;

use crate::body::{BodyShape, RigidBody};

/// Overlap between two bodies. `normal` is a unit vector pointing from the
/// second body towards the first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub normal: Vec3,
    pub depth: f32,
}

/// Contact between `a` and `b`, if their shapes overlap or touch.
pub fn detect(a: &RigidBody, b: &RigidBody) -> Option<Contact> {
    if a.shape().is_degenerate() || b.shape().is_degenerate() {
        return None;
    }
    match (*a.shape(), *b.shape()) {
        (BodyShape::Sphere { radius: ra }, BodyShape::Sphere { radius: rb }) => {
            sphere_sphere(a.position, ra, b.position, rb)
        }
        (BodyShape::Cube { side_length: sa }, BodyShape::Cube { side_length: sb }) => {
            aabb_aabb(a.position, sa * 0.5, b.position, sb * 0.5)
        }
        (BodyShape::Cube { side_length }, BodyShape::Sphere { radius }) => {
            // Normal from the cube towards the sphere, flipped to point at `a`.
            aabb_sphere(a.position, side_length * 0.5, b.position, radius).map(|c| Contact {
                normal: -c.normal,
                depth: c.depth,
            })
        }
        (BodyShape::Sphere { radius }, BodyShape::Cube { side_length }) => {
            aabb_sphere(b.position, side_length * 0.5, a.position, radius)
        }
    }
}

fn sphere_sphere(pa: Vec3, ra: f32, pb: Vec3, rb: f32) -> Option<Contact> {
    let offset = pa - pb;
    let reach = ra + rb;
    if offset.length_squared() > reach * reach {
        return None;
    }
    Some(Contact {
        normal: offset.try_normalize().unwrap_or(Vec3::Y),
        depth: reach - offset.length(),
    })
}

/// Axis of least penetration, signed along `offset`.
fn least_axis(overlap: Vec3, offset: Vec3) -> Contact {
    let axis = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        0
    } else if overlap.y <= overlap.z {
        1
    } else {
        2
    };
    let mut normal = Vec3::ZERO;
    normal[axis] = if offset[axis] < 0.0 { -1.0 } else { 1.0 };
    Contact {
        normal,
        depth: overlap[axis],
    }
}

fn aabb_aabb(pa: Vec3, ha: f32, pb: Vec3, hb: f32) -> Option<Contact> {
    let offset = pa - pb;
    let overlap = Vec3::splat(ha + hb) - offset.abs();
    if overlap.min_element() < 0.0 {
        return None;
    }
    Some(least_axis(overlap, offset))
}

/// Contact with the normal pointing from the cube towards the sphere.
fn aabb_sphere(cube: Vec3, half: f32, sphere: Vec3, radius: f32) -> Option<Contact> {
    let local = sphere - cube;
    let closest = local.clamp(Vec3::splat(-half), Vec3::splat(half));
    let gap = local - closest;
    let distance_sq = gap.length_squared();
    if distance_sq > radius * radius {
        return None;
    }
    if distance_sq > 0.0 {
        let distance = distance_sq.sqrt();
        return Some(Contact {
            normal: gap / distance,
            depth: radius - distance,
        });
    }
    // Centre inside the cube: push out through the nearest face.
    let overlap = Vec3::splat(half) - local.abs();
    let contact = least_axis(overlap, local);
    Some(Contact {
        normal: contact.normal,
        depth: contact.depth + radius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(x: f32, radius: f32) -> RigidBody {
        RigidBody::sphere(0, 1.0, Vec3::new(x, 0.0, 0.0), Vec3::ZERO, radius).unwrap()
    }

    fn cube(position: Vec3, side: f32) -> RigidBody {
        RigidBody::cube(0, 1.0, position, Vec3::ZERO, side).unwrap()
    }

    #[test]
    fn spheres_collide_within_sum_of_radii() {
        let contact = detect(&sphere(1.9, 1.0), &sphere(0.0, 1.0)).unwrap();
        assert_eq!(contact.normal, Vec3::X);
        assert!((contact.depth - 0.1).abs() < 1e-5);

        // Inside the sum of radii but outside the root of the summed squares.
        assert!(detect(&sphere(1.6, 1.0), &sphere(0.0, 1.0)).is_some());
        assert!(detect(&sphere(2.1, 1.0), &sphere(0.0, 1.0)).is_none());
    }

    #[test]
    fn zero_size_shapes_never_collide() {
        assert!(detect(&sphere(0.0, 0.0), &sphere(0.0, 1.0)).is_none());
        assert!(detect(&cube(Vec3::ZERO, 0.0), &cube(Vec3::ZERO, 1.0)).is_none());
        assert!(detect(&cube(Vec3::ZERO, 0.0), &sphere(0.0, 1.0)).is_none());
    }

    #[test]
    fn cubes_need_overlap_on_every_axis() {
        let a = cube(Vec3::new(0.8, 0.5, 0.0), 1.0);
        let b = cube(Vec3::ZERO, 1.0);
        let contact = detect(&a, &b).unwrap();
        assert_eq!(contact.normal, Vec3::X);
        assert!((contact.depth - 0.2).abs() < 1e-5);

        let apart = cube(Vec3::new(0.5, 0.0, 1.5), 1.0);
        assert!(detect(&apart, &b).is_none());
    }

    #[test]
    fn cube_sphere_uses_closest_point() {
        let c = cube(Vec3::ZERO, 2.0);
        let near = sphere(1.4, 0.5);
        let contact = detect(&near, &c).unwrap();
        assert_eq!(contact.normal, Vec3::X);
        assert!((contact.depth - 0.1).abs() < 1e-5);

        let flipped = detect(&c, &near).unwrap();
        assert_eq!(flipped.normal, -Vec3::X);

        // Close to the edge along the diagonal, but outside the rounded corner.
        let corner = RigidBody::sphere(0, 1.0, Vec3::new(1.4, 1.4, 0.0), Vec3::ZERO, 0.5).unwrap();
        assert!(detect(&corner, &c).is_none());
    }

    #[test]
    fn sphere_centre_inside_cube_exits_through_nearest_face() {
        let c = cube(Vec3::ZERO, 2.0);
        let inside = RigidBody::sphere(0, 1.0, Vec3::new(0.0, -0.8, 0.0), Vec3::ZERO, 0.5).unwrap();
        let contact = detect(&inside, &c).unwrap();
        assert_eq!(contact.normal, -Vec3::Y);
        assert!((contact.depth - 0.7).abs() < 1e-5);
    }
}
