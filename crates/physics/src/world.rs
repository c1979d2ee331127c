use crate::body::{PhysicsError, RigidBody};
use crate::collision::{Contact, detect};

/// A resolved contact between two bodies, by body code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub a: u32,
    pub b: u32,
    pub contact: Contact,
}

/// Owns every simulated body and steps them together.
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    bodies: Vec<RigidBody>,
    /// Coefficient of restitution applied to every contact.
    restitution: f32,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// An empty world with perfectly elastic contacts.
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            restitution: 1.0,
        }
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn add_body(&mut self, body: RigidBody) -> Result<(), PhysicsError> {
        if self.body(body.code()).is_some() {
            return Err(PhysicsError::DuplicateCode(body.code()));
        }
        self.bodies.push(body);
        Ok(())
    }

    pub fn remove_body(&mut self, code: u32) -> Option<RigidBody> {
        let index = self.bodies.iter().position(|b| b.code() == code)?;
        Some(self.bodies.remove(index))
    }

    pub fn body(&self, code: u32) -> Option<&RigidBody> {
        self.bodies.iter().find(|b| b.code() == code)
    }

    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub fn total_momentum(&self) -> glam::Vec3 {
        self.bodies.iter().map(RigidBody::momentum).sum()
    }

    pub fn total_kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(RigidBody::kinetic_energy).sum()
    }

    /// Integrate every body by `dt`, then resolve each overlapping pair in
    /// insertion order. Returns the contacts that changed velocities.
    pub fn step(&mut self, dt: f32) -> Vec<ContactEvent> {
        for body in &mut self.bodies {
            body.integrate(dt);
        }

        let mut events = Vec::new();
        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                let (head, tail) = self.bodies.split_at_mut(j);
                let (a, b) = (&mut head[i], &mut tail[0]);
                let Some(contact) = detect(a, b) else {
                    continue;
                };
                if resolve(a, b, &contact, self.restitution) {
                    tracing::trace!("contact {} <-> {} depth {:.4}", a.code(), b.code(), contact.depth);
                    events.push(ContactEvent {
                        a: a.code(),
                        b: b.code(),
                        contact,
                    });
                }
            }
        }
        events
    }
}

/// Apply an impulse along the contact normal. Pairs already separating are
/// left alone. Returns whether velocities changed.
fn resolve(a: &mut RigidBody, b: &mut RigidBody, contact: &Contact, restitution: f32) -> bool {
    let relative = a.velocity - b.velocity;
    let along_normal = relative.dot(contact.normal);
    if along_normal >= 0.0 {
        return false;
    }
    let impulse = -(1.0 + restitution) * along_normal / (a.inverse_mass() + b.inverse_mass());
    a.velocity += contact.normal * (impulse * a.inverse_mass());
    b.velocity -= contact.normal * (impulse * b.inverse_mass());
    true
}
