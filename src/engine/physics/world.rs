use rapier2d::prelude::*;

use super::collision::{CollisionEvent as GameCollisionEvent, CollisionEventQueue, CollisionLayer};
use crate::engine::game_loop::FIXED_TIMESTEP;

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    /// Gravity vector
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Query pipeline for probes against the last stepped state
    query_pipeline: QueryPipeline,

    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,

    /// Collision event handler
    collision_event_queue: CollisionEventQueue,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_gravity(vector![0.0, -9.81])
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vector<Real>) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = FIXED_TIMESTEP;

        Self {
            gravity,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            collision_event_queue: CollisionEventQueue::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    pub fn step(&mut self) {
        // Events not drained by the previous caller are stale now
        self.collision_event_queue.clear();

        let event_handler = &self.collision_event_queue;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            event_handler,
        );
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set)
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable reference to a rigid body
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Get a reference to a collider
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Enable or disable a collider; missing handles are ignored
    pub fn set_collider_enabled(&mut self, handle: ColliderHandle, enabled: bool) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_enabled(enabled);
        }
    }

    /// Axis-aligned bounds of a collider as (min, max) corners
    pub fn collider_bounds(&self, handle: ColliderHandle) -> Option<(Point<Real>, Point<Real>)> {
        self.collider_set.get(handle).map(|collider| {
            let aabb = collider.compute_aabb();
            (aabb.mins, aabb.maxs)
        })
    }

    /// Overlap a box against one layer, ignoring `exclude` and all sensors.
    ///
    /// Sweeping a box a short distance is the same as overlapping the box that
    /// covers the swept region, which is what the movement probes build.
    pub fn probe_box(
        &self,
        center: Vector<Real>,
        half_extents: Vector<Real>,
        layer: CollisionLayer,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<ColliderHandle> {
        if half_extents.x <= 0.0 || half_extents.y <= 0.0 {
            return None;
        }
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y);
        self.probe_shape(&shape, center, layer, exclude)
    }

    /// Overlap a circle against one layer, ignoring `exclude` and all sensors
    pub fn probe_circle(
        &self,
        center: Vector<Real>,
        radius: Real,
        layer: CollisionLayer,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<ColliderHandle> {
        if radius <= 0.0 {
            return None;
        }
        let shape = SharedShape::ball(radius);
        self.probe_shape(&shape, center, layer, exclude)
    }

    fn probe_shape(
        &self,
        shape: &SharedShape,
        center: Vector<Real>,
        layer: CollisionLayer,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<ColliderHandle> {
        let mut filter = QueryFilter::new()
            .exclude_sensors()
            .groups(layer.query_groups());
        if let Some(handle) = exclude {
            filter = filter.exclude_rigid_body(handle);
        }

        let shape_pos = Isometry::translation(center.x, center.y);
        self.query_pipeline.intersection_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &**shape,
            filter,
        )
    }

    /// Take all collision events produced by the last step
    pub fn drain_collision_events(&self) -> Vec<GameCollisionEvent> {
        self.collision_event_queue.drain()
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vector<Real> {
        self.gravity
    }

    /// Get the current timestep
    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::super::body::presets;
    use super::*;

    fn world_with_floor() -> (PhysicsWorld, ColliderHandle) {
        let mut world = PhysicsWorld::new();
        let floor = world.add_rigid_body(presets::ground_body(0.0, 0.0));
        let collider = world.add_collider(presets::ground_collider(20.0, 1.0), floor);
        world.step();
        (world, collider)
    }

    #[test]
    fn test_probe_box_hits_ground() {
        let (world, floor) = world_with_floor();
        let hit = world.probe_box(
            vector![0.0, 0.55],
            vector![0.4, 0.1],
            CollisionLayer::Ground,
            None,
        );
        assert_eq!(hit, Some(floor));
    }

    #[test]
    fn test_probe_box_misses_above_ground() {
        let (world, _) = world_with_floor();
        let hit = world.probe_box(
            vector![0.0, 2.0],
            vector![0.4, 0.1],
            CollisionLayer::Ground,
            None,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_probe_filters_by_layer() {
        let (world, _) = world_with_floor();
        let hit = world.probe_circle(vector![0.0, 0.5], 0.2, CollisionLayer::Hazard, None);
        assert!(hit.is_none());
    }

    #[test]
    fn test_degenerate_probe_is_a_miss() {
        let (world, _) = world_with_floor();
        assert!(world
            .probe_circle(vector![0.0, 0.5], 0.0, CollisionLayer::Ground, None)
            .is_none());
        assert!(world
            .probe_box(vector![0.0, 0.5], vector![0.0, 1.0], CollisionLayer::Ground, None)
            .is_none());
    }

    #[test]
    fn test_dynamic_body_falls() {
        let mut world = PhysicsWorld::new();
        let body = world.add_rigid_body(presets::player_body(0.0, 10.0));
        world.add_collider(presets::player_collider(1.0, 2.0), body);
        for _ in 0..10 {
            world.step();
        }
        let y = world.get_rigid_body(body).map(|b| b.translation().y);
        assert!(y.is_some_and(|y| y < 10.0));
    }
}
