//! One play session: terrain, the player, summoned vehicles and the fixed-step loop.

use std::time::Duration;

use engine_core::{Entity, Time, Transform, Vec3, World};
use hover::attitude::{yaw_basis, yaw_of};
use hover::{HoverController, HoverInput, HoverTelemetry, VehicleId, VehicleRegistry};
use input::{HoverBindings, InputState, VehicleCommand};
use physics::{PhysicsBody, PhysicsWorld, RapierVehicle};

use crate::config::GameConfig;
use crate::mobility::{Equipment, MovementModifiers};
use crate::player::{spawn_player, update_player};
use crate::seat::{follow_vehicle, SeatRig};
use crate::speed_zones::{SpeedZones, ZoneEvent};
use crate::terrain::Terrain;

/// Vehicle collider half extents.
const POD_HALF_EXTENTS: Vec3 = Vec3::new(0.8, 0.3, 1.2);
/// How close the player must stand to climb aboard.
const MOUNT_RANGE: f32 = 5.0;
const VIEW_SENSITIVITY: f32 = 0.003;

pub struct Session {
    pub config: GameConfig,
    pub world: World,
    pub physics: PhysicsWorld,
    pub terrain: Terrain,
    pub time: Time,
    pub input: InputState,
    pub bindings: HoverBindings,
    pub modifiers: MovementModifiers,
    pub zones: SpeedZones,
    pub vehicles: VehicleRegistry<Entity, PhysicsBody>,
    player: Entity,
    view_yaw: f32,
    hover_input: HoverInput,
    last_telemetry: Option<HoverTelemetry>,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        let config = config.validated();

        let mut time = Time::new();
        time.set_fixed_rate(config.fixed_rate);

        let mut physics = PhysicsWorld::new();
        physics.set_timestep(time.fixed_timestep_seconds());

        let terrain = Terrain::generate(config.terrain.clone(), config.seed);
        if terrain.add_to_physics(&mut physics).is_none() {
            log::warn!("Terrain has no collider; vehicles will find no ground");
        }
        physics.update_query_pipeline();

        let mut world = World::new();
        let player = spawn_player(&mut world, terrain.surface_point(0.0, 0.0));

        let mut modifiers = MovementModifiers::new();
        if config.enable_equipment {
            for item in Equipment::ALL {
                item.equip(&mut modifiers);
            }
        }

        let mut zones = SpeedZones::new();
        if config.enable_speed_zones {
            zones.create(
                "route",
                terrain.surface_point(0.0, -20.0),
                6.0,
                config.speed_boost_multiplier,
                &mut modifiers,
            );
        }

        log::info!(
            "Session ready: seed {}, {} Hz, terrain {} units",
            config.seed,
            config.fixed_rate,
            terrain.config.size
        );

        Self {
            config,
            world,
            physics,
            terrain,
            time,
            input: InputState::new(),
            bindings: HoverBindings::default(),
            modifiers,
            zones,
            vehicles: VehicleRegistry::new(),
            player,
            view_yaw: 0.0,
            hover_input: HoverInput::default(),
            last_telemetry: None,
        }
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn player_transform(&self) -> Transform {
        self.world
            .get::<&Transform>(self.player)
            .map(|t| *t)
            .unwrap_or_default()
    }

    pub fn active_vehicle(&self) -> Option<VehicleId> {
        self.vehicles.active()
    }

    pub fn is_player_mounted(&self) -> bool {
        self.active_vehicle()
            .and_then(|id| self.vehicles.get(id))
            .is_some_and(|entry| entry.controller.rider() == Some(self.player))
    }

    pub fn vehicle_transform(&self, id: VehicleId) -> Option<Transform> {
        let entry = self.vehicles.get(id)?;
        self.physics.get_body_transform(entry.body.rigid_body)
    }

    pub fn last_telemetry(&self) -> Option<HoverTelemetry> {
        self.last_telemetry
    }

    /// Run one rendered frame of `delta`: commands, on-foot movement, zones,
    /// then as many fixed physics steps as the accumulator allows.
    pub fn frame(&mut self, delta: Duration) {
        self.time.advance(delta);
        let dt = self.time.delta_seconds();

        for command in self.bindings.commands(&self.input) {
            self.handle_command(command);
        }

        let mounted = self.is_player_mounted();
        if mounted {
            self.view_yaw -= self.input.mouse_delta().x * VIEW_SENSITIVITY;
        }
        let terrain = &self.terrain;
        update_player(&mut self.world, &self.input, &self.modifiers, dt, |x, z| {
            terrain.height_at(x, z)
        });
        if !mounted {
            self.view_yaw = yaw_of(self.player_transform().rotation);
        }

        // Latest sample; ticks read it when they run
        let (view_forward, _) = yaw_basis(self.view_yaw);
        self.hover_input = self.bindings.sample(&self.input, Some(view_forward));

        while self.time.should_fixed_update() {
            self.fixed_step();
        }

        let position = self.player_transform().position;
        for event in self.zones.update(position, &mut self.modifiers) {
            match event {
                ZoneEvent::Entered(id) => log::info!("Entered speed zone {}", id),
                ZoneEvent::Exited(id) => log::info!("Left speed zone {}", id),
            }
        }

        self.input.begin_frame();
    }

    fn fixed_step(&mut self) {
        let dt = self.time.fixed_timestep_seconds();
        for (_, entry) in self.vehicles.iter_mut() {
            let input = if entry.controller.rider() == Some(self.player) {
                self.hover_input
            } else {
                HoverInput::default()
            };
            if let Some(mut vehicle) = RapierVehicle::new(&mut self.physics, entry.body.rigid_body) {
                let telemetry = entry.controller.tick(dt, &mut vehicle, &input);
                self.last_telemetry = Some(telemetry);
            }
        }

        self.physics.step();

        for (id, entry) in self.vehicles.iter_mut() {
            if let Some(frame) = self.physics.get_body_transform(entry.body.rigid_body) {
                follow_vehicle(&mut self.world, id, &frame);
            }
        }
    }

    pub fn handle_command(&mut self, command: VehicleCommand) {
        match command {
            VehicleCommand::ToggleSummon => match self.active_vehicle() {
                Some(id) => self.dismiss(id),
                None => {
                    self.summon();
                }
            },
            VehicleCommand::ToggleMount => {
                if self.is_player_mounted() {
                    self.dismount();
                } else {
                    self.mount();
                }
            }
            VehicleCommand::Recall => self.recall(),
        }
    }

    /// Spawn a vehicle in front of the player.
    pub fn summon(&mut self) -> Option<VehicleId> {
        let tuning = self.config.hover;
        let player = self.player_transform();
        let heading = yaw_of(player.rotation);
        let (forward, _) = yaw_basis(heading);
        let spot = player.position + forward * tuning.recall_distance;
        let ground = self.terrain.height_at(spot.x, spot.z);
        let position = Vec3::new(spot.x, ground + tuning.default_hover_height, spot.z);

        let body = self.physics.add_hover_body(position, POD_HALF_EXTENTS, &tuning);
        let controller = HoverController::new(tuning).with_heading(heading);
        match self.vehicles.summon(controller, body) {
            Ok(id) => {
                self.physics.update_query_pipeline();
                Some(id)
            }
            Err(e) => {
                log::info!("Summon refused: {}", e);
                self.physics.remove_body(body.rigid_body);
                None
            }
        }
    }

    /// Tear a vehicle down, putting any rider back on the ground first.
    pub fn dismiss(&mut self, id: VehicleId) {
        let mut entry = match self.vehicles.dismiss(id) {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("{}", e);
                return;
            }
        };
        if let Some(vehicle) = RapierVehicle::new(&mut self.physics, entry.body.rigid_body) {
            let mut rig = SeatRig::new(&mut self.world, id);
            entry.controller.release(&vehicle, &mut rig);
        }
        self.physics.remove_body(entry.body.rigid_body);
        self.physics.update_query_pipeline();
    }

    pub fn mount(&mut self) -> bool {
        let Some(id) = self.active_vehicle() else {
            log::debug!("Nothing to mount");
            return false;
        };
        let Some(vehicle_position) = self.vehicle_transform(id).map(|t| t.position) else {
            return false;
        };
        if self.player_transform().position.distance(vehicle_position) > MOUNT_RANGE {
            log::debug!("Too far from {} to mount", id);
            return false;
        }
        let player = self.player;
        let Some(entry) = self.vehicles.get_mut(id) else {
            return false;
        };
        let mut rig = SeatRig::new(&mut self.world, id);
        entry.controller.mount(player, &mut rig)
    }

    pub fn dismount(&mut self) -> bool {
        let Some(id) = self.active_vehicle() else {
            return false;
        };
        let Some(entry) = self.vehicles.get_mut(id) else {
            return false;
        };
        let Some(vehicle) = RapierVehicle::new(&mut self.physics, entry.body.rigid_body) else {
            return false;
        };
        let mut rig = SeatRig::new(&mut self.world, id);
        entry.controller.dismount(&vehicle, &mut rig)
    }

    pub fn recall(&mut self) {
        let Some(id) = self.active_vehicle() else {
            log::debug!("Nothing to recall");
            return;
        };
        let player = self.player_transform();
        let Some(entry) = self.vehicles.get_mut(id) else {
            return;
        };
        if let Some(mut vehicle) = RapierVehicle::new(&mut self.physics, entry.body.rigid_body) {
            entry
                .controller
                .recall_to_player(&mut vehicle, player.position, player.flat_forward());
        }
    }

    /// Dismiss every vehicle. Call before dropping the session.
    pub fn shutdown(&mut self) {
        while let Some(id) = self.active_vehicle() {
            self.dismiss(id);
        }
        self.zones.clear(&mut self.modifiers);
        log::info!("Session finished after {:.1}s", self.time.elapsed_seconds());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{Locomotion, Seated};
    use input::{ElementState, KeyCode};

    fn session() -> Session {
        let mut config = GameConfig::default();
        config.terrain.size = 64.0;
        config.terrain.resolution = 33;
        config.seed = 7;
        Session::new(config)
    }

    fn run(session: &mut Session, seconds: f32) {
        let frames = (seconds / 0.02).round() as usize;
        for _ in 0..frames {
            session.frame(Duration::from_millis(20));
        }
    }

    fn press(session: &mut Session, key: KeyCode) {
        session.input.process_keyboard(key, ElementState::Pressed);
    }

    fn release(session: &mut Session, key: KeyCode) {
        session.input.process_keyboard(key, ElementState::Released);
    }

    #[test]
    fn summon_is_limited_to_one_vehicle() {
        let mut s = session();
        let first = s.summon().unwrap();
        assert!(s.summon().is_none());
        assert_eq!(s.vehicles.len(), 1);
        assert_eq!(s.physics.rigid_body_set.len(), 1);
        assert_eq!(s.active_vehicle(), Some(first));
    }

    #[test]
    fn summoned_vehicle_hovers_over_terrain() {
        let mut s = session();
        let id = s.summon().unwrap();
        run(&mut s, 6.0);
        let pos = s.vehicle_transform(id).unwrap().position;
        let clearance = pos.y - s.terrain.height_at(pos.x, pos.z);
        assert!((clearance - 2.0).abs() < 0.5, "clearance {}", clearance);
    }

    #[test]
    fn keys_drive_summon_mount_and_dismount() {
        let mut s = session();
        press(&mut s, KeyCode::KeyV);
        s.frame(Duration::from_millis(20));
        release(&mut s, KeyCode::KeyV);
        assert!(s.active_vehicle().is_some());

        press(&mut s, KeyCode::KeyF);
        s.frame(Duration::from_millis(20));
        release(&mut s, KeyCode::KeyF);
        assert!(s.is_player_mounted());
        let player = s.player();
        assert!(!s.world.get::<&Locomotion>(player).unwrap().enabled);
        assert!(s.world.get::<&Seated>(player).is_ok());

        press(&mut s, KeyCode::KeyW);
        run(&mut s, 1.0);
        release(&mut s, KeyCode::KeyW);
        let t = s.last_telemetry().unwrap();
        assert!(t.pitch.abs() <= s.config.hover.max_pitch() + 1e-4);
        assert!(s.player_transform().position.z < -5.0);

        press(&mut s, KeyCode::KeyF);
        s.frame(Duration::from_millis(20));
        release(&mut s, KeyCode::KeyF);
        assert!(!s.is_player_mounted());
        assert!(s.world.get::<&Locomotion>(player).unwrap().enabled);
        assert!(s.world.get::<&Seated>(player).is_err());
    }

    #[test]
    fn dismissing_a_ridden_vehicle_drops_the_rider() {
        let mut s = session();
        let id = s.summon().unwrap();
        assert!(s.mount());
        s.dismiss(id);
        assert!(s.active_vehicle().is_none());
        assert!(s.physics.rigid_body_set.is_empty());
        let player = s.player();
        assert!(s.world.get::<&Locomotion>(player).unwrap().enabled);
        assert!(s.world.get::<&Seated>(player).is_err());
    }

    #[test]
    fn recall_brings_the_idle_vehicle_back() {
        let mut s = session();
        let id = s.summon().unwrap();
        press(&mut s, KeyCode::KeyS);
        run(&mut s, 3.0);
        release(&mut s, KeyCode::KeyS);
        let player = s.player_transform().position;
        assert!(s.vehicle_transform(id).unwrap().position.distance(player) > 10.0);

        s.recall();
        let pos = s.vehicle_transform(id).unwrap().position;
        let flat = Vec3::new(pos.x - player.x, 0.0, pos.z - player.z);
        assert!((flat.length() - s.config.hover.recall_distance).abs() < 1e-3);
    }

    #[test]
    fn mount_out_of_range_is_refused() {
        let mut s = session();
        let id = s.summon().unwrap();
        let pod = s.vehicle_transform(id).unwrap().position;
        let player = s.player();
        s.world.get::<&mut Transform>(player).unwrap().position = pod + Vec3::new(20.0, 0.0, 0.0);
        assert!(!s.mount());
        assert!(!s.is_player_mounted());
    }

    #[test]
    fn shutdown_releases_everything() {
        let mut s = session();
        s.summon().unwrap();
        s.mount();
        s.shutdown();
        assert!(s.vehicles.is_empty());
        assert!(!s.is_player_mounted());
    }
}
