use super::math::{
    Rect2F,
    Vector2F
};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const TANK_SIZE: Vector2F = Vector2F { x: 0.2, y: 0.2 };
pub const BULLET_SIZE: Vector2F = Vector2F { x: 0.05, y: 0.05 };
pub const TANK_SPEED: f32 = 0.5;
pub const BULLET_SPEED: f32 = 1.0;
pub const BOUNDARY_LIMIT: f32 = 0.85;
pub const AUTO_FIRE_CHANCE: f32 = 0.05;

pub const PLAYER_START: Vector2F = Vector2F { x: -0.5, y: -0.9 };
pub const OPPONENT_START: Vector2F = Vector2F { x: 0.5, y: 0.9 };

/// Opaque reference to a GPU-resident image. Owned and interpreted by the
/// rendering side, the update step only carries it around.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LifeStatus {
    Alive,
    Destroyed,
}

/// A positioned, sized game object: tank, weapon or bullet.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub position: Vector2F,
    pub size: Vector2F,
    pub angle: f32,
    pub facing: Vector2F,
    pub status: LifeStatus,
    pub texture: Option<TextureHandle>,
}

impl Entity {
    pub fn new(position: Vector2F, size: Vector2F) -> Self {
        debug_assert!(size.x > 0.0 && size.y > 0.0);
        Self {
            position,
            size,
            angle: 0.0,
            facing: Vector2F::new(1.0, 0.0),
            status: LifeStatus::Alive,
            texture: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == LifeStatus::Alive
    }

    /// Collision box: position is the lower-left corner.
    pub fn bounds(&self) -> Rect2F {
        Rect2F { pos: self.position, size: self.size }
    }

    pub fn overlaps(&self, other: &Entity) -> bool {
        self.bounds().intersects(&other.bounds())
    }
}

/// Per-tank fire latch. Goes `Ready -> Shot` on the first bullet and is
/// never reset, later fire requests are silently dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShotLatch {
    Ready,
    Shot,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FireRule {
    /// Fire on every tick the tank is alive.
    EveryTick,
    /// Independent per-tick fire probability.
    Chance(f32),
}

#[derive(Debug)]
pub struct AutoController {
    pub fire_rule: FireRule,
}

#[derive(Debug)]
pub struct PlayerController;

#[derive(Debug)]
pub enum TankController {
    Player(PlayerController),
    Auto(AutoController),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BoundaryPolicy {
    None,
    Clamp { min: Vector2F, max: Vector2F },
}

impl BoundaryPolicy {
    pub fn apply(&self, position: Vector2F) -> Vector2F {
        match self {
            BoundaryPolicy::None => position,
            BoundaryPolicy::Clamp { min, max } => Vector2F::new(
                position.x.clamp(min.x, max.x),
                position.y.clamp(min.y, max.y),
            ),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CullPolicy {
    /// Bullets are never removed, the sequences grow for the process
    /// lifetime. Matches the original demo.
    Never,
    /// Remove bullets that scrolled out of the arena or already hit a tank.
    OffscreenAndSpent,
}

#[derive(Debug)]
pub struct Tank {
    pub entity: Entity,
    pub weapon: Option<Entity>,
    pub controller: TankController,
    pub boundary: BoundaryPolicy,
    pub latch: Option<ShotLatch>,
}

impl Tank {
    fn new(
        position: Vector2F,
        config: &BattleConfig,
        controller: TankController,
        boundary: BoundaryPolicy,
    ) -> Self {
        let entity = Entity::new(position, config.tank_size);
        let weapon = config.weapons.then(|| Entity::new(position, config.tank_size * 0.5));
        Self {
            entity,
            weapon,
            controller,
            boundary,
            latch: config.latched_fire.then_some(ShotLatch::Ready),
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.controller, TankController::Player(_))
    }

    pub fn has_fired(&self) -> bool {
        self.latch == Some(ShotLatch::Shot)
    }

    fn sync_weapon(&mut self) {
        if let Some(weapon) = self.weapon.as_mut() {
            weapon.position = self.entity.position;
        }
    }
}

/// Key-down snapshot of the player controls for one tick.
#[derive(Debug, Default, Copy, Clone)]
pub struct ControlState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

#[derive(Debug, Copy, Clone)]
pub struct BattleConfig {
    pub tank_speed: f32,
    pub bullet_speed: f32,
    pub tank_size: Vector2F,
    pub bullet_size: Vector2F,
    pub player_boundary: BoundaryPolicy,
    pub auto_boundary: BoundaryPolicy,
    pub latched_fire: bool,
    pub auto_fire_rule: FireRule,
    pub weapons: bool,
    pub cull_policy: CullPolicy,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            tank_speed: TANK_SPEED,
            bullet_speed: BULLET_SPEED,
            tank_size: TANK_SIZE,
            bullet_size: BULLET_SIZE,
            player_boundary: BoundaryPolicy::Clamp {
                min: Vector2F { x: -BOUNDARY_LIMIT, y: -0.9 },
                max: Vector2F { x: BOUNDARY_LIMIT, y: 0.7 },
            },
            auto_boundary: BoundaryPolicy::Clamp {
                min: Vector2F { x: -BOUNDARY_LIMIT, y: -1.0 },
                max: Vector2F { x: BOUNDARY_LIMIT, y: 1.0 },
            },
            latched_fire: true,
            auto_fire_rule: FireRule::Chance(AUTO_FIRE_CHANCE),
            weapons: true,
            cull_policy: CullPolicy::Never,
        }
    }
}

/// Complete game state of one match: two tanks and their bullet sequences.
/// Owned by the frame loop and advanced by [`Battle::tick`].
#[derive(Debug)]
pub struct Battle {
    pub player: Tank,
    pub opponent: Tank,
    pub player_bullets: Vec<Entity>,
    pub opponent_bullets: Vec<Entity>,
    config: BattleConfig,
    rng: StdRng,
}

impl Battle {
    pub fn new(config: BattleConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic battle for tests and replays.
    pub fn from_seed(config: BattleConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: BattleConfig, rng: StdRng) -> Self {
        log::info!("Battle created");
        let player = Tank::new(
            PLAYER_START,
            &config,
            TankController::Player(PlayerController),
            config.player_boundary,
        );
        let opponent = Tank::new(
            OPPONENT_START,
            &config,
            TankController::Auto(AutoController { fire_rule: config.auto_fire_rule }),
            config.auto_boundary,
        );
        Self {
            player,
            opponent,
            player_bullets: vec![],
            opponent_bullets: vec![],
            config,
            rng,
        }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Advances the whole game state by one frame: control and fire for
    /// both tanks, bullet movement, collision resolution, weapon sync.
    pub fn tick(&mut self, input: &ControlState, delta_time: f32) {
        log::trace!("Battle tick, dt={delta_time}");
        debug_assert!(delta_time >= 0.0);

        self.update_player(input, delta_time);
        self.update_automated(delta_time);

        let bullet_step = self.config.bullet_speed * delta_time;
        Self::advance_bullets(&mut self.player_bullets, bullet_step);
        Self::advance_bullets(&mut self.opponent_bullets, bullet_step);

        Self::resolve_hits(&mut self.opponent, &mut self.player_bullets, self.config.cull_policy);
        Self::resolve_hits(&mut self.player, &mut self.opponent_bullets, self.config.cull_policy);

        if self.config.cull_policy == CullPolicy::OffscreenAndSpent {
            Self::cull_bullets(&mut self.player_bullets);
            Self::cull_bullets(&mut self.opponent_bullets);
        }

        self.player.sync_weapon();
        self.opponent.sync_weapon();
    }

    fn update_player(&mut self, input: &ControlState, delta_time: f32) {
        let tank = &mut self.player;
        if !tank.entity.is_alive() {
            return;
        }

        // Axis inputs compose additively, diagonal speed is not normalized.
        let step = self.config.tank_speed * delta_time;
        if input.left {
            tank.entity.position.x -= step;
        }
        if input.right {
            tank.entity.position.x += step;
        }
        if input.up {
            tank.entity.position.y += step;
        }
        if input.down {
            tank.entity.position.y -= step;
        }
        tank.entity.position = tank.boundary.apply(tank.entity.position);

        if input.fire {
            Self::try_fire(tank, &mut self.player_bullets, self.config.bullet_size);
        }
    }

    fn update_automated(&mut self, delta_time: f32) {
        let tank = &mut self.opponent;
        if !tank.entity.is_alive() {
            return;
        }

        // Heading is re-rolled every single tick, the jitter is intended.
        let direction = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        tank.entity.position.x += self.config.tank_speed * delta_time * direction;
        tank.entity.position = tank.boundary.apply(tank.entity.position);

        let wants_fire = match &tank.controller {
            TankController::Auto(controller) => match controller.fire_rule {
                FireRule::EveryTick => true,
                FireRule::Chance(chance) => {
                    self.rng.random_bool(f64::from(chance).clamp(0.0, 1.0))
                }
            },
            TankController::Player(_) => false,
        };
        if wants_fire {
            Self::try_fire(tank, &mut self.opponent_bullets, self.config.bullet_size);
        }
    }

    fn try_fire(tank: &mut Tank, bullets: &mut Vec<Entity>, bullet_size: Vector2F) {
        if tank.latch == Some(ShotLatch::Shot) {
            log::debug!("Fire request from {} dropped, latch already spent", tank.entity.position);
            return;
        }

        let mut bullet = Entity::new(tank.entity.position, bullet_size);
        bullet.texture = tank.entity.texture;
        bullets.push(bullet);

        if let Some(latch) = tank.latch.as_mut() {
            *latch = ShotLatch::Shot;
        }
        log::debug!("Bullet fired from {}", tank.entity.position);
    }

    // Both sequences travel towards +y, the demo never flips the sign for
    // the opposing side.
    fn advance_bullets(bullets: &mut [Entity], step: f32) {
        for bullet in bullets.iter_mut() {
            bullet.position.y += step;
        }
    }

    fn resolve_hits(tank: &mut Tank, bullets: &mut [Entity], cull_policy: CullPolicy) {
        for bullet in bullets.iter_mut() {
            if tank.entity.overlaps(bullet) {
                if tank.entity.is_alive() {
                    log::info!("Tank at {} destroyed", tank.entity.position);
                }
                tank.entity.status = LifeStatus::Destroyed;
                if cull_policy == CullPolicy::OffscreenAndSpent {
                    bullet.status = LifeStatus::Destroyed;
                }
            }
        }
    }

    fn cull_bullets(bullets: &mut Vec<Entity>) {
        bullets.retain(|bullet| {
            bullet.status == LifeStatus::Alive
                && bullet.position.y < 1.0
                && bullet.position.y + bullet.size.y > -1.0
        });
    }

    /// Every drawable entity, destroyed ones included.
    pub fn iter_entities(&self) -> impl Iterator<Item = &Entity> {
        [&self.player, &self.opponent]
            .into_iter()
            .flat_map(|tank| std::iter::once(&tank.entity).chain(tank.weapon.as_ref()))
            .chain(self.player_bullets.iter())
            .chain(self.opponent_bullets.iter())
    }
}

#[test]
fn test_battle_creation() {
    let battle = Battle::from_seed(BattleConfig::default(), 7);
    assert_eq!(battle.player.entity.position, PLAYER_START);
    assert_eq!(battle.opponent.entity.position, OPPONENT_START);
    assert!(battle.player.entity.is_alive());
    assert!(battle.opponent.entity.is_alive());
    assert!(battle.player_bullets.is_empty());
    assert!(battle.opponent_bullets.is_empty());
}

#[test]
fn test_entity_defaults() {
    let entity = Entity::new(Vector2F::zero(), TANK_SIZE);
    assert_eq!(entity.angle, 0.0);
    assert_eq!(entity.facing, Vector2F::new(1.0, 0.0));
    assert_eq!(entity.status, LifeStatus::Alive);
    assert_eq!(entity.texture, None);
}

#[test]
fn test_boundary_clamp() {
    let boundary = BoundaryPolicy::Clamp {
        min: Vector2F::new(-0.85, -0.9),
        max: Vector2F::new(0.85, 0.7),
    };
    assert_eq!(boundary.apply(Vector2F::new(-2.0, 0.0)), Vector2F::new(-0.85, 0.0));
    assert_eq!(boundary.apply(Vector2F::new(0.0, 5.0)), Vector2F::new(0.0, 0.7));
    assert_eq!(boundary.apply(Vector2F::new(0.1, -0.2)), Vector2F::new(0.1, -0.2));
}

#[test]
fn test_boundary_none_is_passthrough() {
    let position = Vector2F::new(42.0, -13.0);
    assert_eq!(BoundaryPolicy::None.apply(position), position);
}

#[test]
fn test_latch_spends_on_first_shot() {
    let mut battle = Battle::from_seed(BattleConfig::default(), 7);
    assert_eq!(battle.player.latch, Some(ShotLatch::Ready));

    let fire = ControlState { fire: true, ..Default::default() };
    battle.tick(&fire, 0.0);
    assert_eq!(battle.player.latch, Some(ShotLatch::Shot));
    assert!(battle.player.has_fired());
    assert_eq!(battle.player_bullets.len(), 1);
}

#[test]
fn test_bullet_inherits_tank_texture() {
    let mut battle = Battle::from_seed(BattleConfig::default(), 7);
    battle.player.entity.texture = Some(TextureHandle(3));

    let fire = ControlState { fire: true, ..Default::default() };
    battle.tick(&fire, 0.0);
    assert_eq!(battle.player_bullets[0].texture, Some(TextureHandle(3)));
    assert_eq!(battle.player_bullets[0].size, BULLET_SIZE);
}

#[test]
fn test_weapon_follows_tank() {
    let mut battle = Battle::from_seed(BattleConfig::default(), 7);
    let input = ControlState { right: true, up: true, ..Default::default() };
    battle.tick(&input, 0.1);
    assert_eq!(
        battle.player.weapon.as_ref().unwrap().position,
        battle.player.entity.position
    );
    assert_eq!(
        battle.opponent.weapon.as_ref().unwrap().position,
        battle.opponent.entity.position
    );
}

#[test]
fn test_destroyed_entities_stay_in_draw_set() {
    let mut battle = Battle::from_seed(BattleConfig::default(), 7);
    battle.opponent.entity.status = LifeStatus::Destroyed;
    // 2 tanks + 2 weapons, destroyed or not
    assert_eq!(battle.iter_entities().count(), 4);
}
