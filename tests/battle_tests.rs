use tank_battle::game::battle::{
    Battle,
    BattleConfig,
    BoundaryPolicy,
    ControlState,
    CullPolicy,
    Entity,
    FireRule,
    LifeStatus,
    PLAYER_START,
};
use tank_battle::game::math::Vector2F;

/// No boundaries, silent opponent. Keeps movement assertions exact and the
/// bullet sequences under the test's control.
fn open_arena_config() -> BattleConfig {
    BattleConfig {
        player_boundary: BoundaryPolicy::None,
        auto_boundary: BoundaryPolicy::None,
        auto_fire_rule: FireRule::Chance(0.0),
        ..Default::default()
    }
}

fn all_inputs() -> ControlState {
    ControlState { left: true, right: true, up: true, down: true, fire: true }
}

// ── movement ─────────────────────────────────────────────────────────────────

#[test]
fn single_direction_displacement_is_speed_times_dt() {
    let mut battle = Battle::from_seed(open_arena_config(), 1);
    let delta_time = 0.25;
    let expected_x = PLAYER_START.x + battle.config().tank_speed * delta_time;

    let input = ControlState { right: true, ..Default::default() };
    battle.tick(&input, delta_time);

    assert_eq!(battle.player.entity.position.x, expected_x);
    assert_eq!(battle.player.entity.position.y, PLAYER_START.y);
}

#[test]
fn opposite_inputs_cancel_out() {
    let mut battle = Battle::from_seed(open_arena_config(), 1);
    let input = ControlState { left: true, right: true, ..Default::default() };
    battle.tick(&input, 0.5);
    assert_eq!(battle.player.entity.position, PLAYER_START);
}

#[test]
fn diagonal_movement_composes_additively() {
    let mut battle = Battle::from_seed(open_arena_config(), 1);
    let delta_time = 0.1;
    let step = battle.config().tank_speed * delta_time;
    let expected = Vector2F::new(PLAYER_START.x + step, PLAYER_START.y + step);

    let input = ControlState { right: true, up: true, ..Default::default() };
    battle.tick(&input, delta_time);

    // Diagonal speed exceeds axis speed, no normalization
    assert_eq!(battle.player.entity.position, expected);
}

#[test]
fn zero_delta_time_moves_nothing() {
    let mut battle = Battle::from_seed(open_arena_config(), 1);
    let opponent_start = battle.opponent.entity.position;
    battle.tick(&all_inputs(), 0.0);
    assert_eq!(battle.player.entity.position, PLAYER_START);
    assert_eq!(battle.opponent.entity.position, opponent_start);
}

#[test]
fn automated_tank_moves_horizontally_only() {
    let mut battle = Battle::from_seed(BattleConfig::default(), 3);
    let start = battle.opponent.entity.position;
    for _ in 0..1000 {
        battle.tick(&ControlState::default(), 0.016);
        assert_eq!(battle.opponent.entity.position.y, start.y);
        assert!(battle.opponent.entity.position.x.abs() <= 0.85);
    }
}

// ── boundary clamp ───────────────────────────────────────────────────────────

#[test]
fn clamp_holds_at_left_boundary() {
    let mut battle = Battle::from_seed(BattleConfig::default(), 1);
    battle.player.entity.position.x = -0.85;

    let input = ControlState { left: true, ..Default::default() };
    battle.tick(&input, 0.1);

    assert_eq!(battle.player.entity.position.x, -0.85);
}

#[test]
fn clamp_is_never_exceeded() {
    let mut battle = Battle::from_seed(BattleConfig::default(), 1);
    let inputs = [
        ControlState { left: true, down: true, ..Default::default() },
        ControlState { right: true, up: true, ..Default::default() },
        ControlState { left: true, up: true, ..Default::default() },
        ControlState { right: true, down: true, ..Default::default() },
    ];
    for step in 0..200usize {
        battle.tick(&inputs[step % inputs.len()], 1.5);
        let position = battle.player.entity.position;
        assert!((-0.85..=0.85).contains(&position.x), "x out of bounds: {position}");
        assert!((-0.9..=0.7).contains(&position.y), "y out of bounds: {position}");
    }
}

#[test]
fn unclamped_tank_leaves_the_arena() {
    let mut battle = Battle::from_seed(open_arena_config(), 1);
    let input = ControlState { left: true, ..Default::default() };
    for _ in 0..10 {
        battle.tick(&input, 1.0);
    }
    assert!(battle.player.entity.position.x < -1.0);
}

// ── destroyed tanks ──────────────────────────────────────────────────────────

#[test]
fn destroyed_tank_ignores_input_and_fire() {
    let mut battle = Battle::from_seed(open_arena_config(), 1);
    battle.player.entity.status = LifeStatus::Destroyed;

    battle.tick(&all_inputs(), 0.5);

    assert_eq!(battle.player.entity.position, PLAYER_START);
    assert!(battle.player_bullets.is_empty());
}

#[test]
fn destroyed_automated_tank_stops_moving_and_firing() {
    let config = BattleConfig {
        auto_fire_rule: FireRule::EveryTick,
        latched_fire: false,
        ..open_arena_config()
    };
    let mut battle = Battle::from_seed(config, 1);
    battle.opponent.entity.status = LifeStatus::Destroyed;
    let start = battle.opponent.entity.position;

    for _ in 0..10 {
        battle.tick(&ControlState::default(), 0.1);
    }

    assert_eq!(battle.opponent.entity.position, start);
    assert!(battle.opponent_bullets.is_empty());
}

// ── collision ────────────────────────────────────────────────────────────────

#[test]
fn edge_touching_boxes_do_not_collide() {
    let tank = Entity::new(Vector2F::zero(), Vector2F::new(0.2, 0.2));
    let bullet_right = Entity::new(Vector2F::new(0.2, 0.0), Vector2F::new(0.05, 0.05));
    let bullet_above = Entity::new(Vector2F::new(0.0, 0.2), Vector2F::new(0.05, 0.05));
    assert!(!tank.overlaps(&bullet_right));
    assert!(!tank.overlaps(&bullet_above));

    let bullet_inside = Entity::new(Vector2F::new(0.19, 0.19), Vector2F::new(0.05, 0.05));
    assert!(tank.overlaps(&bullet_inside));
}

#[test]
fn overlap_at_spawn_is_detected_same_tick() {
    let mut battle = Battle::from_seed(open_arena_config(), 1);
    battle.player.entity.position = Vector2F::zero();
    battle.opponent.entity.position = Vector2F::zero();

    let input = ControlState { fire: true, ..Default::default() };
    battle.tick(&input, 0.0);

    assert_eq!(battle.opponent.entity.status, LifeStatus::Destroyed);
}

#[test]
fn destruction_is_idempotent() {
    let mut battle = Battle::from_seed(open_arena_config(), 1);
    battle.player.entity.position = Vector2F::zero();
    battle.opponent.entity.position = Vector2F::zero();

    let input = ControlState { fire: true, ..Default::default() };
    battle.tick(&input, 0.0);
    assert_eq!(battle.opponent.entity.status, LifeStatus::Destroyed);
    let position = battle.opponent.entity.position;
    let bullets = battle.player_bullets.len();

    // The still-overlapping bullet re-hits on following ticks, nothing changes
    for _ in 0..5 {
        battle.tick(&input, 0.0);
        assert_eq!(battle.opponent.entity.status, LifeStatus::Destroyed);
        assert_eq!(battle.opponent.entity.position, position);
        assert_eq!(battle.player_bullets.len(), bullets);
    }
}

// ── fire control ─────────────────────────────────────────────────────────────

#[test]
fn latch_admits_exactly_one_bullet() {
    let mut battle = Battle::from_seed(open_arena_config(), 1);
    let input = ControlState { fire: true, ..Default::default() };

    battle.tick(&input, 0.016);
    battle.tick(&input, 0.016);

    assert_eq!(battle.player_bullets.len(), 1);
    assert!(battle.player.has_fired());
}

#[test]
fn unlatched_tank_fires_every_tick() {
    let config = BattleConfig { latched_fire: false, ..open_arena_config() };
    let mut battle = Battle::from_seed(config, 1);
    let input = ControlState { fire: true, ..Default::default() };

    for _ in 0..5 {
        battle.tick(&input, 0.016);
    }

    // No culling, the sequence only ever grows
    assert_eq!(battle.player_bullets.len(), 5);
}

#[test]
fn bullet_spawns_at_tank_position_with_bullet_size() {
    let mut battle = Battle::from_seed(open_arena_config(), 1);
    let input = ControlState { fire: true, ..Default::default() };
    battle.tick(&input, 0.0);

    let bullet = &battle.player_bullets[0];
    assert_eq!(bullet.position, battle.player.entity.position);
    assert_eq!(bullet.size, battle.config().bullet_size);
}

#[test]
fn seeded_fire_chance_hits_statistical_band() {
    let config = BattleConfig {
        latched_fire: false,
        auto_fire_rule: FireRule::Chance(0.05),
        ..BattleConfig::default()
    };
    let mut battle = Battle::from_seed(config, 42);

    let ticks = 50_000;
    for _ in 0..ticks {
        battle.tick(&ControlState::default(), 0.0);
    }

    // Binomial(50_000, 0.05): mean 2500, sigma ~48.7. The band below is
    // roughly four sigmas wide on each side.
    let fired = battle.opponent_bullets.len();
    assert!(
        (2300..=2700).contains(&fired),
        "fired count {fired} outside expected band"
    );
}

// ── bullet update and culling ────────────────────────────────────────────────

#[test]
fn bullets_of_both_sides_travel_up() {
    let config = BattleConfig {
        latched_fire: false,
        auto_fire_rule: FireRule::EveryTick,
        ..open_arena_config()
    };
    let mut battle = Battle::from_seed(config, 1);
    let input = ControlState { fire: true, ..Default::default() };

    battle.tick(&input, 0.0);
    let player_bullet_y = battle.player_bullets[0].position.y;
    let opponent_bullet_y = battle.opponent_bullets[0].position.y;

    battle.tick(&ControlState::default(), 0.1);
    let step = battle.config().bullet_speed * 0.1;
    assert_eq!(battle.player_bullets[0].position.y, player_bullet_y + step);
    assert_eq!(battle.opponent_bullets[0].position.y, opponent_bullet_y + step);
}

#[test]
fn bullets_are_kept_forever_by_default() {
    let mut battle = Battle::from_seed(open_arena_config(), 1);
    let input = ControlState { fire: true, ..Default::default() };
    battle.tick(&input, 0.0);

    // Push the bullet far off-screen
    battle.tick(&ControlState::default(), 5.0);

    assert_eq!(battle.player_bullets.len(), 1);
    assert!(battle.player_bullets[0].position.y > 1.0);
}

#[test]
fn culling_removes_offscreen_bullets() {
    let config = BattleConfig { cull_policy: CullPolicy::OffscreenAndSpent, ..open_arena_config() };
    let mut battle = Battle::from_seed(config, 1);
    let input = ControlState { fire: true, ..Default::default() };
    battle.tick(&input, 0.0);
    assert_eq!(battle.player_bullets.len(), 1);

    battle.tick(&ControlState::default(), 5.0);
    assert!(battle.player_bullets.is_empty());
}

#[test]
fn culling_removes_spent_bullets() {
    let config = BattleConfig { cull_policy: CullPolicy::OffscreenAndSpent, ..open_arena_config() };
    let mut battle = Battle::from_seed(config, 1);
    battle.player.entity.position = Vector2F::zero();
    battle.opponent.entity.position = Vector2F::zero();

    let input = ControlState { fire: true, ..Default::default() };
    battle.tick(&input, 0.0);

    assert_eq!(battle.opponent.entity.status, LifeStatus::Destroyed);
    assert!(battle.player_bullets.is_empty());
}
