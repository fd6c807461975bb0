use std::path::PathBuf;

use clap::Parser;

use tank_battle::game::battle::{
    Battle,
    BattleConfig,
    BoundaryPolicy,
    CullPolicy,
    FireRule
};

/// # Global Arguments
#[derive(Debug, Parser)]
#[command(version, about = "2D tank battle demo", long_about = None)]
struct Cli {
    /// Seed for the automated tank, random when omitted
    #[arg(short = 's', long = "seed", value_name = "SEED")]
    seed: Option<u64>,

    /// Per-tick fire probability of the automated tank; it fires every tick when omitted
    #[arg(short = 'c', long = "fire-chance", value_name = "CHANCE")]
    fire_chance: Option<f32>,

    /// Allow more than one bullet per tank
    #[arg(long = "unlatched")]
    unlatched: bool,

    /// Let tanks roam outside the arena bounds
    #[arg(long = "no-clamp")]
    no_clamp: bool,

    /// Remove bullets once off-screen or after a hit
    #[arg(long = "cull-bullets")]
    cull_bullets: bool,

    /// Directory holding the sprite textures
    #[arg(short = 'a', long = "assets", value_name = "ASSET_DIR", default_value = "assets")]
    assets: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .format_file(false)
        .format_line_number(true)
        .init();

    let cli_args = Cli::parse();
    log::info!("Got args: '{:?}'.", cli_args);

    let mut config = BattleConfig {
        latched_fire: !cli_args.unlatched,
        ..Default::default()
    };
    config.auto_fire_rule = match cli_args.fire_chance {
        Some(chance) => FireRule::Chance(chance),
        None => FireRule::EveryTick,
    };
    if cli_args.no_clamp {
        config.player_boundary = BoundaryPolicy::None;
        config.auto_boundary = BoundaryPolicy::None;
    }
    if cli_args.cull_bullets {
        config.cull_policy = CullPolicy::OffscreenAndSpent;
    }

    let battle = match cli_args.seed {
        Some(seed) => Battle::from_seed(config, seed),
        None => Battle::new(config),
    };

    tank_battle::app::run(battle, cli_args.assets);
}
