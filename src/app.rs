use std::{
    path::PathBuf,
    sync::Arc,
    time::Instant
};

use winit::{
    application::ApplicationHandler,
    event::{
        ElementState,
        WindowEvent
    },
    event_loop::{
        ActiveEventLoop,
        ControlFlow,
        EventLoop
    },
    keyboard::{Key, NamedKey},
    window::{
        Window,
        WindowId
    }
};

use crate::game::battle::{
    Battle,
    ControlState,
    LifeStatus,
    Tank,
    TextureHandle
};
use crate::rendering::{
    renderer::State,
    Scene,
    SpriteView
};

struct App {
    state: Option<State>,
    battle: Battle,
    input: ControlState,
    last_frame: Option<Instant>,
    asset_dir: PathBuf,
    explosion_texture: Option<TextureHandle>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Create window object
        let window = Arc::new(
            event_loop
                .create_window(Window::default_attributes().with_title("Tank Battle"))
                .unwrap(),
        );

        let mut state = pollster::block_on(State::new(window.clone()));

        let tank_a = state.load_texture(&self.asset_dir.join("tank_a.png"));
        let tank_b = state.load_texture(&self.asset_dir.join("tank_b.png"));
        self.battle.player.entity.texture = Some(tank_a);
        self.battle.opponent.entity.texture = Some(tank_b);

        if let Some(weapon) = self.battle.player.weapon.as_mut() {
            weapon.texture = Some(state.load_texture(&self.asset_dir.join("weapon_a.png")));
        }
        if let Some(weapon) = self.battle.opponent.weapon.as_mut() {
            weapon.texture = Some(state.load_texture(&self.asset_dir.join("weapon_b.png")));
        }

        self.explosion_texture = Some(state.load_texture(&self.asset_dir.join("explosion.png")));

        self.state = Some(state);
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let state = self.state.as_mut().unwrap();
        match event {
            WindowEvent::CloseRequested => {
                log::info!("The close button was pressed; stopping");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = self
                    .last_frame
                    .map(|last| (now - last).as_secs_f32())
                    .unwrap_or(0.0);
                self.last_frame = Some(now);

                self.battle.tick(&self.input, delta_time);

                let scene = build_scene(&self.battle, self.explosion_texture);
                state.render(&scene);

                // Emits a new redraw requested event.
                state.get_window().request_redraw();
            }
            WindowEvent::Resized(size) => {
                // Reconfigures the size of the surface. We do not re-render
                // here as this event is always followed up by redraw request.
                state.resize(size);
            }
            WindowEvent::KeyboardInput { device_id: _, event, is_synthetic: _ } => {
                let pressed = event.state == ElementState::Pressed;
                match &event.logical_key {
                    Key::Named(NamedKey::Escape) => {
                        if pressed {
                            log::info!("Escape pressed; stopping");
                            event_loop.exit();
                        }
                    }
                    Key::Named(NamedKey::ArrowLeft) => self.input.left = pressed,
                    Key::Named(NamedKey::ArrowRight) => self.input.right = pressed,
                    Key::Named(NamedKey::ArrowUp) => self.input.up = pressed,
                    Key::Named(NamedKey::ArrowDown) => self.input.down = pressed,
                    Key::Named(NamedKey::Space) => self.input.fire = pressed,
                    Key::Character(character) => match character.as_str() {
                        "a" | "A" => self.input.left = pressed,
                        "d" | "D" => self.input.right = pressed,
                        "w" | "W" => self.input.up = pressed,
                        "s" | "S" => self.input.down = pressed,
                        _ => {}
                    },
                    _ => {}
                }
            }
            _ => (),
        }
    }
}

// Entities are drawn regardless of life status. A destroyed tank switches
// to the explosion visual, the handle on the entity stays untouched.
fn build_scene(battle: &Battle, explosion_texture: Option<TextureHandle>) -> Scene {
    let mut scene = Scene::default();
    push_tank_sprites(&mut scene, &battle.player, explosion_texture);
    push_tank_sprites(&mut scene, &battle.opponent, explosion_texture);

    for bullet in battle.player_bullets.iter().chain(battle.opponent_bullets.iter()) {
        scene.sprites.push(SpriteView {
            position: bullet.position,
            size: bullet.size,
            angle: bullet.angle,
            texture: bullet.texture,
        });
    }
    scene
}

fn push_tank_sprites(scene: &mut Scene, tank: &Tank, explosion_texture: Option<TextureHandle>) {
    let texture = match tank.entity.status {
        LifeStatus::Alive => tank.entity.texture,
        LifeStatus::Destroyed => explosion_texture.or(tank.entity.texture),
    };
    scene.sprites.push(SpriteView {
        position: tank.entity.position,
        size: tank.entity.size,
        angle: tank.entity.angle,
        texture,
    });
    if let Some(weapon) = tank.weapon.as_ref() {
        scene.sprites.push(SpriteView {
            position: weapon.position,
            size: weapon.size,
            angle: weapon.angle,
            texture: weapon.texture,
        });
    }
}

pub fn run(battle: Battle, asset_dir: PathBuf) {
    let event_loop = EventLoop::new().unwrap();

    // When the current loop iteration finishes, immediately begin a new
    // iteration regardless of whether or not new events are available to
    // process. Preferred for applications that want to render as fast as
    // possible, like games.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        state: None,
        battle,
        input: ControlState::default(),
        last_frame: None,
        asset_dir,
        explosion_texture: None,
    };

    event_loop.run_app(&mut app).unwrap();
}
