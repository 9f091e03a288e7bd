mod common;

use common::*;
use invaders::collision::{collide, collide_at};
use invaders::consts::*;
use invaders::entities::*;
use invaders::world::*;

// ── Initial world ─────────────────────────────────────────────────────────────

#[test]
fn new_world_has_full_invader_grid() {
    let world = World::new();
    assert_eq!(world.invader_count(), 84); // 14 columns × 6 rows
    assert_eq!(world.actors().len(), 84);

    let first = &world.actors()[0];
    assert_eq!((first.x, first.y), (39, 52));
    assert_eq!(
        first.kind,
        ActorKind::Invader {
            left_wall: 19,
            right_wall: 59
        }
    );
    assert_eq!(world.status(), GameStatus::Running);
}

#[test]
fn new_world_player_starts_centred() {
    let world = World::new();
    let p = world.player();
    assert_eq!((p.actor.x, p.actor.y), (WIDTH / 2 - 12, HEIGHT - 50));
    assert_eq!(p.score(), 0);
}

// ── Collision pass ────────────────────────────────────────────────────────────

#[test]
fn pass_notifies_both_sides_of_every_overlap() {
    let mut actors = vec![
        still_invader(100, 100),
        still_invader(110, 100),
        still_invader(400, 100),
    ];
    let mut shot = Actor::shot(ShotOwner::Player, 112, 110);

    assert_eq!(collide(&mut actors, &mut shot), 2);
    assert!(actors[0].is_removal_pending());
    assert!(actors[1].is_removal_pending());
    assert!(!actors[2].is_removal_pending());
    assert!(shot.is_removal_pending());
}

#[test]
fn pass_skips_actors_already_pending() {
    let mut actors = vec![still_invader(100, 100)];
    actors[0].mark_for_removal(Removal::Destroyed);
    let mut shot = Actor::shot(ShotOwner::Player, 104, 110);

    assert_eq!(collide(&mut actors, &mut shot), 0);
    assert!(!shot.is_removal_pending());
}

#[test]
fn indexed_pass_scans_both_sides_of_subject() {
    let mut actors = vec![
        still_invader(100, 100),
        Actor::shot(ShotOwner::Player, 104, 110),
        Actor::ufo(100, 110),
    ];
    assert_eq!(collide_at(&mut actors, 1), 2);
    assert!(actors.iter().all(Actor::is_removal_pending));
}

#[test]
fn crossing_shots_ignore_each_other() {
    let mut world = world_with(vec![
        Actor::invader(400, 100),
        Actor::shot(ShotOwner::Player, 100, 200),
        Actor::shot(ShotOwner::Enemy, 100, 200),
    ]);

    world.update();

    // Both shots ran a pass over the pair and both fly on
    let shots: Vec<_> = world.actors().iter().filter(|a| a.kind.is_shot()).collect();
    assert_eq!(shots.len(), 2);
    assert_eq!((shots[0].y, shots[1].y), (200 - SHOT_SPEED, 200 + ENEMY_SHOT_SPEED));
}

// ── Update pass ───────────────────────────────────────────────────────────────

#[test]
fn shot_and_invader_both_removed_and_scored() {
    let mut world = world_with(vec![
        still_invader(100, 100),
        Actor::invader(400, 100),
        Actor::shot(ShotOwner::Player, 108, 110),
    ]);

    world.update();

    assert_eq!(world.actors().len(), 1);
    assert_eq!(world.actors()[0].x, 410); // the far invader moved on
    assert_eq!(world.player().score(), INVADER_POINTS + SHOT_POINTS);
    assert_eq!(world.status(), GameStatus::Running);
}

#[test]
fn invader_is_credited_once_when_hit_by_two_shots() {
    let mut world = world_with(vec![
        still_invader(100, 100),
        Actor::invader(400, 100),
        Actor::shot(ShotOwner::Player, 104, 110),
        Actor::shot(ShotOwner::Player, 112, 110),
    ]);

    world.update();

    assert_eq!(world.player().score(), INVADER_POINTS);
    // The second shot found nothing left to hit and flew on
    let survivors: Vec<_> = world.actors().iter().filter(|a| a.kind.is_shot()).collect();
    assert_eq!(survivors.len(), 1);
    assert_eq!((survivors[0].x, survivors[0].y), (112, 100));
}

#[test]
fn ufo_leaving_the_stage_is_removed_without_credit() {
    let mut world = world_with(vec![Actor::invader(400, 100), Actor::ufo(WIDTH, 20)]);

    world.update();

    assert!(!world.has_ufo());
    assert_eq!(world.player().score(), 0);
}

#[test]
fn shot_on_ufo_scores_ufo_points() {
    let mut world = world_with(vec![
        Actor::invader(400, 100),
        Actor::ufo(100, 20),
        Actor::shot(ShotOwner::Player, 110, 30),
    ]);

    world.update();

    assert!(!world.has_ufo());
    assert_eq!(world.player().score(), UFO_POINTS);
}

#[test]
fn no_pending_actor_survives_an_update() {
    let mut world = World::new();
    world.spawn(Actor::shot(ShotOwner::Player, 0, -100)); // leaves at once
    world.command(PlayerCommand::Fire);

    for _ in 0..200 {
        world.update();
        assert!(world.actors().iter().all(|a| !a.is_removal_pending()));
    }
}

// ── Terminal states ───────────────────────────────────────────────────────────

#[test]
fn last_invader_destroyed_means_won() {
    let mut world = world_with(vec![
        still_invader(100, 100),
        Actor::shot(ShotOwner::Player, 108, 110),
    ]);

    world.update();

    assert_eq!(world.invader_count(), 0);
    assert!(world.player().is_alive());
    assert_eq!(world.status(), GameStatus::Won);
}

#[test]
fn empty_world_is_won_after_first_pass() {
    let mut world = world_with(Vec::new());
    assert_eq!(world.status(), GameStatus::Running);
    world.update();
    assert_eq!(world.status(), GameStatus::Won);
}

#[test]
fn enemy_shot_on_player_is_game_over() {
    let mut world = world_with(vec![
        Actor::invader(400, 100),
        Actor::shot(ShotOwner::Enemy, 308, 425),
    ]);

    world.update();

    assert!(!world.player().is_alive());
    assert_eq!(world.status(), GameStatus::GameOver);
    assert!(world.actors().iter().all(|a| !a.kind.is_shot()));
}

#[test]
fn invader_touching_player_is_game_over() {
    let mut world = world_with(vec![still_invader(300, 420)]);
    world.update();
    assert_eq!(world.status(), GameStatus::GameOver);
}

#[test]
fn terminal_states_are_final() {
    let mut world = world_with(Vec::new());
    world.update();
    assert_eq!(world.status(), GameStatus::Won);
    let frame = world.frame();

    world.spawn(Actor::invader(100, 100));
    world.command(PlayerCommand::Fire);
    for _ in 0..10 {
        world.update();
    }

    assert_eq!(world.status(), GameStatus::Won);
    assert_eq!(world.frame(), frame);
    assert_eq!(world.actors().len(), 1); // fire was ignored
}

// ── Commands ──────────────────────────────────────────────────────────────────

#[test]
fn fire_command_adds_shot_that_climbs() {
    let mut world = world_with(vec![Actor::invader(400, 100)]);
    world.command(PlayerCommand::Fire);

    let shot = world.actors().last().expect("shot spawned").clone();
    assert!(shot.kind.is_shot());

    world.update();
    let moved = world.actors().last().expect("shot still live");
    assert_eq!(moved.y, shot.y - SHOT_SPEED);
}

#[test]
fn move_command_moves_player_each_update() {
    let mut world = world_with(vec![Actor::invader(400, 100)]);
    world.command(PlayerCommand::MoveLeft);
    world.update();
    world.update();
    assert_eq!(world.player().actor.x, 300 - 2 * PLAYER_SPEED);

    world.command(PlayerCommand::StopLeft);
    world.update();
    assert_eq!(world.player().actor.x, 300 - 2 * PLAYER_SPEED);
}

#[test]
fn render_paints_actors_then_player() {
    let mut assets = bundled_assets();
    let sprites = invaders::assets::SpriteSet::load(&mut assets);
    let world = world_with(vec![Actor::invader(100, 100), Actor::ufo(0, 20)]);

    let mut r = RecordingRenderer::default();
    world.render(&mut r, &sprites);

    let names: Vec<String> = r
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::Image { sprite, .. } => Some(sprite.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec![INVADER_SPRITE, UFO_SPRITE, PLAYER_SPRITE]);
}
