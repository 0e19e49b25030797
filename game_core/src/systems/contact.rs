use hecs::{Entity, World};

use crate::{is_safe, Collider, Cue, Events, Obstacle, Player, Pooled, Session};

/// Result of a player touching an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Right mode: the obstacle's score was awarded
    Passed { score: u32 },
    /// Wrong mode: a life was lost
    Hit { game_over: bool },
}

/// Resolve a trigger contact between the player and an obstacle.
///
/// The obstacle's collider is disabled so the contact fires once; it is
/// returned to its pool later by [`crate::recycle_obstacles`]. Returns `None`
/// when the pair is not a live player/obstacle contact.
pub fn resolve_contact(
    world: &mut World,
    player: Entity,
    obstacle: Entity,
    session: &mut Session,
    events: &mut Events,
) -> Option<ContactOutcome> {
    let mode = world.get::<&Player>(player).ok()?.mode;

    let (state, collider, pooled) = world
        .query_one_mut::<(&mut Obstacle, &mut Collider, &Pooled)>(obstacle)
        .ok()?;
    if !pooled.active || !collider.enabled || state.passed {
        return None;
    }

    state.passed = true;
    state.struck_for = Some(0.0);
    collider.enabled = false;

    if is_safe(state.category, mode) {
        session.add_score(state.score_amount);
        events.push_cue(Cue::ObstaclePassed);
        log::debug!("passed {:?} obstacle in {} mode", state.category, mode);
        Some(ContactOutcome::Passed {
            score: state.score_amount,
        })
    } else {
        let game_over = session.lose_life();
        events.push_cue(Cue::ObstacleHit);
        log::debug!(
            "hit {:?} obstacle in {} mode, {} lives left",
            state.category,
            mode,
            session.lives
        );
        Some(ContactOutcome::Hit { game_over })
    }
}
