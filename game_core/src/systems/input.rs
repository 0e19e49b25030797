use hecs::World;

use crate::{Cue, Events, InputQueue, Player, PlayerIntent, Session};

/// Apply queued input to the player: latest lateral direction wins, every
/// switch request toggles the light mode.
pub fn ingest_inputs(
    world: &mut World,
    input_queue: &mut InputQueue,
    session: &mut Session,
    events: &mut Events,
) {
    let inputs = input_queue.pop_inputs();
    if inputs.is_empty() {
        return;
    }

    for (_entity, (player, intent)) in world.query_mut::<(&mut Player, &mut PlayerIntent)>() {
        for input in &inputs {
            intent.lateral = input.lateral.signum();

            if input.switch_mode && !session.game_over {
                player.mode = player.mode.toggled();
                session.record_mode_switch();
                events.push_cue(Cue::ModeSwitch);
                log::debug!("light mode switched to {}", player.mode);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_player, Config, LightMode, PlayerInput};

    fn setup_world() -> (World, Config, InputQueue, Session, Events) {
        let world = World::new();
        let config = Config::new();
        let session = Session::new(&config);
        (world, config, InputQueue::new(), session, Events::new())
    }

    #[test]
    fn test_switch_toggles_mode_and_counts() {
        let (mut world, config, mut queue, mut session, mut events) = setup_world();
        let player = create_player(&mut world, &config);

        queue.push_input(PlayerInput {
            lateral: 0,
            switch_mode: true,
        });
        ingest_inputs(&mut world, &mut queue, &mut session, &mut events);

        assert_eq!(
            world.get::<&Player>(player).expect("player").mode,
            LightMode::Particle
        );
        assert_eq!(session.mode_switches, 1);
        assert!(events.has_cue(Cue::ModeSwitch));
        assert!(queue.inputs.is_empty());
    }

    #[test]
    fn test_two_switches_in_one_tick_cancel_out() {
        let (mut world, config, mut queue, mut session, mut events) = setup_world();
        let player = create_player(&mut world, &config);

        for _ in 0..2 {
            queue.push_input(PlayerInput {
                lateral: 0,
                switch_mode: true,
            });
        }
        ingest_inputs(&mut world, &mut queue, &mut session, &mut events);

        assert_eq!(
            world.get::<&Player>(player).expect("player").mode,
            LightMode::Wave
        );
        assert_eq!(session.mode_switches, 2);
    }

    #[test]
    fn test_latest_lateral_direction_wins() {
        let (mut world, config, mut queue, mut session, mut events) = setup_world();
        let player = create_player(&mut world, &config);

        queue.push_input(PlayerInput {
            lateral: -1,
            switch_mode: false,
        });
        queue.push_input(PlayerInput {
            lateral: 5,
            switch_mode: false,
        });
        ingest_inputs(&mut world, &mut queue, &mut session, &mut events);

        assert_eq!(
            world.get::<&PlayerIntent>(player).expect("intent").lateral,
            1,
            "Direction is normalized to its sign"
        );
        assert!(events.cues.is_empty());
    }

    #[test]
    fn test_no_switch_after_game_over() {
        let (mut world, config, mut queue, mut session, mut events) = setup_world();
        let player = create_player(&mut world, &config);
        session.game_over = true;

        queue.push_input(PlayerInput {
            lateral: 0,
            switch_mode: true,
        });
        ingest_inputs(&mut world, &mut queue, &mut session, &mut events);

        assert_eq!(
            world.get::<&Player>(player).expect("player").mode,
            LightMode::Wave
        );
        assert_eq!(session.mode_switches, 0);
    }
}
