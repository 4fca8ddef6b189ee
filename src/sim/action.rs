/// Player action handler: one discrete input event → one state mutation.
/// The caller holds the lock for the whole dispatch.

use crate::domain::element::Element;
use crate::domain::{Coords, InputEvent, MoveDir};
use crate::sim::world::GameState;

/// Dispatch one input event. Returns false when the session should end
/// (quit), true otherwise — including on game-over, which the main loop
/// picks up from the termination flag.
pub fn execute(state: &mut GameState, event: InputEvent) -> bool {
    state.status.clear();
    match event {
        InputEvent::Quit => false,
        InputEvent::Interact => {
            interact(state);
            true
        }
        InputEvent::Move(dir) => {
            move_player(state, dir);
            true
        }
    }
}

/// Try the four axis-adjacent cells for a closed portal and activate the
/// first one whose slot accepts the signal.
fn interact(state: &mut GameState) {
    let (px, py) = (state.player_x, state.player_y);
    let adjacent = [
        Coords { x: px, y: py - 1 },
        Coords { x: px, y: py + 1 },
        Coords { x: px - 1, y: py },
        Coords { x: px + 1, y: py },
    ];

    for cell in adjacent {
        let Some(element) = state.element_at(cell.x, cell.y) else {
            continue;
        };
        if !element.is_closed_portal() {
            continue;
        }
        let portal = state
            .portals
            .iter()
            .find(|p| p.x == cell.x && p.y == cell.y);
        if let Some(portal) = portal {
            if portal.activations.try_send(()).is_ok() {
                state.status = "You opened a portal!".to_string();
                return;
            }
        }
    }
    state.status = "Nothing here to interact with.".to_string();
}

fn move_player(state: &mut GameState, dir: MoveDir) {
    let (dx, dy) = dir.delta();
    let (nx, ny) = (state.player_x + dx, state.player_y + dy);

    // Collision with an enemy marker is checked before passability: it ends
    // the game instead of merely blocking the step.
    if state.element_at(nx, ny).is_some_and(|e| e.is_enemy()) {
        state.end_game("You walked into an enemy! Game over.");
        return;
    }
    if !state.can_enter_at(nx, ny) {
        return;
    }

    let from = Coords {
        x: state.player_x,
        y: state.player_y,
    };
    let to = Coords { x: nx, y: ny };
    let restore = state.displaced;
    // The player has no grid marker; their cell keeps its element and the
    // renderer paints the player glyph over it.
    state.displaced = state.swap_occupancy(from, to, restore, None);
    state.player_x = nx;
    state.player_y = ny;

    if state.displaced.is_pressure_plate() {
        state.status = "You activated a mechanism!".to_string();
        for portal in &state.portals {
            let _ = portal.activations.try_send(());
        }
    }
    if state.displaced.is_trap() {
        state.end_game("A trap snapped shut! Game over.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level;
    use crate::sim::world::GameState;

    fn state_from(map: &str) -> GameState {
        level::parse(map, "test").unwrap().state
    }

    #[test]
    fn quit_ends_the_session_without_mutation() {
        let mut state = state_from("☺ ");
        state.status = "old".to_string();
        assert!(!execute(&mut state, InputEvent::Quit));
        assert_eq!(state.player_x, 0);
        // Status is cleared on every dispatch, quit included.
        assert!(state.status.is_empty());
    }

    #[test]
    fn move_swaps_and_round_trips() {
        let mut state = state_from("☺♣ ");
        assert!(execute(&mut state, InputEvent::Move(MoveDir::Right)));
        assert_eq!((state.player_x, state.player_y), (1, 0));
        assert_eq!(state.displaced, Element::VEGETATION);
        // The occupied cell keeps its element; the player is out-of-band.
        assert_eq!(state.element_at(1, 0), Some(Element::VEGETATION));

        assert!(execute(&mut state, InputEvent::Move(MoveDir::Left)));
        assert_eq!((state.player_x, state.player_y), (0, 0));
        assert_eq!(state.displaced, Element::EMPTY);
        assert_eq!(state.element_at(1, 0), Some(Element::VEGETATION));
        assert_eq!(state.element_at(0, 0), Some(Element::EMPTY));
    }

    #[test]
    fn move_into_a_wall_is_ignored() {
        let mut state = state_from("☺▤");
        assert!(execute(&mut state, InputEvent::Move(MoveDir::Right)));
        assert_eq!(state.player_x, 0);
        assert!(!state.over);
    }

    #[test]
    fn move_off_the_grid_is_ignored() {
        let mut state = state_from("☺");
        assert!(execute(&mut state, InputEvent::Move(MoveDir::Up)));
        assert!(execute(&mut state, InputEvent::Move(MoveDir::Left)));
        assert_eq!((state.player_x, state.player_y), (0, 0));
    }

    #[test]
    fn move_into_an_enemy_is_fatal_and_rejected() {
        let mut state = state_from("☺☠");
        assert!(execute(&mut state, InputEvent::Move(MoveDir::Right)));
        assert!(state.over);
        assert_eq!((state.player_x, state.player_y), (0, 0));
    }

    #[test]
    fn trap_ends_the_game_but_stays_in_the_cell() {
        let mut state = state_from("☺*");
        assert!(execute(&mut state, InputEvent::Move(MoveDir::Right)));
        assert!(state.over);
        assert_eq!((state.player_x, state.player_y), (1, 0));
        // The trap is remembered as displaced and still shows in the grid.
        assert_eq!(state.displaced, Element::TRAP);
        assert_eq!(state.element_at(1, 0), Some(Element::TRAP));
    }

    #[test]
    fn pressure_plate_activates_every_portal() {
        let mut loaded = level::parse("☺.\n⬱⬱", "test").unwrap();
        assert!(execute(&mut loaded.state, InputEvent::Move(MoveDir::Right)));
        assert_eq!(loaded.state.status, "You activated a mechanism!");
        assert!(loaded.portal_channels[0].try_recv().is_ok());
        assert!(loaded.portal_channels[1].try_recv().is_ok());
    }

    #[test]
    fn plate_broadcast_drops_on_full_slots() {
        let mut loaded = level::parse("☺.⬱", "test").unwrap();
        // Fill the portal's slot first; the broadcast must not error out.
        loaded.state.portals[0].activations.try_send(()).unwrap();
        assert!(execute(&mut loaded.state, InputEvent::Move(MoveDir::Right)));
        assert_eq!(loaded.state.status, "You activated a mechanism!");
        // Only the pre-filled activation is buffered.
        assert!(loaded.portal_channels[0].try_recv().is_ok());
        assert!(loaded.portal_channels[0].try_recv().is_err());
    }

    #[test]
    fn interact_opens_an_adjacent_closed_portal() {
        let mut loaded = level::parse("☺⬱", "test").unwrap();
        assert!(execute(&mut loaded.state, InputEvent::Interact));
        assert_eq!(loaded.state.status, "You opened a portal!");
        assert!(loaded.portal_channels[0].try_recv().is_ok());
    }

    #[test]
    fn interact_with_nothing_nearby() {
        let mut loaded = level::parse("☺ ⬱", "test").unwrap();
        assert!(execute(&mut loaded.state, InputEvent::Interact));
        assert_eq!(loaded.state.status, "Nothing here to interact with.");
        assert!(loaded.portal_channels[0].try_recv().is_err());
    }

    #[test]
    fn interact_falls_through_a_full_portal_slot() {
        let mut loaded = level::parse("☺⬱", "test").unwrap();
        loaded.state.portals[0].activations.try_send(()).unwrap();
        assert!(execute(&mut loaded.state, InputEvent::Interact));
        // Send failed on the full slot and no other portal was adjacent.
        assert_eq!(loaded.state.status, "Nothing here to interact with.");
    }
}
