/// Radar sweep: the coordinator's periodic proximity scan.
///
/// For every patrol enemy within the radius of the player, the player's
/// current coordinates are offered to that enemy's sighting slot with a
/// non-blocking send. A full slot drops the sighting silently; the next
/// sweep tries again. The caller holds the state lock for the whole sweep.

use crate::domain::Coords;
use crate::sim::world::GameState;

pub fn scan(state: &GameState, radius: f64) {
    let player = Coords {
        x: state.player_x,
        y: state.player_y,
    };
    for patrol in &state.patrols {
        let dx = (patrol.x - player.x) as f64;
        let dy = (patrol.y - player.y) as f64;
        if (dx * dx + dy * dy).sqrt() < radius {
            let _ = patrol.sightings.try_send(player);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level;

    #[test]
    fn notifies_enemies_inside_the_radius() {
        // Distances 3 and 5 from the player at (0, 0).
        let loaded = level::parse("☺  ☠ ☠", "test").unwrap();
        let mut channels = loaded.patrol_channels;

        scan(&loaded.state, 8.0);
        assert_eq!(channels[0].try_recv().unwrap(), Coords { x: 0, y: 0 });
        assert_eq!(channels[1].try_recv().unwrap(), Coords { x: 0, y: 0 });
    }

    #[test]
    fn ignores_enemies_outside_the_radius() {
        let loaded = level::parse("☺        ☠", "test").unwrap();
        let mut channels = loaded.patrol_channels;

        scan(&loaded.state, 8.0); // distance 9
        assert!(channels[0].try_recv().is_err());
    }

    #[test]
    fn radius_is_exclusive() {
        let loaded = level::parse("☺       ☠", "test").unwrap();
        let mut channels = loaded.patrol_channels;

        scan(&loaded.state, 8.0); // distance exactly 8
        assert!(channels[0].try_recv().is_err());
    }

    #[test]
    fn full_slot_drops_the_sighting_silently() {
        let loaded = level::parse("☺  ☠", "test").unwrap();
        let mut channels = loaded.patrol_channels;

        scan(&loaded.state, 8.0);
        scan(&loaded.state, 8.0); // slot already full: dropped, no panic
        assert!(channels[0].try_recv().is_ok());
        assert!(channels[0].try_recv().is_err()); // only one buffered
    }
}
