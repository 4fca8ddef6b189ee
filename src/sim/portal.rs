/// Timed portal gate: Closed → Open → Closed.
///
/// One task per portal, looping on its activation channel. The open/closed
/// state is the portal cell's element value, nothing else. Auto-close is a
/// fixed wall-clock timeout from activation; at expiry the cell is only
/// reverted if it still shows the open marker (something else may have
/// moved onto the cell in the meantime). Activations buffered while open
/// are consumed after the close and simply re-open the portal.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;

use crate::domain::element::Element;
use crate::sim::world::SharedGame;

/// Agent loop. `idx` is the stable handle into `state.portals`.
pub async fn run(
    game: SharedGame,
    idx: usize,
    mut activations: mpsc::Receiver<()>,
    open_for: Duration,
) {
    while activations.recv().await.is_some() {
        {
            let mut state = game.lock().await;
            let (x, y) = {
                let p = &state.portals[idx];
                (p.x, p.y)
            };
            state.set_cell(x, y, Element::PORTAL_OPEN);
        }

        time::sleep(open_for).await;

        {
            let mut state = game.lock().await;
            let (x, y) = {
                let p = &state.portals[idx];
                (p.x, p.y)
            };
            if state.element_at(x, y).is_some_and(|e| e.is_open_portal()) {
                state.set_cell(x, y, Element::PORTAL_CLOSED);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    const OPEN_FOR: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn opens_on_activation_and_autocloses() {
        let loaded = level::parse("☺⬱", "test").unwrap();
        let activate = loaded.state.portals[0].activations.clone();
        let game = Arc::new(Mutex::new(loaded.state));
        let mut channels = loaded.portal_channels;

        tokio::spawn(run(game.clone(), 0, channels.remove(0), OPEN_FOR));

        activate.try_send(()).unwrap();
        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(
            game.lock().await.element_at(1, 0),
            Some(Element::PORTAL_OPEN)
        );

        // Still open just before the deadline...
        time::sleep(Duration::from_millis(4900)).await;
        assert_eq!(
            game.lock().await.element_at(1, 0),
            Some(Element::PORTAL_OPEN)
        );

        // ...closed right after it.
        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(
            game.lock().await.element_at(1, 0),
            Some(Element::PORTAL_CLOSED)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn buffered_activation_reopens_after_close() {
        let loaded = level::parse("☺⬱", "test").unwrap();
        let activate = loaded.state.portals[0].activations.clone();
        let game = Arc::new(Mutex::new(loaded.state));
        let mut channels = loaded.portal_channels;

        tokio::spawn(run(game.clone(), 0, channels.remove(0), OPEN_FOR));

        activate.try_send(()).unwrap();
        time::sleep(Duration::from_millis(50)).await;
        // Second activation parks in the single buffer slot; a third is
        // dropped silently, never an error for the sender.
        activate.try_send(()).unwrap();
        assert!(activate.try_send(()).is_err());

        // After the first close, the buffered activation re-opens the gate.
        time::sleep(OPEN_FOR).await;
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            game.lock().await.element_at(1, 0),
            Some(Element::PORTAL_OPEN)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_revert_a_cell_something_else_claimed() {
        let loaded = level::parse("☺⬱", "test").unwrap();
        let activate = loaded.state.portals[0].activations.clone();
        let game = Arc::new(Mutex::new(loaded.state));
        let mut channels = loaded.portal_channels;

        tokio::spawn(run(game.clone(), 0, channels.remove(0), OPEN_FOR));

        activate.try_send(()).unwrap();
        time::sleep(Duration::from_millis(50)).await;

        // An enemy wanders onto the open portal before the deadline.
        game.lock().await.set_cell(1, 0, Element::ENEMY);

        time::sleep(OPEN_FOR).await;
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(game.lock().await.element_at(1, 0), Some(Element::ENEMY));
    }
}
