/// Blocking input reader.
///
/// Runs on a dedicated OS thread because `crossterm::event::read()` blocks;
/// translated events are pushed into the main loop's channel with
/// `blocking_send`. The thread exits when the terminal stream errors or the
/// main loop drops the receiving end; otherwise the process exit ends it.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::domain::{InputEvent, MoveDir};

pub fn spawn_reader(tx: mpsc::Sender<InputEvent>) {
    std::thread::spawn(move || loop {
        let event = match event::read() {
            Ok(event) => event,
            Err(_) => return,
        };
        let Some(input) = translate(event) else {
            continue;
        };
        if tx.blocking_send(input).is_err() {
            return;
        }
    });
}

fn translate(event: Event) -> Option<InputEvent> {
    let Event::Key(key) = event else {
        return None;
    };
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(InputEvent::Quit);
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputEvent::Quit),
        KeyCode::Char('e') | KeyCode::Char('E') => Some(InputEvent::Interact),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(InputEvent::Move(MoveDir::Up))
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(InputEvent::Move(MoveDir::Down))
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(InputEvent::Move(MoveDir::Left))
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(InputEvent::Move(MoveDir::Right))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::from(code))
    }

    #[test]
    fn movement_keys_map_to_directions() {
        assert_eq!(
            translate(key(KeyCode::Char('w'))),
            Some(InputEvent::Move(MoveDir::Up))
        );
        assert_eq!(
            translate(key(KeyCode::Left)),
            Some(InputEvent::Move(MoveDir::Left))
        );
    }

    #[test]
    fn quit_and_interact_keys() {
        assert_eq!(translate(key(KeyCode::Esc)), Some(InputEvent::Quit));
        assert_eq!(translate(key(KeyCode::Char('q'))), Some(InputEvent::Quit));
        assert_eq!(
            translate(key(KeyCode::Char('e'))),
            Some(InputEvent::Interact)
        );
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(translate(key(KeyCode::Char('z'))), None);
        assert_eq!(translate(key(KeyCode::Tab)), None);
    }
}
