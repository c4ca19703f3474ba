/// Commands the game understands, decoded from raw key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    Reset,
}

mod key_code {
    pub const SPACE: u32 = 32;
    pub const ARROW_LEFT: u32 = 37;
    pub const ARROW_UP: u32 = 38;
    pub const ARROW_RIGHT: u32 = 39;
    pub const ARROW_DOWN: u32 = 40;
}

impl Command {
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            key_code::ARROW_LEFT => Some(Command::Left),
            key_code::ARROW_UP => Some(Command::Up),
            key_code::ARROW_RIGHT => Some(Command::Right),
            key_code::ARROW_DOWN => Some(Command::Down),
            key_code::SPACE => Some(Command::Reset),
            _ => None,
        }
    }
}

/// Commands released since the last frame.
/// The keyup listener pushes; the game loop drains once per tick.
#[derive(Debug, Default)]
pub struct InputQueue {
    commands: Vec<Command>,
}

impl InputQueue {
    pub fn new() -> Self {
        InputQueue {
            commands: Vec::with_capacity(8),
        }
    }

    /// Queue the command bound to `code`. Unbound keys are dropped.
    pub fn push_key(&mut self, code: u32) {
        if let Some(command) = Command::from_key_code(code) {
            self.commands.push(command);
        }
    }

    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_map_to_directions() {
        assert_eq!(Command::from_key_code(37), Some(Command::Left));
        assert_eq!(Command::from_key_code(38), Some(Command::Up));
        assert_eq!(Command::from_key_code(39), Some(Command::Right));
        assert_eq!(Command::from_key_code(40), Some(Command::Down));
        assert_eq!(Command::from_key_code(32), Some(Command::Reset));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut queue = InputQueue::new();
        queue.push_key(65);
        queue.push_key(13);
        assert!(queue.is_empty());
    }

    #[test]
    fn drain_keeps_release_order_and_empties_queue() {
        let mut queue = InputQueue::new();
        queue.push_key(38);
        queue.push_key(37);
        queue.push_key(38);

        assert_eq!(
            queue.drain(),
            vec![Command::Up, Command::Left, Command::Up]
        );
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
