use std::time::Duration;

use arrayvec::ArrayVec;

/// A discrete player command accepted by [`GameSession::apply`].
///
/// [`GameSession::apply`]: super::GameSession::apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateClockwise,
    RotateCounterClockwise,
    HardDrop,
    TogglePause,
    Restart,
}

impl Command {
    /// Every command, in declaration order.
    pub const ALL: [Self; 8] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::SoftDrop,
        Command::RotateClockwise,
        Command::RotateCounterClockwise,
        Command::HardDrop,
        Command::TogglePause,
        Command::Restart,
    ];

    /// Whether holding the key for this command repeats it.
    #[must_use]
    pub const fn is_repeatable(self) -> bool {
        self.repeat_slot().is_some()
    }

    const fn repeat_slot(self) -> Option<usize> {
        match self {
            Command::MoveLeft => Some(0),
            Command::MoveRight => Some(1),
            Command::SoftDrop => Some(2),
            _ => None,
        }
    }
}

const REPEATABLE: [Command; 3] = [Command::MoveLeft, Command::MoveRight, Command::SoftDrop];

/// Delayed auto-repeat for held movement keys.
///
/// This is driver-side timing: the engine accepts commands at any rate and
/// never throttles them. A driver applies the command returned by
/// [`press`](Self::press) right away, then calls [`update`](Self::update) every
/// frame and applies whatever it returns. Only [`Command::MoveLeft`],
/// [`Command::MoveRight`] and [`Command::SoftDrop`] repeat.
///
/// The first repeat fires once the key has been held for `initial_delay`, the
/// following ones every `repeat_interval`. At most one repeat per key is
/// produced by a single update.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{AutoRepeat, Command};
///
/// let mut repeat = AutoRepeat::default();
/// assert_eq!(repeat.press(Command::MoveLeft), Command::MoveLeft);
///
/// assert!(repeat.update(Duration::from_millis(100)).is_empty());
/// assert_eq!(repeat.update(Duration::from_millis(70)).as_slice(), [Command::MoveLeft]);
/// assert!(repeat.update(Duration::from_millis(30)).is_empty());
/// assert_eq!(repeat.update(Duration::from_millis(20)).as_slice(), [Command::MoveLeft]);
/// ```
#[derive(Debug, Clone)]
pub struct AutoRepeat {
    initial_delay: Duration,
    repeat_interval: Duration,
    held: [Option<HeldKey>; 3],
}

#[derive(Debug, Clone, Copy)]
struct HeldKey {
    held_for: Duration,
    next_fire: Duration,
}

impl Default for AutoRepeat {
    fn default() -> Self {
        Self::new(Self::INITIAL_DELAY, Self::REPEAT_INTERVAL)
    }
}

impl AutoRepeat {
    pub const INITIAL_DELAY: Duration = Duration::from_millis(170);
    pub const REPEAT_INTERVAL: Duration = Duration::from_millis(50);

    /// # Panics
    ///
    /// Panics if `repeat_interval` is zero.
    #[must_use]
    pub fn new(initial_delay: Duration, repeat_interval: Duration) -> Self {
        assert!(!repeat_interval.is_zero(), "repeat interval must be positive");
        Self {
            initial_delay,
            repeat_interval,
            held: [None; 3],
        }
    }

    /// Starts tracking a key press and returns the command to apply right
    /// away.
    ///
    /// Non-repeatable commands are passed through without being tracked, and
    /// pressing a key that is already held restarts its delay.
    pub fn press(&mut self, command: Command) -> Command {
        if let Some(slot) = command.repeat_slot() {
            self.held[slot] = Some(HeldKey {
                held_for: Duration::ZERO,
                next_fire: self.initial_delay,
            });
        }
        command
    }

    /// Stops tracking a key.
    pub fn release(&mut self, command: Command) {
        if let Some(slot) = command.repeat_slot() {
            self.held[slot] = None;
        }
    }

    /// Forgets every held key, e.g. after a restart.
    pub fn clear(&mut self) {
        self.held = [None; 3];
    }

    #[must_use]
    pub fn is_held(&self, command: Command) -> bool {
        command
            .repeat_slot()
            .is_some_and(|slot| self.held[slot].is_some())
    }

    /// Advances held keys by `elapsed` and returns the repeats now due.
    pub fn update(&mut self, elapsed: Duration) -> ArrayVec<Command, 3> {
        let mut due = ArrayVec::new();
        for (key, command) in self.held.iter_mut().zip(REPEATABLE) {
            let Some(key) = key else {
                continue;
            };
            key.held_for += elapsed;
            if key.held_for < key.next_fire {
                continue;
            }
            due.push(command);
            key.next_fire += self.repeat_interval;
            while key.next_fire <= key.held_for {
                key.next_fire += self.repeat_interval;
            }
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_only_movement_repeats() {
        let repeatable: Vec<_> = Command::ALL
            .into_iter()
            .filter(|c| c.is_repeatable())
            .collect();
        assert_eq!(repeatable, REPEATABLE);
    }

    #[test]
    fn test_nothing_fires_before_initial_delay() {
        let mut repeat = AutoRepeat::default();
        repeat.press(Command::SoftDrop);
        for _ in 0..10 {
            assert!(repeat.update(ms(16)).is_empty());
        }
        // 160ms held so far
        assert!(repeat.update(ms(9)).is_empty());
        assert_eq!(repeat.update(ms(1)).as_slice(), [Command::SoftDrop]);
    }

    #[test]
    fn test_repeats_every_interval_after_delay() {
        let mut repeat = AutoRepeat::default();
        repeat.press(Command::MoveRight);
        let mut fired = 0;
        // hold for one second in 10ms frames
        for _ in 0..100 {
            fired += repeat.update(ms(10)).len();
        }
        // fires at 170, 220, ..., 970
        assert_eq!(fired, 17);
    }

    #[test]
    fn test_long_frame_fires_once() {
        let mut repeat = AutoRepeat::default();
        repeat.press(Command::MoveLeft);
        assert_eq!(repeat.update(ms(500)).len(), 1);
        // next threshold is 520ms
        assert!(repeat.update(ms(19)).is_empty());
        assert_eq!(repeat.update(ms(1)).len(), 1);
    }

    #[test]
    fn test_release_and_clear_stop_repeats() {
        let mut repeat = AutoRepeat::default();
        repeat.press(Command::MoveLeft);
        repeat.press(Command::SoftDrop);
        assert!(repeat.is_held(Command::MoveLeft));

        repeat.release(Command::MoveLeft);
        assert!(!repeat.is_held(Command::MoveLeft));
        assert_eq!(repeat.update(ms(200)).as_slice(), [Command::SoftDrop]);

        repeat.clear();
        assert!(repeat.update(ms(200)).is_empty());
    }

    #[test]
    fn test_press_returns_immediate_command() {
        let mut repeat = AutoRepeat::default();
        for command in Command::ALL {
            assert_eq!(repeat.press(command), command);
            assert_eq!(repeat.is_held(command), command.is_repeatable());
        }
    }

    #[test]
    fn test_non_repeatable_press_is_ignored() {
        let mut repeat = AutoRepeat::default();
        repeat.press(Command::HardDrop);
        repeat.press(Command::RotateClockwise);
        assert!(!repeat.is_held(Command::HardDrop));
        assert!(repeat.update(ms(1000)).is_empty());
    }

    #[test]
    fn test_simultaneous_keys_fire_together() {
        let mut repeat = AutoRepeat::new(ms(100), ms(25));
        repeat.press(Command::MoveLeft);
        repeat.press(Command::MoveRight);
        repeat.press(Command::SoftDrop);
        assert_eq!(
            repeat.update(ms(100)).as_slice(),
            [Command::MoveLeft, Command::MoveRight, Command::SoftDrop]
        );
    }
}
