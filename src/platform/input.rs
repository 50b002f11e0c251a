//! Mapping raw key/pointer events to game commands
//!
//! Input callbacks only record commands; the next frame applies them, so gate
//! collections are never touched from an event handler.

use crate::sim::{ColorChoice, RunPhase, TickInput};
use crate::skins::{CATALOG, Skin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    SetColor(char),
    CycleColor,
    EndRun,
    Restart,
    ToggleAutopilot,
    /// Shop card for a catalog skin: select if owned, otherwise buy
    ActivateSkin(&'static str),
}

impl Command {
    /// Fold a sim-level command into the pending tick input.
    ///
    /// Returns false for commands the controller handles itself.
    pub fn apply_to(self, input: &mut TickInput) -> bool {
        match self {
            Command::Start => input.start = true,
            Command::SetColor(code) => input.color_code = Some(code),
            Command::CycleColor => input.cycle_color = true,
            Command::EndRun => input.end_run = true,
            Command::ToggleAutopilot => input.autopilot = !input.autopilot,
            Command::Restart | Command::ActivateSkin(_) => return false,
        }
        true
    }
}

/// Keyboard binding (values of `KeyboardEvent.key`)
pub fn command_for_key(key: &str, phase: RunPhase) -> Option<Command> {
    match key {
        " " | "ArrowUp" => Some(Command::CycleColor),
        "Enter" => match phase {
            RunPhase::NotStarted => Some(Command::Start),
            RunPhase::Ended => Some(Command::Restart),
            RunPhase::Running => None,
        },
        "Escape" => Some(Command::EndRun),
        "i" | "I" => Some(Command::ToggleAutopilot),
        _ => {
            if let Some(skin) = shop_key(key) {
                return (phase != RunPhase::Running).then_some(Command::ActivateSkin(skin.id));
            }
            let mut chars = key.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return None;
            };
            ColorChoice::from_code(c).map(|color| Command::SetColor(color.code()))
        }
    }
}

/// Digit keys pick shop cards in catalog order, starting at 1
fn shop_key(key: &str) -> Option<&'static Skin> {
    let index: usize = key.parse().ok()?;
    CATALOG.get(index.checked_sub(1)?)
}

/// A tap or click on the play field cycles the color
pub fn command_for_pointer(phase: RunPhase) -> Option<Command> {
    match phase {
        RunPhase::Ended => None,
        _ => Some(Command::CycleColor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_keys() {
        assert_eq!(
            command_for_key("o", RunPhase::Running),
            Some(Command::SetColor('O'))
        );
        assert_eq!(
            command_for_key("B", RunPhase::NotStarted),
            Some(Command::SetColor('B'))
        );
        assert_eq!(command_for_key("x", RunPhase::Running), None);
        assert_eq!(command_for_key("Shift", RunPhase::Running), None);
    }

    #[test]
    fn enter_depends_on_phase() {
        assert_eq!(command_for_key("Enter", RunPhase::NotStarted), Some(Command::Start));
        assert_eq!(command_for_key("Enter", RunPhase::Running), None);
        assert_eq!(command_for_key("Enter", RunPhase::Ended), Some(Command::Restart));
    }

    #[test]
    fn commands_fold_into_tick_input() {
        let mut input = TickInput::default();
        assert!(Command::CycleColor.apply_to(&mut input));
        assert!(Command::SetColor('Y').apply_to(&mut input));
        assert!(!Command::Restart.apply_to(&mut input));
        assert!(input.cycle_color);
        assert_eq!(input.color_code, Some('Y'));
    }

    #[test]
    fn digits_activate_skins_between_runs() {
        assert_eq!(
            command_for_key("1", RunPhase::NotStarted),
            Some(Command::ActivateSkin("default"))
        );
        assert_eq!(
            command_for_key("4", RunPhase::Ended),
            Some(Command::ActivateSkin("star"))
        );
        assert_eq!(command_for_key("2", RunPhase::Running), None);
        assert_eq!(command_for_key("0", RunPhase::NotStarted), None);
        assert_eq!(command_for_key("5", RunPhase::NotStarted), None);
        assert!(!Command::ActivateSkin("circle").apply_to(&mut TickInput::default()));
    }

    #[test]
    fn pointer_cycles_until_ended() {
        assert_eq!(command_for_pointer(RunPhase::Running), Some(Command::CycleColor));
        assert_eq!(command_for_pointer(RunPhase::Ended), None);
    }
}
