//! Scripted input for headless simulation runs.

use anyhow::{Result, anyhow, bail};
use shellfur_input::{Action, InputSnapshot};

pub fn parse_action(name: &str) -> Option<Action> {
    let action = match name {
        "forward" => Action::MoveForward,
        "backward" => Action::MoveBackward,
        "left" => Action::MoveLeft,
        "right" => Action::MoveRight,
        "up" => Action::MoveUp,
        "down" => Action::MoveDown,
        "faster" => Action::SpeedUp,
        "slower" => Action::SpeedDown,
        "reset" => Action::ResetCamera,
        "debug-camera" => Action::ToggleDebugCamera,
        "ui" => Action::ToggleUiMode,
        "flashlight" => Action::ToggleFlashlight,
        "fill" => Action::FillMode,
        "wireframe" => Action::WireframeMode,
        "quit" => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// One scripted press: `action` held for frames `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Press {
    pub action: Action,
    pub start: u64,
    pub end: u64,
}

impl Press {
    /// Parse `name`, `name@frame` or `name@start..end`.
    ///
    /// A bare name is held for the whole run; `name@frame` is a one-frame tap.
    pub fn parse(spec: &str) -> Result<Press> {
        let (name, range) = match spec.split_once('@') {
            Some((name, range)) => (name, Some(range)),
            None => (spec, None),
        };
        let action = parse_action(name).ok_or_else(|| anyhow!("unknown action `{name}`"))?;
        let (start, end) = match range {
            None => (0, u64::MAX),
            Some(r) => match r.split_once("..") {
                Some((a, b)) => (a.parse()?, b.parse()?),
                None => {
                    let f: u64 = r.parse()?;
                    let end = f
                        .checked_add(1)
                        .ok_or_else(|| anyhow!("frame {f} out of range in `{spec}`"))?;
                    (f, end)
                }
            },
        };
        if end <= start {
            bail!("empty frame range in `{spec}`");
        }
        Ok(Press { action, start, end })
    }

    fn active(&self, frame: u64) -> bool {
        (self.start..self.end).contains(&frame)
    }
}

/// Input snapshot for `frame` given a list of scripted presses.
pub fn snapshot_for(presses: &[Press], frame: u64) -> InputSnapshot {
    let mut snap = InputSnapshot::new();
    for p in presses.iter().filter(|p| p.active(frame)) {
        snap.press(p.action);
    }
    snap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_holds_forever() {
        let p = Press::parse("forward").unwrap();
        assert_eq!(p.action, Action::MoveForward);
        assert!(p.active(0));
        assert!(p.active(1_000_000));
    }

    #[test]
    fn tap_lasts_one_frame() {
        let p = Press::parse("flashlight@3").unwrap();
        assert!(!p.active(2));
        assert!(p.active(3));
        assert!(!p.active(4));
    }

    #[test]
    fn range_is_half_open() {
        let p = Press::parse("left@2..5").unwrap();
        assert!(p.active(2));
        assert!(p.active(4));
        assert!(!p.active(5));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Press::parse("jump").is_err());
        assert!(Press::parse("left@5..5").is_err());
        assert!(Press::parse("left@x").is_err());
        assert!(Press::parse(&format!("quit@{}", u64::MAX)).is_err());
    }

    #[test]
    fn snapshot_collects_active_presses() {
        let presses = [
            Press::parse("forward").unwrap(),
            Press::parse("ui@1").unwrap(),
        ];
        let s0 = snapshot_for(&presses, 0);
        assert!(s0.is_held(Action::MoveForward));
        assert!(!s0.is_held(Action::ToggleUiMode));
        let s1 = snapshot_for(&presses, 1);
        assert!(s1.just_pressed(&s0, Action::ToggleUiMode));
    }
}
