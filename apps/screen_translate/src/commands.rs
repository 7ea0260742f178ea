//! Line-oriented command protocol for the headless driver.
//!
//! ```text
//! pointer | fullscreen | rect      select a mode
//! move X Y                         pointer moved
//! down X Y | drag X Y | up X Y     rectangle drag
//! clear                            remove all annotations
//! quit                             stop
//! ```

use st_app::{Action, Mode, Point};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command {0:?}")]
    Unknown(String),

    #[error("{command} expects two integer coordinates")]
    Coordinates { command: String },
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Action>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    if let Some(mode) = Mode::from_name(&command) {
        return Ok(Some(Action::SelectMode(mode)));
    }

    let action = match command.as_str() {
        "mode" => match args.first().and_then(|name| Mode::from_name(name)) {
            Some(mode) => Action::SelectMode(mode),
            None => return Err(CommandError::Unknown(line.to_string())),
        },
        "move" => Action::PointerMoved(point(&command, &args)?),
        "down" => Action::DragStart(point(&command, &args)?),
        "drag" => Action::DragMove(point(&command, &args)?),
        "up" => Action::DragEnd(point(&command, &args)?),
        "clear" => Action::Clear,
        "quit" | "exit" => Action::Quit,
        _ => return Err(CommandError::Unknown(line.to_string())),
    };
    Ok(Some(action))
}

fn point(command: &str, args: &[&str]) -> Result<Point, CommandError> {
    match args {
        [x, y] => match (x.parse(), y.parse()) {
            (Ok(x), Ok(y)) => Ok(Point::new(x, y)),
            _ => Err(CommandError::Coordinates {
                command: command.to_string(),
            }),
        },
        _ => Err(CommandError::Coordinates {
            command: command.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use st_app::{Action, Mode, Point};

    use super::{CommandError, parse_command};

    fn parsed(line: &str) -> Action {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn modes_by_name() {
        assert!(matches!(parsed("pointer"), Action::SelectMode(Mode::Pointer)));
        assert!(matches!(parsed("FullScreen"), Action::SelectMode(Mode::FullScreen)));
        assert!(matches!(parsed("rect"), Action::SelectMode(Mode::RectSelect)));
        assert!(matches!(
            parsed("mode rect_select"),
            Action::SelectMode(Mode::RectSelect)
        ));
    }

    #[test]
    fn pointer_and_drag_events_carry_coordinates() {
        assert!(matches!(parsed("move 10 -5"), Action::PointerMoved(p) if p == Point::new(10, -5)));
        assert!(matches!(parsed("  down 1 2 "), Action::DragStart(p) if p == Point::new(1, 2)));
        assert!(matches!(parsed("drag 3 4"), Action::DragMove(p) if p == Point::new(3, 4)));
        assert!(matches!(parsed("up 5 6"), Action::DragEnd(p) if p == Point::new(5, 6)));
    }

    #[test]
    fn control_commands() {
        assert!(matches!(parsed("clear"), Action::Clear));
        assert!(matches!(parsed("quit"), Action::Quit));
        assert!(matches!(parsed("exit"), Action::Quit));
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert!(parse_command("").unwrap().is_none());
        assert!(parse_command("   ").unwrap().is_none());
        assert!(parse_command("# move 1 2").unwrap().is_none());
    }

    #[test]
    fn bad_input_is_reported() {
        assert_eq!(
            parse_command("jump").unwrap_err(),
            CommandError::Unknown("jump".to_string())
        );
        assert_eq!(
            parse_command("move 1").unwrap_err(),
            CommandError::Coordinates {
                command: "move".to_string()
            }
        );
        assert!(parse_command("up a b").is_err());
        assert!(parse_command("mode sideways").is_err());
    }
}
