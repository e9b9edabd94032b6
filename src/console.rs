//! Terminal front end
//!
//! Line-based commands standing in for the settings window: each stdin line
//! is parsed into a [`ConsoleCommand`] and applied to the [`AutoClicker`].

use crate::config::{SettingUpdate, SettingsError};
use crate::input::Hotkey;
use crate::AutoClicker;

pub const HELP: &str = "\
Commands:
  <enter> or <hotkey>   toggle clicking
  start | stop | toggle
  cps <1-200>           clicks per second
  jitter <0-100>        timing randomness in percent
  button <left|right|middle>
  hotkey <letter>
  status                show current state
  config                print the configuration as JSON
  help
  quit";

/// A parsed console command
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Toggle,
    Start,
    Stop,
    Set(SettingUpdate),
    Hotkey(String),
    Status,
    Config,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Parse one input line; a bare hotkey letter toggles
    pub fn parse(line: &str, hotkey: Hotkey) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Ok(ConsoleCommand::Toggle);
        };
        let arg = words.next();
        if let Some(extra) = words.next() {
            return Err(CommandError::UnexpectedArgument(extra.to_string()));
        }

        let mut chars = first.chars();
        if let (Some(c), None, None) = (chars.next(), chars.next(), arg) {
            if hotkey.matches(c) {
                return Ok(ConsoleCommand::Toggle);
            }
        }

        let name = first.to_ascii_lowercase();
        let command = match (name.as_str(), arg) {
            ("toggle", None) => ConsoleCommand::Toggle,
            ("start", None) => ConsoleCommand::Start,
            ("stop", None) => ConsoleCommand::Stop,
            ("status", None) => ConsoleCommand::Status,
            ("config", None) => ConsoleCommand::Config,
            ("help" | "?", None) => ConsoleCommand::Help,
            ("quit" | "exit" | "q", None) => ConsoleCommand::Quit,
            ("hotkey", Some(key)) => ConsoleCommand::Hotkey(key.to_string()),
            ("cps" | "rate" | "jitter" | "button", Some(value)) => {
                let field = if name == "rate" { "cps" } else { name.as_str() };
                ConsoleCommand::Set(SettingUpdate::parse(field, value)?)
            }
            ("cps" | "rate" | "jitter" | "button" | "hotkey", None) => {
                return Err(CommandError::MissingArgument(name.clone()));
            }
            (_, Some(extra))
                if matches!(
                    name.as_str(),
                    "toggle"
                        | "start"
                        | "stop"
                        | "status"
                        | "config"
                        | "help"
                        | "?"
                        | "quit"
                        | "exit"
                        | "q"
                ) =>
            {
                return Err(CommandError::UnexpectedArgument(extra.to_string()));
            }
            _ => return Err(CommandError::Unknown(first.to_string())),
        };

        Ok(command)
    }
}

/// What the console loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this and read the next line
    Reply(String),
    /// Shut down and exit
    Quit,
}

/// Apply a command to the app
pub fn execute(app: &mut AutoClicker, command: ConsoleCommand) -> Outcome {
    let panel = app.panel_mut();

    let reply = match command {
        ConsoleCommand::Toggle => {
            panel.toggle();
            panel.status_line().to_string()
        }
        ConsoleCommand::Start => {
            panel.start();
            panel.status_line().to_string()
        }
        ConsoleCommand::Stop => {
            panel.stop();
            panel.status_line().to_string()
        }
        ConsoleCommand::Set(update) => {
            let accepted = match update {
                SettingUpdate::TargetRate(rate) => panel.set_target_rate(rate),
                SettingUpdate::JitterPct(pct) => panel.set_jitter_pct(pct),
                SettingUpdate::Button(button) => panel.set_button(button),
            };
            if accepted {
                summary(app)
            } else {
                let reason = update
                    .validate()
                    .err()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "rejected".to_string());
                format!("{}\n{}", reason, summary(app))
            }
        }
        ConsoleCommand::Hotkey(input) => match panel.set_hotkey(&input) {
            Ok(hotkey) => format!("Hotkey set to {}", hotkey),
            Err(e) => format!("{} (hotkey is still {})", e, panel.hotkey()),
        },
        ConsoleCommand::Status => summary(app),
        ConsoleCommand::Config => app.config().to_json_pretty(),
        ConsoleCommand::Help => HELP.to_string(),
        ConsoleCommand::Quit => return Outcome::Quit,
    };

    Outcome::Reply(reply)
}

fn summary(app: &AutoClicker) -> String {
    let panel = app.panel();
    let stats = app.engine().stats();
    format!(
        "CPS: {} | Jitter: {} | Button: {} | {} | {} clicks, {} failed\n{}",
        panel.rate_label(),
        panel.jitter_label(),
        panel.settings().button,
        panel.status_line(),
        stats.clicks,
        stats.failures,
        panel.toggle_label(),
    )
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, type help for a list")]
    Unknown(String),
    #[error("{0} needs a value")]
    MissingArgument(String),
    #[error("unexpected argument {0:?}")]
    UnexpectedArgument(String),
    #[error(transparent)]
    Setting(#[from] SettingsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, MouseButton};
    use crate::input::DryRunClicker;

    fn parse(line: &str) -> Result<ConsoleCommand, CommandError> {
        ConsoleCommand::parse(line, Hotkey::default())
    }

    fn app() -> AutoClicker {
        AutoClicker::new(&AppConfig::default(), DryRunClicker::new()).unwrap()
    }

    #[test]
    fn test_parse_toggle_forms() {
        assert_eq!(parse(""), Ok(ConsoleCommand::Toggle));
        assert_eq!(parse("   "), Ok(ConsoleCommand::Toggle));
        assert_eq!(parse("s"), Ok(ConsoleCommand::Toggle));
        assert_eq!(parse("S"), Ok(ConsoleCommand::Toggle));
        assert_eq!(parse("toggle"), Ok(ConsoleCommand::Toggle));
    }

    #[test]
    fn test_parse_settings() {
        assert_eq!(
            parse("cps 25"),
            Ok(ConsoleCommand::Set(SettingUpdate::TargetRate(25.0)))
        );
        assert_eq!(
            parse("rate 3.5"),
            Ok(ConsoleCommand::Set(SettingUpdate::TargetRate(3.5)))
        );
        assert_eq!(
            parse("JITTER 0"),
            Ok(ConsoleCommand::Set(SettingUpdate::JitterPct(0.0)))
        );
        assert_eq!(
            parse("button right"),
            Ok(ConsoleCommand::Set(SettingUpdate::Button(MouseButton::Right)))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("cps"), Err(CommandError::MissingArgument("cps".into())));
        assert_eq!(
            parse("start now"),
            Err(CommandError::UnexpectedArgument("now".into()))
        );
        assert_eq!(
            parse("cps 1 2"),
            Err(CommandError::UnexpectedArgument("2".into()))
        );
        assert_eq!(
            parse("q now"),
            Err(CommandError::UnexpectedArgument("now".into()))
        );
        assert_eq!(
            parse("exit 1"),
            Err(CommandError::UnexpectedArgument("1".into()))
        );
        assert!(matches!(parse("fly"), Err(CommandError::Unknown(_))));
        assert!(matches!(parse("x"), Err(CommandError::Unknown(_))));
        assert!(matches!(
            parse("button side"),
            Err(CommandError::Setting(SettingsError::InvalidButton(_)))
        ));
    }

    #[test]
    fn test_execute_toggle_and_quit() {
        let mut app = app();

        let reply = execute(&mut app, ConsoleCommand::Toggle);
        assert_eq!(reply, Outcome::Reply("Status: ACTIVE, clicking...".into()));
        assert!(app.engine().is_active());

        execute(&mut app, ConsoleCommand::Stop);
        assert!(!app.engine().is_active());

        assert_eq!(execute(&mut app, ConsoleCommand::Quit), Outcome::Quit);
    }

    #[test]
    fn test_execute_rejected_setting() {
        let mut app = app();

        let Outcome::Reply(reply) =
            execute(&mut app, ConsoleCommand::Set(SettingUpdate::TargetRate(500.0)))
        else {
            panic!("expected a reply");
        };

        assert!(reply.starts_with("target rate must be between 1 and 200"));
        assert_eq!(app.engine().settings().target_rate, 10.0);
    }

    #[test]
    fn test_execute_hotkey_then_toggle_with_it() {
        let mut app = app();

        execute(&mut app, ConsoleCommand::Hotkey("k".into()));
        let command = ConsoleCommand::parse("k", app.panel().hotkey()).unwrap();
        assert_eq!(command, ConsoleCommand::Toggle);
    }

    #[test]
    fn test_execute_config_is_json() {
        let mut app = app();
        execute(&mut app, ConsoleCommand::Set(SettingUpdate::JitterPct(5.0)));

        let Outcome::Reply(json) = execute(&mut app, ConsoleCommand::Config) else {
            panic!("expected a reply");
        };
        let config = AppConfig::from_json_str(&json).unwrap();
        assert_eq!(config.engine.jitter_pct, 5.0);
    }
}
