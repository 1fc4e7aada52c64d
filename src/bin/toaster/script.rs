use std::str::FromStr;
use std::time::Duration;

use humantime::parse_duration;
use toaster::contact::ContactForm;
use toaster::error::ScriptError;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Severity is kept raw so unknown names degrade to `info` in the presenter.
    Present {
        severity: String,
        message: String,
    },
    Close,
    Hover(bool),
    Click(ClickTarget),
    Wait(Duration),
    Submit(ContactForm),
    Scroll(f64),
    Section { id: String, top: f64, height: f64 },
    Goto(String),
    Menu(MenuAction),
    Show,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    Inside,
    Outside,
    Close,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Toggle,
    Link,
    ClickOutside,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        match verb.to_ascii_lowercase().as_str() {
            "present" => {
                let (severity, message) = rest
                    .split_once(char::is_whitespace)
                    .map_or((rest, ""), |(s, m)| (s, m.trim()));
                if severity.is_empty() {
                    return Err("usage: present <severity> <message>".to_string());
                }
                Ok(Self::Present {
                    severity: severity.to_string(),
                    message: message.to_string(),
                })
            }
            "close" => Ok(Self::Close),
            "hover" => match rest {
                "on" => Ok(Self::Hover(true)),
                "off" => Ok(Self::Hover(false)),
                _ => Err("usage: hover on|off".to_string()),
            },
            "click" => match rest {
                "inside" => Ok(Self::Click(ClickTarget::Inside)),
                "outside" => Ok(Self::Click(ClickTarget::Outside)),
                "close" => Ok(Self::Click(ClickTarget::Close)),
                _ => Err("usage: click inside|outside|close".to_string()),
            },
            "wait" => parse_duration(rest)
                .map(Self::Wait)
                .map_err(|err| format!("invalid duration {rest:?}: {err}")),
            "submit" => {
                let mut parts = rest.splitn(3, '|');
                let name = parts.next().unwrap_or_default();
                let email = parts.next().unwrap_or_default();
                let message = parts.next().unwrap_or_default();
                Ok(Self::Submit(ContactForm::new(name, email, message)))
            }
            "scroll" => rest
                .parse::<f64>()
                .map(Self::Scroll)
                .map_err(|err| format!("invalid scroll offset {rest:?}: {err}")),
            "section" => {
                let fields: Vec<&str> = rest.split_whitespace().collect();
                let [id, top, height] = fields.as_slice() else {
                    return Err("usage: section <id> <top> <height>".to_string());
                };
                let top = top
                    .parse::<f64>()
                    .map_err(|err| format!("invalid section top {top:?}: {err}"))?;
                let height = height
                    .parse::<f64>()
                    .map_err(|err| format!("invalid section height {height:?}: {err}"))?;
                Ok(Self::Section {
                    id: (*id).to_string(),
                    top,
                    height,
                })
            }
            "goto" => rest
                .strip_prefix('#')
                .or(Some(rest))
                .filter(|id| !id.is_empty())
                .map(|id| Self::Goto(id.to_string()))
                .ok_or_else(|| "usage: goto <section-id>".to_string()),
            "menu" => match rest {
                "toggle" => Ok(Self::Menu(MenuAction::Toggle)),
                "link" => Ok(Self::Menu(MenuAction::Link)),
                "click-outside" => Ok(Self::Menu(MenuAction::ClickOutside)),
                _ => Err("usage: menu toggle|link|click-outside".to_string()),
            },
            "show" => Ok(Self::Show),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Parses one script line; blank lines and `#` comments yield `None`.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Command>, ScriptError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    trimmed
        .parse::<Command>()
        .map(Some)
        .map_err(|message| ScriptError::Parse {
            line: line_no,
            message,
        })
}

#[cfg(test)]
mod tests {
    use super::{ClickTarget, Command, MenuAction, parse_line};
    use std::time::Duration;
    use toaster::contact::ContactForm;

    #[test]
    fn present_keeps_raw_severity_and_message() {
        assert_eq!(
            "present success Saved.  All good".parse::<Command>(),
            Ok(Command::Present {
                severity: "success".into(),
                message: "Saved.  All good".into(),
            })
        );
        assert_eq!(
            "present bogus".parse::<Command>(),
            Ok(Command::Present {
                severity: "bogus".into(),
                message: String::new(),
            })
        );
        assert!("present".parse::<Command>().is_err());
    }

    #[test]
    fn simple_verbs() {
        assert_eq!("close".parse::<Command>(), Ok(Command::Close));
        assert_eq!("hover on".parse::<Command>(), Ok(Command::Hover(true)));
        assert_eq!(
            "click outside".parse::<Command>(),
            Ok(Command::Click(ClickTarget::Outside))
        );
        assert_eq!(
            "wait 600ms".parse::<Command>(),
            Ok(Command::Wait(Duration::from_millis(600)))
        );
        assert_eq!("scroll 240".parse::<Command>(), Ok(Command::Scroll(240.0)));
        assert_eq!("goto #about".parse::<Command>(), Ok(Command::Goto("about".into())));
        assert_eq!(
            "section about 600 500".parse::<Command>(),
            Ok(Command::Section {
                id: "about".into(),
                top: 600.0,
                height: 500.0,
            })
        );
        assert!("section about 600".parse::<Command>().is_err());
        assert_eq!(
            "menu click-outside".parse::<Command>(),
            Ok(Command::Menu(MenuAction::ClickOutside))
        );
    }

    #[test]
    fn submit_splits_on_pipes() {
        assert_eq!(
            "submit Ada|ada@example.org|Hello | there".parse::<Command>(),
            Ok(Command::Submit(ContactForm::new(
                "Ada",
                "ada@example.org",
                "Hello | there"
            )))
        );
        assert_eq!(
            "submit Ada".parse::<Command>(),
            Ok(Command::Submit(ContactForm::new("Ada", "", "")))
        );
    }

    #[test]
    fn comments_and_errors_carry_line_numbers() {
        assert_eq!(parse_line(1, "  # comment").unwrap(), None);
        assert_eq!(parse_line(2, "").unwrap(), None);
        let err = parse_line(7, "dance").unwrap_err();
        assert_eq!(err.to_string(), "line 7: unknown command: dance");
    }
}
