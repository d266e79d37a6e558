//! Focuses the chosen window by running an external command.

use std::process::Command;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::ActivationError;
use crate::session::Activator;
use crate::window::WindowId;

const ID_PLACEHOLDER: &str = "{id}";

/// Runs a shell-word command template, e.g. `swaymsg [con_id={id}] focus`,
/// with `{id}` substituted in every argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandActivator {
    template: Vec<String>,
    delay: Duration,
}

impl CommandActivator {
    pub fn new(template: &str, delay: Duration) -> Result<Self, ActivationError> {
        let template = shell_words::split(template)?;
        if template.is_empty() {
            return Err(ActivationError::EmptyCommand);
        }
        Ok(Self { template, delay })
    }

    pub fn command_for(&self, id: WindowId) -> Vec<String> {
        let id = id.to_string();
        self.template
            .iter()
            .map(|arg| arg.replace(ID_PLACEHOLDER, &id))
            .collect()
    }
}

impl Activator for CommandActivator {
    fn activate(&mut self, id: WindowId) -> Result<(), ActivationError> {
        let argv = self.command_for(id);
        let shown = shell_words::join(&argv);
        if !self.delay.is_zero() {
            debug!(delay_ms = self.delay.as_millis() as u64, "waiting before activation");
            thread::sleep(self.delay);
        }
        info!(command = %shown, "running activation command");
        let (program, args) = argv.split_first().ok_or(ActivationError::EmptyCommand)?;
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| ActivationError::Spawn {
                command: shown.clone(),
                source,
            })?;
        if !status.success() {
            return Err(ActivationError::Failed {
                command: shown,
                status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_substituted_in_every_argument() {
        let act = CommandActivator::new("swaymsg '[con_id={id}]' focus", Duration::ZERO).unwrap();
        assert_eq!(
            act.command_for(WindowId(42)),
            vec!["swaymsg", "[con_id=42]", "focus"]
        );
    }

    #[test]
    fn empty_template_is_rejected() {
        assert!(matches!(
            CommandActivator::new("   ", Duration::ZERO),
            Err(ActivationError::EmptyCommand)
        ));
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        assert!(matches!(
            CommandActivator::new("swaymsg 'focus", Duration::ZERO),
            Err(ActivationError::Template(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_reported() {
        let mut act = CommandActivator::new("false {id}", Duration::ZERO).unwrap();
        match act.activate(WindowId(1)) {
            Err(ActivationError::Failed { command, status }) => {
                assert_eq!(command, "false 1");
                assert!(!status.success());
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn missing_program_names_the_command() {
        let mut act =
            CommandActivator::new("term-expose-no-such-program [con_id={id}]", Duration::ZERO)
                .unwrap();
        match act.activate(WindowId(9)) {
            Err(ActivationError::Spawn { command, .. }) => {
                assert_eq!(command, "term-expose-no-such-program '[con_id=9]'");
            }
            other => panic!("expected spawn error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn succeeding_command_is_ok() {
        let mut act = CommandActivator::new("true {id}", Duration::ZERO).unwrap();
        assert!(act.activate(WindowId(7)).is_ok());
    }
}
