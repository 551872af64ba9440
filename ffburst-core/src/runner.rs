//! Printing and running external commands, one at a time.

use std::{
  process::Command,
  sync::atomic::{AtomicBool, Ordering},
};

use ansi_term::Colour;

use crate::{
  error::{Error, Result},
  plan::EncodePlan,
};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Remembers Ctrl-C instead of dying right away, so the running command can
/// finish handling it and no further command is started.
pub fn install_interrupt_handler() -> std::result::Result<(), ctrlc::Error> {
  ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::SeqCst))
}

pub fn interrupted() -> bool {
  INTERRUPTED.load(Ordering::SeqCst)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner {
  /// Only print commands, never run them.
  pub dry_run: bool,
}

impl CommandRunner {
  pub const fn new(dry_run: bool) -> Self {
    Self { dry_run }
  }

  /// Prints `cmd`, then runs it with inherited stdio unless in dry-run mode.
  pub fn run<S: AsRef<str>>(&self, cmd: &[S]) -> Result<()> {
    let line = cmd.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");
    println!("\n{}", Colour::Cyan.bold().paint(&line));

    if self.dry_run {
      return Ok(());
    }
    if interrupted() {
      return Err(Error::Interrupted);
    }

    let (program, args) = cmd
      .split_first()
      .ok_or_else(|| Error::invalid("Cannot run an empty command"))?;
    let program = program.as_ref();

    let status = Command::new(program)
      .args(args.iter().map(AsRef::as_ref))
      .status()
      .map_err(|source| Error::Spawn {
        program: program.to_owned(),
        source,
      })?;
    debug!("{} finished: {}", program, status);

    if interrupted() {
      return Err(Error::Interrupted);
    }

    match status.code() {
      Some(0) => Ok(()),
      Some(code) => Err(Error::CommandFailed {
        program: program.to_owned(),
        code,
      }),
      // killed by a signal
      None => Err(Error::Interrupted),
    }
  }

  /// Runs every command of `plan` in order, stopping at the first failure.
  /// Commands that already ran are not undone.
  pub fn run_plan(&self, plan: &EncodePlan) -> Result<()> {
    for cmd in &plan.pass_commands {
      self.run(cmd)?;
    }

    Ok(())
  }
}
