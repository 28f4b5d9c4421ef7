// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The seam between the pipeline and the external tools it drives.

use crate::helpers::*;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

/// One external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Human-readable name used in progress output.
    pub task_name: String,
    /// The program to run.
    pub program: String,
    /// Its arguments.
    pub args: Vec<String>,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(
        task_name: impl Into<String>,
        program: impl Into<String>,
        cwd: impl Into<PathBuf>,
    ) -> Self {
        Self {
            task_name: task_name.into(),
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Runs external tools on behalf of the pipeline.
pub trait CommandRunner {
    /// Runs the invocation to completion. A non-zero exit status is an error.
    fn run(&self, invocation: &Invocation) -> Result<()>;

    /// Runs the invocation and returns its trimmed standard output.
    fn capture(&self, invocation: &Invocation) -> Result<String>;

    /// When `true`, the pipeline reports filesystem changes instead of making them.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Spawns real processes, streaming their output to the terminal.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        let start_time = Instant::now();
        print_command_info(&invocation.program, &invocation.args);
        log::debug!("Running in '{}'", invocation.cwd.display());

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .status()
            .with_context(|| format!("Failed to execute '{}'", invocation.program))?;
        let duration = start_time.elapsed();

        if status.success() {
            print_success(&format!(
                "{} completed in {:.2}s",
                invocation.task_name,
                duration.as_secs_f64()
            ));
            Ok(())
        } else {
            print_error(&format!(
                "{} failed after {:.2}s",
                invocation.task_name,
                duration.as_secs_f64()
            ));
            anyhow::bail!("{} failed with status: {}", invocation.task_name, status);
        }
    }

    fn capture(&self, invocation: &Invocation) -> Result<String> {
        log::debug!(
            "Capturing output of '{} {}'",
            invocation.program,
            invocation.args.join(" ")
        );
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .output()
            .with_context(|| format!("Failed to execute '{}'", invocation.program))?;

        if !output.status.success() {
            anyhow::bail!(
                "{} failed with status {}: {}",
                invocation.task_name,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        let stdout = String::from_utf8(output.stdout)
            .with_context(|| format!("{} printed non UTF-8 output", invocation.task_name))?;
        Ok(stdout.trim().to_string())
    }
}

/// Prints what would run without running anything.
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        print_command_info(&invocation.program, &invocation.args);
        println!("{}{}(dry run){} {} skipped", BOLD, YELLOW, RESET, invocation.task_name);
        Ok(())
    }

    fn capture(&self, invocation: &Invocation) -> Result<String> {
        print_command_info(&invocation.program, &invocation.args);
        // The last argument is the thing being resolved; echo it back.
        Ok(invocation.args.last().cloned().unwrap_or_default())
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Records invocations and lets tests script their effects.
    #[derive(Default)]
    pub struct RecordingRunner {
        pub calls: RefCell<Vec<Invocation>>,
        /// Runs before a call with the given task name "succeeds".
        pub effects: HashMap<String, Box<dyn Fn(&Invocation)>>,
        /// Task names whose invocation fails.
        pub failing: Vec<String>,
        /// Canned output for `capture`, keyed by task name.
        pub outputs: HashMap<String, String>,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, invocation: &Invocation) -> Result<()> {
            self.calls.borrow_mut().push(invocation.clone());
            if self.failing.contains(&invocation.task_name) {
                anyhow::bail!("{} failed with status: exit status: 1", invocation.task_name);
            }
            if let Some(effect) = self.effects.get(&invocation.task_name) {
                effect(invocation);
            }
            Ok(())
        }

        fn capture(&self, invocation: &Invocation) -> Result<String> {
            self.calls.borrow_mut().push(invocation.clone());
            self.outputs
                .get(&invocation.task_name)
                .cloned()
                .with_context(|| format!("no canned output for {}", invocation.task_name))
        }
    }

    #[test]
    fn test_invocation_builder_collects_args() {
        let inv = Invocation::new("Docs", "cargo", "/tmp")
            .args(["rustdoc"])
            .args(["--package", "motion-core"]);
        assert_eq!(inv.args, vec!["rustdoc", "--package", "motion-core"]);
        assert_eq!(inv.program, "cargo");
    }

    #[test]
    fn test_dry_run_capture_echoes_last_argument() {
        let inv = Invocation::new("Resolve remote", "git", ".").args(["remote", "get-url", "origin"]);
        assert_eq!(DryRunRunner.capture(&inv).unwrap(), "origin");
        assert!(DryRunRunner.is_dry_run());
        assert!(!SystemRunner.is_dry_run());
    }
}
