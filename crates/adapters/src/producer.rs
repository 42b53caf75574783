// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-backed Bamboo plan spec producers

use aeolus_core::{PlanSpecProducer, ProducerError, ProducerOutput};
use std::path::PathBuf;
use std::process::Command;

/// Image used when none is configured
pub const DEFAULT_GENERATOR_IMAGE: &str = "ghcr.io/ls1intum/aeolus/bamboo-generator:nightly";

/// Runs the generator jar with a local JVM
#[derive(Debug, Clone)]
pub struct JarPlanSpecProducer {
    java: String,
    jar: PathBuf,
}

impl JarPlanSpecProducer {
    pub fn new(jar: impl Into<PathBuf>) -> Self {
        Self {
            java: "java".to_string(),
            jar: jar.into(),
        }
    }

    /// Use a specific java executable instead of the one on `PATH`
    pub fn with_java(mut self, java: impl Into<String>) -> Self {
        self.java = java.into();
        self
    }
}

impl PlanSpecProducer for JarPlanSpecProducer {
    fn produce(&self, encoded: &str) -> Result<ProducerOutput, ProducerError> {
        let mut command = Command::new(&self.java);
        command.arg("-jar").arg(&self.jar).arg("--base64").arg(encoded);
        run(&self.java, command)
    }
}

/// Runs the generator image with docker
#[derive(Debug, Clone)]
pub struct DockerPlanSpecProducer {
    image: String,
}

impl DockerPlanSpecProducer {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
        }
    }

    pub fn image(&self) -> &str {
        &self.image
    }
}

impl Default for DockerPlanSpecProducer {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATOR_IMAGE)
    }
}

impl PlanSpecProducer for DockerPlanSpecProducer {
    fn produce(&self, encoded: &str) -> Result<ProducerOutput, ProducerError> {
        let mut command = Command::new("docker");
        command
            .args(["run", "--rm"])
            .arg(&self.image)
            .arg("--base64")
            .arg(encoded);
        run("docker", command)
    }
}

fn run(program: &str, mut command: Command) -> Result<ProducerOutput, ProducerError> {
    let output = command.output().map_err(|source| ProducerError::Launch {
        program: program.to_string(),
        source,
    })?;
    let exit_code = output.status.code().ok_or(ProducerError::Terminated)?;
    Ok(ProducerOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code,
    })
}

#[cfg(test)]
#[path = "producer_tests.rs"]
mod tests;
