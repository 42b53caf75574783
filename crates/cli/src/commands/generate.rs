// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `aeolus generate <file> --target <target>` - Emit a pipeline for one CI system

use super::load_merged;
use crate::config::{Config, ProducerKind, JAR_ENV};
use crate::error::AeolusError;
use crate::output;
use aeolus_adapters::{
    BashSyntaxChecker, DockerPlanSpecProducer, JarPlanSpecProducer, TracedPlanSpecProducer,
};
use aeolus_core::{PlanSpecProducer, Target};
use aeolus_generators::{BambooGenerator, CliGenerator, Generator, JenkinsGenerator};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct GenerateArgs {
    /// Windfile to generate from
    pub file: PathBuf,

    /// CI system to generate for (cli, jenkins, bamboo)
    #[arg(short, long)]
    pub target: Target,

    /// Syntax-check the generated script (cli target only)
    #[arg(long)]
    pub check: bool,

    /// Write the artifact to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// How Bamboo plan specs are produced, overriding the config
    #[arg(long, value_enum)]
    pub producer: Option<ProducerKind>,
}

pub fn generate(args: GenerateArgs, config: &Config, verbose: bool) -> Result<()> {
    let windfile = load_merged(&args.file, verbose)?;
    if let Some(targets) = &windfile.metadata.targets {
        if !targets.contains(&args.target) {
            tracing::warn!(platform = %args.target, "windfile does not list this target");
        }
    }
    if args.check && args.target != Target::Cli {
        tracing::warn!(platform = %args.target, "--check only applies to the cli target");
    }

    let table = config.environment_table(args.target);
    let fail = |e| AeolusError::generate_failed(args.target.as_str(), e);
    let content = match args.target {
        Target::Cli => {
            let generator = CliGenerator::with_environment(table);
            let content = generator.generate(&windfile).map_err(fail)?;
            if args.check {
                generator
                    .check(&content, &BashSyntaxChecker::new())
                    .map_err(fail)?;
            }
            content
        }
        Target::Jenkins => JenkinsGenerator::with_environment(table)
            .generate(&windfile)
            .map_err(fail)?,
        Target::Bamboo => {
            let producer = producer(config, args.producer)?;
            BambooGenerator::new(TracedPlanSpecProducer::new(producer))
                .with_environment(table)
                .generate(&windfile)
                .map_err(fail)?
        }
    };

    output::emit(&content, args.output.as_deref())
}

fn producer(config: &Config, kind: Option<ProducerKind>) -> Result<Box<dyn PlanSpecProducer>> {
    let bamboo = &config.bamboo;
    match kind.unwrap_or(bamboo.producer) {
        ProducerKind::Docker => Ok(Box::new(match &bamboo.image {
            Some(image) => DockerPlanSpecProducer::new(image.clone()),
            None => DockerPlanSpecProducer::default(),
        })),
        ProducerKind::Jar => {
            let jar = bamboo.jar.clone().ok_or_else(|| {
                AeolusError::new("no bamboo generator jar configured")
                    .with_context("The jar producer runs the generator with a local JVM")
                    .with_suggestion(format!("Set {} to the generator jar", JAR_ENV))
                    .with_suggestion("Set `jar` in the [bamboo] section of the config")
                    .with_suggestion("Use the container instead: --producer docker")
            })?;
            let mut producer = JarPlanSpecProducer::new(jar);
            if let Some(java) = &bamboo.java {
                producer = producer.with_java(java.clone());
            }
            Ok(Box::new(producer))
        }
    }
}
