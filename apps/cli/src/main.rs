// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: reconcile a plan fixture's area rows with its annotation and
//! report the classified, validated layout.
//!
//! Usage:
//!   floorplan-lite-cli <fixture.json> [options]

use std::env;
use std::fs;

use anyhow::{bail, Context, Result};
use floorplan_lite_classification::ClassificationScheme;
use floorplan_lite_handlers::{
    AreaHandler, AreaRecord, AreaStore, InMemoryRepository, LayoutOptions, NewAreaRecord,
    PlanLayoutHandler, PlanRecord, ReconciliationReport, SiteRecord,
};
use floorplan_lite_layout::{Annotation, LayoutConfig, LayoutSnapshot, LayoutViolation};
use serde::{Deserialize, Serialize};

/// A plan with everything stored about it.
#[derive(Debug, Deserialize)]
struct Fixture {
    site: SiteRecord,
    plan: PlanRecord,
    annotation: Annotation,
    #[serde(default)]
    areas: Vec<NewAreaRecord>,
}

#[derive(Debug, Serialize)]
struct Report {
    scheme: &'static str,
    reconciliation: ReconciliationReport,
    areas: Vec<AreaRecord>,
    net_area_m2: f64,
    room_count: f64,
    blocking_violations: usize,
    violations: Vec<LayoutViolation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<LayoutSnapshot>,
}

struct Options {
    fixture: String,
    raise: bool,
    postprocess: bool,
    georeference: bool,
    include_layout: bool,
    output: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "info,floorplan_lite_handlers=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e:#}");
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&options) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options {
        fixture: args[1].clone(),
        raise: false,
        postprocess: false,
        georeference: false,
        include_layout: false,
        output: None,
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--raise" => options.raise = true,
            "--postprocess" => options.postprocess = true,
            "--georeference" => options.georeference = true,
            "--layout" => options.include_layout = true,
            "--output" => {
                i += 1;
                let path = args.get(i).context("--output needs a path")?;
                options.output = Some(path.clone());
            }
            other => bail!("unknown option: {other}"),
        }
        i += 1;
    }
    Ok(options)
}

fn run(options: &Options) -> Result<()> {
    let json = fs::read_to_string(&options.fixture)
        .with_context(|| format!("cannot read fixture '{}'", options.fixture))?;
    let fixture: Fixture = serde_json::from_str(&json)
        .with_context(|| format!("cannot parse fixture '{}'", options.fixture))?;

    let plan_id = fixture.plan.id;
    let repo = InMemoryRepository::new();
    repo.insert_site(fixture.site);
    repo.insert_plan(fixture.plan);
    repo.insert_annotation(plan_id, fixture.annotation);
    for mut row in fixture.areas {
        row.plan_id = plan_id;
        repo.seed_area(row);
    }

    let config = LayoutConfig::from_env();
    tracing::info!(plan_id, fixture = %options.fixture, "loaded fixture");

    let reconciliation = AreaHandler::new(&repo, config.clone()).recover_and_upsert_areas(plan_id)?;

    let handler = PlanLayoutHandler::new(plan_id, &repo, config);
    let layout = handler.get_layout(
        LayoutOptions::scaled()
            .classified(true)
            .validated(true)
            .postprocessed(options.postprocess)
            .georeferenced(options.georeference)
            .raise_on_inconsistency(options.raise),
    )?;
    let scheme = handler.scheme()?;

    let report = Report {
        scheme: scheme.name(),
        reconciliation,
        areas: repo.find_by_plan(plan_id)?,
        net_area_m2: layout.net_area(scheme),
        room_count: layout.room_count(scheme),
        blocking_violations: layout.violations.iter().filter(|v| v.is_blocking).count(),
        violations: layout.violations.clone(),
        layout: options.include_layout.then(|| layout.to_snapshot()),
    };

    let out = serde_json::to_string_pretty(&report)?;
    match &options.output {
        Some(path) => {
            fs::write(path, out).with_context(|| format!("cannot write report '{path}'"))?;
            tracing::info!(path = %path, "report written");
        }
        None => println!("{out}"),
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: floorplan-lite-cli <fixture.json> [options]");
    eprintln!();
    eprintln!("Reconciles the fixture's area rows with its annotation, then prints");
    eprintln!("the classified and validated layout as JSON.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --raise          Fail when areas cannot be matched unambiguously");
    eprintln!("  --postprocess    Drop areas below FLOORPLAN_MIN_AREA_M2 first");
    eprintln!("  --georeference   Place the layout on the site");
    eprintln!("  --layout         Include the full layout snapshot");
    eprintln!("  --output <path>  Write the report to a file instead of stdout");
}
