use std::fs;

use anyhow::{Context, Result, bail};
use ppa_conformance::zonegeom::{ServiceArea, geojson};
use ppa_conformance::{
    HarnessSettings, PrecomputedBoundary, ReferenceModel, TractDirectory, load_config, reconcile, verify_zone,
};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::VerifyArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let settings = match &args.settings {
        Some(path) => HarnessSettings::load(path)?,
        None => HarnessSettings::default(),
    };

    let requests = reconcile(&config.registration_requests, &config.conditional_registration_data)?;

    let zone_bytes = fs::read(&args.zone)
        .with_context(|| format!("Failed to read zone file: {}", args.zone.display()))?;
    let candidate = geojson::read_geometry_bytes(&zone_bytes)
        .with_context(|| format!("Failed to parse zone file: {}", args.zone.display()))?;

    let reference = PrecomputedBoundary::from_file(&args.reference)?
        .compute_boundary(&requests, &config.pal_records)?;

    let tracts = TractDirectory::new(&args.tracts);
    let service_area = ServiceArea::from_descriptors(&config.area_identifiers(), &tracts)
        .context("Failed to build service area")?;

    if cli.verbose > 0 {
        eprintln!("[verify] {} device(s), {} tract(s)", requests.len(), service_area.descriptors().len());
    }

    let tolerances = settings.tolerances;
    let verdict = verify_zone(&service_area, &reference, &candidate, &tolerances);
    let s = &verdict.similarity;
    println!(
        "within service area: {} (outside area {})",
        verdict.containment.within, verdict.containment.outside_area,
    );
    println!(
        "non-overlapping area: {} (allowed {}, reference area {}, zone area {})",
        s.symmetric_difference, s.allowed, s.reference_area, s.candidate_area,
    );

    if let Err(err) = verdict.into_result(&candidate, &tolerances) {
        bail!("FAIL: {err}");
    }
    println!("PASS");
    Ok(())
}
