// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The fixed-order setup pipeline.

use tracing::{debug, info};
use zonegeom_model::{ConstructionRegistry, Diagnostics, GeometryContext, SurfaceModel};

use crate::error::Result;
use crate::grouper::build_enclosures;
use crate::input::GeometryInput;
use crate::reconcile::{reconcile, ReconcileOutput};
use crate::volume::compute_zone_geometry;

/// The finished model plus everything the run recorded about the input.
///
/// `diagnostics.should_halt()` is the caller's go/no-go verdict; the model
/// is fully populated either way so reporting can describe what was wrong.
pub struct ProcessOutput {
    pub model: SurfaceModel,
    pub diagnostics: Diagnostics,
}

/// Runs the whole geometry setup phase: collection and vertex processing,
/// reconciliation and canonical reordering, zone volume work, and
/// enclosure grouping.
///
/// Fatal contract violations (dangling name references, ordering bugs)
/// return an [`Error`](crate::Error); everything recoverable lands in the
/// returned diagnostics.
pub fn process_surfaces(
    ctx: &GeometryContext,
    input: &GeometryInput,
    constructions: &ConstructionRegistry,
) -> Result<ProcessOutput> {
    let mut diagnostics = Diagnostics::new(ctx.display_extra_warnings);

    debug!(
        zones = input.zones.len(),
        surfaces = input.surfaces.len(),
        subsurfaces = input.subsurfaces.len(),
        "collecting surface geometry"
    );
    let ReconcileOutput {
        surfaces,
        mut zones,
        report_order,
    } = reconcile(ctx, input, constructions, &mut diagnostics)?;

    compute_zone_geometry(&surfaces, &mut zones, &mut diagnostics);
    let (radiant_enclosures, solar_enclosures) = build_enclosures(&surfaces, &mut zones);

    diagnostics.emit_summary();
    info!(
        surfaces = surfaces.len(),
        zones = zones.len(),
        enclosures = radiant_enclosures.len(),
        severe = diagnostics.severe_count(),
        "geometry setup complete"
    );

    Ok(ProcessOutput {
        model: SurfaceModel {
            surfaces,
            zones,
            report_order,
            radiant_enclosures,
            solar_enclosures,
        },
        diagnostics,
    })
}
