// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structured diagnostics with the warning/severe/fatal taxonomy.
//!
//! Geometry code records events unconditionally; throttling only affects
//! what gets emitted through `tracing`, never what is recorded, and control
//! flow never depends on throttle state. The caller reads
//! [`Diagnostics::should_halt`] after all validation to decide whether the
//! run proceeds — severe findings accumulate rather than aborting
//! mid-validation.

use rustc_hash::FxHashMap;

/// How bad a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Recorded; the run proceeds.
    Warning,
    /// Recorded; the run halts after validation completes.
    Severe,
    /// The setup phase cannot continue at all.
    Fatal,
}

/// Stable code identifying a class of finding. Counts per code are a
/// meaningful output; message text is not a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    CoincidentVerticesRemoved,
    CollinearVerticesRemoved,
    DegenerateSurface,
    NonPlanarSurface,
    NonConvexSurface,
    UpsideDownSurfaceFixed,
    ImplausibleTiltAfterFix,
    IgnoredZoneTransforms,
    BlankBoundaryDefaulted,
    InterzoneSameZone,
    InterzoneNotReciprocal,
    InterzoneConstructionMismatch,
    InterzoneConstructionNotReversed,
    InterzoneAreaMismatch,
    InterzoneTiltMismatch,
    InterzoneClassMismatch,
    ExposureCleared,
    SubsurfaceClassIllegal,
    BaseSurfaceMissing,
    ConstructionMissing,
    FrameAreaExceedsBase,
    DividerAreaExceedsGlazing,
    NegativeOrZeroArea,
    SurfaceCountMismatch,
    ZoneHasNoHeatTransferSurfaces,
    ZoneNotEnclosed,
    ZoneVolumeMismatch,
    ZoneFloorAreaMismatch,
    ZoneCeilingHeightMismatch,
    ZoneVolumeDefaulted,
    AirBoundaryNotInterzone,
    SubsurfaceBeforeBase,
}

impl Code {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CoincidentVerticesRemoved => "CoincidentVerticesRemoved",
            Self::CollinearVerticesRemoved => "CollinearVerticesRemoved",
            Self::DegenerateSurface => "DegenerateSurface",
            Self::NonPlanarSurface => "NonPlanarSurface",
            Self::NonConvexSurface => "NonConvexSurface",
            Self::UpsideDownSurfaceFixed => "UpsideDownSurfaceFixed",
            Self::ImplausibleTiltAfterFix => "ImplausibleTiltAfterFix",
            Self::IgnoredZoneTransforms => "IgnoredZoneTransforms",
            Self::BlankBoundaryDefaulted => "BlankBoundaryDefaulted",
            Self::InterzoneSameZone => "InterzoneSameZone",
            Self::InterzoneNotReciprocal => "InterzoneNotReciprocal",
            Self::InterzoneConstructionMismatch => "InterzoneConstructionMismatch",
            Self::InterzoneConstructionNotReversed => "InterzoneConstructionNotReversed",
            Self::InterzoneAreaMismatch => "InterzoneAreaMismatch",
            Self::InterzoneTiltMismatch => "InterzoneTiltMismatch",
            Self::InterzoneClassMismatch => "InterzoneClassMismatch",
            Self::ExposureCleared => "ExposureCleared",
            Self::SubsurfaceClassIllegal => "SubsurfaceClassIllegal",
            Self::BaseSurfaceMissing => "BaseSurfaceMissing",
            Self::ConstructionMissing => "ConstructionMissing",
            Self::FrameAreaExceedsBase => "FrameAreaExceedsBase",
            Self::DividerAreaExceedsGlazing => "DividerAreaExceedsGlazing",
            Self::NegativeOrZeroArea => "NegativeOrZeroArea",
            Self::SurfaceCountMismatch => "SurfaceCountMismatch",
            Self::ZoneHasNoHeatTransferSurfaces => "ZoneHasNoHeatTransferSurfaces",
            Self::ZoneNotEnclosed => "ZoneNotEnclosed",
            Self::ZoneVolumeMismatch => "ZoneVolumeMismatch",
            Self::ZoneFloorAreaMismatch => "ZoneFloorAreaMismatch",
            Self::ZoneCeilingHeightMismatch => "ZoneCeilingHeightMismatch",
            Self::ZoneVolumeDefaulted => "ZoneVolumeDefaulted",
            Self::AirBoundaryNotInterzone => "AirBoundaryNotInterzone",
            Self::SubsurfaceBeforeBase => "SubsurfaceBeforeBase",
        }
    }

    /// Codes that occur per-vertex or per-surface on large models and get
    /// first-occurrence-plus-summary treatment.
    pub fn is_throttled(self) -> bool {
        matches!(
            self,
            Self::CoincidentVerticesRemoved
                | Self::CollinearVerticesRemoved
                | Self::DegenerateSurface
                | Self::BlankBoundaryDefaulted
        )
    }
}

/// One recorded finding.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Code,
    pub message: String,
    /// Name of the surface or zone the finding is about, when applicable.
    pub subject: Option<String>,
}

/// Accumulating collector for the whole setup phase.
#[derive(Debug, Default)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
    counts: FxHashMap<Code, usize>,
    severe_count: usize,
    fatal_count: usize,
    verbose: bool,
}

impl Diagnostics {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    fn record(&mut self, severity: Severity, code: Code, subject: Option<String>, message: String) {
        let n = self.counts.entry(code).or_insert(0);
        *n += 1;
        let first = *n == 1;

        // Throttle emission, never recording.
        if self.verbose || first || !code.is_throttled() {
            match severity {
                Severity::Warning => {
                    tracing::warn!(code = code.as_str(), subject = subject.as_deref(), "{message}")
                }
                Severity::Severe | Severity::Fatal => {
                    tracing::error!(code = code.as_str(), subject = subject.as_deref(), "{message}")
                }
            }
        }

        match severity {
            Severity::Severe => self.severe_count += 1,
            Severity::Fatal => self.fatal_count += 1,
            Severity::Warning => {}
        }

        self.events.push(Diagnostic {
            severity,
            code,
            message,
            subject,
        });
    }

    pub fn warn(&mut self, code: Code, subject: impl Into<Option<String>>, message: impl Into<String>) {
        self.record(Severity::Warning, code, subject.into(), message.into());
    }

    pub fn severe(&mut self, code: Code, subject: impl Into<Option<String>>, message: impl Into<String>) {
        self.record(Severity::Severe, code, subject.into(), message.into());
    }

    pub fn fatal(&mut self, code: Code, subject: impl Into<Option<String>>, message: impl Into<String>) {
        self.record(Severity::Fatal, code, subject.into(), message.into());
    }

    /// Occurrences of a given code so far.
    pub fn count(&self, code: Code) -> usize {
        self.counts.get(&code).copied().unwrap_or(0)
    }

    pub fn severe_count(&self) -> usize {
        self.severe_count
    }

    pub fn fatal_count(&self) -> usize {
        self.fatal_count
    }

    /// The accumulate-then-decide verdict: should the caller halt the run
    /// before any thermal calculation?
    pub fn should_halt(&self) -> bool {
        self.severe_count > 0 || self.fatal_count > 0
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    /// Final aggregate counts for throttled codes, emitted once at the end
    /// of the setup phase.
    pub fn emit_summary(&self) {
        for (&code, &n) in &self.counts {
            if code.is_throttled() && n > 1 && !self.verbose {
                tracing::warn!(code = code.as_str(), occurrences = n, "suppressed repeats");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_verdict() {
        let mut d = Diagnostics::new(false);
        assert!(!d.should_halt());

        d.warn(Code::NonPlanarSurface, None, "slightly out of plane");
        d.warn(Code::NonPlanarSurface, None, "slightly out of plane");
        assert_eq!(d.count(Code::NonPlanarSurface), 2);
        assert!(!d.should_halt());

        d.severe(Code::NegativeOrZeroArea, Some("wall-1".to_string()), "zero area");
        assert_eq!(d.severe_count(), 1);
        assert!(d.should_halt());
    }

    #[test]
    fn fatal_halts() {
        let mut d = Diagnostics::new(false);
        d.fatal(Code::ConstructionMissing, None, "no such construction");
        assert!(d.should_halt());
        assert_eq!(d.fatal_count(), 1);
    }

    #[test]
    fn events_keep_subjects() {
        let mut d = Diagnostics::new(true);
        d.warn(Code::DegenerateSurface, Some("tri".to_string()), "degenerate");
        assert_eq!(d.events().len(), 1);
        assert_eq!(d.events()[0].subject.as_deref(), Some("tri"));
    }
}
