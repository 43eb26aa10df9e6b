//! Top-level report dispatch.

use crate::error::ReportError;
use crate::event::{EventBatch, EventSink};
use crate::intuos4::SubReportAnomalies;
use crate::state::DeviceState;
use crate::types::TabletVariant;
use crate::{graphire, intuos4};

/// Result of routing one buffer that was accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutedReport {
    /// Events in emission order.
    pub events: EventBatch,
    /// Sub-reports that were skipped as unknown.
    pub anomalies: SubReportAnomalies,
}

/// Decode one delivered buffer for `variant`.
///
/// On `Err(UnrecognizedReport)` the state has not been modified.
pub fn route(
    variant: TabletVariant,
    data: &[u8],
    state: &mut DeviceState,
) -> Result<RoutedReport, ReportError> {
    let mut routed = RoutedReport::default();
    match variant {
        TabletVariant::Graphire => graphire::decode(data, state, &mut routed.events)?,
        TabletVariant::Intuos4 => {
            routed.anomalies = intuos4::decode(data, state, &mut routed.events)?;
        }
    }
    Ok(routed)
}

/// [`route`], then hand the events to `sink` in order.
pub fn route_to_sink(
    variant: TabletVariant,
    data: &[u8],
    state: &mut DeviceState,
    sink: &mut dyn EventSink,
) -> Result<RoutedReport, ReportError> {
    let routed = route(variant, data, state)?;
    for event in &routed.events {
        sink.emit(*event);
    }
    Ok(routed)
}
