//! Simulated control channel for offline speed negotiation.

use opentablet_hid_common::mock::MockFeatureWriter;
use opentablet_hid_common::{FeatureReportWriter, HidCommonResult};
use tracing::{info, warn};

/// Feature-report writer that rejects its first `fail_writes` writes and
/// logs every attempt.
#[derive(Debug)]
pub struct SimulatedWriter {
    inner: MockFeatureWriter,
}

impl SimulatedWriter {
    pub fn new(fail_writes: usize) -> Self {
        let mut inner = MockFeatureWriter::new();
        inner.fail_next(fail_writes);
        Self { inner }
    }

    pub fn attempts(&self) -> usize {
        self.inner.attempts().len()
    }

    pub fn accepted(&self) -> &[Vec<u8>] {
        self.inner.accepted()
    }
}

impl FeatureReportWriter for SimulatedWriter {
    fn write_feature_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        match self.inner.write_feature_report(data) {
            Ok(n) => {
                info!("feature report {:02x?} accepted", data);
                Ok(n)
            }
            Err(e) => {
                warn!("feature report {:02x?} rejected: {}", data, e);
                Err(e)
            }
        }
    }
}
