//! HID control-channel traits

use crate::HidCommonResult;

/// Capability to push a feature report to the device.
///
/// This is the only device I/O the protocol crates perform. Implementations
/// return the number of bytes accepted; any `Err` counts as a failed write.
pub trait FeatureReportWriter {
    fn write_feature_report(&mut self, data: &[u8]) -> HidCommonResult<usize>;
}

impl<W: FeatureReportWriter + ?Sized> FeatureReportWriter for &mut W {
    fn write_feature_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        (**self).write_feature_report(data)
    }
}

impl<W: FeatureReportWriter + ?Sized> FeatureReportWriter for Box<W> {
    fn write_feature_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        (**self).write_feature_report(data)
    }
}

pub mod mock {
    use super::*;
    use crate::HidCommonError;
    use tracing::trace;

    /// Scripted feature-report writer.
    ///
    /// Every call is recorded in the attempt log, including the ones that are
    /// made to fail, so tests can count retries.
    #[derive(Debug, Default)]
    pub struct MockFeatureWriter {
        attempts: Vec<Vec<u8>>,
        accepted: Vec<Vec<u8>>,
        pending_failures: usize,
        fail_always: bool,
        disconnected: bool,
    }

    impl MockFeatureWriter {
        pub fn new() -> Self {
            Self::default()
        }

        /// A writer whose every write fails.
        pub fn always_failing() -> Self {
            Self {
                fail_always: true,
                ..Self::default()
            }
        }

        /// Fail the next `count` writes, then accept.
        pub fn fail_next(&mut self, count: usize) -> &mut Self {
            self.pending_failures = count;
            self
        }

        pub fn disconnect(&mut self) {
            self.disconnected = true;
        }

        pub fn reconnect(&mut self) {
            self.disconnected = false;
        }

        /// Every buffer passed to `write_feature_report`, in call order.
        pub fn attempts(&self) -> &[Vec<u8>] {
            &self.attempts
        }

        /// Buffers that were accepted, in call order.
        pub fn accepted(&self) -> &[Vec<u8>] {
            &self.accepted
        }
    }

    impl FeatureReportWriter for MockFeatureWriter {
        fn write_feature_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
            self.attempts.push(data.to_vec());

            if self.disconnected {
                return Err(HidCommonError::Disconnected);
            }
            if self.fail_always {
                return Err(HidCommonError::WriteError("scripted failure".to_string()));
            }
            if self.pending_failures > 0 {
                self.pending_failures -= 1;
                trace!(
                    remaining = self.pending_failures,
                    "mock writer failing feature report"
                );
                return Err(HidCommonError::WriteError("scripted failure".to_string()));
            }

            self.accepted.push(data.to_vec());
            Ok(data.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockFeatureWriter;
    use super::*;
    use crate::HidCommonError;

    #[test]
    fn test_mock_writer_accepts_and_records() -> Result<(), HidCommonError> {
        let mut writer = MockFeatureWriter::new();

        let written = writer.write_feature_report(&[0x03, 0x20])?;
        assert_eq!(written, 2);
        assert_eq!(writer.accepted(), &[vec![0x03, 0x20]]);
        assert_eq!(writer.attempts().len(), 1);
        Ok(())
    }

    #[test]
    fn test_mock_writer_scripted_failures() {
        let mut writer = MockFeatureWriter::new();
        writer.fail_next(2);

        assert!(writer.write_feature_report(&[0x03, 0x00]).is_err());
        assert!(writer.write_feature_report(&[0x03, 0x00]).is_err());
        assert!(writer.write_feature_report(&[0x03, 0x00]).is_ok());

        assert_eq!(writer.attempts().len(), 3);
        assert_eq!(writer.accepted().len(), 1);
    }

    #[test]
    fn test_mock_writer_disconnect() {
        let mut writer = MockFeatureWriter::new();
        writer.disconnect();

        let result = writer.write_feature_report(&[0x03, 0x00]);
        assert!(matches!(result, Err(HidCommonError::Disconnected)));

        writer.reconnect();
        assert!(writer.write_feature_report(&[0x03, 0x00]).is_ok());
    }

    #[test]
    fn test_writer_through_mut_reference() {
        fn push(mut writer: impl FeatureReportWriter) -> bool {
            writer.write_feature_report(&[0x06, 0x00]).is_ok()
        }

        let mut writer = MockFeatureWriter::new();
        assert!(push(&mut writer));
        assert_eq!(writer.accepted(), &[vec![0x06, 0x00]]);
    }
}
