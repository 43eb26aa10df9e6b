//! Event and statistics printing.

use crate::config::OutputFormat;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use tablet_hid_wacom_bt_protocol::{Button, DecodeStats, EventSink, InputEvent, Tool};

pub fn tool_label(tool: Tool) -> &'static str {
    match tool {
        Tool::None => "none",
        Tool::Pen => "pen",
        Tool::Eraser => "eraser",
        Tool::MouseWithWheel => "mouse (wheel)",
        Tool::MouseNoWheel => "mouse",
    }
}

pub fn button_label(button: Button) -> String {
    match button {
        Button::Left => "left".to_string(),
        Button::Right => "right".to_string(),
        Button::Middle => "middle".to_string(),
        Button::Touch => "touch".to_string(),
        Button::Stylus => "stylus".to_string(),
        Button::Stylus2 => "stylus2".to_string(),
        Button::Pad(n) => format!("pad{n}"),
    }
}

/// One-line human rendering of an event.
pub fn describe(event: &InputEvent) -> String {
    match *event {
        InputEvent::ToolChanged { tool } => format!("TOOL      {}", tool_label(tool)),
        InputEvent::PositionUpdate { x, y } => format!("POS       x={x} y={y}"),
        InputEvent::PressureUpdate { value } => format!("PRESSURE  {value}"),
        InputEvent::DistanceUpdate { value } => format!("DISTANCE  {value}"),
        InputEvent::ButtonChanged { button, pressed } => format!(
            "BUTTON    {} {}",
            button_label(button),
            if pressed { "down" } else { "up" }
        ),
        InputEvent::WheelDelta { delta } => format!("WHEEL     {delta:+}"),
        InputEvent::ProximityLost => "PROXIMITY lost".to_string(),
        InputEvent::SyncBarrier => "SYNC".to_string(),
        InputEvent::PadActive => "PAD".to_string(),
        InputEvent::ToolIdUpdate { id } => format!("TOOL_ID   {id:#x}"),
        InputEvent::SerialUpdate { serial } => format!("SERIAL    {serial:#x}"),
    }
}

/// Sink that prints each event as it is emitted.
pub struct PrintSink<W: Write> {
    out: W,
    format: OutputFormat,
    error: Option<std::io::Error>,
}

impl<W: Write> PrintSink<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            error: None,
        }
    }

    /// First write error seen, if any. Emission continues regardless.
    pub fn finish(self) -> Result<W> {
        match self.error {
            Some(e) => Err(e.into()),
            None => Ok(self.out),
        }
    }

    fn write_event(&mut self, event: &InputEvent) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Human => writeln!(self.out, "{}", describe(event)),
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, event)?;
                writeln!(self.out)
            }
        }
    }
}

impl<W: Write> EventSink for PrintSink<W> {
    fn emit(&mut self, event: InputEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_event(&event) {
            self.error = Some(e);
        }
    }
}

#[derive(Serialize)]
struct StatsRecord<'a> {
    device: &'a str,
    reports_decoded: u64,
    reports_dropped: u64,
    events_emitted: u64,
    unknown_sub_reports: u64,
}

pub fn write_stats(
    out: &mut impl Write,
    format: OutputFormat,
    device: &str,
    stats: &DecodeStats,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            writeln!(out, "---")?;
            writeln!(out, "Device:              {device}")?;
            writeln!(out, "Reports decoded:     {}", stats.reports_decoded)?;
            writeln!(out, "Reports dropped:     {}", stats.reports_dropped)?;
            writeln!(out, "Events emitted:      {}", stats.events_emitted)?;
            writeln!(out, "Unknown sub-reports: {}", stats.unknown_sub_reports)?;
        }
        OutputFormat::Json => {
            let record = StatsRecord {
                device,
                reports_decoded: stats.reports_decoded,
                reports_dropped: stats.reports_dropped,
                events_emitted: stats.events_emitted,
                unknown_sub_reports: stats.unknown_sub_reports,
            };
            serde_json::to_writer(&mut *out, &record)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_events() {
        assert_eq!(
            describe(&InputEvent::ButtonChanged {
                button: Button::Pad(4),
                pressed: true
            }),
            "BUTTON    pad4 down"
        );
        assert_eq!(describe(&InputEvent::WheelDelta { delta: -1 }), "WHEEL     -1");
        assert_eq!(
            describe(&InputEvent::SerialUpdate { serial: 0xF0 }),
            "SERIAL    0xf0"
        );
    }

    #[test]
    fn test_json_sink_writes_one_line_per_event() -> Result<()> {
        let mut sink = PrintSink::new(Vec::new(), OutputFormat::Json);
        sink.emit(InputEvent::ToolChanged { tool: Tool::Pen });
        sink.emit(InputEvent::SyncBarrier);
        let text = String::from_utf8(sink.finish()?)?;

        assert_eq!(
            text,
            "{\"event\":\"tool_changed\",\"tool\":\"pen\"}\n{\"event\":\"sync_barrier\"}\n"
        );
        Ok(())
    }

    #[test]
    fn test_json_stats_record() -> Result<()> {
        let stats = DecodeStats {
            reports_decoded: 2,
            reports_dropped: 1,
            events_emitted: 9,
            unknown_sub_reports: 0,
        };
        let mut out = Vec::new();
        write_stats(&mut out, OutputFormat::Json, "Wacom Graphire Bluetooth", &stats)?;
        let value: serde_json::Value = serde_json::from_slice(&out)?;

        assert_eq!(value["reports_dropped"], 1);
        assert_eq!(value["device"], "Wacom Graphire Bluetooth");
        Ok(())
    }
}
