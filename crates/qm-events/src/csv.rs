//! CSV event sink.
//!
//! Writes one `events.csv` with a row per event:
//! `time,kind,vehicle_id,link_id`.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{Event, EventHandler, EventsResult};

/// Streams the event log to a CSV file.
///
/// Write errors are stored internally (the [`EventHandler`] interface is
/// infallible) and surfaced by [`finish`](Self::finish) or
/// [`take_error`](Self::take_error).
pub struct CsvEventWriter {
    writer: Writer<File>,
    error: Option<crate::EventsError>,
    finished: bool,
}

impl CsvEventWriter {
    /// Create `events.csv` in `dir` and write the header row.
    pub fn new(dir: &Path) -> EventsResult<Self> {
        let mut writer = Writer::from_path(dir.join("events.csv"))?;
        writer.write_record(["time", "kind", "vehicle_id", "link_id"])?;
        Ok(Self {
            writer,
            error: None,
            finished: false,
        })
    }

    fn write(&mut self, event: &Event) -> EventsResult<()> {
        self.writer.write_record(&[
            event.time.0.to_string(),
            event.kind.as_str().to_string(),
            event.kind.vehicle().0.to_string(),
            event.kind.link().0.to_string(),
        ])?;
        Ok(())
    }

    /// The first write error encountered, if any.
    pub fn take_error(&mut self) -> Option<crate::EventsError> {
        self.error.take()
    }

    /// Flush the underlying file.  Idempotent.
    pub fn finish(&mut self) -> EventsResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }
}

impl EventHandler for CsvEventWriter {
    fn handle_event(&mut self, event: &Event) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write(event) {
            self.error = Some(e);
        }
    }
}
