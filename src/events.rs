use crate::error::Result;
use crate::grid::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

/// Everything the navigator reports while it runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// The agent stepped onto a cell
    Moved { to: Position },
    /// A newly seen obstacle blocks the route ahead
    PathImpassable { at: Position },
    /// Objective number `objective` (1-based) was reached
    ObjectiveReached { objective: usize },
    /// An unlock alternative was committed after reaching `objective`
    AlternativeChosen { objective: usize, alternative: u32 },
    /// No alternative offered at `objective` could be used
    NoViableAlternative { objective: usize },
    /// Objective `objective` cannot be reached; the run stops here
    ObjectiveUnreachable { objective: usize },
}

/// One transcript line per event
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Moved { to } => write!(f, "Moving to {}", to),
            Event::PathImpassable { .. } => write!(f, "Path is impassable!"),
            Event::ObjectiveReached { objective } => write!(f, "Objective {} reached!", objective),
            Event::AlternativeChosen { alternative, .. } => write!(f, "Number {} is chosen!", alternative),
            Event::NoViableAlternative { objective } => {
                write!(f, "No option is viable for objective {}!", objective)
            }
            Event::ObjectiveUnreachable { objective } => {
                write!(f, "Objective {} cannot be reached!", objective)
            }
        }
    }
}

/// Receiver for navigator events
pub trait EventSink {
    fn record(&mut self, event: &Event);
}

impl EventSink for Vec<Event> {
    fn record(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn record(&mut self, event: &Event) {
        (**self).record(event);
    }
}

/// Forward each event to both sinks
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn record(&mut self, event: &Event) {
        self.0.record(event);
        self.1.record(event);
    }
}

/// Logged event with its position in the run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// 0-based index in the run
    pub sequence: usize,
    #[serde(flatten)]
    pub event: Event,
}

/// In-memory event recorder
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<LoggedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog { events: Vec::new() }
    }

    /// Get all logged events
    pub fn get_events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// The bare events, in order
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().map(|logged| &logged.event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a log written by `save_to_file`
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let events: Vec<LoggedEvent> = serde_json::from_str(&json)?;
        Ok(EventLog { events })
    }

    /// The run as transcript text, one line per event
    pub fn transcript(&self) -> String {
        let mut text = String::new();
        for event in self.events() {
            text.push_str(&event.to_string());
            text.push('\n');
        }
        text
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut moves = 0;
        let mut replans = 0;
        let mut reached = 0;
        let mut chosen = 0;
        let mut declined = 0;
        let mut blocked = None;

        for event in self.events() {
            match event {
                Event::Moved { .. } => moves += 1,
                Event::PathImpassable { .. } => replans += 1,
                Event::ObjectiveReached { .. } => reached += 1,
                Event::AlternativeChosen { .. } => chosen += 1,
                Event::NoViableAlternative { .. } => declined += 1,
                Event::ObjectiveUnreachable { objective } => blocked = Some(*objective),
            }
        }

        let status = match blocked {
            Some(objective) => format!("aborted at objective {}", objective),
            None => "completed".to_string(),
        };

        format!(
            "Run {}\n\
             Total Events: {}\n\
             Movement: {} moves, {} reported replans\n\
             Objectives: {} reached\n\
             Decisions: {} chosen, {} without a viable option",
            status,
            self.events.len(),
            moves,
            replans,
            reached,
            chosen,
            declined
        )
    }
}

impl EventSink for EventLog {
    fn record(&mut self, event: &Event) {
        self.events.push(LoggedEvent {
            sequence: self.events.len(),
            event: event.clone(),
        });
    }
}

/// Writes the transcript line by line as events arrive.
///
/// The first write error is kept and returned by `finish`; later events are
/// dropped.
pub struct TranscriptWriter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> TranscriptWriter<W> {
    pub fn new(out: W) -> Self {
        TranscriptWriter { out, error: None }
    }

    /// Flush and hand back the writer, or the first error seen
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> EventSink for TranscriptWriter<W> {
    fn record(&mut self, event: &Event) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", event) {
            self.error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_run() -> Vec<Event> {
        vec![
            Event::Moved { to: Position::new(1, 0) },
            Event::PathImpassable { at: Position::new(1, 0) },
            Event::Moved { to: Position::new(1, 1) },
            Event::ObjectiveReached { objective: 1 },
            Event::AlternativeChosen { objective: 1, alternative: 3 },
            Event::NoViableAlternative { objective: 2 },
            Event::ObjectiveUnreachable { objective: 3 },
        ]
    }

    #[test]
    fn test_transcript_lines() {
        let lines: Vec<String> = sample_run().iter().map(Event::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "Moving to 1-0",
                "Path is impassable!",
                "Moving to 1-1",
                "Objective 1 reached!",
                "Number 3 is chosen!",
                "No option is viable for objective 2!",
                "Objective 3 cannot be reached!",
            ]
        );
    }

    #[test]
    fn test_event_log_numbers_events() {
        let mut log = EventLog::new();
        for event in sample_run() {
            log.record(&event);
        }
        assert_eq!(log.len(), 7);
        assert_eq!(log.get_events()[4].sequence, 4);
        assert!(log.transcript().starts_with("Moving to 1-0\nPath is impassable!\n"));
        assert!(log.summary().contains("aborted at objective 3"));
        assert!(log.summary().contains("2 moves, 1 reported replans"));
    }

    #[test]
    fn test_json_shape() {
        let mut log = EventLog::new();
        log.record(&Event::AlternativeChosen { objective: 2, alternative: 4 });
        let json = serde_json::to_value(log.get_events()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "sequence": 0, "event": "alternative_chosen", "objective": 2, "alternative": 4 }
            ])
        );
    }

    #[test]
    fn test_transcript_writer_and_fan_out() {
        let mut recorded: Vec<Event> = Vec::new();
        let mut writer = TranscriptWriter::new(Vec::new());
        {
            let mut both = (&mut recorded, &mut writer);
            for event in sample_run().iter().take(2) {
                both.record(event);
            }
        }
        let bytes = writer.finish().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "Moving to 1-0\nPath is impassable!\n");
        assert_eq!(recorded.len(), 2);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_and_load_keep_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut name = format!("fogwalk_events_{}_", std::process::id()).into_bytes();
        name.extend_from_slice(b"\xff.json");
        let path = std::env::temp_dir().join(OsStr::from_bytes(&name));

        let mut log = EventLog::new();
        for event in sample_run() {
            log.record(&event);
        }
        log.save_to_file(&path).unwrap();
        assert!(path.exists());
        let loaded = EventLog::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.get_events(), log.get_events());
    }
}
