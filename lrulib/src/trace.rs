use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// The kind of memory operation a trace record describes
///
/// A modify stands for a load immediately followed by a store to the same
/// address, so the engine runs twice for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Load,
    Store,
    Modify,
}

/// One memory access pulled from a trace, in original trace order
///
/// The size is carried for display purposes only; the simulation tracks
/// line metadata, not bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessEvent {
    pub kind: AccessKind,
    pub address: u64,
    pub size: u16,
}

/// Failures while reading or parsing a trace. All of them end the run; a
/// trace is a recorded artefact, so there is nothing to retry
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("couldn't read the trace file: {0}")]
    Io(#[from] std::io::Error),
    #[error("the trace file is not text: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("line {line}: unrecognised trace record `{text}`")]
    Malformed { line: usize, text: String },
}

lazy_static! {
    // Valgrind memory trace records: instruction fetches start in the first
    // column, data accesses are indented by one space, e.g.
    //   "I  0400d7d4,8" / " M 0421c7f0,4" / " L 04f6b868,8"
    static ref RECORD: Regex =
        Regex::new(r"^\s?(?P<op>[ILSM])\s+(?P<addr>[0-9a-fA-F]+),(?P<size>[0-9]+)\s*$").unwrap();
}

/// Parses a whole valgrind trace into access events
///
/// Instruction fetch records are filtered out here; the engine only ever sees
/// data accesses. Blank lines are skipped. Anything else fails the parse with
/// the offending line
///
/// # Arguments
///
/// * `input`: The trace text
///
/// returns: Result<Vec<AccessEvent>, TraceError>
pub fn parse_trace(input: &str) -> Result<Vec<AccessEvent>, TraceError> {
    let mut events = Vec::new();
    for (number, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let malformed = || TraceError::Malformed {
            line: number + 1,
            text: line.to_string(),
        };
        let record = RECORD.captures(line).ok_or_else(|| malformed())?;
        let op = &record["op"];
        if op == "I" {
            continue;
        }
        let kind = match op {
            "L" => AccessKind::Load,
            "S" => AccessKind::Store,
            _ => AccessKind::Modify,
        };
        // from_str_radix rejects addresses wider than 64 bits
        let address = u64::from_str_radix(&record["addr"], 16).map_err(|_| malformed())?;
        let size = record["size"].parse().map_err(|_| malformed())?;
        events.push(AccessEvent {
            kind,
            address,
            size,
        });
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_three_data_access_kinds() {
        let trace = " L 04f6b868,8\n S 7ff0005c8,8\n M 0421c7f0,4\n";
        let events = parse_trace(trace).unwrap();
        assert_eq!(
            events,
            vec![
                AccessEvent {
                    kind: AccessKind::Load,
                    address: 0x04f6_b868,
                    size: 8
                },
                AccessEvent {
                    kind: AccessKind::Store,
                    address: 0x7_ff00_05c8,
                    size: 8
                },
                AccessEvent {
                    kind: AccessKind::Modify,
                    address: 0x0421_c7f0,
                    size: 4
                },
            ]
        );
    }

    #[test]
    fn skips_instruction_fetches_and_blank_lines() {
        let trace = "I  0400d7d4,8\n\n L 10,1\nI  0400d7e0,4\n";
        let events = parse_trace(trace).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, AccessKind::Load);
    }

    #[test]
    fn reports_the_line_of_a_malformed_record() {
        let trace = " L 10,1\n X 20,4\n";
        match parse_trace(trace).unwrap_err() {
            TraceError::Malformed { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, " X 20,4");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_addresses_wider_than_sixty_four_bits() {
        let trace = " L 10000000000000000,1\n";
        assert!(matches!(
            parse_trace(trace).unwrap_err(),
            TraceError::Malformed { line: 1, .. }
        ));
    }

    #[test]
    fn an_empty_trace_is_valid() {
        assert!(parse_trace("").unwrap().is_empty());
    }
}
