//! Cue file output and parsing.
//!
//! Cues are exported as numbered blocks:
//!
//! ```text
//! 1
//! 00:00.000 --> 00:05.000
//! one two three four
//!
//! ```
//!
//! Timestamps are `MM:SS.mmm` with unbounded minutes.

use std::path::Path;

use cuesmith_common::error::{CuesmithError, CuesmithResult};
use cuesmith_cue_model::cue::Cue;

/// MIME type offered to the export sink.
pub const CUE_FILE_MIME: &str = "text/plain";

/// Extension of exported cue files.
pub const CUE_FILE_EXTENSION: &str = "srt";

/// File name used when no source name is available.
pub const DEFAULT_EXPORT_NAME: &str = "subtitles.srt";

/// Generate cue file content from an ordered cue list.
///
/// Cues whose text is blank are skipped; numbering stays contiguous.
pub fn generate_cue_file(cues: &[Cue]) -> String {
    let mut output = String::new();
    let mut index = 0usize;

    for cue in cues.iter().filter(|c| !c.is_blank()) {
        index += 1;
        output.push_str(&format!("{index}\n"));
        output.push_str(&format!(
            "{} --> {}\n",
            format_time(cue.start),
            format_time(cue.end),
        ));
        output.push_str(&cue.text);
        output.push_str("\n\n");
    }

    let skipped = cues.len() - index;
    if skipped > 0 {
        tracing::warn!(skipped, "Blank cues left out of export");
    }

    output
}

/// Parse cue file content produced by [`generate_cue_file`].
///
/// Ids are assigned sequentially from zero in file order. Sequence numbers
/// in the file are checked for shape but not for continuity.
pub fn parse_cue_file(content: &str) -> CuesmithResult<Vec<Cue>> {
    let mut cues = Vec::new();
    let mut lines = content.lines().map(|l| l.trim_end_matches('\r')).enumerate().peekable();

    loop {
        while lines.next_if(|(_, l)| l.trim().is_empty()).is_some() {}

        let Some((index_line, index)) = lines.next() else {
            break;
        };
        if index.trim().parse::<u64>().is_err() {
            return Err(CuesmithError::parse(
                index_line + 1,
                format!("expected cue number, found '{index}'"),
            ));
        }

        let (timing_line, timing) = lines
            .next()
            .ok_or_else(|| CuesmithError::parse(index_line + 2, "missing timing line"))?;
        let (start, end) = parse_time_range(timing)
            .ok_or_else(|| CuesmithError::parse(timing_line + 1, format!("bad timing '{timing}'")))?;

        let mut text_lines = Vec::new();
        while let Some((_, line)) = lines.next_if(|(_, l)| !l.trim().is_empty()) {
            text_lines.push(line);
        }

        cues.push(Cue::new(cues.len() as u64, start, end, text_lines.join("\n")));
    }

    Ok(cues)
}

/// Format seconds as `MM:SS.mmm`.
///
/// Negative and non-finite values format as `00:00.000`.
pub fn format_time(secs: f64) -> String {
    let total_ms = if secs.is_finite() && secs > 0.0 {
        (secs * 1000.0).round() as u64
    } else {
        0
    };
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{minutes:02}:{seconds:02}.{millis:03}")
}

/// Parse a `MM:SS.mmm` timestamp typed by the user.
///
/// Any other shape yields `0.0`; callers re-validate the cue span before
/// committing the value.
pub fn parse_time(input: &str) -> f64 {
    try_parse_time(input).unwrap_or(0.0)
}

/// Strict variant of [`parse_time`].
pub fn try_parse_time(input: &str) -> Option<f64> {
    let (minutes, rest) = input.trim().split_once(':')?;
    let (seconds, millis) = rest.split_once('.')?;

    if !is_digits(minutes, 1, usize::MAX) || !is_digits(seconds, 1, 2) || !is_digits(millis, 1, 3)
    {
        return None;
    }

    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;
    // "5" after the dot means half a second, like a decimal fraction.
    let fraction: f64 = format!("0.{millis}").parse().ok()?;

    Some(minutes as f64 * 60.0 + seconds as f64 + fraction)
}

fn is_digits(s: &str, min_len: usize, max_len: usize) -> bool {
    (min_len..=max_len).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_time_range(line: &str) -> Option<(f64, f64)> {
    let (a, b) = line.split_once("-->")?;
    Some((try_parse_time(a)?, try_parse_time(b)?))
}

/// Export file name derived from the uploaded audio's name.
///
/// `interview.final.mp3` becomes `interview.final.srt`.
pub fn export_filename(source_name: Option<&str>) -> String {
    source_name
        .map(Path::new)
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .map(|stem| format!("{stem}.{CUE_FILE_EXTENSION}"))
        .unwrap_or_else(|| DEFAULT_EXPORT_NAME.to_string())
}

/// Save cues to a file.
pub fn save_cue_file(cues: &[Cue], path: &Path) -> CuesmithResult<()> {
    std::fs::write(path, generate_cue_file(cues))?;
    tracing::info!(path = %path.display(), cues = cues.len(), "Cue file written");
    Ok(())
}

/// Load cues from a file.
pub fn load_cue_file(path: &Path) -> CuesmithResult<Vec<Cue>> {
    if !path.exists() {
        return Err(CuesmithError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    parse_cue_file(&std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Cue> {
        vec![
            Cue::new(0, 0.0, 5.0, "one two three four"),
            Cue::new(1, 5.0, 10.0, "five six seven eight"),
        ]
    }

    #[test]
    fn test_cue_file_generation() {
        assert_eq!(
            generate_cue_file(&sample()),
            "1\n00:00.000 --> 00:05.000\none two three four\n\n\
             2\n00:05.000 --> 00:10.000\nfive six seven eight\n\n"
        );
    }

    #[test]
    fn test_blank_cues_skipped_and_renumbered() {
        let mut cues = sample();
        cues.insert(1, Cue::new(7, 4.0, 5.0, "   "));
        let out = generate_cue_file(&cues);
        assert!(out.contains("2\n00:05.000 --> 00:10.000\nfive six seven eight"));
        assert!(!out.contains("3\n"));
        assert!(!out.contains("00:04.000"));
    }

    #[test]
    fn test_empty_list_exports_nothing() {
        assert_eq!(generate_cue_file(&[]), "");
    }

    #[test]
    fn test_time_formatting() {
        assert_eq!(format_time(0.0), "00:00.000");
        assert_eq!(format_time(5.0), "00:05.000");
        assert_eq!(format_time(61.5), "01:01.500");
        assert_eq!(format_time(3725.042), "62:05.042");
        assert_eq!(format_time(-2.0), "00:00.000");
        assert_eq!(format_time(f64::NAN), "00:00.000");
    }

    #[test]
    fn test_time_parsing() {
        assert!((parse_time("01:01.500") - 61.5).abs() < 1e-9);
        assert!((parse_time("62:05.042") - 3725.042).abs() < 1e-9);
        assert!((parse_time(" 00:03.5 ") - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_time_parses_to_zero() {
        for input in [
            "not-a-time",
            "",
            "01:02",
            "1:02:03.000",
            "01:02.",
            "01:02.1234",
            "-1:02.000",
            "aa:02.000",
            "01:123.000",
        ] {
            assert_eq!(parse_time(input), 0.0, "input {input:?}");
        }
    }

    #[test]
    fn test_parse_cue_file() {
        let content = "1\r\n00:00.000 --> 00:05.000\r\none two\r\nthree four\r\n\r\n\n\
                       2\n00:05.000 --> 00:10.000\nfive six seven eight\n";
        let cues = parse_cue_file(content).unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "one two\nthree four");
        assert_eq!(cues[1], Cue::new(1, 5.0, 10.0, "five six seven eight"));
    }

    #[test]
    fn test_parse_cue_file_reports_line() {
        let err = parse_cue_file("1\n00:00.000 -> 00:05.000\nhello\n").unwrap_err();
        assert!(matches!(err, CuesmithError::Parse { line: 2, .. }));

        let err = parse_cue_file("\n\nintro\n").unwrap_err();
        assert!(matches!(err, CuesmithError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_generated_file_reads_back() {
        let cues = sample();
        assert_eq!(parse_cue_file(&generate_cue_file(&cues)).unwrap(), cues);
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename(Some("talk.mp3")), "talk.srt");
        assert_eq!(export_filename(Some("interview.final.wav")), "interview.final.srt");
        assert_eq!(export_filename(Some("noext")), "noext.srt");
        assert_eq!(export_filename(None), "subtitles.srt");
        assert_eq!(export_filename(Some("")), "subtitles.srt");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn time_round_trip_within_a_millisecond(t in 0.0f64..3600.0) {
                let parsed = parse_time(&format_time(t));
                prop_assert!((parsed - t).abs() <= 0.001, "{} -> {}", t, parsed);
            }
        }
    }
}
