//! Fixture synthesis for the `tfc` regression suite.
//!
//! Everything here is literal data: the input corpus and the expected-output
//! oracle are hand-encoded byte and line tables, one per scenario. They are
//! deliberately *not* derived from the normalization rules at runtime — the
//! whole point of an oracle is that it stays independent of the program it
//! judges. If a table ever needs to change, change the bytes by hand and
//! re-reason about them.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::layout::TestLayout;

/// A byte-exact fixture, compared verbatim against the tool's output.
pub struct BinaryFixture {
    pub name: &'static str,
    pub bytes: &'static [u8],
}

/// A line-oriented fixture; written with one `\n` per line and compared
/// line-wise, so line terminators are not part of the contract.
pub struct TextFixture {
    pub name: &'static str,
    pub lines: &'static [&'static str],
}

/// Expected output of `tfc -x`: a two-line record of the input path and
/// eight space-separated counts
/// `total space_only tab_only neither both dos unix malformed`.
pub struct SummaryFixture {
    /// Name of the input fixture this summary describes.
    pub input: &'static str,
    pub counts: &'static str,
}

// --------------------- Summary family (test1..test4) -----------------------
//
// Four 9-line inputs, each mixing all four leading-whitespace classes
// (space-only, tab-only, both, neither) under a single line-ending regime.

/// All CR LF endings.
const TEST1: &[u8] =
    b"\t  Sub 1\r\n \t  CRLF.m\r\n \t\r\n\t \r\n\tH\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n";

/// All LF endings.
const TEST2: &[u8] = b"\t  Sub 1\n \t  LF.m\n \t\n\t \n\tH\ti\n H\ti\nH\ti\nH i\n\n";

/// Six CR LF endings, three LF endings.
const TEST3: &[u8] =
    b"\t  Mix 1\r\n \t  CRLF.m\n \t\r\n\t \n\tH\ti\r\n H\ti\r\nH\ti\nH i\r\n\r\n";

/// All endings reversed to LF CR, i.e. malformed.
const TEST4: &[u8] =
    b"\t  Sub 1\n\r \t  LFCR.m\n\r \t\n\r\t \n\r\tH\ti\n\r H\ti\n\rH\ti\n\rH i\n\r\n\r";

pub const BINARY_INPUTS: &[BinaryFixture] = &[
    BinaryFixture { name: "test1.txt", bytes: TEST1 },
    BinaryFixture { name: "test2.txt", bytes: TEST2 },
    BinaryFixture { name: "test3.txt", bytes: TEST3 },
    BinaryFixture { name: "test4.txt", bytes: TEST4 },
];

pub const SUMMARY_EXPECTED: &[SummaryFixture] = &[
    SummaryFixture { input: "test1.txt", counts: "9 1 1 3 4 9 0 0" },
    SummaryFixture { input: "test2.txt", counts: "9 1 1 3 4 0 9 0" },
    SummaryFixture { input: "test3.txt", counts: "9 1 1 3 4 6 3 0" },
    SummaryFixture { input: "test4.txt", counts: "9 1 1 3 4 0 0 9" },
];

// --------------------- Conversion oracles ----------------------------------
//
// One oracle per (base fixture, conversion) pair. Postfix letters mirror the
// tool flags: s = leading run as spaces, t = leading run as tabs (width 4),
// d = DOS endings, u = Unix endings.

pub const BINARY_EXPECTED: &[BinaryFixture] = &[
    // -s: leading run re-rendered as spaces, endings untouched.
    BinaryFixture {
        name: "test1s.txt",
        bytes: b"      Sub 1\r\n      CRLF.m\r\n    \r\n     \r\n    H\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n",
    },
    BinaryFixture {
        name: "test2s.txt",
        bytes: b"      Sub 1\n      LF.m\n    \n     \n    H\ti\n H\ti\nH\ti\nH i\n\n",
    },
    BinaryFixture {
        name: "test3s.txt",
        bytes: b"      Mix 1\r\n      CRLF.m\n    \r\n     \n    H\ti\r\n H\ti\r\nH\ti\nH i\r\n\r\n",
    },
    BinaryFixture {
        name: "test4s.txt",
        bytes: b"      Sub 1\n\r      LFCR.m\n\r    \n\r     \n\r    H\ti\n\r H\ti\n\rH\ti\n\rH i\n\r\n\r",
    },
    // -t: leading run re-rendered as tabs plus remainder spaces.
    BinaryFixture {
        name: "test1t.txt",
        bytes: b"\t  Sub 1\r\n\t  CRLF.m\r\n\t\r\n\t \r\n\tH\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n",
    },
    BinaryFixture {
        name: "test2t.txt",
        bytes: b"\t  Sub 1\n\t  LF.m\n\t\n\t \n\tH\ti\n H\ti\nH\ti\nH i\n\n",
    },
    BinaryFixture {
        name: "test3t.txt",
        bytes: b"\t  Mix 1\r\n\t  CRLF.m\n\t\r\n\t \n\tH\ti\r\n H\ti\r\nH\ti\nH i\r\n\r\n",
    },
    BinaryFixture {
        name: "test4t.txt",
        bytes: b"\t  Sub 1\n\r\t  LFCR.m\n\r\t\n\r\t \n\r\tH\ti\n\r H\ti\n\rH\ti\n\rH i\n\r\n\r",
    },
    // -d: every ending becomes CR LF, leading runs untouched.
    BinaryFixture {
        name: "test1d.txt",
        bytes: b"\t  Sub 1\r\n \t  CRLF.m\r\n \t\r\n\t \r\n\tH\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n",
    },
    BinaryFixture {
        name: "test2d.txt",
        bytes: b"\t  Sub 1\r\n \t  LF.m\r\n \t\r\n\t \r\n\tH\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n",
    },
    BinaryFixture {
        name: "test3d.txt",
        bytes: b"\t  Mix 1\r\n \t  CRLF.m\r\n \t\r\n\t \r\n\tH\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n",
    },
    BinaryFixture {
        name: "test4d.txt",
        bytes: b"\t  Sub 1\r\n \t  LFCR.m\r\n \t\r\n\t \r\n\tH\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n",
    },
    // -u: every ending becomes LF.
    BinaryFixture {
        name: "test1u.txt",
        bytes: b"\t  Sub 1\n \t  CRLF.m\n \t\n\t \n\tH\ti\n H\ti\nH\ti\nH i\n\n",
    },
    BinaryFixture {
        name: "test2u.txt",
        bytes: b"\t  Sub 1\n \t  LF.m\n \t\n\t \n\tH\ti\n H\ti\nH\ti\nH i\n\n",
    },
    BinaryFixture {
        name: "test3u.txt",
        bytes: b"\t  Mix 1\n \t  CRLF.m\n \t\n\t \n\tH\ti\n H\ti\nH\ti\nH i\n\n",
    },
    BinaryFixture {
        name: "test4u.txt",
        bytes: b"\t  Sub 1\n \t  LFCR.m\n \t\n\t \n\tH\ti\n H\ti\nH\ti\nH i\n\n",
    },
    // -s -d
    BinaryFixture {
        name: "test1sd.txt",
        bytes: b"      Sub 1\r\n      CRLF.m\r\n    \r\n     \r\n    H\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n",
    },
    BinaryFixture {
        name: "test2sd.txt",
        bytes: b"      Sub 1\r\n      LF.m\r\n    \r\n     \r\n    H\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n",
    },
    BinaryFixture {
        name: "test3sd.txt",
        bytes: b"      Mix 1\r\n      CRLF.m\r\n    \r\n     \r\n    H\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n",
    },
    BinaryFixture {
        name: "test4sd.txt",
        bytes: b"      Sub 1\r\n      LFCR.m\r\n    \r\n     \r\n    H\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n",
    },
    // -t -d
    BinaryFixture {
        name: "test1td.txt",
        bytes: b"\t  Sub 1\r\n\t  CRLF.m\r\n\t\r\n\t \r\n\tH\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n",
    },
    BinaryFixture {
        name: "test2td.txt",
        bytes: b"\t  Sub 1\r\n\t  LF.m\r\n\t\r\n\t \r\n\tH\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n",
    },
    BinaryFixture {
        name: "test3td.txt",
        bytes: b"\t  Mix 1\r\n\t  CRLF.m\r\n\t\r\n\t \r\n\tH\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n",
    },
    BinaryFixture {
        name: "test4td.txt",
        bytes: b"\t  Sub 1\r\n\t  LFCR.m\r\n\t\r\n\t \r\n\tH\ti\r\n H\ti\r\nH\ti\r\nH i\r\n\r\n",
    },
    // -s -u
    BinaryFixture {
        name: "test1su.txt",
        bytes: b"      Sub 1\n      CRLF.m\n    \n     \n    H\ti\n H\ti\nH\ti\nH i\n\n",
    },
    BinaryFixture {
        name: "test2su.txt",
        bytes: b"      Sub 1\n      LF.m\n    \n     \n    H\ti\n H\ti\nH\ti\nH i\n\n",
    },
    BinaryFixture {
        name: "test3su.txt",
        bytes: b"      Mix 1\n      CRLF.m\n    \n     \n    H\ti\n H\ti\nH\ti\nH i\n\n",
    },
    BinaryFixture {
        name: "test4su.txt",
        bytes: b"      Sub 1\n      LFCR.m\n    \n     \n    H\ti\n H\ti\nH\ti\nH i\n\n",
    },
    // -t -u
    BinaryFixture {
        name: "test1tu.txt",
        bytes: b"\t  Sub 1\n\t  CRLF.m\n\t\n\t \n\tH\ti\n H\ti\nH\ti\nH i\n\n",
    },
    BinaryFixture {
        name: "test2tu.txt",
        bytes: b"\t  Sub 1\n\t  LF.m\n\t\n\t \n\tH\ti\n H\ti\nH\ti\nH i\n\n",
    },
    BinaryFixture {
        name: "test3tu.txt",
        bytes: b"\t  Mix 1\n\t  CRLF.m\n\t\n\t \n\tH\ti\n H\ti\nH\ti\nH i\n\n",
    },
    BinaryFixture {
        name: "test4tu.txt",
        bytes: b"\t  Sub 1\n\t  LFCR.m\n\t\n\t \n\tH\ti\n H\ti\nH\ti\nH i\n\n",
    },
];

// --------------------- Width-conversion families ----------------------------
//
// testSpace: leading space runs of length 0..9, converted to tabs with
// `-t -W`. testTab: n spaces then one tab, expanded to spaces with `-s -W`.
// The digit in each line names its original leading-run length.

const TEST_SPACE: &[&str] = &[
    "0",
    " 1",
    "  2",
    "   3",
    "    4",
    "     5",
    "      6",
    "       7",
    "        8",
    "         9",
];

const TEST_SPACE2: &[&str] = &[
    "0",
    " 1",
    "\t2",
    "\t 3",
    "\t\t4",
    "\t\t 5",
    "\t\t\t6",
    "\t\t\t 7",
    "\t\t\t\t8",
    "\t\t\t\t 9",
];

const TEST_SPACE4: &[&str] = &[
    "0",
    " 1",
    "  2",
    "   3",
    "\t4",
    "\t 5",
    "\t  6",
    "\t   7",
    "\t\t8",
    "\t\t 9",
];

const TEST_SPACE8: &[&str] = &[
    "0",
    " 1",
    "  2",
    "   3",
    "    4",
    "     5",
    "      6",
    "       7",
    "\t8",
    "\t 9",
];

const TEST_TAB: &[&str] = &[
    "\t0",
    " \t1",
    "  \t2",
    "   \t3",
    "    \t4",
    "     \t5",
    "      \t6",
    "       \t7",
    "        \t8",
    "         \t9",
];

const TEST_TAB2: &[&str] = &[
    "  0",
    "  1",
    "    2",
    "    3",
    "      4",
    "      5",
    "        6",
    "        7",
    "          8",
    "          9",
];

const TEST_TAB4: &[&str] = &[
    "    0",
    "    1",
    "    2",
    "    3",
    "        4",
    "        5",
    "        6",
    "        7",
    "            8",
    "            9",
];

const TEST_TAB8: &[&str] = &[
    "        0",
    "        1",
    "        2",
    "        3",
    "        4",
    "        5",
    "        6",
    "        7",
    "                8",
    "                9",
];

/// Plain content for the CLI option-validation cases; no oracle is paired
/// with it because those cases assert exit codes only.
const TEST_OPTIONS: &[&str] = &["Line 0", "Line 1", "Line 2", "Line 3", "Line 4"];

pub const TEXT_INPUTS: &[TextFixture] = &[
    TextFixture { name: "testSpace.txt", lines: TEST_SPACE },
    TextFixture { name: "testTab.txt", lines: TEST_TAB },
    TextFixture { name: "testOptions.txt", lines: TEST_OPTIONS },
];

pub const TEXT_EXPECTED: &[TextFixture] = &[
    TextFixture { name: "testSpace2.txt", lines: TEST_SPACE2 },
    TextFixture { name: "testSpace4.txt", lines: TEST_SPACE4 },
    TextFixture { name: "testSpace8.txt", lines: TEST_SPACE8 },
    TextFixture { name: "testTab2.txt", lines: TEST_TAB2 },
    TextFixture { name: "testTab4.txt", lines: TEST_TAB4 },
    TextFixture { name: "testTab8.txt", lines: TEST_TAB8 },
];

// --------------------- Generator -------------------------------------------

/// Wipe the fixture tree and materialize every input and oracle file.
pub fn generate(layout: &TestLayout, verbose: bool) -> Result<()> {
    println!("Creating test environment under {}.", layout.root.display());
    layout.rebuild()?;

    for fixture in BINARY_INPUTS {
        write_bytes(&layout.input_file(fixture.name), fixture.bytes, verbose)?;
    }
    for summary in SUMMARY_EXPECTED {
        // Line 1 of the record is the input path exactly as the runner will
        // pass it to `-i`, so both sides must derive it from the same layout.
        let record = format!(
            "{}\n{}\n",
            layout.input_file(summary.input).display(),
            summary.counts
        );
        write_bytes(
            &layout.expected_file(summary.input),
            record.as_bytes(),
            verbose,
        )?;
    }
    for fixture in BINARY_EXPECTED {
        write_bytes(&layout.expected_file(fixture.name), fixture.bytes, verbose)?;
    }
    for fixture in TEXT_INPUTS {
        write_lines(&layout.input_file(fixture.name), fixture.lines, verbose)?;
    }
    for fixture in TEXT_EXPECTED {
        write_lines(&layout.expected_file(fixture.name), fixture.lines, verbose)?;
    }

    Ok(())
}

fn write_bytes(path: &Path, bytes: &[u8], verbose: bool) -> Result<()> {
    if verbose {
        println!("[GEN ] {}", path.display());
    }
    fs::write(path, bytes).with_context(|| format!("writing fixture {}", path.display()))
}

fn write_lines(path: &Path, lines: &[&str], verbose: bool) -> Result<()> {
    if verbose {
        println!("[GEN ] {}", path.display());
    }
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(path, content).with_context(|| format!("writing fixture {}", path.display()))
}

// --------------------- Oracle cross-checks ---------------------------------
//
// A small reference model of the tool's normalization semantics, used only
// to cross-check the hand-coded tables above. It lives under #[cfg(test)] so
// the shipped oracle never depends on it.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TestLayout;
    use tempfile::TempDir;

    /// Tab width the tool assumes when no -2/-4/-8 flag is given.
    const DEFAULT_WIDTH: usize = 4;

    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    enum Lead {
        SpaceOnly,
        TabOnly,
        Both,
        Neither,
    }

    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    enum Ending {
        Dos,
        Unix,
        Malformed,
    }

    struct Line<'a> {
        body: &'a [u8],
        ending: Ending,
    }

    /// Split a fixture into (body, ending) pairs. CR LF is DOS, a bare LF is
    /// Unix, and LF CR is the malformed ordering the tool recognizes.
    fn split_lines(bytes: &[u8]) -> Vec<Line<'_>> {
        let mut lines = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    lines.push(Line { body: &bytes[start..i], ending: Ending::Dos });
                    i += 2;
                    start = i;
                }
                b'\n' if bytes.get(i + 1) == Some(&b'\r') => {
                    lines.push(Line { body: &bytes[start..i], ending: Ending::Malformed });
                    i += 2;
                    start = i;
                }
                b'\n' => {
                    lines.push(Line { body: &bytes[start..i], ending: Ending::Unix });
                    i += 1;
                    start = i;
                }
                _ => i += 1,
            }
        }
        assert_eq!(start, bytes.len(), "fixture must end with a line terminator");
        lines
    }

    fn leading_run(body: &[u8]) -> &[u8] {
        let end = body
            .iter()
            .position(|&b| b != b' ' && b != b'\t')
            .unwrap_or(body.len());
        &body[..end]
    }

    fn classify_lead(body: &[u8]) -> Lead {
        let run = leading_run(body);
        let spaces = run.iter().any(|&b| b == b' ');
        let tabs = run.iter().any(|&b| b == b'\t');
        match (spaces, tabs) {
            (true, false) => Lead::SpaceOnly,
            (false, true) => Lead::TabOnly,
            (true, true) => Lead::Both,
            (false, false) => Lead::Neither,
        }
    }

    /// Column width of a leading run: spaces count one column, tabs advance
    /// to the next multiple of `width`.
    fn run_columns(run: &[u8], width: usize) -> usize {
        run.iter().fold(0, |col, &b| match b {
            b' ' => col + 1,
            b'\t' => (col / width + 1) * width,
            _ => unreachable!("leading run holds only blanks"),
        })
    }

    fn spaces_for(col: usize) -> Vec<u8> {
        vec![b' '; col]
    }

    fn tabs_for(col: usize, width: usize) -> Vec<u8> {
        let mut out = vec![b'\t'; col / width];
        out.extend(std::iter::repeat(b' ').take(col % width));
        out
    }

    #[derive(Clone, Copy)]
    enum LeadMode {
        Spaces,
        Tabs,
    }

    #[derive(Clone, Copy)]
    enum EndingMode {
        Dos,
        Unix,
    }

    /// Reference rendition of a conversion run: rewrite each line's leading
    /// run and/or ending, leave the rest of the line alone.
    fn convert(bytes: &[u8], lead: Option<LeadMode>, ending: Option<EndingMode>) -> Vec<u8> {
        let mut out = Vec::new();
        for line in split_lines(bytes) {
            let run = leading_run(line.body);
            let rest = &line.body[run.len()..];
            match lead {
                Some(LeadMode::Spaces) => {
                    out.extend(spaces_for(run_columns(run, DEFAULT_WIDTH)))
                }
                Some(LeadMode::Tabs) => {
                    out.extend(tabs_for(run_columns(run, DEFAULT_WIDTH), DEFAULT_WIDTH))
                }
                None => out.extend_from_slice(run),
            }
            out.extend_from_slice(rest);
            let rendered = match (ending, line.ending) {
                (Some(EndingMode::Dos), _) | (None, Ending::Dos) => &b"\r\n"[..],
                (Some(EndingMode::Unix), _) | (None, Ending::Unix) => &b"\n"[..],
                (None, Ending::Malformed) => &b"\n\r"[..],
            };
            out.extend_from_slice(rendered);
        }
        out
    }

    fn lead_of(line: &str) -> &str {
        let end = line
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(line.len());
        &line[..end]
    }

    fn spaces_to_tabs(line: &str, width: usize) -> String {
        let run = lead_of(line);
        let col = run_columns(run.as_bytes(), width);
        let mut out = String::from_utf8(tabs_for(col, width)).unwrap();
        out.push_str(&line[run.len()..]);
        out
    }

    fn tabs_to_spaces(line: &str, width: usize) -> String {
        let run = lead_of(line);
        let col = run_columns(run.as_bytes(), width);
        let mut out = String::from_utf8(spaces_for(col)).unwrap();
        out.push_str(&line[run.len()..]);
        out
    }

    fn binary_input(name: &str) -> &'static [u8] {
        BINARY_INPUTS
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.bytes)
            .unwrap_or_else(|| panic!("no input fixture {name}"))
    }

    fn binary_expected(name: &str) -> &'static [u8] {
        BINARY_EXPECTED
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.bytes)
            .unwrap_or_else(|| panic!("no oracle fixture {name}"))
    }

    fn counts_for(input: &str) -> Vec<usize> {
        SUMMARY_EXPECTED
            .iter()
            .find(|s| s.input == input)
            .map(|s| {
                s.counts
                    .split(' ')
                    .map(|n| n.parse().unwrap())
                    .collect::<Vec<usize>>()
            })
            .unwrap_or_else(|| panic!("no summary for {input}"))
    }

    #[test]
    fn summary_counts_are_internally_consistent() {
        for summary in SUMMARY_EXPECTED {
            let c = counts_for(summary.input);
            assert_eq!(c.len(), 8, "{}", summary.input);
            let (total, space, tab, neither, both) = (c[0], c[1], c[2], c[3], c[4]);
            let (dos, unix, malformed) = (c[5], c[6], c[7]);
            assert_eq!(total, 9, "{}", summary.input);
            assert_eq!(total, space + tab + neither + both, "{}", summary.input);
            assert_eq!(total, dos + unix + malformed, "{}", summary.input);
        }
    }

    #[test]
    fn summary_counts_match_classification_of_the_input_bytes() {
        for summary in SUMMARY_EXPECTED {
            let lines = split_lines(binary_input(summary.input));
            let c = counts_for(summary.input);
            assert_eq!(lines.len(), c[0], "{} total", summary.input);
            let count_lead = |want: Lead| {
                lines
                    .iter()
                    .filter(|l| classify_lead(l.body) == want)
                    .count()
            };
            let count_ending = |want: Ending| {
                lines.iter().filter(|l| l.ending == want).count()
            };
            assert_eq!(count_lead(Lead::SpaceOnly), c[1], "{} space", summary.input);
            assert_eq!(count_lead(Lead::TabOnly), c[2], "{} tab", summary.input);
            assert_eq!(count_lead(Lead::Neither), c[3], "{} neither", summary.input);
            assert_eq!(count_lead(Lead::Both), c[4], "{} both", summary.input);
            assert_eq!(count_ending(Ending::Dos), c[5], "{} dos", summary.input);
            assert_eq!(count_ending(Ending::Unix), c[6], "{} unix", summary.input);
            assert_eq!(count_ending(Ending::Malformed), c[7], "{} bad", summary.input);
        }
    }

    #[test]
    fn tab_only_dos_line_classifies_as_such() {
        let lines = split_lines(b"\tH\ti\r\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(classify_lead(lines[0].body), Lead::TabOnly);
        assert_eq!(lines[0].ending, Ending::Dos);
    }

    #[test]
    fn conversion_oracles_match_the_reference_model() {
        let families: &[(&str, Option<LeadMode>, Option<EndingMode>)] = &[
            ("s", Some(LeadMode::Spaces), None),
            ("t", Some(LeadMode::Tabs), None),
            ("d", None, Some(EndingMode::Dos)),
            ("u", None, Some(EndingMode::Unix)),
            ("sd", Some(LeadMode::Spaces), Some(EndingMode::Dos)),
            ("td", Some(LeadMode::Tabs), Some(EndingMode::Dos)),
            ("su", Some(LeadMode::Spaces), Some(EndingMode::Unix)),
            ("tu", Some(LeadMode::Tabs), Some(EndingMode::Unix)),
        ];
        for (postfix, lead, ending) in families {
            for n in 1..=4 {
                let input = binary_input(&format!("test{n}.txt"));
                let oracle = binary_expected(&format!("test{n}{postfix}.txt"));
                let modeled = convert(input, *lead, *ending);
                assert_eq!(
                    modeled, oracle,
                    "oracle test{n}{postfix}.txt disagrees with the model"
                );
            }
        }
    }

    #[test]
    fn conversions_are_idempotent_on_their_own_output() {
        for fixture in BINARY_EXPECTED {
            let name = fixture.name;
            // Names follow test<digit><postfix>.txt; the postfix letters say
            // which conversions the oracle must already be a fixed point of.
            let postfix = &name[5..name.len() - 4];
            if postfix.contains('s') {
                let again = convert(fixture.bytes, Some(LeadMode::Spaces), None);
                assert_eq!(again, fixture.bytes, "{name} not space-stable");
            }
            if postfix.contains('t') {
                let again = convert(fixture.bytes, Some(LeadMode::Tabs), None);
                assert_eq!(again, fixture.bytes, "{name} not tab-stable");
            }
            if postfix.contains('d') {
                let again = convert(fixture.bytes, None, Some(EndingMode::Dos));
                assert_eq!(again, fixture.bytes, "{name} not dos-stable");
            }
            if postfix.contains('u') {
                let again = convert(fixture.bytes, None, Some(EndingMode::Unix));
                assert_eq!(again, fixture.bytes, "{name} not unix-stable");
            }
        }
    }

    #[test]
    fn width_oracles_match_the_reference_model() {
        let space_oracles = [(2, TEST_SPACE2), (4, TEST_SPACE4), (8, TEST_SPACE8)];
        for (width, oracle) in space_oracles {
            for (line, want) in TEST_SPACE.iter().zip(oracle) {
                assert_eq!(&spaces_to_tabs(line, width), want, "width {width}");
            }
        }
        let tab_oracles = [(2, TEST_TAB2), (4, TEST_TAB4), (8, TEST_TAB8)];
        for (width, oracle) in tab_oracles {
            for (line, want) in TEST_TAB.iter().zip(oracle) {
                assert_eq!(&tabs_to_spaces(line, width), want, "width {width}");
            }
        }
    }

    #[test]
    fn three_spaces_survive_width_four_but_collapse_at_width_two() {
        assert_eq!(spaces_to_tabs("   3", 4), "   3");
        assert_eq!(spaces_to_tabs("   3", 2), "\t 3");
    }

    #[test]
    fn width_conversion_round_trips_leading_spaces() {
        for width in [2, 4, 8] {
            for n in 0..10 {
                let original = format!("{}x", " ".repeat(n));
                let tabbed = spaces_to_tabs(&original, width);
                assert_eq!(tabs_to_spaces(&tabbed, width), original, "width {width} run {n}");
            }
        }
    }

    #[test]
    fn generate_writes_every_fixture_byte_for_byte() {
        let tmp = TempDir::new().unwrap();
        let layout = TestLayout::new(tmp.path().join("testdata"));
        generate(&layout, false).unwrap();

        for fixture in BINARY_INPUTS {
            let written = fs::read(layout.input_file(fixture.name)).unwrap();
            assert_eq!(written, fixture.bytes, "{}", fixture.name);
        }
        for fixture in BINARY_EXPECTED {
            let written = fs::read(layout.expected_file(fixture.name)).unwrap();
            assert_eq!(written, fixture.bytes, "{}", fixture.name);
        }
        let summary = fs::read_to_string(layout.expected_file("test1.txt")).unwrap();
        let expected_record = format!(
            "{}\n9 1 1 3 4 9 0 0\n",
            layout.input_file("test1.txt").display()
        );
        assert_eq!(summary, expected_record);
        let options = fs::read_to_string(layout.input_file("testOptions.txt")).unwrap();
        assert_eq!(options, "Line 0\nLine 1\nLine 2\nLine 3\nLine 4\n");
    }

    #[test]
    fn generate_is_reproducible() {
        let tmp = TempDir::new().unwrap();
        let layout = TestLayout::new(tmp.path().join("testdata"));
        generate(&layout, false).unwrap();
        let first = fs::read(layout.expected_file("test3sd.txt")).unwrap();
        generate(&layout, false).unwrap();
        let second = fs::read(layout.expected_file("test3sd.txt")).unwrap();
        assert_eq!(first, second);
    }
}
