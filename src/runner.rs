//! Scenario execution: spawning `tfc`, comparing its output against the
//! oracle files, and keeping the command log.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

use crate::fixtures::{BINARY_INPUTS, TEXT_INPUTS};
use crate::layout::TestLayout;

// --------------------- Shared harness --------------------------------------
pub struct Harness {
    tool: PathBuf,
    layout: TestLayout,
    commands: Vec<String>,
    verbose: bool,
}

type TestCase = (
    &'static str,
    &'static str,
    Box<dyn Fn(&mut Harness) -> Result<()>>,
);

pub struct SuiteOutcome {
    pub executed: usize,
    pub failures: usize,
}

impl Harness {
    pub fn new(layout: TestLayout, tool: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let tool = match tool {
            Some(path) => path,
            None => which::which("tfc")
                .context("tfc not found on PATH (use --tool to point at the binary)")?,
        };
        Ok(Self {
            tool,
            layout,
            commands: Vec::new(),
            verbose,
        })
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Spawn the tool once, log the command line, report whether it exited 0.
    /// A spawn failure counts the same as a non-zero exit: the scenario under
    /// test is "this invocation succeeds", and it did not.
    fn invoke(&mut self, args: &[&str]) -> bool {
        let mut rendered = self.tool.display().to_string();
        for arg in args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        self.commands.push(rendered);

        let status = Command::new(&self.tool)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if self.verbose {
            match &status {
                Ok(s) => println!(
                    "[CMD ] {} {:?} -> status {:?}",
                    self.tool.display(),
                    args,
                    s.code()
                ),
                Err(e) => println!(
                    "[CMD ] {} {:?} -> spawn failed: {e}",
                    self.tool.display(),
                    args
                ),
            }
        }
        matches!(status, Ok(s) if s.success())
    }

    fn expect_success(&mut self, args: &[&str]) -> Result<()> {
        if !self.invoke(args) {
            bail!("expected success for args {args:?}");
        }
        Ok(())
    }

    fn expect_failure(&mut self, args: &[&str]) -> Result<()> {
        if self.invoke(args) {
            bail!("expected failure for args {args:?}");
        }
        Ok(())
    }

    /// Run one conversion: `tfc <flags> -i input/<input> -o output/<result>`.
    fn convert(&mut self, flags: &[&str], input: &str, result: &str) -> Result<()> {
        let input = self.input_path(input);
        let output = self.output_path(result);
        let mut args: Vec<&str> = flags.to_vec();
        args.extend(["-i", &input, "-o", &output]);
        self.expect_success(&args)
    }

    /// Byte-exact comparison of `output/<name>` against `expected/<name>`.
    /// Missing file, length mismatch and byte mismatch are reported as
    /// separate failure categories so a `[FAIL]` line says what went wrong
    /// without opening the files.
    fn compare_binary(&self, name: &str) -> Result<()> {
        let produced = read_required(&self.layout.output_file(name), "tool output")?;
        let oracle = read_required(&self.layout.expected_file(name), "expected fixture")?;
        if produced.len() != oracle.len() {
            bail!(
                "length mismatch for {name}: got {}B, expected {}B",
                produced.len(),
                oracle.len()
            );
        }
        if let Some(offset) = produced.iter().zip(&oracle).position(|(a, b)| a != b) {
            bail!(
                "byte mismatch for {name} at offset {offset}: got 0x{:02x}, expected 0x{:02x}",
                produced[offset],
                oracle[offset]
            );
        }
        Ok(())
    }

    /// Line-oriented comparison for the text families: terminators are
    /// stripped (including a trailing CR) and blank lines are skipped, so
    /// only the visible content of each line is asserted.
    fn compare_text(&self, name: &str) -> Result<()> {
        let produced = read_required(&self.layout.output_file(name), "tool output")?;
        let oracle = read_required(&self.layout.expected_file(name), "expected fixture")?;
        let produced = text_lines(&produced);
        let oracle = text_lines(&oracle);
        if produced.len() != oracle.len() {
            bail!(
                "line count mismatch for {name}: got {}, expected {}",
                produced.len(),
                oracle.len()
            );
        }
        for (idx, (got, want)) in produced.iter().zip(&oracle).enumerate() {
            if got != want {
                bail!("line {} mismatch for {name}: got {got:?}, expected {want:?}", idx + 1);
            }
        }
        Ok(())
    }

    /// Everything the suite depends on must already be on disk; a missing
    /// fixture here would otherwise surface as a confusing tool failure in
    /// some later scenario.
    fn check_environment(&self) -> Result<()> {
        for fixture in BINARY_INPUTS {
            let path = self.layout.input_file(fixture.name);
            if !path.is_file() {
                bail!("missing input fixture {}", path.display());
            }
        }
        for fixture in TEXT_INPUTS {
            let path = self.layout.input_file(fixture.name);
            if !path.is_file() {
                bail!("missing input fixture {}", path.display());
            }
        }
        if !self.layout.expected.is_dir() {
            bail!("missing expected directory {}", self.layout.expected.display());
        }
        if !self.layout.output.is_dir() {
            bail!("missing output directory {}", self.layout.output.display());
        }
        Ok(())
    }

    fn input_path(&self, name: &str) -> String {
        self.layout.input_file(name).display().to_string()
    }

    fn output_path(&self, name: &str) -> String {
        self.layout.output_file(name).display().to_string()
    }

    #[cfg(test)]
    fn for_tests(layout: TestLayout, tool: PathBuf) -> Self {
        Self {
            tool,
            layout,
            commands: Vec::new(),
            verbose: false,
        }
    }
}

fn read_required(path: &Path, what: &str) -> Result<Vec<u8>> {
    if !path.is_file() {
        bail!("missing {what} {}", path.display());
    }
    fs::read(path).with_context(|| format!("reading {what} {}", path.display()))
}

fn text_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

// --------------------- Scenario registry -----------------------------------

/// Normalization families: (file-name postfix, tool flags, description label).
const CONVERSIONS: &[(&str, &[&str], &str)] = &[
    ("s", &["-s"], "leading space"),
    ("t", &["-t"], "leading tab"),
    ("d", &["-d"], "trailing dos"),
    ("u", &["-u"], "trailing unix"),
    ("sd", &["-s", "-d"], "leading space and trailing dos"),
    ("td", &["-t", "-d"], "leading tab and trailing dos"),
    ("su", &["-s", "-u"], "leading space and trailing unix"),
    ("tu", &["-t", "-u"], "leading tab and trailing unix"),
];

fn build_cases() -> Vec<TestCase> {
    let mut cases: Vec<TestCase> = vec![(
        "test0",
        "Check the test environment is in place.",
        Box::new(|h| h.check_environment()),
    )];

    for n in 1..=4u32 {
        let name: &'static str = Box::leak(format!("test{n}").into_boxed_str());
        let desc: &'static str =
            Box::leak(format!("Test summarization of 'test{n}.txt'.").into_boxed_str());
        cases.push((
            name,
            desc,
            Box::new(move |h| {
                let file = format!("test{n}.txt");
                h.convert(&["-x"], &file, &file)?;
                h.compare_binary(&file)
            }),
        ));
    }

    for (postfix, flags, label) in CONVERSIONS {
        for n in 1..=4u32 {
            let name: &'static str = Box::leak(format!("test{n}{postfix}").into_boxed_str());
            let desc: &'static str = Box::leak(
                format!("Test {label} normalization of 'test{n}.txt'.").into_boxed_str(),
            );
            cases.push((
                name,
                desc,
                Box::new(move |h| {
                    let result = format!("test{n}{postfix}.txt");
                    h.convert(flags, &format!("test{n}.txt"), &result)?;
                    h.compare_binary(&result)
                }),
            ));
        }
    }

    for width in [2u32, 4, 8] {
        let wflag: &'static str = match width {
            2 => "-2",
            4 => "-4",
            _ => "-8",
        };
        let name: &'static str = Box::leak(format!("testSpace{width}").into_boxed_str());
        let desc: &'static str = Box::leak(
            format!("Test space-to-tab conversion at tab width {width}.").into_boxed_str(),
        );
        cases.push((
            name,
            desc,
            Box::new(move |h| {
                let result = format!("testSpace{width}.txt");
                h.convert(&["-t", wflag], "testSpace.txt", &result)?;
                h.compare_text(&result)
            }),
        ));
    }
    for width in [2u32, 4, 8] {
        let wflag: &'static str = match width {
            2 => "-2",
            4 => "-4",
            _ => "-8",
        };
        let name: &'static str = Box::leak(format!("testTab{width}").into_boxed_str());
        let desc: &'static str = Box::leak(
            format!("Test tab-to-space conversion at tab width {width}.").into_boxed_str(),
        );
        cases.push((
            name,
            desc,
            Box::new(move |h| {
                let result = format!("testTab{width}.txt");
                h.convert(&["-s", wflag], "testTab.txt", &result)?;
                h.compare_text(&result)
            }),
        ));
    }

    cases.push((
        "testOptions0",
        "An unknown flag is rejected.",
        Box::new(|h| h.expect_failure(&["-z"])),
    ));
    cases.push((
        "testOptions1",
        "Both help flags succeed.",
        Box::new(|h| {
            h.expect_success(&["-h"])?;
            h.expect_success(&["--help"])
        }),
    ));
    cases.push((
        "testOptions2",
        "Both version flags succeed.",
        Box::new(|h| {
            h.expect_success(&["-v"])?;
            h.expect_success(&["--version"])
        }),
    ));
    cases.push((
        "testOptions3",
        "-i without a path is rejected.",
        Box::new(|h| h.expect_failure(&["-i"])),
    ));
    cases.push((
        "testOptions4",
        "A nonexistent input file is rejected.",
        Box::new(|h| h.expect_failure(&["-i", "zxcv"])),
    ));
    cases.push((
        "testOptions5",
        "In-place replacement without a conversion mode, or combined with -o, is rejected.",
        Box::new(|h| {
            let input = h.input_path("testOptions.txt");
            h.expect_failure(&["-r", &input])?;
            h.expect_failure(&["--replace", &input])?;
            let output = h.output_path("testOptions.txt");
            h.expect_failure(&["--unix", "--replace", &input, "-o", &output])
        }),
    ));
    cases.push((
        "testOptions6",
        "Identical input and output paths are rejected.",
        Box::new(|h| {
            let input = h.input_path("testOptions.txt");
            h.expect_failure(&["--space", "--input", &input, "--output", &input])
        }),
    ));
    cases.push((
        "testOptions7",
        "An existing output file is silently overwritten.",
        Box::new(|h| {
            let input = h.input_path("testOptions.txt");
            let output = h.output_path("testOptions.txt");
            h.expect_success(&["--tab", "--input", &input, "--output", &output])?;
            h.expect_success(&["--space", "--input", &input, "--output", &output])
        }),
    ));
    cases.push((
        "testOptions8",
        "In-place replacement works with an explicit conversion mode.",
        Box::new(|h| {
            let input = h.input_path("testOptions.txt");
            let target = h.output_path("testOverwrite.txt");
            h.expect_success(&["--dos", "-i", &input, "-o", &target])?;
            h.expect_success(&["--unix", "-r", &target])?;
            h.expect_success(&["--dos", "--replace", &target])
        }),
    ));

    cases
}

// --------------------- Suite runner ----------------------------------------

/// Run every registered scenario in order, collecting failures instead of
/// stopping at the first one.
pub fn run_suite(harness: &mut Harness, filter: Option<&str>) -> SuiteOutcome {
    let mut executed = 0;
    let mut failures = 0;
    for (name, desc, case) in build_cases() {
        if let Some(f) = filter {
            if !name.contains(f) {
                continue;
            }
        }
        executed += 1;
        if harness.verbose {
            println!("[RUN ] {name}: {desc}");
        }
        match case(harness) {
            Ok(()) => println!("[PASS] {name}"),
            Err(e) => {
                failures += 1;
                println!("[FAIL] {name}: {e:#}");
            }
        }
    }
    SuiteOutcome { executed, failures }
}

/// Render the command log as an executable `#!/bin/sh` script so a failing
/// run can be replayed by hand without the harness.
pub fn write_replay_script(path: &Path, commands: &[String]) -> Result<()> {
    let mut script = String::from("#!/bin/sh\n# Replays the tool invocations from the last run.\n");
    for command in commands {
        script.push_str(command);
        script.push('\n');
    }
    fs::write(path, script)
        .with_context(|| format!("writing replay script {}", path.display()))?;
    let metadata = fs::metadata(path)
        .with_context(|| format!("reading permissions of {}", path.display()))?;
    let mut perms = metadata.permissions();
    perms.set_mode(perms.mode() | 0o755);
    fs::set_permissions(path, perms)
        .with_context(|| format!("marking {} executable", path.display()))?;
    Ok(())
}
