use inflect::{GenerationReport, PartTrace};

mod ansi {
    const RESET: &str = "\x1b[0m";
    const DIM: &str = "\x1b[2m";
    const BOLD: &str = "\x1b[1m";

    const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, code: &str) -> String {
            if self.enabled { format!("{code}{}{RESET}", s.as_ref()) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            self.paint(s, BOLD)
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            self.paint(s, DIM)
        }

        /// `✓ label` in green, or `✗ label` in red.
        pub fn mark(&self, ok: bool, label: impl AsRef<str>) -> String {
            if ok {
                self.paint(format!("✓ {}", label.as_ref()), GREEN)
            } else {
                self.paint(format!("✗ {}", label.as_ref()), RED)
            }
        }

        pub fn ruler(&self, title: &str) -> String {
            self.paint(format!("━━━ {title} ━━━"), GRAY)
        }
    }
}

pub fn print_report(report: &GenerationReport, requested: &[String], color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Generating: {}", report.category), ansi::CYAN)));
    println!("  {} {}", palette.dim("chain:"), palette.paint(report.chain.join(" → "), ansi::BLUE));

    println!("\n{}", palette.ruler("Parts"));
    if report.stats.computed.is_empty() {
        println!("{}", palette.dim("  Every requested part was a seed"));
    } else {
        for trace in &report.stats.computed {
            println!("  {}", fmt_trace(trace, &palette));
        }
    }

    println!("\n{}", palette.ruler("Results"));
    for part in requested {
        let forms = report.forms.get(part).map(Vec::as_slice).unwrap_or_default();
        let rendered = if forms.is_empty() {
            palette.mark(false, "no forms")
        } else {
            forms.iter().map(|f| palette.bold(palette.paint(f, ansi::GREEN))).collect::<Vec<_>>().join(", ")
        };
        println!("  {} {} {}", palette.paint(part, ansi::BLUE), palette.dim("│"), rendered);
    }
    if report.forms.values().all(Vec::is_empty) {
        println!("\n{}", palette.dim("  Tip: Set INFLECT_DEBUG_RULES=1 to trace every rule evaluation"));
    }

    println!("\n{}", palette.ruler("Timing"));
    println!(
        "  Total: {}  │  Forms: {}  │  Memo hits: {}  │  Expansions: {}  │  Regex evals: {}",
        palette.paint(format!("{:?}", report.elapsed), ansi::GREEN),
        palette.paint(report.stats.total_forms().to_string(), ansi::GREEN),
        palette.paint(report.stats.memo_hits.to_string(), ansi::CYAN),
        palette.dim(report.stats.expansions.to_string()),
        palette.dim(report.stats.regex_evaluations.to_string()),
    );
    println!();
}

fn fmt_trace(trace: &PartTrace, palette: &ansi::Palette) -> String {
    let marker = palette.mark(trace.forms > 0, format!("{} forms", trace.forms));
    format!(
        "{}{} {}  {} {}",
        "  ".repeat(trace.depth),
        palette.paint(&trace.part, ansi::BLUE),
        marker,
        palette.dim(format!("{} rules", trace.rules)),
        palette.paint(format!("{:?}", trace.duration), ansi::YELLOW),
    )
}
