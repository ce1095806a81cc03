use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use cxxfront_errors::{Collector, Renderer, Severity};
use cxxfront_parse::RuleSet;
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(clap::Args)]
struct Input {
    path: Utf8PathBuf,
    /// Accept gcc extensions such as `typeof`.
    #[arg(long)]
    gnu: bool,
    /// Accept msvc extensions such as `__int64`.
    #[arg(long)]
    msvc: bool,
}

impl Input {
    fn rules(&self) -> RuleSet {
        if self.msvc {
            RuleSet::msvc()
        } else if self.gnu {
            RuleSet::gnu()
        } else {
            RuleSet::strict()
        }
    }
}

#[derive(Parser)]
enum Options {
    /// Parse a file and report its diagnostics.
    Check(Input),
    /// Parse a file and print the parse tree.
    Dump(Input),
}

fn main() -> anyhow::Result<()> {
    let options = Options::parse();
    let (input, dump) = match &options {
        Options::Check(input) => (input, false),
        Options::Dump(input) => (input, true),
    };

    let text = std::fs::read_to_string(&input.path)
        .with_context(|| format!("failed to read `{}`", input.path))?;

    let mut collector = Collector::new();
    let parse = cxxfront_parse::translation_unit(&text, input.rules(), &mut collector);

    let renderer = Renderer::styled();
    for diagnostic in collector.diagnostics() {
        eprintln!("{}", diagnostic.render(&renderer, input.path.as_str(), &text));
    }

    if dump {
        println!("{}", parse.ptree.display(parse.unit, &text));
    }

    if collector.diagnostics().iter().any(|d| d.severity() == Severity::Error) {
        anyhow::bail!("{} parse errors", collector.error_count());
    }
    Ok(())
}
