use day_12::part1::process;
use miette::{Context, IntoDiagnostic};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[tracing::instrument]
fn main() -> miette::Result<()> {
    init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "input1.txt".to_string());
    let file = std::fs::read_to_string(&path)
        .into_diagnostic()
        .with_context(|| format!("read {}", path))?;
    let result = process(&file).context("process part 1")?;
    println!("{}", result);
    Ok(())
}

fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("day_12=info".parse().unwrap()),
        )
        .with_span_events(FmtSpan::NONE)
        .try_init();
}
