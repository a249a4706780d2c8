use clap::Parser;
use log::{error, info};
use offerdoc::{BatchRunner, BatchSummary, CancellationToken, DocumentRequest, GeneratorConfig};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Generates one offer PDF per recipient of a JSON batch file.
#[derive(Parser, Debug)]
#[command(name = "offerdoc", version, about)]
struct Cli {
    /// JSON array of document requests.
    batch: PathBuf,
    /// Directory that receives `<recipient_id>.pdf` and `summary.json`.
    out_dir: PathBuf,
    /// Generator configuration (JSON).
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Recipient ids are caller data; keep them from escaping the output directory.
fn file_stem(recipient_id: &str) -> String {
    recipient_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Hands out one distinct file name per recipient. Ids that flatten to the
/// same stem get a numeric suffix in batch order.
#[derive(Debug, Default)]
struct OutputNames {
    taken: HashSet<String>,
}

impl OutputNames {
    fn claim(&mut self, recipient_id: &str) -> String {
        let stem = file_stem(recipient_id);
        let mut name = format!("{}.pdf", stem);
        let mut suffix = 2;
        while !self.taken.insert(name.clone()) {
            name = format!("{}-{}.pdf", stem, suffix);
            suffix += 1;
        }
        name
    }
}

fn run(cli: Cli) -> Result<BatchSummary, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };
    let runner = BatchRunner::builder().with_config(config).build()?;

    let requests: Vec<DocumentRequest> = serde_json::from_str(&fs::read_to_string(&cli.batch)?)?;
    let results = runner.generate_requests(requests, &CancellationToken::new())?;

    fs::create_dir_all(&cli.out_dir)?;
    let mut names = OutputNames::default();
    for result in &results {
        match result.document() {
            Some(bytes) => {
                let path = cli.out_dir.join(names.claim(&result.recipient_id));
                fs::write(&path, bytes)?;
                info!("Wrote {} for {}", path.display(), result.recipient_id);
            }
            None => info!("No document for {}", result.recipient_id),
        }
    }

    let summary = BatchSummary::from_results(&results);
    fs::write(
        cli.out_dir.join("summary.json"),
        serde_json::to_string_pretty(&summary)?,
    )?;
    Ok(summary)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run(Cli::parse()) {
        Ok(summary) => {
            println!(
                "{} document(s): {} succeeded, {} failed, {} stub(s)",
                summary.total, summary.succeeded, summary.failed, summary.stubs
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsafe_characters_are_flattened() {
        assert_eq!(file_stem("../beta"), "___beta");
        assert_eq!(file_stem("kunde-42_b"), "kunde-42_b");
    }

    #[test]
    fn colliding_ids_get_distinct_names() {
        let mut names = OutputNames::default();
        assert_eq!(names.claim("a.b"), "a_b.pdf");
        assert_eq!(names.claim("a_b"), "a_b-2.pdf");
        assert_eq!(names.claim("a/b"), "a_b-3.pdf");
    }

    #[test]
    fn suffixed_names_do_not_shadow_real_ids() {
        let mut names = OutputNames::default();
        assert_eq!(names.claim("a.b"), "a_b.pdf");
        assert_eq!(names.claim("a_b"), "a_b-2.pdf");
        assert_eq!(names.claim("a_b-2"), "a_b-2-2.pdf");
    }
}
