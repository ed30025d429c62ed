use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use folio_pdf::{FileImageResolver, Options, Visibility};

#[derive(Parser)]
#[command(version, about = "Lay out a JSON content tree into a paginated PDF")]
struct Cli {
    /// Content tree as JSON
    input: PathBuf,

    /// Output PDF (defaults to the options filename, then <input>.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Options file as JSON
    #[arg(long)]
    options: Option<PathBuf>,

    /// Title drawn in the header band
    #[arg(long)]
    header_text: Option<String>,

    /// Header logo: file path or data URI
    #[arg(long)]
    logo: Option<String>,

    /// Footer logo: file path or data URI
    #[arg(long)]
    footer_logo: Option<String>,

    /// all, first, all-except-first, none, or a page list like 1,3,5
    #[arg(long)]
    show_header: Option<Visibility>,

    /// all, first, all-except-first, none, or a page list like 1,3,5
    #[arg(long)]
    show_footer: Option<Visibility>,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn build_options(cli: &Cli) -> Result<Options, folio_pdf::Error> {
    let mut options = match &cli.options {
        Some(path) => Options::from_json(&std::fs::read_to_string(path)?)?,
        None => Options {
            filename: cli.input.with_extension("pdf"),
            ..Options::default()
        },
    };
    if let Some(output) = &cli.output {
        options.filename = output.clone();
    }
    if let Some(text) = &cli.header_text {
        options.header_text = text.clone();
    }
    if let Some(logo) = &cli.logo {
        options.logo_reference = Some(logo.clone());
        options.logo_data = None;
    }
    if let Some(logo) = &cli.footer_logo {
        options.footer_logo_reference = Some(logo.clone());
        options.footer_logo_data = None;
    }
    if let Some(v) = &cli.show_header {
        options.header_visibility = v.clone();
    }
    if let Some(v) = &cli.show_footer {
        options.footer_visibility = v.clone();
    }
    Ok(options)
}

fn run(cli: &Cli) -> Result<(), folio_pdf::Error> {
    let options = build_options(cli)?;
    let root = folio_pdf::load_content(&std::fs::read_to_string(&cli.input)?)?;
    let base_dir = cli.input.parent().unwrap_or(Path::new("."));
    let resolver = FileImageResolver::new(base_dir);

    let report = folio_pdf::save_pdf(&root, &options, &resolver)?;

    println!(
        "Wrote {} ({} page{})",
        options.filename.display(),
        report.page_count,
        if report.page_count == 1 { "" } else { "s" }
    );
    for d in &report.diagnostics {
        match d.page {
            Some(page) => eprintln!(
                "warning: page {page}: skipped {:?} {}: {}",
                d.role, d.source, d.message
            ),
            None => eprintln!(
                "warning: skipped {:?} {}: {}",
                d.role, d.source, d.message
            ),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
