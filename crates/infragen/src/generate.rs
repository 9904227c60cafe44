//! Non-interactive template generation from a Configuration JSON file

use anyhow::{bail, Context, Result};
use clap::Args;
use infragen_config::GeneratorConfig;
use infragen_core::{Configuration, OutputFormat};
use std::fs;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Configuration JSON file ("-" reads stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output format: yaml or json (overrides config file)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Directory to write the template into
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Print the template instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Generate the template described by `args`.
///
/// Returns the written path, or `None` when printing to stdout.
pub fn run(args: &GenerateArgs, generator: &GeneratorConfig) -> Result<Option<PathBuf>> {
    let config = read_configuration(&args.input)?;

    let format = args.format.unwrap_or(generator.output_format);
    let processor = generator.processor().with_format(format);
    let template = processor
        .generate(&config)
        .with_context(|| format!("Invalid configuration in {}", args.input.display()))?;

    if args.stdout {
        print!("{}", template.text);
        return Ok(None);
    }

    let path = output_path(&args.out_dir, &template.filename())?;
    if path.exists() && !args.force {
        bail!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        );
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;
    fs::write(&path, &template.text)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {} ({} template)", path.display(), template.service);
    Ok(Some(path))
}

/// Join `filename` under `out_dir`, rejecting names that would leave it.
///
/// `appName` is part of the filename, so separators, `..` and absolute
/// paths from the input file must not reach `Path::join`.
fn output_path(out_dir: &Path, filename: &str) -> Result<PathBuf> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == filename => Ok(out_dir.join(name)),
        _ => bail!(
            "appName must not contain path separators: '{}' would be written outside {}",
            filename,
            out_dir.display()
        ),
    }
}

fn read_configuration(input: &Path) -> Result<Configuration> {
    let content = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read configuration from stdin")?;
        buf
    } else {
        fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?
    };

    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON object", input.display()))
}
