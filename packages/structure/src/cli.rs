//! Command-line interface for the structurer.

use std::path::{Path, PathBuf};

use arrete_shared::{StructuredText, TextElement, Title};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::config::DOCUMENT_EXTENSION;
use crate::error::{Result, StructurationError};
use crate::numbering::{detect_pattern, guess_numbering_pattern, matched_prefix};
use crate::output::{
    load_elements, load_tree, outline, render_tree, save_tree, wrap_outline_title, OutputFormat,
};
use crate::structuring::{add_references, promote_leading_title, Structurer};

/// Arrêté structurer - Build section trees from flat order text.
#[derive(Parser)]
#[command(name = "arrete-structure")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Structure one JSON file of text elements.
    Structure {
        /// JSON array of text elements
        input: PathBuf,

        /// Title of the root section
        #[arg(short, long)]
        title: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Titles are already tagged with levels; skip numbering inference
        #[arg(long)]
        tagged: bool,

        /// Fill reference labels such as "Art. 2 1.1."
        #[arg(long)]
        references: bool,
    },

    /// Structure every element file below a directory.
    Batch {
        /// Directory scanned recursively for element files
        input_dir: PathBuf,

        /// Directory receiving the structured documents
        #[arg(short, long)]
        output_dir: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Titles are already tagged with levels; skip numbering inference
        #[arg(long)]
        tagged: bool,
    },

    /// Print the section outline of a structured document.
    Show {
        /// Structured document (JSON)
        input: PathBuf,
    },

    /// Detect the numbering pattern of each line and guess the run's pattern.
    Detect {
        /// Lines to classify
        #[arg(required = true)]
        lines: Vec<String>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Structure {
            input,
            title,
            output,
            format,
            tagged,
            references,
        } => structure_command(
            &input,
            title.as_deref(),
            output.as_deref(),
            format,
            tagged,
            references,
        ),
        Commands::Batch {
            input_dir,
            output_dir,
            format,
            tagged,
        } => batch_command(&input_dir, &output_dir, format, tagged),
        Commands::Show { input } => show_command(&input),
        Commands::Detect { lines } => detect_command(&lines),
    }
}

/// Structure the elements of one file.
pub fn structure_file(path: &Path, title: Option<&str>, tagged: bool) -> Result<StructuredText> {
    let elements = load_elements(path)?;
    structure_elements(title, &elements, tagged)
}

fn structure_elements(
    title: Option<&str>,
    elements: &[TextElement],
    tagged: bool,
) -> Result<StructuredText> {
    let root_title = title.map(|text| Title::new(text, 0));
    let structurer = Structurer::new();
    let tree = if tagged {
        structurer.build(root_title.as_ref(), elements)?
    } else {
        structurer.structure_lines(root_title.as_ref(), elements)?
    };
    Ok(if root_title.is_none() {
        promote_leading_title(tree)
    } else {
        tree
    })
}

fn structure_command(
    input: &Path,
    title: Option<&str>,
    output: Option<&Path>,
    format: OutputFormat,
    tagged: bool,
    references: bool,
) -> Result<()> {
    let mut tree = structure_file(input, title, tagged)?;
    if references {
        tree = add_references(tree);
    }

    match output {
        Some(path) => {
            save_tree(&tree, path, format)?;
            eprintln!(
                "{} {} ({} sections)",
                style("Saved to:").green().bold(),
                path.display(),
                tree.descendants().len()
            );
        }
        None => println!("{}", render_tree(&tree, format)?),
    }
    Ok(())
}

fn batch_command(
    input_dir: &Path,
    output_dir: &Path,
    format: OutputFormat,
    tagged: bool,
) -> Result<()> {
    if !input_dir.is_dir() {
        return Err(StructurationError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input directory does not exist: {}", input_dir.display()),
        )));
    }

    let files: Vec<PathBuf> = WalkDir::new(input_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION))
        .collect();

    println!(
        "{} {} files from {}",
        style("Structuring").bold(),
        style(files.len()).cyan(),
        style(input_dir.display()).green()
    );

    let pb = ProgressBar::new(files.len() as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.green} {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let mut failures = 0usize;
    for path in &files {
        let relative = path.strip_prefix(input_dir).unwrap_or(path);
        pb.set_message(relative.display().to_string());
        let destination = output_dir.join(relative).with_extension(format.extension());
        let result =
            structure_file(path, None, tagged).and_then(|tree| save_tree(&tree, &destination, format));
        if let Err(e) = result {
            failures += 1;
            tracing::warn!(path = %path.display(), error = %e, "Failed to structure document");
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!(
        "{} {} structured, {} failed",
        style("Done:").green().bold(),
        files.len() - failures,
        if failures > 0 {
            style(failures).yellow().bold()
        } else {
            style(failures)
        }
    );
    Ok(())
}

fn show_command(input: &Path) -> Result<()> {
    let tree = load_tree(input)?;
    if !tree.title.text.is_empty() {
        println!("{}", style(&tree.title.text).bold());
    }
    for entry in outline(&tree) {
        let line = wrap_outline_title(&entry);
        let count = style(format!("({} alineas)", entry.alineas)).dim();
        if entry.active {
            println!("{line} {count}");
        } else {
            println!("{} {count}", style(line).strikethrough());
        }
    }
    Ok(())
}

fn detect_command(lines: &[String]) -> Result<()> {
    for line in lines {
        match detect_pattern(line) {
            Some(pattern) => println!(
                "{} {} {}",
                style(pattern).cyan(),
                style(matched_prefix(line).unwrap_or_default()).green(),
                line
            ),
            None => println!("{} {line}", style("-").dim()),
        }
    }
    match guess_numbering_pattern(lines) {
        Some(pattern) => println!("{} {}", style("Guessed:").bold(), style(pattern).cyan()),
        None => println!("{} none", style("Guessed:").bold()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_structure() {
        let cli = Cli::parse_from(["arrete-structure", "structure", "input.json"]);

        let Commands::Structure {
            input,
            title,
            output,
            format,
            tagged,
            references,
        } = cli.command
        else {
            panic!("expected structure command");
        };
        assert_eq!(input, PathBuf::from("input.json"));
        assert!(title.is_none());
        assert!(output.is_none());
        assert_eq!(format, OutputFormat::Json);
        assert!(!tagged);
        assert!(!references);
    }

    #[test]
    fn test_cli_parse_structure_with_options() {
        let cli = Cli::parse_from([
            "arrete-structure",
            "structure",
            "input.json",
            "--title",
            "Arrêté du 2 février 1998",
            "--format",
            "yaml",
            "--tagged",
            "--references",
        ]);

        let Commands::Structure {
            title,
            format,
            tagged,
            references,
            ..
        } = cli.command
        else {
            panic!("expected structure command");
        };
        assert_eq!(title, Some("Arrêté du 2 février 1998".to_string()));
        assert_eq!(format, OutputFormat::Yaml);
        assert!(tagged);
        assert!(references);
    }

    #[test]
    fn test_cli_parse_batch() {
        let cli = Cli::parse_from(["arrete-structure", "batch", "in", "--output-dir", "out"]);

        let Commands::Batch {
            input_dir,
            output_dir,
            ..
        } = cli.command
        else {
            panic!("expected batch command");
        };
        assert_eq!(input_dir, PathBuf::from("in"));
        assert_eq!(output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_cli_parse_detect_requires_lines() {
        assert!(Cli::try_parse_from(["arrete-structure", "detect"]).is_err());
        let cli = Cli::parse_from(["arrete-structure", "detect", "1. Foo", "2. Bar"]);
        let Commands::Detect { lines } = cli.command else {
            panic!("expected detect command");
        };
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_structure_elements_promotes_title_without_root_title() {
        let elements = vec![
            TextElement::text("DISPOSITIONS GÉNÉRALES"),
            TextElement::text("1. Foo"),
            TextElement::text("2. Bar"),
        ];
        let tree = structure_elements(None, &elements, false).unwrap();
        assert_eq!(tree.title.text, "DISPOSITIONS GÉNÉRALES");
        assert_eq!(tree.sections.len(), 2);
    }
}
