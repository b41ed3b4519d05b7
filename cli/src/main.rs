//! pagescan CLI - inspect and edit OCR page records

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};

use pagescan::render::{self, RichText, TextRun, WordListDictionary};
use pagescan::{load_page, save_page, BoxType, JsonFormat, Page, ReconstructOptions, ResultWriter, Settings};

#[derive(Parser)]
#[command(name = "pagescan")]
#[command(version)]
#[command(about = "Inspect and edit OCR page records", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the boxes of a page
    Info {
        /// Page record file
        #[arg(value_name = "PAGE")]
        input: PathBuf,
    },

    /// Print the plain text of a page
    Text {
        /// Page record file
        #[arg(value_name = "PAGE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the reconstructed text of a box with highlights
    Show {
        /// Page record file
        #[arg(value_name = "PAGE")]
        input: PathBuf,

        /// Box index
        index: usize,

        /// Settings file
        #[arg(short, long, value_name = "FILE", env = "PAGESCAN_SETTINGS")]
        settings: Option<PathBuf>,

        /// Word list used to veto hyphenation merges (enables spell checking)
        #[arg(long, value_name = "FILE")]
        dictionary: Option<PathBuf>,
    },

    /// Print the normalized page record
    Json {
        /// Page record file
        #[arg(value_name = "PAGE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the export payload of a page
    Export {
        /// Page record file
        #[arg(value_name = "PAGE")]
        input: PathBuf,

        /// Settings file
        #[arg(short, long, value_name = "FILE", env = "PAGESCAN_SETTINGS")]
        settings: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Change the type of a box
    Convert {
        /// Page record file
        #[arg(value_name = "PAGE")]
        input: PathBuf,

        /// Box index
        index: usize,

        /// New box type (e.g. FLOWING_IMAGE)
        box_type: String,

        /// Output file (input is overwritten if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Merge the second box into the first
    Merge {
        /// Page record file
        #[arg(value_name = "PAGE")]
        input: PathBuf,

        /// Box that is kept
        first: usize,

        /// Box that is merged and removed
        second: usize,

        /// Output file (input is overwritten if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Move a box to another reading order position
    Move {
        /// Page record file
        #[arg(value_name = "PAGE")]
        input: PathBuf,

        /// Current position
        from: usize,

        /// New position
        to: usize,

        /// Output file (input is overwritten if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Remove a box
    Remove {
        /// Page record file
        #[arg(value_name = "PAGE")]
        input: PathBuf,

        /// Box index
        index: usize,

        /// Output file (input is overwritten if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Info { input } => cmd_info(&input),
        Commands::Text { input, output } => cmd_text(&input, output.as_deref()),
        Commands::Show {
            input,
            index,
            settings,
            dictionary,
        } => cmd_show(&input, index, settings.as_deref(), dictionary.as_deref()),
        Commands::Json {
            input,
            output,
            compact,
        } => cmd_json(&input, output.as_deref(), compact),
        Commands::Export {
            input,
            settings,
            output,
        } => cmd_export(&input, settings.as_deref(), output.as_deref()),
        Commands::Convert {
            input,
            index,
            box_type,
            output,
        } => edit(&input, output.as_deref(), |page| {
            let box_type: BoxType = box_type.parse()?;
            page.convert(index, box_type)?;
            Ok(format!("Converted box {} to {}", index, box_type))
        }),
        Commands::Merge {
            input,
            first,
            second,
            output,
        } => edit(&input, output.as_deref(), |page| {
            page.merge(first, second)?;
            Ok(format!("Merged box {} into {}", second, first))
        }),
        Commands::Move {
            input,
            from,
            to,
            output,
        } => edit(&input, output.as_deref(), |page| {
            page.layout.move_box(from, to)?;
            Ok(format!("Moved box {} to {}", from, to))
        }),
        Commands::Remove {
            input,
            index,
            output,
        } => edit(&input, output.as_deref(), |page| {
            let removed = page.layout.remove(index)?;
            Ok(format!("Removed box {} ({})", index, removed.box_type()))
        }),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings, pagescan::Error> {
    match path {
        Some(path) => Settings::from_file(path),
        None => Ok(Settings::default()),
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_info(input: &Path) -> CliResult {
    let page = load_page(input)?;

    println!("{}", "Page Information".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref image) = page.image_path {
        println!("{}: {}", "Image".bold(), image.display());
    }
    println!("{}: {}", "Order".bold(), page.order);
    println!("{}: {:?}", "Region".bold(), page.layout.region.to_array());
    println!(
        "{}: {} / {}",
        "Header / Footer".bold(),
        page.layout.header_y,
        page.layout.footer_y
    );
    println!("{}: {}", "Boxes".bold(), page.layout.len());

    if page.layout.is_empty() {
        return Ok(());
    }

    println!();
    println!(
        "{}",
        format!(
            "{:>4}  {:<16} {:>20}  {:>5}  {:>6}  {}",
            "#", "Type", "Position", "Conf", "Words", "Text"
        )
        .bold()
    );
    println!("{}", "─".repeat(60).dimmed());

    for ocr_box in page.layout.iter() {
        let position = format!(
            "{},{} {}x{}",
            ocr_box.bbox.x, ocr_box.bbox.y, ocr_box.bbox.width, ocr_box.bbox.height
        );
        let words = ocr_box.results.as_ref().map_or(0, |r| r.word_count());
        let mut preview: String = ocr_box.display_text().replace('\n', " ");
        if preview.chars().count() > 40 {
            preview = preview.chars().take(39).collect::<String>() + "…";
        }
        let flow = if ocr_box.flows_into_next() { " ↪" } else { "" };

        println!(
            "{:>4}  {:<16} {:>20}  {:>5.2}  {:>6}  {}{}",
            ocr_box.order,
            ocr_box.box_type().name(),
            position,
            ocr_box.confidence,
            words,
            preview,
            flow.cyan()
        );
    }

    Ok(())
}

fn cmd_text(input: &Path, output: Option<&Path>) -> CliResult {
    let text = pagescan::extract_text(input)?;
    write_or_print(output, &text)
}

fn cmd_show(
    input: &Path,
    index: usize,
    settings: Option<&Path>,
    dictionary: Option<&Path>,
) -> CliResult {
    let page = load_page(input)?;
    let settings = load_settings(settings)?;

    let mut options = ReconstructOptions::from_settings(&settings);
    let mut writer_dictionary = None;
    if let Some(path) = dictionary {
        let mut words = WordListDictionary::new();
        words.load_word_list(&options.language, &fs::read_to_string(path)?);
        log::debug!("Loaded {} words from {}", words.len(&options.language), path.display());
        writer_dictionary = Some(Arc::new(words));
        options = options.with_spell_check(true);
    }

    let mut writer = ResultWriter::new(options);
    if let Some(dictionary) = writer_dictionary {
        writer = writer.with_dictionary(dictionary);
    }

    let text = render::reconstruct_flow(&page.layout, index, &writer).ok_or(
        pagescan::Error::InvalidIndex {
            index,
            len: page.layout.len(),
        },
    )?;

    if text.is_empty() {
        println!("{}", "(no recognized text)".dimmed());
        return Ok(());
    }

    println!("{}", colorize(&text));

    if !text.hyphenations.is_empty() {
        println!();
        println!("{}", "Hyphenations".cyan().bold());
        for hyphenation in &text.hyphenations {
            println!(
                "  {} + {} {} {:?}",
                hyphenation.first_part,
                hyphenation.second_part,
                "→".dimmed(),
                hyphenation.decision
            );
        }
    }

    Ok(())
}

fn colorize(text: &RichText) -> String {
    text.runs.iter().map(|run| styled(run).to_string()).collect()
}

fn styled(run: &TextRun) -> ColoredString {
    let mut styled = run.text.as_str().normal();
    if let Some(color) = run.style.color {
        styled = styled.truecolor(color.r, color.g, color.b);
    }
    if let Some(background) = run.style.background_color {
        styled = styled.on_truecolor(background.r, background.g, background.b);
    }
    styled
}

fn cmd_json(input: &Path, output: Option<&Path>, compact: bool) -> CliResult {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = pagescan::to_json(input, format)?;
    write_or_print(output, &json)
}

fn cmd_export(input: &Path, settings: Option<&Path>, output: Option<&Path>) -> CliResult {
    let page = load_page(input)?;
    let settings = load_settings(settings)?;

    let export = page.export_data(&settings);
    let json = render::to_json(&export, JsonFormat::Pretty)?;
    write_or_print(output, &json)
}

fn edit<F>(input: &Path, output: Option<&Path>, operation: F) -> CliResult
where
    F: FnOnce(&mut Page) -> Result<String, pagescan::Error>,
{
    let mut page = load_page(input)?;
    let message = operation(&mut page)?;

    let target = output.unwrap_or(input);
    save_page(&page, target)?;

    println!("{} {}", message.green(), format!("({})", target.display()).dimmed());
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pagescan".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("OCR page record tool");
    println!();
    println!("Library: pagescan {}", pagescan::version());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagescan::OcrBox;

    fn write_page(dir: &Path) -> PathBuf {
        let path = dir.join("page.json");
        let mut page = Page::new().with_image("scan.png");
        for y in [0, 100, 200] {
            page.layout
                .add(OcrBox::with_geometry(0, y, 50, 20, BoxType::FlowingText), None)
                .unwrap();
        }
        save_page(&page, &path).unwrap();
        path
    }

    #[test]
    fn test_edit_writes_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_page(dir.path());
        let output = dir.path().join("edited.json");

        edit(&input, Some(&output), |page| {
            page.layout.remove(0)?;
            Ok("removed".to_string())
        })
        .unwrap();

        assert_eq!(load_page(&input).unwrap().layout.len(), 3);
        assert_eq!(load_page(&output).unwrap().layout.len(), 2);
    }

    #[test]
    fn test_edit_failure_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_page(dir.path());
        let before = fs::read_to_string(&input).unwrap();

        let result = edit(&input, None, |page| {
            page.layout.move_box(0, 9)?;
            Ok("moved".to_string())
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&input).unwrap(), before);
    }

    #[test]
    fn test_load_settings_default() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
