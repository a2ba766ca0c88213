//! CLI for halftone QR codes

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use qart::{ECLevel, MaskSource, OptionUpdate, QRBuilder, Rect, RenderOption};

#[derive(Parser)]
#[command(name = "qart")]
#[command(about = "Generate QR codes blended with a picture or an animation", long_about = None)]
struct Cli {
    /// Content to encode, words are joined with a single space
    content: Vec<String>,

    /// Picture or GIF blended into the code
    #[arg(short, long)]
    mask: Option<PathBuf>,

    /// Output file, stdout if unset
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Point width hint
    #[arg(short = 's', long, default_value_t = 3)]
    point_width: u32,

    /// Print the code as text art
    #[arg(short, long)]
    text: bool,

    /// Swap foreground and background
    #[arg(short, long)]
    invert: bool,

    /// Left edge of the mask rectangle
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    start_x: i32,

    /// Top edge of the mask rectangle
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    start_y: i32,

    /// Side of the square mask rectangle, 0 uses the whole picture
    #[arg(long, default_value_t = 0)]
    width: u32,

    /// Paste the code into the picture at the mask rectangle
    #[arg(long)]
    embed: bool,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    tracing_subscriber::registry()
        .with(EnvFilter::builder().with_default_directive(level.into()).from_env_lossy())
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let content = cli.content.join(" ");
    if content.is_empty() {
        bail!("no content given");
    }

    let mut qr = QRBuilder::new(content.as_bytes())
        .ec_level(ECLevel::H)
        .build()
        .context("failed to encode content")?;
    debug!(version = *qr.version(), mask = *qr.mask(), "Encoded content");

    if cli.text {
        return emit(cli.output, qr.to_str(cli.invert).as_bytes());
    }

    let mut update = OptionUpdate::new().embed(cli.embed);
    if cli.invert {
        update = update
            .foreground(RenderOption::DEFAULT_BACKGROUND)
            .background(RenderOption::DEFAULT_FOREGROUND);
    }
    if let Some(rect) = mask_rect(&cli) {
        update = update.mask_rect(rect);
    }
    if let Some(path) = cli.mask {
        update = update.mask(MaskSource::Path(path));
    }
    qr.add_option(update);

    let data = qr.image_data(cli.point_width).context("failed to render code")?;
    emit(cli.output, &data)
}

// Negative corners or a zero width leave the whole picture as the mask
fn mask_rect(cli: &Cli) -> Option<Rect> {
    if cli.start_x < 0 || cli.start_y < 0 || cli.width == 0 {
        return None;
    }
    Some(Rect::at(cli.start_x, cli.start_y).of_size(cli.width, cli.width))
}

fn emit(output: Option<PathBuf>, data: &[u8]) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(&path, data)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod cli_tests {
    use clap::Parser;
    use test_case::test_case;

    use super::{mask_rect, Cli};
    use qart::Rect;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("qart").chain(args.iter().copied())).unwrap()
    }

    #[test_case(&["--start-x", "-5", "--width", "40", "hi"])]
    #[test_case(&["--start-y=-1", "--width", "40", "hi"])]
    #[test_case(&["--start-x", "3", "--start-y", "4", "hi"])]
    fn test_rect_ignored(args: &[&str]) {
        assert_eq!(mask_rect(&parse(args)), None);
    }

    #[test]
    fn test_rect_square() {
        let cli = parse(&["--start-x", "3", "--start-y", "4", "--width", "40", "hello", "world"]);
        assert_eq!(mask_rect(&cli), Some(Rect::at(3, 4).of_size(40, 40)));
        assert_eq!(cli.content.join(" "), "hello world");
    }
}
