mod logger;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use label_runtime::Workspace;
use label_sheets::{
    DragOutcome, LabelOptions, LabelStock, Offset, OffsetPreset, ScalingMode, SlotAdjustment,
    SlotCoord, calculate_statistics, coerce_offset_mm,
};
use logger::CliLogger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "labelsheet", about = "Place PDF pages onto label sheets", version)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place every page of the input PDFs into label slots
    Place {
        /// Input PDF file(s), placed in the order given
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long, required_unless_present = "stats_only")]
        output: Option<PathBuf>,

        /// Load options from a JSON config file before applying flags
        #[arg(long)]
        config: Option<PathBuf>,

        /// Save the resulting options to a JSON config file
        #[arg(long)]
        save_config: Option<PathBuf>,

        /// Label stock
        #[arg(long, value_enum)]
        stock: Option<StockArg>,

        /// Scaling mode
        #[arg(long, value_enum)]
        scaling: Option<ScalingArg>,

        /// Shrink pages that would not fit their slot
        #[arg(long)]
        clamp: bool,

        /// Let content spill outside its slot
        #[arg(long)]
        no_clip: bool,

        /// Don't draw slot outlines
        #[arg(long)]
        no_guide: bool,

        /// Offset preset applied to every slot
        #[arg(long, value_enum)]
        preset: Option<PresetArg>,

        /// Horizontal offset of the whole sheet in mm
        #[arg(long, allow_hyphen_values = true)]
        offset_x: Option<f32>,

        /// Vertical offset of the whole sheet in mm (positive moves up)
        #[arg(long, allow_hyphen_values = true)]
        offset_y: Option<f32>,

        /// Horizontal offset of every slot in mm
        #[arg(long, allow_hyphen_values = true)]
        slot_offset_x: Option<String>,

        /// Vertical offset of every slot in mm
        #[arg(long, allow_hyphen_values = true)]
        slot_offset_y: Option<String>,

        /// Scale of every slot in percent (10-200)
        #[arg(long)]
        slot_scale: Option<String>,

        /// Maximum number of sheets
        #[arg(long)]
        max_sheets: Option<usize>,

        /// Swap or move slot contents after placement, SHEET:SLOT=SHEET:SLOT
        /// (zero-based), e.g. 0:0=1:2
        #[arg(long = "swap", value_parser = parse_swap)]
        swaps: Vec<(SlotCoord, SlotCoord)>,

        /// Print where every page went
        #[arg(long)]
        list: bool,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// List the supported label stocks
    Stocks,
}

#[derive(Clone, Copy, ValueEnum)]
enum StockArg {
    Ls3116,
    A4x8,
    Letter10,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScalingArg {
    Original,
    FitWidth,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Tracx,
    Shopee,
}

impl From<StockArg> for LabelStock {
    fn from(arg: StockArg) -> Self {
        match arg {
            StockArg::Ls3116 => Self::Ls3116,
            StockArg::A4x8 => Self::A4TwoByFour,
            StockArg::Letter10 => Self::LetterTwoByFive,
        }
    }
}

impl From<ScalingArg> for ScalingMode {
    fn from(arg: ScalingArg) -> Self {
        match arg {
            ScalingArg::Original => Self::RespectOriginal,
            ScalingArg::FitWidth => Self::FitToSlotWidth,
        }
    }
}

impl From<PresetArg> for OffsetPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Tracx => Self::Tracx,
            PresetArg::Shopee => Self::Shopee,
        }
    }
}

fn parse_coord(text: &str) -> Result<SlotCoord, String> {
    let (sheet, slot) = text
        .split_once(':')
        .ok_or_else(|| format!("expected SHEET:SLOT, got '{}'", text))?;
    let sheet = sheet
        .trim()
        .parse()
        .map_err(|_| format!("invalid sheet index '{}'", sheet))?;
    let slot = slot
        .trim()
        .parse()
        .map_err(|_| format!("invalid slot index '{}'", slot))?;
    Ok(SlotCoord::new(sheet, slot))
}

fn parse_swap(text: &str) -> Result<(SlotCoord, SlotCoord), String> {
    let (from, to) = text
        .split_once('=')
        .ok_or_else(|| format!("expected SHEET:SLOT=SHEET:SLOT, got '{}'", text))?;
    Ok((parse_coord(from)?, parse_coord(to)?))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::from_flags(cli.verbose, cli.quiet).init()?;

    match cli.command {
        Commands::Stocks => {
            for stock in LabelStock::catalog() {
                let spec = stock.spec();
                println!(
                    "{:<12} {} x {} slots of {:.1} x {:.1} mm on {:.1} x {:.1} mm",
                    stock.name(),
                    spec.cols,
                    spec.rows,
                    spec.slot_width_mm,
                    spec.slot_height_mm,
                    spec.page_width_mm,
                    spec.page_height_mm
                );
            }
        }

        Commands::Place {
            input,
            output,
            config,
            save_config,
            stock,
            scaling,
            clamp,
            no_clip,
            no_guide,
            preset,
            offset_x,
            offset_y,
            slot_offset_x,
            slot_offset_y,
            slot_scale,
            max_sheets,
            swaps,
            list,
            stats_only,
        } => {
            let mut options = match &config {
                Some(path) => LabelOptions::load(path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => LabelOptions::default(),
            };

            if let Some(stock) = stock {
                options.stock = stock.into();
                options.reset_adjustments();
            }
            if let Some(preset) = preset {
                options.preset = Some(preset.into());
                options.reset_adjustments();
            }
            if let Some(scaling) = scaling {
                options.scaling_mode = scaling.into();
            }
            options.clamp_to_slot |= clamp;
            if no_clip {
                options.clip_to_slot = false;
            }
            if no_guide {
                options.show_guide = false;
            }
            if offset_x.is_some() || offset_y.is_some() {
                options.sheet_offset = Offset::new(
                    coerce_offset_mm(offset_x.unwrap_or(options.sheet_offset.x_mm)),
                    coerce_offset_mm(offset_y.unwrap_or(options.sheet_offset.y_mm)),
                );
            }
            if slot_offset_x.is_some() || slot_offset_y.is_some() || slot_scale.is_some() {
                let base = options.adjustment_for(0);
                let adjustment = SlotAdjustment::parse(
                    &slot_offset_x.unwrap_or_else(|| base.offset_x_mm.to_string()),
                    &slot_offset_y.unwrap_or_else(|| base.offset_y_mm.to_string()),
                    &slot_scale.unwrap_or_else(|| base.scale_percent.to_string()),
                );
                options.slot_adjustments.fill(adjustment);
            }
            if let Some(max_sheets) = max_sheets {
                options.max_sheets = max_sheets;
            }
            options.validate()?;

            if let Some(path) = &save_config {
                options.save(path).await?;
                println!("Saved config → {}", path.display());
            }

            let mut workspace = Workspace::new(options)?;
            let upload = workspace.add_files(&input).await;
            for failure in &upload.failed {
                eprintln!("Skipped {}: {}", failure.name, failure.error);
            }
            if upload.added.is_empty() {
                bail!("None of the input files could be loaded");
            }

            for (from, to) in swaps {
                match workspace.session.drag_swap(from, to) {
                    DragOutcome::Ignored => {
                        log::warn!("Ignored swap {} -> {}", from.label(), to.label())
                    }
                    outcome => log::debug!("{:?}", outcome),
                }
            }

            let stats = calculate_statistics(&workspace.session);
            println!("Label Statistics:");
            println!("  Stock: {}", workspace.session.options().stock.name());
            println!("  Pages: {}", stats.items);
            println!("  Assigned: {}", stats.assigned);
            if stats.unassigned > 0 {
                println!(
                    "  Unassigned: {} (sheet limit {} reached)",
                    stats.unassigned,
                    workspace.session.options().max_sheets
                );
            }
            println!("  Sheets to print: {}", stats.sheets_to_print);
            println!("  Free slots: {}", stats.free_slots);

            if list {
                for (ordinal, item) in workspace.session.items().iter().enumerate() {
                    println!(
                        "  {:>3}. {:<30} {}",
                        ordinal + 1,
                        item.name(),
                        item.assignment_label()
                    );
                }
            }

            if stats_only {
                return Ok(());
            }

            let Some(output) = output else {
                bail!("No output file given");
            };
            let artifact = workspace.export_to(&output).await?;
            println!(
                "Placed {} page(s) on {} sheet(s) → {}",
                stats.assigned,
                artifact.sheets,
                output.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_swap() {
        assert_eq!(
            parse_swap("0:1=2:3").unwrap(),
            (SlotCoord::new(0, 1), SlotCoord::new(2, 3))
        );
        assert!(parse_swap("0:1").is_err());
        assert!(parse_swap("a:1=0:0").is_err());
        assert!(parse_swap("0-1=0:0").is_err());
    }

    #[test]
    fn test_cli_parses_place() {
        let cli = Cli::try_parse_from([
            "labelsheet",
            "place",
            "-i",
            "a.pdf",
            "b.pdf",
            "-o",
            "out.pdf",
            "--stock",
            "a4x8",
            "--offset-x",
            "-1.5",
            "--swap",
            "0:0=0:1",
        ])
        .unwrap();

        match cli.command {
            Commands::Place {
                input,
                offset_x,
                swaps,
                ..
            } => {
                assert_eq!(input.len(), 2);
                assert_eq!(offset_x, Some(-1.5));
                assert_eq!(swaps.len(), 1);
            }
            Commands::Stocks => panic!("Expected place"),
        }
    }

    #[test]
    fn test_output_required_unless_stats_only() {
        assert!(Cli::try_parse_from(["labelsheet", "place", "-i", "a.pdf"]).is_err());
        assert!(
            Cli::try_parse_from(["labelsheet", "place", "-i", "a.pdf", "--stats-only"]).is_ok()
        );
    }
}
