//! VF Delivery CLI
//!
//! Encode volume fields and deliver scene snapshots to files.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use vf_delivery::{
    deliver, delivery_label, load_volume, plan_delivery, read_header, CsvSpace, DeliverySettings,
    ExportFormat, GridDescriptor, Grouping, NoHostExporter, RemapRange, Sample, SceneContext,
    ValueKind, VolumeField,
};

#[derive(Parser)]
#[command(name = "vf-delivery")]
#[command(author, version, about = "Deliver volume fields, textures and position tracks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a volume field from a JSON input file
    Encode {
        /// Input JSON: {"size": [x, y, z], "values": [...]}
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (extension added when missing)
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "vf")]
        format: VolumeFormat,

        /// Value mapped to 0.0 in PNG output
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        range_lo: f32,

        /// Value mapped to 1.0 in PNG output
        #[arg(long, default_value = "1.0", allow_hyphen_values = true)]
        range_hi: f32,
    },

    /// Show information about a VF file
    Inspect {
        /// VF file to read
        file: PathBuf,
    },

    /// Deliver objects from a scene snapshot
    Deliver {
        /// Scene snapshot JSON
        #[arg(short, long)]
        scene: PathBuf,

        /// Settings JSON (flags below override it)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Delivery directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Delivery format
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// Combined or individual files
        #[arg(short, long, value_enum)]
        grouping: Option<Grouping>,

        /// Coordinate space for CSV tracks
        #[arg(long, value_enum)]
        csv_space: Option<CsvSpace>,

        /// Only print the files that would be written
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the delivery button label for a scene snapshot
    Label {
        /// Scene snapshot JSON
        #[arg(short, long)]
        scene: PathBuf,

        /// Settings JSON
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Delivery format
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum VolumeFormat {
    /// VF binary volume field
    Vf,
    /// PNG 3D-texture strip
    Png,
}

// JSON input format
#[derive(serde::Deserialize)]
struct VolumeInput {
    size: [u32; 3],
    #[serde(default)]
    kind: Option<ValueKind>,
    values: Vec<Sample>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            input,
            output,
            format,
            range_lo,
            range_hi,
        } => {
            encode_volume(&input, &output, format, range_lo, range_hi)?;
        }
        Commands::Inspect { file } => {
            inspect_volume(&file)?;
        }
        Commands::Deliver {
            scene,
            settings,
            output,
            format,
            grouping,
            csv_space,
            dry_run,
        } => {
            let mut settings = load_settings(settings.as_ref())?;
            if let Some(output) = output {
                settings.location = output;
            }
            if let Some(format) = format {
                settings.format = format;
            }
            if let Some(grouping) = grouping {
                settings.grouping = grouping;
            }
            if let Some(space) = csv_space {
                settings.csv_space = space;
            }
            run_delivery(&scene, &settings, dry_run)?;
        }
        Commands::Label {
            scene,
            settings,
            format,
        } => {
            let mut settings = load_settings(settings.as_ref())?;
            if let Some(format) = format {
                settings.format = format;
            }
            let scene = SceneContext::from_json(&fs::read_to_string(&scene)?)?;
            let label = delivery_label(&scene, &settings);
            println!(
                "{} [{:?}{}]",
                label.text,
                label.icon,
                if label.enabled { "" } else { ", disabled" }
            );
        }
    }

    Ok(())
}

fn load_settings(path: Option<&PathBuf>) -> Result<DeliverySettings, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            println!("Loading settings from {:?}...", path);
            Ok(DeliverySettings::load(path)?)
        }
        None => Ok(DeliverySettings::default()),
    }
}

fn encode_volume(
    input_path: &PathBuf,
    output_path: &PathBuf,
    format: VolumeFormat,
    range_lo: f32,
    range_hi: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading volume from {:?}...", input_path);
    let input: VolumeInput = serde_json::from_str(&fs::read_to_string(input_path)?)?;
    let grid = GridDescriptor::from_host(input.size)?;
    let kind = input
        .kind
        .or_else(|| input.values.first().map(|s| s.kind()))
        .unwrap_or(ValueKind::Scalar);
    let field = VolumeField::new(grid, kind, input.values)?;
    println!(
        "  Loaded {} {} samples on a {:?} grid",
        field.samples.len(),
        field.kind,
        grid.dims()
    );

    let (bytes, extension) = match format {
        VolumeFormat::Vf => (field.to_binary()?, "vf"),
        VolumeFormat::Png => {
            let strip = field.to_strip(RemapRange::new(range_lo, range_hi)?)?;
            println!("  Strip: {}x{}", strip.width, strip.height);
            (strip.to_png()?, "png")
        }
    };

    let path = if output_path.extension().is_some() {
        output_path.clone()
    } else {
        output_path.with_extension(extension)
    };
    fs::write(&path, &bytes)?;
    println!("Exported {} bytes to {:?}", bytes.len(), path);

    Ok(())
}

fn inspect_volume(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let header = read_header(&fs::read(path)?)?;
    let field = load_volume(path)?;

    println!("\nVF File Info:");
    println!("  Kind: {}", field.kind);
    println!("  Header dims (x, z, y): {:?}", header.on_disk);
    println!("  Grid (x, y, z): {:?}", field.grid.dims());
    println!("  Samples: {}", field.samples.len());
    if let Some((lo, hi)) = field.value_range() {
        println!("  Value range: [{}, {}]", lo, hi);
    }

    Ok(())
}

fn run_delivery(
    scene_path: &PathBuf,
    settings: &DeliverySettings,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading scene from {:?}...", scene_path);
    let scene = SceneContext::from_json(&fs::read_to_string(scene_path)?)?;
    println!("  Found {} objects", scene.objects.len());

    if dry_run || settings.format.is_host() {
        let plan = plan_delivery(&scene, settings)?;
        if settings.format.is_host() && !dry_run {
            println!(
                "{} is written by the host editor; showing the delivery plan instead",
                settings.format
            );
        }
        for job in &plan.jobs {
            println!("  {:?} <- {}", job.path, job.objects.join(", "));
        }
        for (name, reason) in &plan.skipped {
            println!("  skipped {}: {}", name, reason);
        }
        return Ok(());
    }

    let report = deliver(&scene, settings, &mut NoHostExporter)?;
    for path in &report.written {
        println!("Exported {:?}", path);
    }
    for (name, reason) in &report.skipped {
        println!("  skipped {}: {}", name, reason);
    }
    println!("Delivered {} file(s)", report.file_count());

    Ok(())
}
