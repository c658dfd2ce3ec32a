use clap::{Parser, Subcommand};
use image::{GenericImageView, ImageBuffer, Rgba};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use stegano_container::container::PayloadDescriptor;
use stegano_container::image_codec::CarrierImage;
use stegano_container::{
    estimate_capacity, hide_emoji, hide_image, reveal_emoji, reveal_image, reveal_image_verbose,
    HideEmojiOptions, HideImageOptions,
};

#[derive(Parser)]
#[command(name = "steg", version = "1.0.0", about = "Hide and reveal payloads in images and emoji text")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a file inside a carrier PNG's pixel LSBs
    HideImage {
        #[arg(short, long)]
        carrier: PathBuf,
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Bits per channel used for embedding (1-4)
        #[arg(short, long, default_value = "1")]
        depth: u8,
        /// Also use the alpha channel, raising capacity by a third
        #[arg(long)]
        use_alpha: bool,
        #[arg(short, long)]
        password: Option<String>,
        #[arg(long)]
        no_compress: bool,
        #[arg(long, default_value = "application/octet-stream")]
        mime: String,
    },
    /// Reveal a payload previously hidden with hide-image
    RevealImage {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        password: Option<String>,
        /// Print which (depth, alpha) combinations were tried
        #[arg(long)]
        verbose: bool,
    },
    /// Hide a UTF-8 message inside a string of emoji cover graphemes
    HideEmoji {
        message: String,
        #[arg(short, long)]
        password: Option<String>,
        #[arg(short, long, default_value = "mixed")]
        theme: String,
        /// Read one cover grapheme per line from this file (implies theme=custom)
        #[arg(long)]
        graphemes_file: Option<PathBuf>,
    },
    /// Reveal a message previously hidden with hide-emoji
    RevealEmoji {
        text: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Report header size and remaining payload capacity for a carrier image
    Capacity {
        #[arg(short, long)]
        carrier: PathBuf,
        #[arg(short, long, default_value = "1")]
        depth: u8,
        #[arg(long)]
        use_alpha: bool,
        #[arg(long)]
        encrypt: bool,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::HideImage {
            carrier,
            input,
            output,
            depth,
            use_alpha,
            password,
            no_compress,
            mime,
        } => {
            let mut carrier_image = load_carrier(&carrier)?;
            let bytes = fs::read(&input)?;
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let payload = PayloadDescriptor { name, mime, bytes };
            let opts = HideImageOptions {
                encrypt: password.is_some(),
                compress: !no_compress,
                depth,
                use_alpha,
            };
            hide_image(&mut carrier_image, &payload, password.as_deref(), &opts)?;
            save_carrier(&carrier_image, &output)?;
            println!("hid {} bytes in {}", payload_len_hint(&input)?, output.display());
            Ok(())
        }
        Commands::RevealImage {
            input,
            output,
            password,
            verbose,
        } => {
            let carrier_image = load_carrier(&input)?;
            let revealed = if verbose {
                let (result, log) = reveal_image_verbose(&carrier_image, password.as_deref());
                for attempt in &log {
                    eprintln!(
                        "  depth={} alpha={}: {}",
                        attempt.depth, attempt.use_alpha, attempt.outcome
                    );
                }
                result?
            } else {
                reveal_image(&carrier_image, password.as_deref())?
            };
            fs::write(&output, &revealed.bytes)?;
            println!(
                "revealed {} ({} bytes, encrypted={}, compressed={}) -> {}",
                revealed.name,
                revealed.bytes.len(),
                revealed.was_encrypted,
                revealed.was_compressed,
                output.display()
            );
            Ok(())
        }
        Commands::HideEmoji {
            message,
            password,
            theme,
            graphemes_file,
        } => {
            let custom_graphemes = match &graphemes_file {
                Some(path) => fs::read_to_string(path)?
                    .lines()
                    .map(|l| l.to_string())
                    .collect(),
                None => Vec::new(),
            };
            let theme = if graphemes_file.is_some() {
                stegano_container::emoji_codec::Theme::Custom
            } else {
                parse_theme(&theme)
            };
            let opts = HideEmojiOptions {
                encrypt: password.is_some(),
                theme: Some(theme),
                custom_graphemes,
            };
            let encoded = hide_emoji(&message, password.as_deref(), &opts)?;
            println!("{encoded}");
            Ok(())
        }
        Commands::RevealEmoji { text, password } => {
            let revealed = reveal_emoji(&text, password.as_deref())?;
            println!("{}", revealed.text);
            Ok(())
        }
        Commands::Capacity {
            carrier,
            depth,
            use_alpha,
            encrypt,
            json,
        } => {
            let img = image::open(&carrier)?;
            let (w, h) = img.dimensions();
            let estimate = estimate_capacity(w, h, depth, use_alpha, encrypt, "", "");
            if json {
                println!("{}", serde_json::to_string(&estimate)?);
            } else {
                println!("carrier:           {}x{}", w, h);
                println!("depth:             {depth} (alpha: {use_alpha})");
                println!("header size:       {} bytes", estimate.header_size);
                println!("payload capacity:  {} bytes", estimate.payload_capacity);
                if use_alpha {
                    println!("note: stripping or flattening alpha in later edits destroys the payload");
                }
            }
            Ok(())
        }
    }
}

fn parse_theme(name: &str) -> stegano_container::emoji_codec::Theme {
    use stegano_container::emoji_codec::Theme;
    match name {
        "faces" => Theme::Faces,
        "nature" => Theme::Nature,
        "objects" => Theme::Objects,
        "custom" => Theme::Custom,
        _ => Theme::Mixed,
    }
}

fn load_carrier(path: &PathBuf) -> Result<CarrierImage, Box<dyn std::error::Error>> {
    let img = image::open(path)?.to_rgba8();
    let (width, height) = img.dimensions();
    Ok(CarrierImage::new(width, height, img.into_raw()))
}

fn save_carrier(image: &CarrierImage, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(image.width, image.height, image.pixels.clone())
            .ok_or("carrier buffer dimensions do not match pixel data")?;
    buffer.save(path)?;
    Ok(())
}

fn payload_len_hint(input: &PathBuf) -> std::io::Result<u64> {
    Ok(fs::metadata(input)?.len())
}
